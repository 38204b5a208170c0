use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use storefront_core::errors::CoreError;
use storefront_core::models::query::{EventQuery, SearchOptions};
use storefront_core::models::settings::Settings;
use storefront_core::services::events_gateway::filter_by_price;
use storefront_core::Storefront;

/// Browse the Discovery API through the storefront data layer.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
struct Cli {
    /// Discovery API key (falls back to TICKETMASTER_API_KEY / .env).
    #[arg(long, env = "TICKETMASTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search events.
    Search {
        #[arg(long)]
        keyword: Option<String>,
        /// music, sports, theatre, comedy, family
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state_code: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,
        /// YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
        /// Miles
        #[arg(long)]
        radius: Option<u32>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Show one event.
    Event { id: String },
    /// Show one venue.
    Venue { id: String },
    /// Show an event with its venue.
    Details { id: String },
    /// Landing page lanes.
    Home {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CoreError> {
    let mut settings = Settings::from_env()?;
    if let Some(key) = cli.api_key {
        settings.api_key = key;
    }
    let storefront = Storefront::from_settings(settings)?;

    match cli.command {
        Command::Search {
            keyword,
            category,
            city,
            state_code,
            from,
            to,
            size,
            lat,
            lon,
            radius,
            min_price,
            max_price,
        } => {
            let mut query = EventQuery::new().with_options(SearchOptions {
                size,
                start_date: from,
                end_date: to,
                city,
                state_code,
                radius,
                ..SearchOptions::default()
            });
            query.keyword = keyword;
            query.category = category.as_deref().map(Into::into);
            query.latitude = lat;
            query.longitude = lon;

            let events = storefront.search_events(&query).await?;
            let events = match (min_price, max_price) {
                (None, None) => events,
                (min, max) => filter_by_price(
                    &events,
                    min.unwrap_or(0.0),
                    max.unwrap_or(f64::INFINITY),
                ),
            };
            print_json(&events)
        }
        Command::Event { id } => print_json(&storefront.get_event(&id).await?),
        Command::Venue { id } => print_json(&storefront.get_venue(&id).await?),
        Command::Details { id } => print_json(&storefront.get_event_details(&id).await?),
        Command::Home { lat, lon } => {
            print_json(&storefront.home_lanes(lat.zip(lon)).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CoreError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::Serialization(format!("Failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}
