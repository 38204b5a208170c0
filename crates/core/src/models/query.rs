use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Separator between `name:value` pairs in a derived cache key.
const KEY_SEPARATOR: &str = "|";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SORT: &str = "date,asc";
pub const SEARCH_UNIT: &str = "miles";

/// Human-facing event category, mapped to an upstream segment id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Music,
    Sports,
    Theatre,
    Comedy,
    Family,
    /// Any other key. Sent without a segment filter.
    Other(String),
}

impl Category {
    pub fn key(&self) -> &str {
        match self {
            Category::Music => "music",
            Category::Sports => "sports",
            Category::Theatre => "theatre",
            Category::Comedy => "comedy",
            Category::Family => "family",
            Category::Other(key) => key,
        }
    }

    /// Upstream segment id. Comedy and family share the same segment.
    pub fn segment_id(&self) -> Option<&'static str> {
        match self {
            Category::Music => Some("KZFzniwnSyZfZ7v7nJ"),
            Category::Sports => Some("KZFzniwnSyZfZ7v7nE"),
            Category::Theatre => Some("KZFzniwnSyZfZ7v7na"),
            Category::Comedy | Category::Family => Some("KZFzniwnSyZfZ7v7n1"),
            Category::Other(_) => None,
        }
    }
}

impl From<&str> for Category {
    fn from(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "music" => Category::Music,
            "sports" => Category::Sports,
            "theatre" => Category::Theatre,
            "comedy" => Category::Comedy,
            "family" => Category::Family,
            _ => Category::Other(key.to_string()),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Optional filters for an event search. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub size: Option<u32>,
    pub page: Option<u32>,
    pub sort: Option<String>,
    /// Date-only; sent upstream as midnight UTC.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub include_family: Option<bool>,
    pub include_tba: Option<bool>,
    pub include_tbd: Option<bool>,
    pub include_test: Option<bool>,
    pub genre_id: Option<String>,
    pub sub_genre_id: Option<String>,
    /// Explicit search radius in miles.
    pub radius: Option<u32>,
}

/// A full event search: keyword, category, filters and optional coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub keyword: Option<String>,
    pub category: Option<Category>,
    pub options: SearchOptions,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn near(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates, or nothing. A lone latitude or longitude is ignored.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Every logical input of the search as `(name, value)`, absent ones as `None`.
    pub fn cache_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        let o = &self.options;
        vec![
            ("keyword", self.keyword.clone()),
            ("classificationName", self.category.as_ref().map(|c| c.key().to_string())),
            ("size", o.size.map(|v| v.to_string())),
            ("page", o.page.map(|v| v.to_string())),
            ("sort", o.sort.clone()),
            ("startDateTime", o.start_date.map(|d| d.to_string())),
            ("endDateTime", o.end_date.map(|d| d.to_string())),
            ("city", o.city.clone()),
            ("stateCode", o.state_code.clone()),
            ("includeFamily", o.include_family.map(|v| v.to_string())),
            ("includeTBA", o.include_tba.map(|v| v.to_string())),
            ("includeTBD", o.include_tbd.map(|v| v.to_string())),
            ("includeTest", o.include_test.map(|v| v.to_string())),
            ("genreId", o.genre_id.clone()),
            ("subGenreId", o.sub_genre_id.clone()),
            ("radius", o.radius.map(|v| v.to_string())),
            ("latitude", self.latitude.map(|v| v.to_string())),
            ("longitude", self.longitude.map(|v| v.to_string())),
        ]
    }

    pub fn cache_key(&self) -> String {
        cache_key(self.cache_pairs())
    }

    /// Query parameters for `GET /events`, without the API key.
    ///
    /// `radius` is the already-resolved search radius; it is sent only when
    /// given, and `latlong` only when both coordinates are present.
    pub fn upstream_params(&self, country_code: &str, radius: Option<u32>) -> Vec<(String, String)> {
        let o = &self.options;
        let params: Vec<(&str, Option<String>)> = vec![
            ("keyword", self.keyword.clone()),
            (
                "segmentId",
                self.category
                    .as_ref()
                    .and_then(Category::segment_id)
                    .map(str::to_string),
            ),
            ("countryCode", Some(country_code.to_string())),
            ("size", Some(o.size.unwrap_or(DEFAULT_PAGE_SIZE).to_string())),
            ("page", Some(o.page.unwrap_or(0).to_string())),
            ("sort", Some(o.sort.clone().unwrap_or_else(|| DEFAULT_SORT.to_string()))),
            ("startDateTime", o.start_date.map(format_api_date)),
            ("endDateTime", o.end_date.map(format_api_date)),
            ("city", o.city.clone()),
            ("stateCode", o.state_code.clone()),
            (
                "latlong",
                self.coordinates().map(|(lat, lon)| format!("{lat},{lon}")),
            ),
            ("radius", radius.map(|r| r.to_string())),
            ("unit", Some(SEARCH_UNIT.to_string())),
            ("includeFamily", o.include_family.map(|v| v.to_string())),
            ("includeTBA", Some(o.include_tba.unwrap_or(false).to_string())),
            ("includeTBD", Some(o.include_tbd.unwrap_or(false).to_string())),
            ("includeTest", Some(o.include_test.unwrap_or(false).to_string())),
            ("genreId", o.genre_id.clone()),
            ("subGenreId", o.sub_genre_id.clone()),
        ];

        params
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect()
    }
}

/// Derive a deterministic key from named values.
///
/// Absent values are skipped, the rest are sorted by name and rendered as
/// `name:value` joined by `|`, so the order in which pairs are supplied
/// never changes the result. `%`, `|` and `:` inside values are
/// percent-encoded.
pub fn cache_key<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let mut present: Vec<(&str, String)> = pairs
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
    present.sort();
    present
        .iter()
        .map(|(name, value)| format!("{name}:{}", escape_key_value(value)))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Percent-encode the separator characters so two different inputs never
/// render to the same key.
fn escape_key_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            '|' => out.push_str("%7C"),
            ':' => out.push_str("%3A"),
            other => out.push(other),
        }
    }
    out
}

/// `YYYY-MM-DD` → `YYYY-MM-DDT00:00:00Z`, the form the Discovery API expects.
pub fn format_api_date(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}
