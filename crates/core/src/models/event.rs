use serde::{Deserialize, Serialize};

/// Upstream status codes for events that can no longer be sold.
const UNSELLABLE_STATUS_CODES: [&str; 2] = ["cancelled", "offsale"];

/// Availability below or at this count is flagged as `Limited`.
pub const LIMITED_THRESHOLD: u32 = 2;

/// Sales state derived from the number of tickets still available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Available,
    Limited,
    SoldOut,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityStatus::Available => write!(f, "AVAILABLE"),
            AvailabilityStatus::Limited => write!(f, "LIMITED"),
            AvailabilityStatus::SoldOut => write!(f, "SOLD_OUT"),
        }
    }
}

/// Ticket availability attached to an event after retrieval.
///
/// Not part of the upstream payload. Built only through [`Availability::from_counts`]
/// so that `available == 0 ⟺ SoldOut` and `Limited ⟹ 0 < available ≤ 2` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub limit: u32,
    pub available: u32,
    pub status: AvailabilityStatus,
}

impl Availability {
    /// Derive the status from the counts. `available` is clamped to `limit`.
    pub fn from_counts(limit: u32, available: u32) -> Self {
        let available = available.min(limit);
        let status = match available {
            0 => AvailabilityStatus::SoldOut,
            n if n <= LIMITED_THRESHOLD => AvailabilityStatus::Limited,
            _ => AvailabilityStatus::Available,
        };
        Self {
            limit,
            available,
            status,
        }
    }

    pub fn sold_out(limit: u32) -> Self {
        Self::from_counts(limit, 0)
    }

    pub fn is_sold_out(&self) -> bool {
        self.status == AvailabilityStatus::SoldOut
    }
}

/// One upstream price band for an event (e.g. "standard", USD 45–120).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(rename = "type", default)]
    pub price_type: String,
    #[serde(default)]
    pub currency: String,
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventImage {
    pub url: String,
    #[serde(default)]
    pub ratio: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub segment: Option<Segment>,
    #[serde(default)]
    pub family: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default)]
    pub local_date: Option<String>,
    #[serde(default)]
    pub local_time: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatus {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDates {
    #[serde(default)]
    pub start: EventStart,
    #[serde(default)]
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seatmap {
    #[serde(rename = "staticUrl")]
    pub static_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLimit {
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRef {
    pub state_code: String,
}

/// The abbreviated venue embedded in an event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub city: Option<CityRef>,
    #[serde(default)]
    pub state: Option<StateRef>,
    #[serde(default)]
    pub seatmap: Option<Seatmap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEmbedded {
    #[serde(default)]
    pub venues: Vec<VenueRef>,
}

/// A listed event as returned by the Discovery API, plus derived availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dates: EventDates,
    #[serde(rename = "_embedded", default)]
    pub embedded: EventEmbedded,
    #[serde(default)]
    pub price_ranges: Vec<PriceRange>,
    #[serde(default)]
    pub images: Vec<EventImage>,
    #[serde(default)]
    pub classifications: Vec<Classification>,
    #[serde(default)]
    pub seatmap: Option<Seatmap>,
    #[serde(default)]
    pub please_note: Option<String>,
    #[serde(default)]
    pub ticket_limit: Option<TicketLimit>,
    #[serde(default)]
    pub availability: Option<Availability>,
}

impl Event {
    /// Minimal event with only id and name, everything else empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            dates: EventDates::default(),
            embedded: EventEmbedded::default(),
            price_ranges: Vec::new(),
            images: Vec::new(),
            classifications: Vec::new(),
            seatmap: None,
            please_note: None,
            ticket_limit: None,
            availability: None,
        }
    }

    /// Whether the upstream status still allows selling tickets.
    pub fn is_on_sale(&self) -> bool {
        match self.dates.status.code.as_deref() {
            Some(code) => !UNSELLABLE_STATUS_CODES.contains(&code),
            None => true,
        }
    }

    /// The first embedded venue that carries an id, if any.
    pub fn primary_venue_id(&self) -> Option<&str> {
        self.embedded
            .venues
            .iter()
            .find_map(|v| v.id.as_deref())
    }

    /// Minimum of the first price range, 0 when the event has none.
    pub fn starting_price(&self) -> f64 {
        self.price_ranges.first().map(|p| p.min).unwrap_or(0.0)
    }

    /// Drop price ranges that are not finite or have `min > max`.
    /// Returns how many were removed.
    pub fn retain_valid_price_ranges(&mut self) -> usize {
        let before = self.price_ranges.len();
        self.price_ranges.retain(PriceRange::is_valid);
        before - self.price_ranges.len()
    }
}
