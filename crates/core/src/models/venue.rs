use serde::{Deserialize, Serialize};

use super::event::{CityRef, Seatmap, StateRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
}

/// Coordinates as the upstream sends them: decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: String,
    pub latitude: String,
}

impl Location {
    /// Parsed `(lat, lon)`, `None` if either side is not a number.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.trim().parse().ok()?;
        let lon = self.longitude.trim().parse().ok()?;
        Some((lat, lon))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInfo {
    #[serde(default)]
    pub general_rule: Option<String>,
    #[serde(default)]
    pub child_rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeInfo {
    #[serde(default)]
    pub phone_number_detail: Option<String>,
    #[serde(default)]
    pub open_hours_detail: Option<String>,
    #[serde(default)]
    pub accepted_payment_detail: Option<String>,
    #[serde(default)]
    pub will_call_detail: Option<String>,
}

/// A venue as returned by `GET /venues/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<CityRef>,
    #[serde(default)]
    pub state: Option<StateRef>,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub general_info: Option<GeneralInfo>,
    #[serde(default)]
    pub seatmap: Option<Seatmap>,
    #[serde(default)]
    pub box_office_info: Option<BoxOfficeInfo>,
    #[serde(default)]
    pub parking_detail: Option<String>,
    #[serde(default)]
    pub accessible_seating_detail: Option<String>,
}

impl Venue {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: None,
            state: None,
            country: None,
            address: None,
            location: None,
            general_info: None,
            seatmap: None,
            box_office_info: None,
            parking_detail: None,
            accessible_seating_detail: None,
        }
    }

    /// "City, ST" for display; falls back to whichever part is known.
    pub fn display_locality(&self) -> Option<String> {
        match (&self.city, &self.state) {
            (Some(c), Some(s)) => Some(format!("{}, {}", c.name, s.state_code)),
            (Some(c), None) => Some(c.name.clone()),
            (None, Some(s)) => Some(s.state_code.clone()),
            (None, None) => None,
        }
    }
}
