//! Map markers and the marker interaction controller

pub mod controller;
pub mod directions;

use crate::geo::LatLng;
use crate::records::WasteType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use controller::{MapCommand, MarkerController, MarkerPlan, MarkerState, PopupTicket};
pub use directions::{DirectionsHandler, DirectionsLink, SiteDetail};

/// Stable marker key, the slug of the site name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `"Kambi Somali Refuse Chamber"` becomes `"kambi-somali-refuse-chamber"`
    pub fn from_site_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A map-rendered point for a site or an aggregated collection location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: MarkerId,
    pub lat: f64,
    pub lng: f64,
    pub site_name: String,
    #[serde(default)]
    pub waste_type: Option<WasteType>,
    #[serde(default)]
    pub volume: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl MapMarker {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(
            MarkerId::from_site_name("Kambi Somali Refuse Chamber").as_str(),
            "kambi-somali-refuse-chamber"
        );
        assert_eq!(MarkerId::from_site_name("  Mevic / Waste  ").as_str(), "mevic-waste");
        assert_eq!(MarkerId::from_site_name("").as_str(), "");
    }
}
