//! Filter criteria for collection queries

use crate::records::{CollectionRecord, WasteType};
use crate::CoreResult;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Query filter. Every field is optional and an unset field imposes no
/// constraint; `waste_separated: None` means "any", not "no".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<WasteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_volume: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_volume: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_separated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_collections: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_organic_volume: Option<Decimal>,
}

impl FilterCriteria {
    /// Criteria pinned to a single site, everything else unset
    pub fn for_site(site_name: impl Into<String>) -> Self {
        Self {
            site_name: Some(site_name.into()),
            ..Default::default()
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a record passes every set constraint. Dates are inclusive
    /// calendar dates; a record without an organic sub-volume counts as zero.
    pub fn matches(&self, record: &CollectionRecord) -> CoreResult<bool> {
        if let Some(site) = &self.site_name {
            if &record.site_name != site {
                return Ok(false);
            }
        }
        if let Some(waste_type) = self.waste_type {
            if record.waste_type != waste_type {
                return Ok(false);
            }
        }

        let day = record.collection_day();
        if self.start_date.is_some_and(|start| day < start) {
            return Ok(false);
        }
        if self.end_date.is_some_and(|end| day > end) {
            return Ok(false);
        }

        if self.min_volume.is_some() || self.max_volume.is_some() {
            let volume = record.volume()?;
            if self.min_volume.is_some_and(|min| volume < min) {
                return Ok(false);
            }
            if self.max_volume.is_some_and(|max| volume > max) {
                return Ok(false);
            }
        }

        if self.waste_separated.is_some_and(|sep| record.waste_separated != sep) {
            return Ok(false);
        }
        if self
            .min_collections
            .is_some_and(|min| record.collection_count < min)
        {
            return Ok(false);
        }
        if let Some(min) = self.min_organic_volume {
            if record.organic()? < min {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Editable criteria fields, addressed by their form names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    SiteName,
    WasteType,
    StartDate,
    EndDate,
    MinVolume,
    MaxVolume,
    WasteSeparated,
    MinCollections,
    MinOrganicVolume,
}

impl FilterField {
    pub const ALL: [FilterField; 9] = [
        FilterField::SiteName,
        FilterField::WasteType,
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::MinVolume,
        FilterField::MaxVolume,
        FilterField::WasteSeparated,
        FilterField::MinCollections,
        FilterField::MinOrganicVolume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterField::SiteName => "siteName",
            FilterField::WasteType => "wasteType",
            FilterField::StartDate => "startDate",
            FilterField::EndDate => "endDate",
            FilterField::MinVolume => "minVolume",
            FilterField::MaxVolume => "maxVolume",
            FilterField::WasteSeparated => "wasteSeparated",
            FilterField::MinCollections => "minCollections",
            FilterField::MinOrganicVolume => "minOrganicVolume",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Store a raw form value. Blank or unparseable input leaves the field
    /// unset rather than rejecting the edit.
    pub fn apply(&self, criteria: &mut FilterCriteria, raw: &str) {
        let raw = raw.trim();
        match self {
            FilterField::SiteName => {
                criteria.site_name = (!raw.is_empty()).then(|| raw.to_string());
            }
            FilterField::WasteType => criteria.waste_type = parse_opt(raw),
            FilterField::StartDate => criteria.start_date = parse_opt(raw),
            FilterField::EndDate => criteria.end_date = parse_opt(raw),
            FilterField::MinVolume => criteria.min_volume = parse_decimal(raw),
            FilterField::MaxVolume => criteria.max_volume = parse_decimal(raw),
            FilterField::WasteSeparated => criteria.waste_separated = parse_tri_state(raw),
            FilterField::MinCollections => criteria.min_collections = parse_opt(raw),
            FilterField::MinOrganicVolume => criteria.min_organic_volume = parse_decimal(raw),
        }
    }

    /// Current value rendered back into form text
    pub fn display(&self, criteria: &FilterCriteria) -> String {
        fn text<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        match self {
            FilterField::SiteName => criteria.site_name.clone().unwrap_or_default(),
            FilterField::WasteType => text(&criteria.waste_type),
            FilterField::StartDate => text(&criteria.start_date),
            FilterField::EndDate => text(&criteria.end_date),
            FilterField::MinVolume => text(&criteria.min_volume),
            FilterField::MaxVolume => text(&criteria.max_volume),
            FilterField::WasteSeparated => match criteria.waste_separated {
                Some(value) => value.to_string(),
                None => "any".to_string(),
            },
            FilterField::MinCollections => text(&criteria.min_collections),
            FilterField::MinOrganicVolume => text(&criteria.min_organic_volume),
        }
    }
}

fn parse_opt<T: FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    parse_opt::<Decimal>(raw).filter(|v| !v.is_sign_negative() || v.is_zero())
}

fn parse_tri_state(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record(site: &str, day: u32, volume: &str, separated: bool) -> CollectionRecord {
        CollectionRecord {
            id: day as i64,
            site_name: site.to_string(),
            waste_type: WasteType::Mixed,
            collection_date: Utc.with_ymd_and_hms(2025, 10, day, 14, 30, 0).unwrap(),
            total_volume: volume.to_string(),
            waste_separated: separated,
            organic_volume: separated.then(|| "2.0".to_string()),
            inorganic_volume: None,
            collection_count: 2,
            latitude: 0.25,
            longitude: 34.72,
            comments: None,
        }
    }

    #[test]
    fn test_unconstrained_matches_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert!(criteria.matches(&record("A", 20, "1.0", false)).unwrap());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let criteria = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2025, 10, 20),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 21),
            ..Default::default()
        };

        assert!(criteria.matches(&record("A", 20, "1", false)).unwrap());
        assert!(criteria.matches(&record("A", 21, "1", false)).unwrap());
        assert!(!criteria.matches(&record("A", 22, "1", false)).unwrap());
    }

    #[test]
    fn test_tri_state_any_is_not_false() {
        let any = FilterCriteria::default();
        let no = FilterCriteria {
            waste_separated: Some(false),
            ..Default::default()
        };
        let separated = record("A", 20, "1", true);

        assert!(any.matches(&separated).unwrap());
        assert!(!no.matches(&separated).unwrap());
    }

    #[test]
    fn test_volume_bounds() {
        let criteria = FilterCriteria {
            min_volume: Some(dec!(5)),
            max_volume: Some(dec!(20)),
            ..Default::default()
        };

        assert!(criteria.matches(&record("A", 20, "12.5", false)).unwrap());
        assert!(!criteria.matches(&record("A", 20, "4.9", false)).unwrap());
        assert!(criteria.matches(&record("A", 20, "bogus", false)).is_err());
    }

    #[test]
    fn test_min_organic_treats_missing_as_zero() {
        let criteria = FilterCriteria {
            min_organic_volume: Some(dec!(1)),
            ..Default::default()
        };

        assert!(criteria.matches(&record("A", 20, "5", true)).unwrap());
        assert!(!criteria.matches(&record("A", 20, "5", false)).unwrap());
    }

    #[test]
    fn test_apply_normalizes_input() {
        let mut criteria = FilterCriteria::default();

        FilterField::MinVolume.apply(&mut criteria, "5");
        assert_eq!(criteria.min_volume, Some(dec!(5)));

        FilterField::MinVolume.apply(&mut criteria, "five");
        assert_eq!(criteria.min_volume, None);

        FilterField::WasteSeparated.apply(&mut criteria, "false");
        assert_eq!(criteria.waste_separated, Some(false));

        FilterField::WasteSeparated.apply(&mut criteria, "any");
        assert_eq!(criteria.waste_separated, None);

        FilterField::WasteType.apply(&mut criteria, "inorganic");
        assert_eq!(criteria.waste_type, Some(WasteType::Inorganic));

        FilterField::StartDate.apply(&mut criteria, "");
        assert_eq!(criteria.start_date, None);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FilterField::ALL {
            assert_eq!(FilterField::from_name(field.name()), Some(field));
        }
        assert_eq!(FilterField::from_name("colour"), None);
    }

    #[test]
    fn test_criteria_query_string_skips_unset() {
        let criteria = FilterCriteria {
            waste_type: Some(WasteType::Organic),
            ..Default::default()
        };
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json, serde_json::json!({ "wasteType": "Organic" }));
    }
}
