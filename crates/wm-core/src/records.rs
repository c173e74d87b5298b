//! Collection records and submissions

use crate::{CoreError, CoreResult, FieldError};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of a collector comment
pub const MAX_COMMENT_LEN: usize = 2000;

/// Kind of waste in a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WasteType {
    Organic,
    Inorganic,
    Mixed,
}

impl WasteType {
    pub const ALL: [WasteType; 3] = [WasteType::Organic, WasteType::Inorganic, WasteType::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteType::Organic => "Organic",
            WasteType::Inorganic => "Inorganic",
            WasteType::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for WasteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WasteType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organic" => Ok(WasteType::Organic),
            "inorganic" => Ok(WasteType::Inorganic),
            "mixed" => Ok(WasteType::Mixed),
            other => Err(CoreError::Parse(format!("unknown waste type: {other:?}"))),
        }
    }
}

/// One reported waste pickup, as returned by the record store.
///
/// Volumes travel as decimal strings, the way the store renders its
/// numeric columns; they are parsed when the pipeline consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub id: i64,
    pub site_name: String,
    pub waste_type: WasteType,
    pub collection_date: DateTime<Utc>,
    pub total_volume: String,
    pub waste_separated: bool,
    #[serde(default)]
    pub organic_volume: Option<String>,
    #[serde(default)]
    pub inorganic_volume: Option<String>,
    pub collection_count: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub comments: Option<String>,
}

impl CollectionRecord {
    /// Parsed total volume in tons
    pub fn volume(&self) -> CoreResult<Decimal> {
        parse_volume(self.id, &self.total_volume)
    }

    /// Parsed organic sub-volume; absent counts as zero
    pub fn organic(&self) -> CoreResult<Decimal> {
        match &self.organic_volume {
            Some(raw) => parse_volume(self.id, raw),
            None => Ok(Decimal::ZERO),
        }
    }

    /// Calendar date of the collection, time of day discarded
    pub fn collection_day(&self) -> NaiveDate {
        self.collection_date.date_naive()
    }
}

/// Parse a store-rendered volume. Anything that is not a finite,
/// non-negative decimal is rejected rather than treated as zero.
pub fn parse_volume(record_id: i64, raw: &str) -> CoreResult<Decimal> {
    let invalid = || CoreError::InvalidVolume {
        record_id,
        value: raw.to_string(),
    };

    let value = Decimal::from_str(raw.trim()).map_err(|_| invalid())?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid());
    }
    Ok(value)
}

/// A collection submitted by a collector, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollection {
    pub site_name: String,
    pub waste_type: WasteType,
    pub collection_date: NaiveDate,
    pub total_volume: Decimal,
    #[serde(default)]
    pub waste_separated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_volume: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inorganic_volume: Option<Decimal>,
    pub collection_count: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl NewCollection {
    /// Check every field and report all problems at once
    pub fn validate(&self) -> CoreResult<()> {
        let mut errors = Vec::new();

        if self.site_name.trim().is_empty() {
            errors.push(FieldError::new("siteName", "is required"));
        }
        if self.total_volume.is_sign_negative() && !self.total_volume.is_zero() {
            errors.push(FieldError::new("totalVolume", "must not be negative"));
        }
        if self.collection_count < 1 {
            errors.push(FieldError::new("collectionCount", "must be at least 1"));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            errors.push(FieldError::new("latitude", "must be between -90 and 90"));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            errors.push(FieldError::new("longitude", "must be between -180 and 180"));
        }
        if let Some(comments) = &self.comments {
            if comments.chars().count() > MAX_COMMENT_LEN {
                errors.push(FieldError::new(
                    "comments",
                    format!("must be at most {MAX_COMMENT_LEN} characters"),
                ));
            }
        }

        if self.waste_separated {
            let organic = self.organic_volume.unwrap_or(Decimal::ZERO);
            let inorganic = self.inorganic_volume.unwrap_or(Decimal::ZERO);

            if organic.is_sign_negative() && !organic.is_zero() {
                errors.push(FieldError::new("organicVolume", "must not be negative"));
            }
            if inorganic.is_sign_negative() && !inorganic.is_zero() {
                errors.push(FieldError::new("inorganicVolume", "must not be negative"));
            }
            if organic + inorganic > self.total_volume {
                errors.push(FieldError::new(
                    "organicVolume",
                    "organic and inorganic volumes exceed the total volume",
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Trim text fields and drop sub-volumes that only apply to separated waste
    pub fn normalized(mut self) -> Self {
        self.site_name = self.site_name.trim().to_string();
        self.comments = self
            .comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if !self.waste_separated {
            self.organic_volume = None;
            self.inorganic_volume = None;
        }
        self
    }

    /// Collection timestamp as stored: midnight UTC of the collection date
    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collection_date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_default()
    }

    /// Materialize the stored record for an assigned id
    pub fn into_record(self, id: i64) -> CollectionRecord {
        CollectionRecord {
            id,
            collection_date: self.collected_at(),
            site_name: self.site_name,
            waste_type: self.waste_type,
            total_volume: self.total_volume.to_string(),
            waste_separated: self.waste_separated,
            organic_volume: self.organic_volume.map(|v| v.to_string()),
            inorganic_volume: self.inorganic_volume.map(|v| v.to_string()),
            collection_count: self.collection_count,
            latitude: self.latitude,
            longitude: self.longitude,
            comments: self.comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn submission() -> NewCollection {
        NewCollection {
            site_name: "Rosterman Dumpsite".to_string(),
            waste_type: WasteType::Organic,
            collection_date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
            total_volume: dec!(12.5),
            waste_separated: true,
            organic_volume: Some(dec!(8.5)),
            inorganic_volume: Some(dec!(4.0)),
            collection_count: 3,
            latitude: 0.25509,
            longitude: 34.72066,
            comments: None,
        }
    }

    #[test]
    fn test_waste_type_parse() {
        assert_eq!("organic".parse::<WasteType>().unwrap(), WasteType::Organic);
        assert_eq!(" Mixed ".parse::<WasteType>().unwrap(), WasteType::Mixed);
        assert!("plastic".parse::<WasteType>().is_err());
    }

    #[test]
    fn test_parse_volume() {
        assert_eq!(parse_volume(1, "12.5").unwrap(), dec!(12.5));
        assert_eq!(parse_volume(1, " 0 ").unwrap(), Decimal::ZERO);
        assert!(matches!(
            parse_volume(7, "abc"),
            Err(CoreError::InvalidVolume { record_id: 7, .. })
        ));
        assert!(parse_volume(7, "-1.5").is_err());
        assert!(parse_volume(7, "").is_err());
    }

    #[test]
    fn test_valid_submission() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_sub_volumes_cannot_exceed_total() {
        let mut input = submission();
        input.organic_volume = Some(dec!(10));

        let err = input.validate().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "organicVolume");
    }

    #[test]
    fn test_sub_volumes_ignored_when_not_separated() {
        let mut input = submission();
        input.waste_separated = false;
        input.organic_volume = Some(dec!(100));

        assert!(input.validate().is_ok());
        assert_eq!(input.normalized().organic_volume, None);
    }

    #[test]
    fn test_collects_every_field_error() {
        let mut input = submission();
        input.site_name = "  ".to_string();
        input.collection_count = 0;
        input.latitude = 120.0;

        let err = input.validate().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["siteName", "collectionCount", "latitude"]);
    }

    #[test]
    fn test_into_record_uses_midnight_utc() {
        let record = submission().into_record(42);
        assert_eq!(record.id, 42);
        assert_eq!(record.total_volume, "12.5");
        assert_eq!(record.collection_day(), NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
        assert_eq!(record.volume().unwrap(), dec!(12.5));
    }

    #[test]
    fn test_record_wire_format_is_camel_case() {
        let json = serde_json::to_value(submission().into_record(1)).unwrap();
        assert_eq!(json["siteName"], "Rosterman Dumpsite");
        assert_eq!(json["totalVolume"], "12.5");
        assert_eq!(json["wasteType"], "Organic");
    }
}
