//! Collector data-entry form
//!
//! Holds the raw text of every input so partially typed values survive
//! re-renders; [`CollectionForm::parse`] turns it into a checked
//! [`NewCollection`].

use crate::catalog::SiteCatalog;
use crate::records::{NewCollection, WasteType};
use crate::{CoreError, CoreResult, FieldError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionForm {
    pub site_name: String,
    pub waste_type: String,
    pub collection_date: String,
    pub total_volume: String,
    pub waste_separated: bool,
    pub organic_volume: String,
    pub inorganic_volume: String,
    pub collection_count: String,
    pub latitude: String,
    pub longitude: String,
    pub comments: String,
}

impl CollectionForm {
    /// Blank form on the first catalog site, dated `today`
    pub fn new(catalog: &SiteCatalog, today: NaiveDate) -> Self {
        let site = catalog.first();
        Self {
            site_name: site.name.clone(),
            waste_type: WasteType::Organic.to_string(),
            collection_date: today.format("%Y-%m-%d").to_string(),
            total_volume: String::new(),
            waste_separated: false,
            organic_volume: String::new(),
            inorganic_volume: String::new(),
            collection_count: "1".to_string(),
            latitude: site.latitude.to_string(),
            longitude: site.longitude.to_string(),
            comments: String::new(),
        }
    }

    /// Switch site and take its coordinates. Names outside the catalog are
    /// ignored.
    pub fn select_site(&mut self, catalog: &SiteCatalog, name: &str) -> bool {
        match catalog.by_name(name) {
            Some(site) => {
                self.site_name = site.name.clone();
                self.latitude = site.latitude.to_string();
                self.longitude = site.longitude.to_string();
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self, catalog: &SiteCatalog, today: NaiveDate) {
        *self = Self::new(catalog, today);
    }

    /// Parse every field, then run submission validation. All problems are
    /// reported together.
    pub fn parse(&self) -> CoreResult<NewCollection> {
        let mut errors = Vec::new();

        let waste_type = field(&mut errors, "wasteType", &self.waste_type);
        let collection_date = field(&mut errors, "collectionDate", &self.collection_date);
        let total_volume = field::<Decimal>(&mut errors, "totalVolume", &self.total_volume);
        let collection_count = field(&mut errors, "collectionCount", &self.collection_count);
        let latitude = field(&mut errors, "latitude", &self.latitude);
        let longitude = field(&mut errors, "longitude", &self.longitude);

        let (organic_volume, inorganic_volume) = if self.waste_separated {
            (
                optional_field(&mut errors, "organicVolume", &self.organic_volume),
                optional_field(&mut errors, "inorganicVolume", &self.inorganic_volume),
            )
        } else {
            (None, None)
        };

        // Unparsed fields get values that pass submission validation so
        // only problems with the typed text are reported for them.
        let total_volume = total_volume.unwrap_or_else(|| {
            organic_volume
                .unwrap_or(Decimal::ZERO)
                .checked_add(inorganic_volume.unwrap_or(Decimal::ZERO))
                .unwrap_or(Decimal::MAX)
        });

        let comments = self.comments.trim();
        let input = NewCollection {
            site_name: self.site_name.clone(),
            waste_type: waste_type.unwrap_or(WasteType::Organic),
            collection_date: collection_date.unwrap_or_default(),
            total_volume,
            waste_separated: self.waste_separated,
            organic_volume,
            inorganic_volume,
            collection_count: collection_count.unwrap_or(1),
            latitude: latitude.unwrap_or(0.0),
            longitude: longitude.unwrap_or(0.0),
            comments: (!comments.is_empty()).then(|| comments.to_string()),
        };

        if let Err(err) = input.validate() {
            for problem in err.field_errors() {
                if !errors.iter().any(|e| e.field == problem.field) {
                    errors.push(problem.clone());
                }
            }
        }
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }
        Ok(input.normalized())
    }
}

fn field<T: FromStr>(errors: &mut Vec<FieldError>, name: &str, raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(FieldError::new(name, "is required"));
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(FieldError::new(name, format!("{raw:?} is not a valid value")));
            None
        }
    }
}

fn optional_field<T: FromStr>(errors: &mut Vec<FieldError>, name: &str, raw: &str) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    field(errors, name, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
    }

    fn form() -> (SiteCatalog, CollectionForm) {
        let catalog = SiteCatalog::builtin().unwrap();
        let form = CollectionForm::new(&catalog, today());
        (catalog, form)
    }

    #[test]
    fn test_defaults() {
        let (_, form) = form();
        assert_eq!(form.site_name, "Rosterman Dumpsite");
        assert_eq!(form.waste_type, "Organic");
        assert_eq!(form.collection_date, "2025-10-20");
        assert_eq!(form.collection_count, "1");
        assert_eq!(form.latitude, "0.25509");
    }

    #[test]
    fn test_site_change_pulls_coordinates() {
        let (catalog, mut form) = form();
        assert!(form.select_site(&catalog, "Shirere Waste Collection"));
        assert_eq!(form.latitude, "0.265");
        assert_eq!(form.longitude, "34.735");

        assert!(!form.select_site(&catalog, "Nowhere"));
        assert_eq!(form.site_name, "Shirere Waste Collection");
    }

    #[test]
    fn test_parse_valid() {
        let (_, mut form) = form();
        form.total_volume = "12.5".to_string();
        form.waste_separated = true;
        form.organic_volume = "8.5".to_string();
        form.inorganic_volume = "4.0".to_string();
        form.collection_count = "3".to_string();

        let input = form.parse().unwrap();
        assert_eq!(input.total_volume, dec!(12.5));
        assert_eq!(input.organic_volume, Some(dec!(8.5)));
        assert_eq!(input.comments, None);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        let (_, mut form) = form();
        form.total_volume = "twelve".to_string();
        form.collection_count = String::new();

        let err = form.parse().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["totalVolume", "collectionCount"]);
    }

    #[test]
    fn test_sub_volumes_ignored_unless_separated() {
        let (_, mut form) = form();
        form.total_volume = "5".to_string();
        form.organic_volume = "garbage".to_string();

        assert_eq!(form.parse().unwrap().organic_volume, None);
    }

    #[test]
    fn test_parse_runs_submission_rules() {
        let (_, mut form) = form();
        form.total_volume = "5".to_string();
        form.waste_separated = true;
        form.organic_volume = "4".to_string();
        form.inorganic_volume = "4".to_string();

        let err = form.parse().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "organicVolume");
    }

    #[test]
    fn test_parse_and_submission_errors_reported_together() {
        let (_, mut form) = form();
        form.site_name = "  ".to_string();
        form.total_volume = "twelve".to_string();
        form.comments = "x".repeat(2001);

        let err = form.parse().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["totalVolume", "siteName", "comments"]);
    }

    #[test]
    fn test_unparsed_total_does_not_fail_sub_volume_rule() {
        let (_, mut form) = form();
        form.total_volume = "lots".to_string();
        form.waste_separated = true;
        form.organic_volume = "8".to_string();
        form.inorganic_volume = "4".to_string();

        let err = form.parse().unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "totalVolume");
    }

    #[test]
    fn test_reset() {
        let (catalog, mut form) = form();
        form.select_site(&catalog, "Shirere Waste Collection");
        form.comments = "late pickup".to_string();

        form.reset(&catalog, today());
        assert_eq!(form, CollectionForm::new(&catalog, today()));
    }
}
