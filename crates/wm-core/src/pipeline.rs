//! Aggregation pipeline
//!
//! Pure functions over a record set. Every volume is parsed as it is
//! consumed; a malformed volume fails the whole aggregation instead of
//! being counted as zero.

use crate::catalog::SiteCatalog;
use crate::markers::{MapMarker, MarkerId};
use crate::records::{CollectionRecord, WasteType};
use crate::CoreResult;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline numbers for a record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_records: usize,
    pub total_volume: Decimal,
    pub by_waste_type: BTreeMap<WasteType, usize>,
}

impl Summary {
    pub fn count(&self, waste_type: WasteType) -> usize {
        self.by_waste_type.get(&waste_type).copied().unwrap_or(0)
    }
}

/// Total volume per calendar date, ascending
pub type Trend = BTreeMap<NaiveDate, Decimal>;

pub fn summarize(records: &[CollectionRecord]) -> CoreResult<Summary> {
    let mut summary = Summary::default();

    for record in records {
        summary.total_volume += record.volume()?;
        *summary.by_waste_type.entry(record.waste_type).or_insert(0) += 1;
    }
    summary.total_records = records.len();

    Ok(summary)
}

pub fn trend(records: &[CollectionRecord]) -> CoreResult<Trend> {
    let mut trend = Trend::new();

    for record in records {
        *trend.entry(record.collection_day()).or_insert(Decimal::ZERO) += record.volume()?;
    }

    Ok(trend)
}

#[derive(Default)]
struct SiteAggregate<'a> {
    volume: Decimal,
    latest: Option<&'a CollectionRecord>,
    // count and position of the latest record seen, per waste type
    types: BTreeMap<WasteType, (usize, usize)>,
}

/// One marker per site in the record set. Known sites keep their catalog
/// pin; unknown ones are placed at their latest record.
pub fn dashboard_markers(
    records: &[CollectionRecord],
    catalog: &SiteCatalog,
) -> CoreResult<Vec<MapMarker>> {
    let mut ordered: Vec<&CollectionRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.collection_date.cmp(&b.collection_date).then(a.id.cmp(&b.id)));

    let mut sites: BTreeMap<&str, SiteAggregate> = BTreeMap::new();
    for (position, record) in ordered.into_iter().enumerate() {
        let site = sites.entry(record.site_name.as_str()).or_default();
        site.volume += record.volume()?;
        site.latest = Some(record);

        let entry = site.types.entry(record.waste_type).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = position;
    }

    let markers = sites
        .into_iter()
        .filter_map(|(name, site)| {
            let latest = site.latest?;
            let waste_type = site
                .types
                .iter()
                .max_by_key(|(_, (count, position))| (*count, *position))
                .map(|(waste_type, _)| *waste_type);

            let (lat, lng) = match catalog.by_name(name) {
                Some(known) => (known.latitude, known.longitude),
                None => (latest.latitude, latest.longitude),
            };

            Some(MapMarker {
                id: MarkerId::from_site_name(name),
                lat,
                lng,
                site_name: name.to_string(),
                waste_type,
                volume: site.volume,
                date: Some(latest.collection_day()),
            })
        })
        .collect();

    Ok(markers)
}

/// The `n` most recent records, newest first
pub fn latest(records: &[CollectionRecord], n: usize) -> Vec<CollectionRecord> {
    let mut sorted = records.to_vec();
    sort_newest_first(&mut sorted);
    sorted.truncate(n);
    sorted
}

pub fn sort_newest_first(records: &mut [CollectionRecord]) {
    records.sort_by(|a, b| b.collection_date.cmp(&a.collection_date).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use rust_decimal_macros::dec;

    fn record(id: i64, site: &str, waste_type: WasteType, day: u32, volume: &str) -> CollectionRecord {
        CollectionRecord {
            id,
            site_name: site.to_string(),
            waste_type,
            collection_date: Utc.with_ymd_and_hms(2025, 10, day, 9, 0, 0).unwrap(),
            total_volume: volume.to_string(),
            waste_separated: false,
            organic_volume: None,
            inorganic_volume: None,
            collection_count: 1,
            latitude: 0.28,
            longitude: 34.75,
            comments: None,
        }
    }

    fn worked_example() -> Vec<CollectionRecord> {
        vec![
            record(1, "Rosterman Dumpsite", WasteType::Organic, 20, "10.5"),
            record(2, "Shirere Waste Collection", WasteType::Mixed, 20, "7.5"),
            record(3, "Rosterman Dumpsite", WasteType::Mixed, 21, "18.3"),
        ]
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn test_summarize_worked_example() {
        let summary = summarize(&worked_example()).unwrap();

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_volume, dec!(36.3));
        assert_eq!(summary.count(WasteType::Organic), 1);
        assert_eq!(summary.count(WasteType::Mixed), 2);
        assert_eq!(summary.count(WasteType::Inorganic), 0);
        assert!(!summary.by_waste_type.contains_key(&WasteType::Inorganic));
    }

    #[test]
    fn test_trend_worked_example() {
        let trend = trend(&worked_example()).unwrap();

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[&day(20)], dec!(18.0));
        assert_eq!(trend[&day(21)], dec!(18.3));
    }

    #[test]
    fn test_overview_example() {
        let records = vec![
            record(1, "Rosterman Dumpsite", WasteType::Organic, 20, "12.5"),
            record(2, "Rosterman Dumpsite", WasteType::Mixed, 20, "5.5"),
            record(3, "Shirere Waste Collection", WasteType::Mixed, 21, "18.3"),
        ];

        let summary = summarize(&records).unwrap();
        assert_eq!(
            summary,
            Summary {
                total_records: 3,
                total_volume: dec!(36.3),
                by_waste_type: BTreeMap::from([(WasteType::Organic, 1), (WasteType::Mixed, 2)]),
            }
        );
        assert_eq!(
            trend(&records).unwrap(),
            Trend::from([(day(20), dec!(18.0)), (day(21), dec!(18.3))])
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize(&[]).unwrap(), Summary::default());
        assert!(trend(&[]).unwrap().is_empty());
        assert!(dashboard_markers(&[], &SiteCatalog::builtin().unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_volume_is_rejected() {
        let mut records = worked_example();
        records[1].total_volume = "seven".to_string();

        assert!(matches!(
            summarize(&records),
            Err(CoreError::InvalidVolume { record_id: 2, .. })
        ));
        assert!(trend(&records).is_err());
    }

    #[test]
    fn test_summary_wire_format() {
        let json = serde_json::to_value(summarize(&worked_example()).unwrap()).unwrap();
        assert_eq!(json["totalRecords"], 3);
        assert_eq!(json["totalVolume"], "36.3");
        assert_eq!(json["byWasteType"]["Mixed"], 2);
    }

    #[test]
    fn test_dashboard_markers_per_site() {
        let catalog = SiteCatalog::builtin().unwrap();
        let markers = dashboard_markers(&worked_example(), &catalog).unwrap();
        assert_eq!(markers.len(), 2);

        let rosterman = &markers[0];
        assert_eq!(rosterman.site_name, "Rosterman Dumpsite");
        assert_eq!(rosterman.volume, dec!(28.8));
        assert_eq!(rosterman.date, Some(day(21)));
        // one Organic, one Mixed: the latest record wins the tie
        assert_eq!(rosterman.waste_type, Some(WasteType::Mixed));
        assert_eq!(rosterman.lat, 0.25509);
    }

    #[test]
    fn test_unknown_site_uses_record_position() {
        let catalog = SiteCatalog::builtin().unwrap();
        let records = vec![record(9, "Backyard Pit", WasteType::Organic, 22, "1")];

        let markers = dashboard_markers(&records, &catalog).unwrap();
        assert_eq!(markers[0].id.as_str(), "backyard-pit");
        assert_eq!(markers[0].lat, 0.28);
    }

    #[test]
    fn test_latest_is_newest_first() {
        let newest = latest(&worked_example(), 2);
        let ids: Vec<_> = newest.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    fn arb_records() -> impl Strategy<Value = Vec<CollectionRecord>> {
        let waste_type = prop_oneof![
            Just(WasteType::Organic),
            Just(WasteType::Inorganic),
            Just(WasteType::Mixed),
        ];
        prop::collection::vec((waste_type, 1_u32..=28, 0_i64..1_000_000), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (waste_type, day, cents))| {
                    let volume = Decimal::new(cents, 2).to_string();
                    record(i as i64 + 1, "Rosterman Dumpsite", waste_type, day, &volume)
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(Config::with_cases(128))]
        #[test]
        fn test_summary_counts_and_sums_every_record(records in arb_records()) {
            let summary = summarize(&records).unwrap();
            let volume: Decimal = records.iter().map(|r| r.volume().unwrap()).sum();

            prop_assert_eq!(summary.total_records, records.len());
            prop_assert_eq!(summary.by_waste_type.values().sum::<usize>(), records.len());
            prop_assert!(summary.by_waste_type.values().all(|&n| n > 0));
            prop_assert_eq!(summary.total_volume, volume);
        }

        #[test]
        fn test_trend_partitions_total_by_day(records in arb_records()) {
            let summary = summarize(&records).unwrap();
            let trend = trend(&records).unwrap();

            prop_assert_eq!(trend.values().copied().sum::<Decimal>(), summary.total_volume);
            for (date, volume) in &trend {
                let expected: Decimal = records
                    .iter()
                    .filter(|r| r.collection_day() == *date)
                    .map(|r| r.volume().unwrap())
                    .sum();
                prop_assert_eq!(*volume, expected);
            }
            prop_assert!(records.iter().all(|r| trend.contains_key(&r.collection_day())));
        }
    }
}
