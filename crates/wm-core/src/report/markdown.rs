//! Markdown report generation

use super::CollectionReport;
use crate::criteria::FilterField;
use crate::records::WasteType;

pub fn generate(report: &CollectionReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    output.push_str("# Waste Collection Report\n\n");
    output.push_str(&format!(
        "Generated {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if !report.criteria.is_unconstrained() {
        output.push_str("## Filters\n\n");
        for field in FilterField::ALL {
            let value = field.display(&report.criteria);
            if !value.is_empty() && value != "any" {
                output.push_str(&format!("- {}: {}\n", field.name(), value));
            }
        }
        output.push('\n');
    }

    output.push_str("## Summary\n\n");
    output.push_str(&format!("- Collections: {}\n", summary.total_records));
    output.push_str(&format!("- Total volume: {} t\n", summary.total_volume));
    for waste_type in WasteType::ALL {
        output.push_str(&format!("- {}: {}\n", waste_type, summary.count(waste_type)));
    }

    output.push_str("\n## Daily volume\n\n");
    if report.trend.is_empty() {
        output.push_str("No collections recorded.\n");
    } else {
        output.push_str("| Date | Volume (t) |\n");
        output.push_str("|------|-----------:|\n");
        for (date, volume) in &report.trend {
            output.push_str(&format!("| {} | {} |\n", date, volume));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::FilterCriteria;
    use crate::records::{NewCollection, WasteType};
    use crate::report::{generate_report, CollectionReport, ReportFormat};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn records() -> Vec<crate::records::CollectionRecord> {
        let input = NewCollection {
            site_name: "Rosterman Dumpsite".to_string(),
            waste_type: WasteType::Organic,
            collection_date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
            total_volume: dec!(12.5),
            waste_separated: false,
            organic_volume: None,
            inorganic_volume: None,
            collection_count: 2,
            latitude: 0.25509,
            longitude: 34.72066,
            comments: None,
        };
        vec![input.into_record(1)]
    }

    #[test]
    fn test_markdown_sections() {
        let criteria = FilterCriteria {
            waste_type: Some(WasteType::Organic),
            ..Default::default()
        };
        let report = CollectionReport::build(&records(), criteria).unwrap();
        let text = generate(&report);

        assert!(text.contains("- wasteType: Organic"));
        assert!(text.contains("- Collections: 1"));
        assert!(text.contains("- Total volume: 12.5 t"));
        assert!(text.contains("| 2025-10-20 | 12.5 |"));
    }

    #[test]
    fn test_empty_report() {
        let report = CollectionReport::build(&[], FilterCriteria::default()).unwrap();
        let text = generate(&report);

        assert!(!text.contains("## Filters"));
        assert!(text.contains("No collections recorded."));
    }

    #[test]
    fn test_json_report() {
        let report = CollectionReport::build(&records(), FilterCriteria::default()).unwrap();
        let json = generate_report(&report, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["totalRecords"], 1);
        assert_eq!(value["trend"]["2025-10-20"], "12.5");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert!("html".parse::<ReportFormat>().is_err());
    }
}
