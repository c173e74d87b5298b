//! Report generation

pub mod json;
pub mod markdown;

use crate::criteria::FilterCriteria;
use crate::pipeline::{summarize, trend, Summary, Trend};
use crate::records::CollectionRecord;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
}

impl FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(CoreError::Parse(format!("unknown report format: {other}"))),
        }
    }
}

/// Summary and trend of a record set under some criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub trend: Trend,
    pub generated_at: DateTime<Utc>,
}

impl CollectionReport {
    /// Aggregate the records that pass `criteria`
    pub fn build(records: &[CollectionRecord], criteria: FilterCriteria) -> CoreResult<Self> {
        let mut selected = Vec::new();
        for record in records {
            if criteria.matches(record)? {
                selected.push(record.clone());
            }
        }

        Ok(Self {
            summary: summarize(&selected)?,
            trend: trend(&selected)?,
            criteria,
            generated_at: Utc::now(),
        })
    }
}

/// Generate report in specified format
pub fn generate_report(report: &CollectionReport, format: ReportFormat) -> CoreResult<String> {
    match format {
        ReportFormat::Json => json::generate(report),
        ReportFormat::Markdown => Ok(markdown::generate(report)),
    }
}
