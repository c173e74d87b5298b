//! JSON report generation

use super::CollectionReport;
use crate::CoreResult;

pub fn generate(report: &CollectionReport) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
