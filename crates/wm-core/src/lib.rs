//! Waste Collection Monitor Core
//!
//! This crate provides the data-shaping core of the waste-collection
//! dashboard: collection records and filter criteria, the aggregation
//! pipeline that derives summaries and trends, the debounced filter state
//! holder, and the map marker controller that sequences pan and popup
//! actions.

pub mod boundary;
pub mod catalog;
pub mod config;
pub mod criteria;
pub mod filter_state;
pub mod form;
pub mod geo;
pub mod markers;
pub mod pipeline;
pub mod records;
pub mod report;
#[cfg(feature = "runtime")]
pub mod session;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use boundary::Boundary;
pub use catalog::{SiteCatalog, SiteKind, SiteLocation};
pub use config::{DashboardConfig, PanTiming};
pub use criteria::{FilterCriteria, FilterField};
pub use filter_state::{DebounceTicket, FilterState, QueryTicket};
pub use form::CollectionForm;
pub use geo::{GeoBounds, LatLng};
pub use markers::{MapCommand, MapMarker, MarkerController, MarkerId, MarkerState, PopupTicket};
pub use pipeline::{summarize, trend, Summary, Trend};
pub use records::{CollectionRecord, NewCollection, WasteType};
pub use report::{generate_report, CollectionReport, ReportFormat};
#[cfg(feature = "runtime")]
pub use session::{DashboardSession, DashboardView};
pub use store::{DashboardData, MemoryStore, RecordStore};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid volume {value:?} on record {record_id}")]
    InvalidVolume { record_id: i64, value: String },

    #[error("Validation failed: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether the error belongs to the input-validation class, as opposed
    /// to a store or environment failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_) | CoreError::InvalidVolume { .. } | CoreError::Parse(_)
        )
    }

    /// Field-level errors carried by a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CoreError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
