//! Record store interface
//!
//! The dashboard only ever talks to a [`RecordStore`]: the HTTP server
//! backs it with PostgreSQL, tests and the CLI with [`MemoryStore`].

mod memory;

pub use memory::MemoryStore;

use crate::criteria::FilterCriteria;
use crate::markers::MapMarker;
use crate::records::{CollectionRecord, NewCollection};
use crate::CoreResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Map payload for the dashboard landing view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub markers: Vec<MapMarker>,
    pub total_records: usize,
    pub total_volume: Decimal,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Validate and persist a submission, returning the stored record
    async fn submit(&self, input: NewCollection) -> CoreResult<CollectionRecord>;

    /// Records matching `criteria`, newest first
    async fn filtered(&self, criteria: &FilterCriteria) -> CoreResult<Vec<CollectionRecord>>;

    /// Per-site markers and totals over every record
    async fn dashboard_data(&self) -> CoreResult<DashboardData>;
}
