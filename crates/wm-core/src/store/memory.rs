//! In-process record store

use super::{DashboardData, RecordStore};
use crate::catalog::SiteCatalog;
use crate::criteria::FilterCriteria;
use crate::pipeline::{dashboard_markers, sort_newest_first, summarize};
use crate::records::{CollectionRecord, NewCollection};
use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub struct MemoryStore {
    records: Mutex<Vec<CollectionRecord>>,
    next_id: AtomicI64,
    catalog: Arc<SiteCatalog>,
}

impl MemoryStore {
    pub fn new(catalog: Arc<SiteCatalog>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            catalog,
        }
    }

    /// Store preloaded with records as-is; ids continue after the highest
    pub fn with_records(catalog: Arc<SiteCatalog>, records: Vec<CollectionRecord>) -> Self {
        let next = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            records: Mutex::new(records),
            next_id: AtomicI64::new(next),
            catalog,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, Vec<CollectionRecord>>> {
        self.records
            .lock()
            .map_err(|_| CoreError::Store("record store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn submit(&self, input: NewCollection) -> CoreResult<CollectionRecord> {
        input.validate()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = input.normalized().into_record(id);
        self.lock()?.push(record.clone());

        debug!("Stored collection {} for {}", id, record.site_name);
        Ok(record)
    }

    async fn filtered(&self, criteria: &FilterCriteria) -> CoreResult<Vec<CollectionRecord>> {
        let records = self.lock()?;
        let mut matched = Vec::new();
        for record in records.iter() {
            if criteria.matches(record)? {
                matched.push(record.clone());
            }
        }
        drop(records);

        sort_newest_first(&mut matched);
        Ok(matched)
    }

    async fn dashboard_data(&self) -> CoreResult<DashboardData> {
        let records = self.lock()?.clone();
        let summary = summarize(&records)?;

        Ok(DashboardData {
            markers: dashboard_markers(&records, &self.catalog)?,
            total_records: summary.total_records,
            total_volume: summary.total_volume,
        })
    }
}
