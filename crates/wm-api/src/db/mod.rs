//! PostgreSQL record store

pub mod schema;

use async_trait::async_trait;
use schema::{CollectionRow, COLLECTION_COLUMNS};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;
use wm_core::pipeline::{dashboard_markers, summarize};
use wm_core::{
    CollectionRecord, CoreError, CoreResult, DashboardData, FilterCriteria, NewCollection,
    RecordStore, SiteCatalog,
};

pub struct PgStore {
    pool: PgPool,
    catalog: Arc<SiteCatalog>,
}

impl PgStore {
    pub fn new(pool: PgPool, catalog: Arc<SiteCatalog>) -> Self {
        Self { pool, catalog }
    }
}

fn store_error(e: sqlx::Error) -> CoreError {
    CoreError::Store(e.to_string())
}

fn into_records(rows: Vec<CollectionRow>) -> CoreResult<Vec<CollectionRecord>> {
    rows.into_iter().map(CollectionRecord::try_from).collect()
}

/// SELECT over `collections` with one bound predicate per set criterion
pub fn filtered_query(criteria: &FilterCriteria) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!(
        "SELECT {COLLECTION_COLUMNS} FROM collections WHERE TRUE"
    ));

    if let Some(site) = &criteria.site_name {
        query.push(" AND site_name = ").push_bind(site.clone());
    }
    if let Some(waste_type) = criteria.waste_type {
        query.push(" AND waste_type = ").push_bind(waste_type.as_str());
    }
    if let Some(start) = criteria.start_date {
        query
            .push(" AND (collection_date AT TIME ZONE 'UTC')::date >= ")
            .push_bind(start);
    }
    if let Some(end) = criteria.end_date {
        query
            .push(" AND (collection_date AT TIME ZONE 'UTC')::date <= ")
            .push_bind(end);
    }
    if let Some(min) = criteria.min_volume {
        query.push(" AND total_volume >= ").push_bind(min);
    }
    if let Some(max) = criteria.max_volume {
        query.push(" AND total_volume <= ").push_bind(max);
    }
    if let Some(separated) = criteria.waste_separated {
        query.push(" AND waste_separated = ").push_bind(separated);
    }
    if let Some(min) = criteria.min_collections {
        query
            .push(" AND collection_count >= ")
            .push_bind(i64::from(min));
    }
    if let Some(min) = criteria.min_organic_volume {
        query
            .push(" AND COALESCE(organic_volume, 0) >= ")
            .push_bind(min);
    }

    query.push(" ORDER BY collection_date DESC, id DESC");
    query
}

#[async_trait]
impl RecordStore for PgStore {
    async fn submit(&self, input: NewCollection) -> CoreResult<CollectionRecord> {
        input.validate()?;
        let input = input.normalized();

        let sql = format!(
            r#"
            INSERT INTO collections (site_name, waste_type, collection_date, total_volume,
                waste_separated, organic_volume, inorganic_volume, collection_count,
                latitude, longitude, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLLECTION_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CollectionRow>(&sql)
            .bind(&input.site_name)
            .bind(input.waste_type.as_str())
            .bind(input.collected_at())
            .bind(input.total_volume)
            .bind(input.waste_separated)
            .bind(input.organic_volume)
            .bind(input.inorganic_volume)
            .bind(i64::from(input.collection_count))
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.comments)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        debug!("Inserted collection {} for {}", row.id, row.site_name);
        CollectionRecord::try_from(row)
    }

    async fn filtered(&self, criteria: &FilterCriteria) -> CoreResult<Vec<CollectionRecord>> {
        let rows = filtered_query(criteria)
            .build_query_as::<CollectionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        into_records(rows)
    }

    async fn dashboard_data(&self) -> CoreResult<DashboardData> {
        let records = self.filtered(&FilterCriteria::default()).await?;
        let summary = summarize(&records)?;

        Ok(DashboardData {
            markers: dashboard_markers(&records, &self.catalog)?,
            total_records: summary.total_records,
            total_volume: summary.total_volume,
        })
    }
}
