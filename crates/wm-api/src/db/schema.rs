//! Database row types

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use wm_core::{CollectionRecord, CoreError, CoreResult};

/// Columns selected for a collection row. Numeric columns are rendered as
/// text so volumes reach the pipeline exactly as stored.
pub const COLLECTION_COLUMNS: &str = "id, site_name, waste_type, collection_date, \
     total_volume::text AS total_volume, waste_separated, \
     organic_volume::text AS organic_volume, inorganic_volume::text AS inorganic_volume, \
     collection_count, latitude, longitude, comments";

#[derive(Debug, FromRow)]
pub struct CollectionRow {
    pub id: i64,
    pub site_name: String,
    pub waste_type: String,
    pub collection_date: DateTime<Utc>,
    pub total_volume: String,
    pub waste_separated: bool,
    pub organic_volume: Option<String>,
    pub inorganic_volume: Option<String>,
    pub collection_count: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub comments: Option<String>,
}

impl TryFrom<CollectionRow> for CollectionRecord {
    type Error = CoreError;

    fn try_from(row: CollectionRow) -> CoreResult<Self> {
        let collection_count = u32::try_from(row.collection_count).map_err(|_| {
            CoreError::Store(format!(
                "collection {} has out-of-range count {}",
                row.id, row.collection_count
            ))
        })?;

        Ok(CollectionRecord {
            id: row.id,
            site_name: row.site_name,
            waste_type: row.waste_type.parse()?,
            collection_date: row.collection_date,
            total_volume: row.total_volume,
            waste_separated: row.waste_separated,
            organic_volume: row.organic_volume,
            inorganic_volume: row.inorganic_volume,
            collection_count,
            latitude: row.latitude,
            longitude: row.longitude,
            comments: row.comments,
        })
    }
}
