//! Collection submission and queries

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;
use wm_core::{CollectionRecord, FilterCriteria, NewCollection};

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewCollection>,
) -> Result<(StatusCode, Json<CollectionRecord>), ApiError> {
    let record = state.store.submit(input).await?;
    info!("Recorded collection {} at {}", record.id, record.site_name);

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<Vec<CollectionRecord>>, ApiError> {
    let records = state.store.filtered(&criteria).await?;
    Ok(Json(records))
}
