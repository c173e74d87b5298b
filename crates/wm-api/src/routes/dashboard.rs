//! Dashboard aggregates

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use wm_core::{summarize, trend, DashboardData, FilterCriteria, Summary, Trend};

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: Summary,
    pub trend: Trend,
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<DashboardData>, ApiError> {
    Ok(Json(state.store.dashboard_data().await?))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let records = state.store.filtered(&criteria).await?;

    Ok(Json(SummaryResponse {
        summary: summarize(&records)?,
        trend: trend(&records)?,
    }))
}
