//! Static site catalog

use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use wm_core::SiteLocation;

pub async fn list_sites(State(state): State<Arc<AppState>>) -> Json<Vec<SiteLocation>> {
    Json(state.catalog.sites().to_vec())
}
