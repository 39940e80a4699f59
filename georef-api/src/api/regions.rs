//! Region endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use super::ApiError;
use crate::data::Region;
use crate::AppState;

/// GET /api/regions
///
/// All regions in load order. Never fails; empty when nothing was loaded.
pub async fn list_regions(State(state): State<AppState>) -> Json<Vec<Region>> {
    Json(state.data.all_regions().to_vec())
}

/// GET /api/regions/:identifier
///
/// `identifier` is a numeric region id or a case-insensitive alias.
pub async fn get_region(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<Region>, ApiError> {
    match state.data.region_by_identifier(&identifier) {
        Some(region) => Ok(Json(region.clone())),
        None => {
            debug!("Region lookup miss: {:?}", identifier);
            Err(ApiError::RegionNotFound)
        }
    }
}
