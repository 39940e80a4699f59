//! Commune endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use super::ApiError;
use crate::data::Commune;
use crate::AppState;

/// GET /api/communes/:identifier
///
/// Communes of the region named by a numeric id or alias, in source order.
/// Resolution is shared with `/api/regions/:identifier`.
pub async fn get_communes(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<Vec<Commune>>, ApiError> {
    match state.data.communes_by_identifier(&identifier) {
        Some(communes) => Ok(Json(communes.to_vec())),
        None => {
            debug!("Commune lookup miss: {:?}", identifier);
            Err(ApiError::RegionNotFound)
        }
    }
}
