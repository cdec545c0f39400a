//! NGD collection discovery — thin pass-throughs to the features API.

use axum::{
    extract::{Path, State},
    Json,
};

use streetlens_sources::CollectionSummary;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /collections — all collections as `(id, title)` pairs.
pub async fn collections_index(
    State(state): State<SharedState>,
) -> Result<Json<Vec<CollectionSummary>>, ApiError> {
    Ok(Json(state.ngd.collections().await?))
}

/// GET /collections/{id}
pub async fn collection_detail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(state.ngd.collection(&id).await?))
}

/// GET /collections/{id}/schema
pub async fn collection_schema(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(state.ngd.collection_schema(&id).await?))
}

/// GET /collections/{id}/queryables
pub async fn collection_queryables(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(state.ngd.collection_queryables(&id).await?))
}
