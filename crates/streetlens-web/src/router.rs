//! Axum router — maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    assess::{assess, assess_batch},
    collections::{collection_detail, collection_queryables, collection_schema, collections_index},
    features::features,
    land_use::{land_use, land_use_summary},
    street::{street_info, street_info_summary},
    system::health,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/health", get(health))

        // NGD discovery (pass-through)
        .route("/collections", get(collections_index))
        .route("/collections/{id}", get(collection_detail))
        .route("/collections/{id}/schema", get(collection_schema))
        .route("/collections/{id}/queryables", get(collection_queryables))
        .route("/features", get(features))

        // Assessments
        .route("/street-info", get(street_info))
        .route("/street-info/summary", get(street_info_summary))
        .route("/land-use", get(land_use))
        .route("/land-use/summary", get(land_use_summary))
        .route("/assess", post(assess))
        .route("/assess/batch", post(assess_batch))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
