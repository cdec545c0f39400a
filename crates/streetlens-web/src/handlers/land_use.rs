//! Land-use assessment routes.
//!
//! The USRN is resolved to a buffered bbox via the warehouse, the land-use
//! collections are fetched for that bbox, and the properties are trimmed and
//! aggregated into the land-use payload.

use axum::{
    extract::{Query, State},
    Json,
};
use futures_util::future::join_all;

use streetlens_common::types::Usrn;
use streetlens_llm::{summarise_land_use, LandUseAnalysis, SummaryResult, SummaryTuning};
use streetlens_sources::{
    filter_collection, land_use_payload, merge_collections, CollectionFamily, FeatureQuery,
    FeatureSource, LandUsePayload, LAND_USE_COLLECTIONS,
};

use crate::error::ApiError;
use crate::handlers::street::{require_usrn, UsrnParams};
use crate::state::SharedState;

pub(crate) async fn assemble_land_use_payload(
    state: &SharedState,
    usrn: &Usrn,
) -> Result<LandUsePayload, ApiError> {
    let bbox = state
        .warehouse
        .bbox_for_usrn(usrn, state.config.assessment.buffer_distance)
        .await?;

    let query = FeatureQuery::ByBbox(bbox);
    let fetches = LAND_USE_COLLECTIONS
        .iter()
        .map(|id| async { (*id, state.ngd.features(id, &query).await) });
    let merged = merge_collections(join_all(fetches).await);

    let filtered = filter_collection(&merged, CollectionFamily::LandUse);
    Ok(land_use_payload(&filtered))
}

/// GET /land-use?usrn=
pub async fn land_use(
    State(state): State<SharedState>,
    Query(params): Query<UsrnParams>,
) -> Result<Json<LandUsePayload>, ApiError> {
    let usrn = require_usrn(&params)?;
    let payload = assemble_land_use_payload(&state, &usrn).await?;
    Ok(Json(payload))
}

/// GET /land-use/summary?usrn= — the payload summarised by the LLM.
pub async fn land_use_summary(
    State(state): State<SharedState>,
    Query(params): Query<UsrnParams>,
) -> Result<Json<SummaryResult<LandUseAnalysis>>, ApiError> {
    let usrn = require_usrn(&params)?;
    let backend = state
        .llm
        .as_ref()
        .ok_or_else(|| ApiError::internal("LLM backend is not configured"))?
        .clone();

    let payload = assemble_land_use_payload(&state, &usrn).await?;
    let payload_json = serde_json::to_value(&payload).map_err(|e| ApiError::internal(e.to_string()))?;

    let tuning = SummaryTuning {
        temperature: Some(state.config.llm.temperature),
        max_tokens: Some(state.config.llm.max_tokens),
    };
    let summary = summarise_land_use(backend.as_ref(), &payload_json, tuning).await;
    Ok(Json(summary))
}
