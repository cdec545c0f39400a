//! Street assessment routes.
//!
//! One request fans out to the warehouse (centre-line bbox + work history),
//! the four street/designation collections, and the NUAR asset metrics, then
//! reshapes the lot into the street payload. NUAR failures degrade to an
//! error note in the stats; collection failures are skipped by the merge.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::error;

use streetlens_common::types::Usrn;
use streetlens_llm::{summarise_street, StreetAnalysis, SummaryResult, SummaryTuning};
use streetlens_sources::{fetch_street_collections, street_payload, NuarSummary, StreetPayload};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct UsrnParams {
    pub usrn: Option<String>,
}

pub(crate) fn require_usrn(params: &UsrnParams) -> Result<Usrn, ApiError> {
    let raw = params
        .usrn
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: usrn"))?;
    Ok(Usrn::parse(raw)?)
}

/// Fetch and assemble the full street payload for a USRN.
pub(crate) async fn assemble_street_payload(
    state: &SharedState,
    usrn: &Usrn,
) -> Result<StreetPayload, ApiError> {
    let bbox = state
        .warehouse
        .bbox_for_usrn(usrn, state.config.assessment.buffer_distance)
        .await?;

    let collections = fetch_street_collections(&state.ngd, usrn);
    let work_history = state.warehouse.work_summary(usrn);
    let asset_counts = async {
        match &state.nuar {
            Some(client) => client.asset_count(&bbox).await.map_err(|e| e.to_string()),
            None => Err("NUAR token is not configured".to_string()),
        }
    };

    let (merged, work_history, asset_counts) =
        tokio::join!(collections, work_history, asset_counts);

    let nuar_summary = match asset_counts {
        Ok(data) => NuarSummary::from_data(&data),
        Err(message) => {
            error!(%usrn, error = %message, "NUAR asset count unavailable");
            NuarSummary::from_error(format!("Failed to fetch NUAR asset count: {message}"))
        }
    };

    Ok(street_payload(&merged, work_history?, nuar_summary))
}

/// GET /street-info?usrn=
pub async fn street_info(
    State(state): State<SharedState>,
    Query(params): Query<UsrnParams>,
) -> Result<Json<StreetPayload>, ApiError> {
    let usrn = require_usrn(&params)?;
    let payload = assemble_street_payload(&state, &usrn).await?;
    Ok(Json(payload))
}

/// GET /street-info/summary?usrn= — the payload summarised by the LLM.
pub async fn street_info_summary(
    State(state): State<SharedState>,
    Query(params): Query<UsrnParams>,
) -> Result<Json<SummaryResult<StreetAnalysis>>, ApiError> {
    let usrn = require_usrn(&params)?;
    let backend = state
        .llm
        .as_ref()
        .ok_or_else(|| ApiError::internal("LLM backend is not configured"))?
        .clone();

    let payload = assemble_street_payload(&state, &usrn).await?;
    let payload_json = serde_json::to_value(&payload).map_err(|e| ApiError::internal(e.to_string()))?;

    let tuning = SummaryTuning {
        temperature: Some(state.config.llm.temperature),
        max_tokens: Some(state.config.llm.max_tokens),
    };
    let summary = summarise_street(backend.as_ref(), &payload_json, tuning).await;
    Ok(Json(summary))
}
