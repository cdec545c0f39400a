//! Service liveness and configured-backend summary.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub llm_model: Option<String>,
    pub nuar_enabled: bool,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "streetlens",
        version: env!("CARGO_PKG_VERSION"),
        llm_model: state.llm.as_ref().map(|b| b.model_id().to_string()),
        nuar_enabled: state.nuar.is_some(),
    })
}
