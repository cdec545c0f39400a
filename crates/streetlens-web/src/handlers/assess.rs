//! Collaboration assessment routes.
//!
//! Single-street assessment fetches the street payload and scores it against
//! the submitted work parameters. Batch assessment does the same per USRN,
//! skipping streets that fail, and reports summary statistics across the lot.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use streetlens_common::types::Usrn;
use streetlens_scorer::{
    compute_collaboration_index, parse_usrns, recommendation_for, BatchSummary,
    CollaborationScore, Recommendation, WorkParameters,
};
use streetlens_sources::assemble::GridCellExtent;
use streetlens_sources::StreetPayload;

use crate::error::ApiError;
use crate::handlers::street::assemble_street_payload;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub usrn: String,
    #[serde(flatten)]
    pub params: WorkParameters,
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub usrn: String,
    pub street_name: Option<String>,
    pub town: Option<String>,
    pub collaboration: CollaborationScore,
    pub recommendation: Recommendation,
    pub street_info: StreetPayload,
}

/// Score an assembled street payload against the work parameters.
pub(crate) fn score_payload(
    payload: &StreetPayload,
    params: &WorkParameters,
) -> (CollaborationScore, Recommendation) {
    let nuar = &payload.stats.nuar_summary;
    let asset_stats = nuar
        .error
        .is_none()
        .then_some((nuar.total_asset_count, nuar.total_hex_grids));

    let designations: Vec<String> = payload
        .designations
        .iter()
        .filter_map(|d| d.designation.clone())
        .collect();

    let score = compute_collaboration_index(params, asset_stats, &designations);
    let recommendation = recommendation_for(score.total_score);
    (score, recommendation)
}

/// POST /assess
pub async fn assess(
    State(state): State<SharedState>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<AssessResponse>, ApiError> {
    let usrn = Usrn::parse(&request.usrn)?;
    let payload = assemble_street_payload(&state, &usrn).await?;
    let (collaboration, recommendation) = score_payload(&payload, &request.params);

    let street = payload.street.as_ref();
    Ok(Json(AssessResponse {
        usrn: usrn.to_string(),
        street_name: street.and_then(|s| s.street_name.clone()),
        town: street.and_then(|s| s.town.clone()),
        collaboration,
        recommendation,
        street_info: payload,
    }))
}

/// USRNs arrive either as free text (any separator mix) or an explicit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UsrnsInput {
    Text(String),
    List(Vec<String>),
}

impl UsrnsInput {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join("\n"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchAssessRequest {
    pub usrns: UsrnsInput,
    #[serde(flatten)]
    pub params: WorkParameters,
}

#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub usrn: String,
    pub street_name: Option<String>,
    pub town: Option<String>,
    pub collaboration: CollaborationScore,
    pub recommendation: Recommendation,
    /// Decoded NUAR cells, for map rendering.
    pub grid_cells: Vec<GridCellExtent>,
}

#[derive(Debug, Serialize)]
pub struct BatchAssessResponse {
    pub summary: BatchSummary,
    pub skipped_invalid: Vec<String>,
    pub results: Vec<BatchItem>,
}

/// POST /assess/batch
pub async fn assess_batch(
    State(state): State<SharedState>,
    Json(request): Json<BatchAssessRequest>,
) -> Result<Json<BatchAssessResponse>, ApiError> {
    let (usrns, skipped_invalid) = parse_usrns(&request.usrns.into_text());

    if usrns.is_empty() {
        return Err(ApiError::bad_request("Please provide at least one valid USRN"));
    }
    let limit = state.config.assessment.batch_limit;
    if usrns.len() > limit {
        return Err(ApiError::bad_request(format!(
            "Please limit to {limit} USRNs maximum per analysis"
        )));
    }

    let mut summary = BatchSummary::new(usrns.len());
    let mut results = Vec::with_capacity(usrns.len());

    for usrn in &usrns {
        let payload = match assemble_street_payload(&state, usrn).await {
            Ok(payload) => payload,
            Err(e) => {
                error!(%usrn, error = %e.message, "batch assessment failed for USRN");
                summary.record_failure();
                continue;
            }
        };

        let (collaboration, recommendation) = score_payload(&payload, &request.params);
        summary.record(collaboration.total_score, recommendation.level);

        let street = payload.street.as_ref();
        results.push(BatchItem {
            usrn: usrn.to_string(),
            street_name: street.and_then(|s| s.street_name.clone()),
            town: street.and_then(|s| s.town.clone()),
            collaboration,
            recommendation,
            grid_cells: payload.stats.nuar_summary.cells.clone(),
        });
    }

    Ok(Json(BatchAssessResponse {
        summary,
        skipped_invalid,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetlens_scorer::{InstallationMethod, LocationType, RecommendationLevel, SectorType, TtroRequired};
    use streetlens_sources::assemble::{DesignationRecord, NuarSummary};
    use streetlens_sources::street_payload;
    use streetlens_common::types::FeatureCollection;

    #[test]
    fn test_assess_request_flattens_work_parameters() {
        let request: AssessRequest = serde_json::from_str(
            r#"{
                "usrn": "11720125",
                "location_type": "carriageway",
                "sector_type": "water",
                "ttro_required": "yes",
                "installation_method": "open_cut"
            }"#,
        )
        .unwrap();
        assert_eq!(request.usrn, "11720125");
        assert_eq!(request.params.location_type, LocationType::Carriageway);
        assert_eq!(request.params.installation_method, InstallationMethod::OpenCut);
    }

    #[test]
    fn test_batch_usrns_accept_text_and_list() {
        let text: BatchAssessRequest = serde_json::from_str(
            r#"{
                "usrns": "12345678, 87654321",
                "location_type": "footway",
                "sector_type": "telco",
                "ttro_required": "no",
                "installation_method": "moling"
            }"#,
        )
        .unwrap();
        assert_eq!(text.usrns.into_text(), "12345678, 87654321");

        let list: BatchAssessRequest = serde_json::from_str(
            r#"{
                "usrns": ["12345678", "87654321"],
                "location_type": "footway",
                "sector_type": "telco",
                "ttro_required": "no",
                "installation_method": "moling"
            }"#,
        )
        .unwrap();
        assert_eq!(list.usrns.into_text(), "12345678\n87654321");
    }

    #[test]
    fn test_score_payload_combines_designations_and_assets() {
        let mut payload = street_payload(
            &FeatureCollection::empty(),
            Vec::new(),
            NuarSummary {
                total_hex_grids: 12,
                total_asset_count: 240,
                ..NuarSummary::default()
            },
        );
        payload.designations.push(DesignationRecord {
            designation: Some("Traffic Sensitive".to_string()),
            ..DesignationRecord::default()
        });

        let params = WorkParameters {
            location_type: LocationType::Carriageway,
            sector_type: SectorType::Water,
            ttro_required: TtroRequired::Yes,
            installation_method: InstallationMethod::OpenCut,
        };
        let (score, recommendation) = score_payload(&payload, &params);

        // base 40 + density 5 (20/grid) + coverage 2 + traffic sensitive 15
        assert_eq!(score.total_score, 62);
        assert_eq!(recommendation.level, RecommendationLevel::HighPriority);
    }

    #[test]
    fn test_score_payload_ignores_failed_nuar_stats() {
        let payload = street_payload(
            &FeatureCollection::empty(),
            Vec::new(),
            NuarSummary::from_error("NUAR down"),
        );
        let params = WorkParameters {
            location_type: LocationType::Footway,
            sector_type: SectorType::Telco,
            ttro_required: TtroRequired::No,
            installation_method: InstallationMethod::Moling,
        };
        let (score, _) = score_payload(&payload, &params);
        assert_eq!(score.breakdown.asset_factors.subtotal, 0);
        assert_eq!(score.total_score, 14);
    }
}
