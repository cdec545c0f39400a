//! Generic feature retrieval for a single collection.
//!
//! Network and special-designation collections are filtered by USRN;
//! land-use and building collections are scoped by bounding box. Responses
//! are trimmed to the essential properties for the collection family.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use streetlens_common::types::{BoundingBox, FeatureCollection, Usrn};
use streetlens_sources::{
    collection_family, filter_collection, CollectionFamily, FeatureQuery, FeatureSource,
};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct FeaturesParams {
    pub collection_id: Option<String>,
    pub usrn: Option<String>,
    pub bbox: Option<String>,
}

/// GET /features?collection_id=...&usrn=... | &bbox=minx,miny,maxx,maxy
pub async fn features(
    State(state): State<SharedState>,
    Query(params): Query<FeaturesParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let collection_id = params
        .collection_id
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("A valid collection_id is required"))?;

    let family = collection_family(collection_id).ok_or_else(|| {
        ApiError::bad_request(format!("Unsupported collection_id: {collection_id}"))
    })?;

    let query = if family.queries_by_usrn() {
        let usrn = params
            .usrn
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("A valid usrn is required for this collection"))?;
        FeatureQuery::ByUsrn(Usrn::parse(usrn)?)
    } else {
        let bbox = params
            .bbox
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("A valid bbox is required for this collection"))?;
        FeatureQuery::ByBbox(BoundingBox::parse_param(bbox)?)
    };

    let fetched = state.ngd.features(collection_id, &query).await?;
    // Designation and land-use responses are trimmed; network and building
    // features pass through untouched.
    let response = match family {
        CollectionFamily::SpecialDesignation | CollectionFamily::LandUse => {
            filter_collection(&fetched, family)
        }
        CollectionFamily::Network | CollectionFamily::Building => fetched,
    };
    Ok(Json(response))
}
