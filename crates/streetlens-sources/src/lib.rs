//! streetlens-sources — Outbound data-source clients and payload shaping.
//!
//! Clients:
//!   NgdClient  — OS NGD features API (OGC API Features)
//!   NuarClient — NUAR generalised-data asset metrics
//!
//! Plus the pure plumbing around them: collection routing, feature property
//! filtering, parallel fan-out with partial-failure merge, hex-grid id
//! decoding, and assembly of the street / land-use assessment payloads.

pub mod assemble;
pub mod features;
pub mod hexgrid;
pub mod ngd;
pub mod nuar;

pub use assemble::{
    land_use_payload, street_payload, DesignationRecord, LandUsePayload, NuarSummary,
    StreetPayload, StreetRecord,
};
pub use features::{
    fetch_street_collections, filter_collection, filter_feature_properties, merge_collections,
};
pub use hexgrid::HexGridId;
pub use ngd::{
    collection_family, CollectionFamily, CollectionSummary, FeatureQuery, FeatureSource,
    MockFeatureSource, NgdClient, LAND_USE_COLLECTIONS, STREET_INFO_COLLECTIONS,
};
pub use nuar::{AssetCountData, GridCellCount, NuarClient};
