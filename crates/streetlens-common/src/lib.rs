//! streetlens-common — Shared types, errors, and the capped HTTP client used
//! across all Streetlens crates.

pub mod error;
pub mod sandbox;
pub mod types;

// Re-export commonly used types
pub use error::{Result, StreetlensError};
pub use types::{BoundingBox, Feature, FeatureCollection, Usrn, WorkSummaryEntry, CRS_BNG};
