//! streetlens-scorer — Collaboration-index scoring.
//!
//! Scores a proposed street work from its work parameters, the underground
//! asset picture, and the street's special designations, then maps the score
//! onto a collaboration recommendation tier. Batch helpers parse free-text
//! USRN lists and accumulate summary statistics across many streets.

pub mod batch;
pub mod factors;
pub mod recommend;
pub mod scorer;

pub use batch::{parse_usrns, BatchSummary};
pub use factors::{InstallationMethod, LocationType, SectorType, TtroRequired};
pub use recommend::{recommendation_for, Recommendation, RecommendationLevel};
pub use scorer::{compute_collaboration_index, CollaborationScore, ScoreBreakdown, WorkParameters};
