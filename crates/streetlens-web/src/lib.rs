//! streetlens-web — HTTP surface of the street assessment service.
//! Routes:
//!   - collection discovery (pass-through to the NGD API)
//!   - street-info and land-use assessments, with optional LLM summaries
//!   - collaboration-index assessment, single street and batch

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
