//! streetlens-llm — LLM backend abstraction and structured summarisation.
//!
//! The backend layer speaks the OpenAI chat-completions wire format (hosted
//! OpenAI or any compatible endpoint); the summary layer turns assessment
//! payloads into structured street / land-use analyses, degrading to an
//! error-plus-raw-data result when the model misbehaves.

pub mod backend;
pub mod summary;

pub use backend::{
    LlmBackend, LlmError, LlmRequest, LlmResponse, Message, MockBackend, OpenAiBackend,
    OpenAiCompatibleBackend,
};
pub use summary::{
    summarise_land_use, summarise_street, LandUseAnalysis, StreetAnalysis, SummaryResult,
    SummaryTuning,
};
