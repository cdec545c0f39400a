//! Structured summarisation of assessment payloads.
//!
//! The model is prompted with the payload as JSON plus format instructions
//! for the target analysis shape, and must reply with a single JSON object.
//! Replies wrapped in code fences or prose are tolerated; anything that
//! still fails to parse degrades the result to `{error, raw_data}` so the
//! request itself succeeds.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::{LlmBackend, LlmRequest, Message};

/// Structured output for street analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetAnalysis {
    /// Name of the street and its location
    pub location: Vec<String>,
    /// Key characteristics of the road network
    pub key_characteristics: Vec<String>,
    /// Special designations or restrictions
    pub special_designations: Vec<String>,
    /// Important considerations for street works
    pub work_considerations: Vec<String>,
    /// Potential challenges or hazards
    pub potential_challenges: Vec<String>,
    /// Overall summary of the analysis
    pub summary: String,
}

/// Structured output for land-use analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandUseAnalysis {
    /// Name and location details of the area
    pub location: Vec<String>,
    /// Main types of land and building use in the area
    pub land_use_types: Vec<String>,
    /// Implications for street works
    pub work_implications: Vec<String>,
    /// Impacts on different property types
    pub property_impacts: Vec<String>,
    /// Access and logistics considerations
    pub access_considerations: Vec<String>,
    /// Overall summary of the analysis
    pub summary: String,
}

/// Either the parsed analysis or a degraded error-plus-raw-data result.
/// Both serialize to the shapes clients already expect.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SummaryResult<T: Serialize> {
    Summary { llm_summary: T },
    Degraded { error: String, raw_data: serde_json::Value },
}

const STREET_TEMPLATE: &str = "You are a street works and highways expert.\n\
Analyze the following street network and special designation data:\n\
{context}\n\
Provide a structured analysis following this format:\n\
{format_instructions}\n\
Be sure to always start with the location of the street and then identify and \
include the responsible highway authority.\n\
Always focus on practical implications for street works planning and impacts \
to the public, environment, and road users.";

const LAND_USE_TEMPLATE: &str = "You are an urban planning expert.\n\
Analyze the following land use data:\n\
{context}\n\
Provide a structured analysis following this format:\n\
{format_instructions}\n\
Be sure to identify and include the responsible highway authority.\n\
Focus on implications for street works and construction activities.";

fn street_format_instructions() -> String {
    format_instructions(&[
        ("location", "array of strings", "name of the street and its location"),
        ("key_characteristics", "array of strings", "key characteristics of the road network"),
        ("special_designations", "array of strings", "special designations or restrictions"),
        ("work_considerations", "array of strings", "important considerations for street works"),
        ("potential_challenges", "array of strings", "potential challenges or hazards"),
        ("summary", "string", "overall summary of the analysis"),
    ])
}

fn land_use_format_instructions() -> String {
    format_instructions(&[
        ("location", "array of strings", "name and location details of the area"),
        ("land_use_types", "array of strings", "main types of land and building use"),
        ("work_implications", "array of strings", "implications for street works"),
        ("property_impacts", "array of strings", "impacts on different property types"),
        ("access_considerations", "array of strings", "access and logistics considerations"),
        ("summary", "string", "overall summary of the analysis"),
    ])
}

fn format_instructions(fields: &[(&str, &str, &str)]) -> String {
    let mut out = String::from(
        "Respond with a single JSON object and nothing else. Required fields:\n",
    );
    for (name, kind, description) in fields {
        out.push_str(&format!("  \"{name}\" ({kind}): {description}\n"));
    }
    out
}

/// Locate the outermost JSON object in a model reply, tolerating code fences
/// and surrounding prose.
pub fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end >= start).then(|| &content[start..=end])
}

/// Sampling knobs forwarded to the backend; `None` fields use the backend's
/// defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryTuning {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

async fn summarise<T>(
    backend: &dyn LlmBackend,
    template: &str,
    instructions: String,
    payload: &serde_json::Value,
    tuning: SummaryTuning,
) -> SummaryResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let context = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    let prompt = template
        .replace("{context}", &context)
        .replace("{format_instructions}", &instructions);

    let request = LlmRequest {
        messages: vec![Message {
            role: "user".to_string(),
            content: prompt,
        }],
        model: None,
        max_tokens: tuning.max_tokens,
        temperature: tuning.temperature,
    };

    let response = match backend.complete(request).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "LLM completion failed");
            return SummaryResult::Degraded {
                error: format!("LLM processing failed: {e}"),
                raw_data: payload.clone(),
            };
        }
    };

    let parsed = extract_json_object(&response.content)
        .ok_or_else(|| "no JSON object in model reply".to_string())
        .and_then(|json| {
            serde_json::from_str::<T>(json).map_err(|e| format!("malformed model reply: {e}"))
        });

    match parsed {
        Ok(analysis) => {
            info!(model = %response.model, "LLM summary parsed");
            SummaryResult::Summary { llm_summary: analysis }
        }
        Err(e) => {
            warn!(error = %e, "LLM reply did not match the analysis shape");
            SummaryResult::Degraded {
                error: format!("LLM processing failed: {e}"),
                raw_data: payload.clone(),
            }
        }
    }
}

/// Summarise a street assessment payload.
pub async fn summarise_street(
    backend: &dyn LlmBackend,
    payload: &serde_json::Value,
    tuning: SummaryTuning,
) -> SummaryResult<StreetAnalysis> {
    summarise(
        backend,
        STREET_TEMPLATE,
        street_format_instructions(),
        payload,
        tuning,
    )
    .await
}

/// Summarise a land-use payload.
pub async fn summarise_land_use(
    backend: &dyn LlmBackend,
    payload: &serde_json::Value,
    tuning: SummaryTuning,
) -> SummaryResult<LandUseAnalysis> {
    summarise(
        backend,
        LAND_USE_TEMPLATE,
        land_use_format_instructions(),
        payload,
        tuning,
    )
    .await
}
