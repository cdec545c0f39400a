//! Shared application state for the web server.

use std::sync::Arc;
use tracing::{info, warn};

use streetlens_common::error::Result;
use streetlens_config::Config;
use streetlens_llm::{LlmBackend, OpenAiBackend, OpenAiCompatibleBackend};
use streetlens_sources::{NgdClient, NuarClient};
use streetlens_warehouse::Warehouse;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Config,
    pub ngd: NgdClient,
    /// Absent when no NUAR token is configured; asset stats degrade to an
    /// error note in that case.
    pub nuar: Option<NuarClient>,
    pub warehouse: Warehouse,
    /// Absent when no LLM key is configured; summary routes refuse.
    pub llm: Option<Arc<dyn LlmBackend>>,
}

impl AppState {
    /// Wire up all clients from the configuration. Only the NGD key and the
    /// warehouse URL are hard requirements.
    pub fn from_config(config: Config) -> Result<Self> {
        let ngd_key = Config::resolve_secret(&config.ngd.api_key_env)?;
        let ngd = NgdClient::new(config.ngd.base_url.clone(), ngd_key)?;

        let nuar = match Config::resolve_secret(&config.nuar.api_key_env) {
            Ok(token) => Some(NuarClient::new(
                config.nuar.base_url.clone(),
                config.nuar.zoom_level,
                token,
            )?),
            Err(_) => {
                warn!(
                    env = %config.nuar.api_key_env,
                    "NUAR token not set, asset statistics disabled"
                );
                None
            }
        };

        let warehouse = Warehouse::connect(&config.warehouse)?;

        let llm: Option<Arc<dyn LlmBackend>> = match config.llm.backend.as_str() {
            "openai_compatible" => {
                let key = Config::resolve_secret(&config.llm.api_key_env).ok();
                Some(Arc::new(OpenAiCompatibleBackend::new(
                    config.llm.base_url.clone(),
                    config.llm.model.clone(),
                    key,
                )))
            }
            _ => match Config::resolve_secret(&config.llm.api_key_env) {
                Ok(key) => Some(Arc::new(OpenAiBackend::new(key, config.llm.model.clone()))),
                Err(_) => {
                    warn!(
                        env = %config.llm.api_key_env,
                        "LLM key not set, summary routes disabled"
                    );
                    None
                }
            },
        };

        if let Some(backend) = &llm {
            info!(model = backend.model_id(), local = backend.is_local(), "LLM backend ready");
        }

        Ok(Self {
            config,
            ngd,
            nuar,
            warehouse,
            llm,
        })
    }
}

pub type SharedState = Arc<AppState>;
