//! Configuration loading for Streetlens.
//! Reads streetlens.toml from the current directory or the path in the
//! STREETLENS_CONFIG env var. API keys and the warehouse connection string
//! are never stored in the file itself — the file names the environment
//! variable that holds each secret.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

use streetlens_common::error::{Result, StreetlensError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ngd: NgdConfig,
    #[serde(default)]
    pub nuar: NuarConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub assessment: AssessmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgdConfig {
    #[serde(default = "default_ngd_base_url")]
    pub base_url: String,
    /// Name of the env var holding the OS API key.
    #[serde(default = "default_ngd_key_env")]
    pub api_key_env: String,
}

fn default_ngd_base_url() -> String { "https://api.os.uk/features/ngd/ofa/v1".to_string() }
fn default_ngd_key_env() -> String { "OS_KEY".to_string() }

impl Default for NgdConfig {
    fn default() -> Self {
        Self { base_url: default_ngd_base_url(), api_key_env: default_ngd_key_env() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuarConfig {
    #[serde(default = "default_nuar_base_url")]
    pub base_url: String,
    #[serde(default = "default_nuar_zoom")]
    pub zoom_level: u8,
    /// Name of the env var holding the NUAR bearer token.
    #[serde(default = "default_nuar_key_env")]
    pub api_key_env: String,
}

fn default_nuar_base_url() -> String {
    "https://innovation.nuar-data-services.uk/services/generalised-data/api/v1".to_string()
}
fn default_nuar_zoom() -> u8 { 12 }
fn default_nuar_key_env() -> String { "NUAR_KEY".to_string() }

impl Default for NuarConfig {
    fn default() -> Self {
        Self {
            base_url: default_nuar_base_url(),
            zoom_level: default_nuar_zoom(),
            api_key_env: default_nuar_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Name of the env var holding the Postgres connection string.
    #[serde(default = "default_warehouse_url_env")]
    pub url_env: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_street_table")]
    pub street_table: String,
    #[serde(default = "default_permit_table")]
    pub permit_table: String,
    #[serde(default = "default_swa_table")]
    pub swa_table: String,
    /// Month window (inclusive, `YYYY-MM`) for the permit work summary.
    #[serde(default = "default_month_from")]
    pub summary_month_from: String,
    #[serde(default = "default_month_to")]
    pub summary_month_to: String,
}

fn default_warehouse_url_env() -> String { "WAREHOUSE_URL".to_string() }
fn default_max_connections() -> usize { 8 }
fn default_street_table() -> String { "os_open_usrns.streets".to_string() }
fn default_permit_table() -> String { "street_manager.permit_events".to_string() }
fn default_swa_table() -> String { "geoplace_swa_codes.latest_active".to_string() }
fn default_month_from() -> String { "2025-01".to_string() }
fn default_month_to() -> String { "2025-06".to_string() }

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            url_env: default_warehouse_url_env(),
            max_connections: default_max_connections(),
            street_table: default_street_table(),
            permit_table: default_permit_table(),
            swa_table: default_swa_table(),
            summary_month_from: default_month_from(),
            summary_month_to: default_month_to(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "openai_compatible"
    #[serde(default = "default_llm_backend")]
    pub backend: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Base URL for openai_compatible backends (ignored for "openai").
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Name of the env var holding the API key.
    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_llm_backend() -> String { "openai".to_string() }
fn default_llm_model() -> String { "gpt-4o-mini".to_string() }
fn default_llm_base_url() -> String { "http://localhost:11434".to_string() }
fn default_llm_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 4096 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: default_llm_backend(),
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            api_key_env: default_llm_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Buffer distance in metres around the street centre-line.
    #[serde(default = "default_buffer_distance")]
    pub buffer_distance: f64,
    /// Hard cap on USRNs per batch assessment request.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

fn default_buffer_distance() -> f64 { 50.0 }
fn default_batch_limit() -> usize { 100 }

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            buffer_distance: default_buffer_distance(),
            batch_limit: default_batch_limit(),
        }
    }
}


impl Config {
    /// Load configuration from streetlens.toml.
    /// Checks STREETLENS_CONFIG env var first, then the current directory.
    /// A missing file yields the built-in defaults so the service can start
    /// from env vars alone.
    pub fn load() -> Result<Self> {
        let path = std::env::var("STREETLENS_CONFIG")
            .unwrap_or_else(|_| "streetlens.toml".to_string());

        if !Path::new(&path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| StreetlensError::Config(format!("cannot read {path}: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| StreetlensError::Config(format!("cannot parse {path}: {e}")))?;
        Ok(config)
    }

    /// Resolve a secret named by one of the `*_env` fields.
    pub fn resolve_secret(env_name: &str) -> Result<SecretString> {
        std::env::var(env_name)
            .map(SecretString::from)
            .map_err(|_| {
                StreetlensError::Config(format!(
                    "required environment variable '{env_name}' is not set"
                ))
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ngd: NgdConfig::default(),
            nuar: NuarConfig::default(),
            warehouse: WarehouseConfig::default(),
            llm: LlmConfig::default(),
            assessment: AssessmentConfig::default(),
        }
    }
}
