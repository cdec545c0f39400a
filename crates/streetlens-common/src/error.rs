use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreetlensError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Upstream API error [{status}]: {message}")]
    Upstream { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Warehouse error: {0}")]
    Warehouse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network capabilities capped: {0}")]
    Sandbox(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StreetlensError {
    /// The HTTP status an upstream failure carried, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StreetlensError>;
