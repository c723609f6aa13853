use std::path::PathBuf;

use shared::error::{MissingFields, GENERIC_GENERATION_FAILURE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation service returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Service { status: u16, detail: Option<String> },
    #[error("invalid response body: {0}")]
    Parse(String),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl GenerationError {
    /// Message surfaced to the user. Only a service-supplied `detail` is shown
    /// verbatim; every other failure collapses to the generic message.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_GENERATION_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    MissingRequired(#[from] MissingFields),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid base_url '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}
