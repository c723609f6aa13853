use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GENERIC_GENERATION_FAILURE: &str = "Failed to generate email";

/// Failure body returned by the generation service on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }

    /// Extracts `detail` from a raw failure body. Bodies that are not JSON, or
    /// whose `detail` is missing or not a string, yield `None`.
    pub fn parse(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorDetail>(body)
            .ok()
            .and_then(|parsed| parsed.detail)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("missing required field(s): {}", .fields.join(", "))]
pub struct MissingFields {
    pub fields: Vec<&'static str>,
}
