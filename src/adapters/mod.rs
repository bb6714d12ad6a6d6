//! Adapter interfaces for the generation service.
//!
//! Adapters turn a reference series into newly generated series. The
//! session only talks to the [`GenerationClient`] trait; Gemini is the
//! production backend and [`ScriptedClient`] replays canned outcomes.

pub mod gemini;
pub mod scripted;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{GenerationResult, Series};

pub use gemini::{GeminiClient, GeminiConfig};
pub use scripted::{ScriptedClient, ScriptedOutcome};

/// Errors raised while producing a generation result
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid reference series: {0}")]
    InvalidReference(String),

    #[error("Request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Generation response is not valid JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Generation response does not match the series schema: {0}")]
    SchemaMismatch(#[source] serde_json::Error),
}

/// Parse the raw text payload of a generation response.
///
/// Text that is not JSON at all is a malformed payload; JSON of the wrong
/// shape is a schema mismatch. Absent or empty text counts as an empty
/// result; whitespace-only text is malformed.
pub fn parse_generation_text(text: Option<&str>) -> Result<GenerationResult, GenerationError> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(GenerationResult::default());
    };

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(GenerationError::MalformedPayload)?;

    serde_json::from_value(value).map_err(GenerationError::SchemaMismatch)
}

/// Trait for generation backends
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Generate new series in the style of `reference`.
    ///
    /// Issues at most one outbound request and never retries.
    async fn generate(&self, reference: &Series) -> Result<GenerationResult, GenerationError>;
}
