//! Core generation logic.
//!
//! This module contains:
//! - Prompt: prompt text and response schema for generation requests
//! - Store: the seed series and generated series for a session
//! - Session: generation flags and the single-flight generation trigger

pub mod prompt;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use prompt::{build_prompt, response_schema, validate_reference};
pub use session::{SeriesSelector, Session, SessionError, ViewState, GENERATION_FAILED_MESSAGE};
pub use store::ContentStore;
