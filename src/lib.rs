//! finance-architect - Narrative series generator for a finance channel
//!
//! Keeps a seed series of ten "financial disaster" episodes, asks Gemini
//! for new series in the same style, and exports any series as a
//! plain-text script.
//!
//! # Architecture
//!
//! - One session owns the seed, the generated series and two flags
//!   (`generating`, `error`)
//! - A generation is a single outbound request with a fixed prompt and a
//!   structured-output schema; new series are prepended to the list
//! - At most one generation is in flight per session
//!
//! # Modules
//!
//! - `adapters`: Generation backends (Gemini, scripted)
//! - `core`: Prompt building, content store, session
//! - `domain`: Data structures (Series, Episode, GenerationResult)
//! - `export`: Transcript formatting and files
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Show the seed series
//! finance-architect show
//!
//! # Generate new series and save every script
//! API_KEY=... finance-architect generate --download --download-all
//!
//! # Interactive session
//! API_KEY=... finance-architect session
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;

// Re-export main types at crate root for convenience
pub use adapters::{GeminiClient, GenerationClient, GenerationError, ScriptedClient};
pub use self::core::{ContentStore, SeriesSelector, Session, SessionError, ViewState};
pub use domain::{Episode, GenerationResult, Series};
