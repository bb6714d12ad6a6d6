//! Export of series as plain-text scripts.
//!
//! # Formats
//!
//! - Single series: header, then every episode with all five fields,
//!   each preceded by a dashed separator line.
//! - Bulk: every series with an abbreviated episode list (no key scene),
//!   series separated by a line of `=`.
//!
//! Transcripts are one-way: there is no parser for them.

pub mod files;
pub mod transcript;

pub use files::{series_file_name, write_bulk_file, write_series_file, BULK_FILE_NAME};
pub use transcript::{format_bulk, format_series, EPISODE_SEPARATOR, SERIES_SEPARATOR};
