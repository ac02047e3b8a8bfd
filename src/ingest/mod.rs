//! Comment ingestion
//!
//! Collaborators that obtain comments and resolve them into the
//! canonical [`crate::giveaway::Comment`] shape before the engine runs:
//!
//! - `csv`: tabular uploads with `username`/`comment_text` columns
//! - `instagram`: OAuth-token-backed Graph API walker

pub mod csv;
pub mod instagram;
