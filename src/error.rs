//! Typed errors for catalog loading and recommendation queries.
//!
//! The library surfaces a small, matchable error enum; the binary wraps it
//! with `anyhow` context at the call site.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the catalog loader and the recommendation engine.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The catalog file is missing one or more required columns.
    ///
    /// Carries every missing column name, not just the first one found.
    #[error("catalog is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A track id was requested that does not exist in the catalog.
    #[error("track id '{track_id}' not found in catalog")]
    TrackNotFound { track_id: String },

    /// The catalog file could not be opened or read.
    #[error("failed to read catalog at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid CSV.
    #[error("failed to parse catalog: {0}")]
    Csv(#[from] csv::Error),
}
