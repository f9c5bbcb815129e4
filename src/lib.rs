//! Offline music recommendations from audio features.
//!
//! Core modules:
//! - [`catalog`] - CSV catalog loading and track lookup
//! - [`features`] - Feature vectors, standardization, weight presets
//! - [`mood`] - Mood prototypes and emotion aliases
//! - [`engine`] - Cosine-similarity ranking with boosts and diversity
//! - [`pipeline`] - Request defaults between hosts and the engine
//! - [`evaluation`] - List statistics and diversity metrics
//!
//! ### Supporting Modules
//!
//! - [`config`] - Catalog location and stored settings
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation for enhanced UX
//! - [`error`] - Library error type
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use attune::catalog::Catalog;
//! use attune::engine::{Recommender, SimilarParams};
//! use std::path::Path;
//!
//! // Load a catalog and build the engine once
//! let catalog = Catalog::load(Path::new("songs.csv"))?;
//! let recommender = Recommender::new(catalog);
//!
//! // Recommend by mood
//! for pick in recommender.recommend_by_mood("energetic", 5) {
//!     println!("{:.3}  {} - {}", pick.similarity, pick.track.track_name, pick.track.track_artist);
//! }
//!
//! // Recommend by similarity to a reference track
//! let picks = recommender.recommend_similar_by_id("6f807x0ima9a1j3VPbc7VN", &SimilarParams::default())?;
//! println!("found {} similar tracks", picks.len());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Scoring Details
//!
//! Every track is a nine-dimensional vector of audio features
//! (danceability, energy, loudness, speechiness, acousticness,
//! instrumentalness, liveness, valence, tempo). Scoring works in three
//! steps:
//!
//! ### Standardization
//! - Means and standard deviations are fitted from the whole catalog once
//! - Every vector, including mood targets, is z-scored with that one fit
//! - Constant columns pass through unscaled instead of dividing by zero
//!
//! ### Ranking
//! - Cosine similarity between the target and every catalog row
//! - Weight presets stretch the space before comparison (workout, chill, ...)
//! - Zero-magnitude vectors score 0.0 rather than NaN
//!
//! ### Adjustments
//! - The nostalgic mood lifts pre-2000 releases by 8% and pre-2010 by 5%
//! - Track queries lift same-genre candidates by 15% (subgenre adds 10%)
//! - No artist fills more than two slots unless diversity is switched off
//!
//! ## Moods
//!
//! Nine built-in moods (happy, sad, energetic, calm, angry, romantic,
//! mellow, nostalgic, focus) plus emotion aliases like "joy" and
//! "anxiety". Unknown names fall back to `happy` with a logged warning.
//!
//! ## Error Handling
//!
//! Library operations return [`error::RecommendError`]: catalog I/O,
//! malformed CSV, missing required columns, and unknown track ids.
//! Recoverable situations are not errors: an unmatched name query returns
//! an empty list and an unknown mood falls back to the default profile.
//!
//! ## Performance Characteristics
//!
//! - **Catalog load**: one pass over the CSV, linear in row count
//! - **Engine build**: one standardization pass plus one matrix build
//! - **Queries**: full-catalog scans, parallelized with rayon
//! - **Memory**: the catalog and one `f64` matrix; presets build a second
//!   matrix per query and drop it afterwards
//!
//! ## Testing
//!
//! The library includes comprehensive testing:
//! - Unit tests for all modules
//! - Integration tests for CLI workflows
//! - Performance benchmarks for critical paths
//!
//! Run tests with:
//! ```bash
//! cargo test
//! cargo bench  # For performance tests
//! ```

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod mood;
pub mod pipeline;
