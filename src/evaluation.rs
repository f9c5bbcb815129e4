//! # Result Evaluation
//!
//! Offline quality metrics for a recommendation list. Nothing here feeds
//! back into scoring; these are read-only measurements for the `--stats`
//! flag and for eyeballing whether a tuning change helped.
//!
//! Two views of the same list:
//!
//! - **[`ListStats`]**: counts plus popularity spread, when the catalog
//!   carries a `track_popularity` column.
//! - **[`DiversityMetrics`]**: Shannon entropy and coverage over artists
//!   and genres. Entropy is measured in bits, so a uniform spread over
//!   eight artists reads as 3.0 and a single-artist list reads as 0.0.

use crate::engine::Recommendation;
use serde::Serialize;
use std::collections::HashMap;

/// Catalog column consulted for popularity statistics.
const POPULARITY_COLUMN: &str = "track_popularity";

/// Counts and popularity spread for one recommendation list.
///
/// The popularity fields are `None` when no track in the list carries a
/// parsable `track_popularity` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListStats {
    pub total: usize,
    pub unique_artists: usize,
    pub unique_genres: usize,
    pub mean_popularity: Option<f64>,
    pub min_popularity: Option<f64>,
    pub max_popularity: Option<f64>,
}

/// Entropy and coverage over artists and genres.
///
/// Coverage is the unique-to-listed ratio: 1.0 means no repeats. Genre
/// figures only consider tracks with a known genre; a fully unlabeled
/// list reports 0.0 for both genre fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityMetrics {
    pub artist_entropy: f64,
    pub genre_entropy: f64,
    pub artist_coverage: f64,
    pub genre_coverage: f64,
}

/// Computes counts and popularity spread for a recommendation list.
///
/// Non-numeric or non-finite popularity cells are skipped rather than
/// treated as zero, so one bad row cannot drag the mean down.
#[must_use]
pub fn basic_stats(recommendations: &[Recommendation]) -> ListStats {
    let mut artists: Vec<&str> = Vec::new();
    let mut genres: Vec<&str> = Vec::new();
    let mut popularity: Vec<f64> = Vec::new();

    for recommendation in recommendations {
        let track = &recommendation.track;
        if !artists.contains(&track.track_artist.as_str()) {
            artists.push(&track.track_artist);
        }
        if let Some(genre) = track.playlist_genre.as_deref() {
            if !genres.contains(&genre) {
                genres.push(genre);
            }
        }
        if let Some(value) = track.extra.get(POPULARITY_COLUMN) {
            if let Ok(parsed) = value.parse::<f64>() {
                if parsed.is_finite() {
                    popularity.push(parsed);
                }
            }
        }
    }

    let (mean, min, max) = if popularity.is_empty() {
        (None, None, None)
    } else {
        let sum: f64 = popularity.iter().sum();
        let min = popularity.iter().copied().fold(f64::INFINITY, f64::min);
        let max = popularity
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (Some(sum / popularity.len() as f64), Some(min), Some(max))
    };

    ListStats {
        total: recommendations.len(),
        unique_artists: artists.len(),
        unique_genres: genres.len(),
        mean_popularity: mean,
        min_popularity: min,
        max_popularity: max,
    }
}

/// Computes entropy and coverage for a recommendation list.
#[must_use]
pub fn diversity_metrics(recommendations: &[Recommendation]) -> DiversityMetrics {
    let mut artist_counts: HashMap<&str, usize> = HashMap::new();
    let mut genre_counts: HashMap<&str, usize> = HashMap::new();
    let mut labeled = 0usize;

    for recommendation in recommendations {
        let track = &recommendation.track;
        *artist_counts.entry(track.track_artist.as_str()).or_insert(0) += 1;
        if let Some(genre) = track.playlist_genre.as_deref() {
            *genre_counts.entry(genre).or_insert(0) += 1;
            labeled += 1;
        }
    }

    let total = recommendations.len();
    let artist_coverage = if total == 0 {
        0.0
    } else {
        artist_counts.len() as f64 / total as f64
    };
    let genre_coverage = if labeled == 0 {
        0.0
    } else {
        genre_counts.len() as f64 / labeled as f64
    };

    DiversityMetrics {
        artist_entropy: shannon_entropy(artist_counts.values().copied(), total),
        genre_entropy: shannon_entropy(genre_counts.values().copied(), labeled),
        artist_coverage,
        genre_coverage,
    }
}

/// Shannon entropy in bits over a count distribution.
fn shannon_entropy<I>(counts: I, total: usize) -> f64
where
    I: IntoIterator<Item = usize>,
{
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .into_iter()
        .filter(|&count| count > 0)
        .map(|count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}
