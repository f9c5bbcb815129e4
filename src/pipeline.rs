//! # Request Pipeline
//!
//! The thin serving layer between a host (CLI, HTTP handler, notebook) and
//! the engine. Hosts hand over partially-specified requests; this module
//! fills in defaults and forwards to [`Recommender`].
//!
//! The split keeps the engine's API strict (every knob explicit) while
//! letting callers omit everything they do not care about.

use crate::engine::{Recommendation, Recommender, SimilarParams, DEFAULT_COUNT};
use crate::error::RecommendError;
use crate::features::WeightPreset;
use log::warn;
use serde::Deserialize;

/// A track-to-track query as a host submits it: every knob optional.
///
/// Deserializes from JSON bodies like `{"count": 5, "preset": "workout"}`;
/// an empty object is valid and means "all defaults". Unknown preset names
/// fall back to the uniform weighting with a logged warning, matching how
/// unknown moods are handled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimilarRequest {
    pub count: Option<usize>,
    pub preset: Option<String>,
    pub genre_boost: Option<bool>,
    pub artist_diversity: Option<bool>,
}

impl SimilarRequest {
    /// Resolves the request into concrete engine parameters.
    #[must_use]
    pub fn to_params(&self) -> SimilarParams {
        let defaults = SimilarParams::default();

        let preset = match self.preset.as_deref() {
            None => defaults.preset,
            Some(name) => WeightPreset::from_name(name).unwrap_or_else(|| {
                warn!("unknown preset '{name}', using '{}'", defaults.preset.name());
                defaults.preset
            }),
        };

        SimilarParams {
            count: self.count.unwrap_or(defaults.count),
            preset,
            genre_boost: self.genre_boost.unwrap_or(defaults.genre_boost),
            artist_diversity: self.artist_diversity.unwrap_or(defaults.artist_diversity),
        }
    }
}

/// Mood recommendations with an optional count (missing means ten).
#[must_use]
pub fn recommend_for_mood(
    recommender: &Recommender,
    mood: &str,
    count: Option<usize>,
) -> Vec<Recommendation> {
    recommender.recommend_by_mood(mood, count.unwrap_or(DEFAULT_COUNT))
}

/// Track-to-track recommendations keyed by exact id.
///
/// # Errors
///
/// Returns [`RecommendError::TrackNotFound`] for an unknown id.
///
/// # Examples
///
/// ```
/// use attune::catalog::Catalog;
/// use attune::engine::Recommender;
/// use attune::pipeline::{recommend_for_track_id, SimilarRequest};
///
/// let data = "\
/// track_id,track_name,track_artist,danceability,energy,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo
/// a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128
/// b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124
/// ";
/// let recommender = Recommender::new(Catalog::from_reader(data.as_bytes())?);
///
/// let request: SimilarRequest = serde_json::from_str(r#"{"count": 1}"#)?;
/// let picks = recommend_for_track_id(&recommender, "a", &request)?;
/// assert_eq!(picks.len(), 1);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn recommend_for_track_id(
    recommender: &Recommender,
    track_id: &str,
    request: &SimilarRequest,
) -> Result<Vec<Recommendation>, RecommendError> {
    recommender.recommend_similar_by_id(track_id, &request.to_params())
}

/// Track-to-track recommendations keyed by a free-text name query.
///
/// An unmatched name returns an empty list, never an error.
#[must_use]
pub fn recommend_for_track_name(
    recommender: &Recommender,
    name: &str,
    request: &SimilarRequest,
) -> Vec<Recommendation> {
    recommender.recommend_similar_by_name(name, &request.to_params())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn small_recommender() -> Recommender {
        let data = "\
track_id,track_name,track_artist,danceability,energy,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo
a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128
b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124
c,Down,Moor,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75
";
        Recommender::new(Catalog::from_reader(data.as_bytes()).expect("fixture should parse"))
    }

    #[test]
    fn test_empty_request_matches_engine_defaults() {
        let request: SimilarRequest =
            serde_json::from_str("{}").expect("empty object should deserialize");
        assert_eq!(request.to_params(), SimilarParams::default());
    }

    #[test]
    fn test_request_overrides_are_honored() {
        let request: SimilarRequest = serde_json::from_str(
            r#"{"count": 3, "preset": "workout", "genre_boost": false, "artist_diversity": false}"#,
        )
        .expect("full object should deserialize");

        let params = request.to_params();
        assert_eq!(params.count, 3);
        assert_eq!(params.preset, WeightPreset::Workout);
        assert!(!params.genre_boost);
        assert!(!params.artist_diversity);
    }

    #[test]
    fn test_unknown_preset_falls_back_to_uniform() {
        let request = SimilarRequest {
            preset: Some("turbo-nonsense".to_string()),
            ..SimilarRequest::default()
        };
        assert_eq!(request.to_params().preset, WeightPreset::Default);
    }

    #[test]
    fn test_mood_facade_defaults_to_ten() {
        let recommender = small_recommender();
        assert_eq!(
            recommend_for_mood(&recommender, "happy", None),
            recommender.recommend_by_mood("happy", DEFAULT_COUNT)
        );
        assert_eq!(recommend_for_mood(&recommender, "happy", Some(1)).len(), 1);
    }

    #[test]
    fn test_track_facades_match_direct_engine_calls() {
        let recommender = small_recommender();
        let request = SimilarRequest::default();

        let by_id = recommend_for_track_id(&recommender, "a", &request)
            .expect("known id must succeed");
        let direct = recommender
            .recommend_similar_by_id("a", &SimilarParams::default())
            .expect("known id must succeed");
        assert_eq!(by_id, direct);

        assert!(recommend_for_track_id(&recommender, "nope", &request).is_err());
        assert!(recommend_for_track_name(&recommender, "zzz-miss", &request).is_empty());
    }
}
