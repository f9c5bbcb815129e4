//! # Similarity Engine
//!
//! Cosine-similarity ranking over the standardized feature space, with the
//! scoring adjustments that make the output feel like a playlist instead of
//! a nearest-neighbor dump.
//!
//! ## Design
//!
//! - **One service object**: [`Recommender`] owns the catalog, the fitted
//!   scaler, and a cached default matrix. It is built explicitly, passed by
//!   reference, and is `Send + Sync` because nothing mutates after
//!   construction. Multi-threaded hosts share it behind an `Arc`.
//! - **Whole-catalog scans**: every query compares the target against every
//!   row. The scan parallelizes with rayon; results are identical to the
//!   sequential order because the collect preserves indices.
//! - **Scoring adjustments**: the nostalgic mood lifts older releases, the
//!   genre boost lifts same-genre candidates, and the artist-diversity pass
//!   caps how often one artist can dominate a result list.
//!
//! ## Scoring pipeline
//!
//! ```text
//! score(track) = cosine(target, row(track))
//!              * nostalgia(release_year)     // nostalgic mood only
//!              * genre_boost(track)          // track queries, positive scores only
//! ```
//!
//! Results are sorted descending, deduplicated by track id (keeping the
//! best-scoring duplicate), and truncated or diversity-capped to the
//! requested count.

use crate::catalog::{Catalog, Track};
use crate::error::RecommendError;
use crate::features::{
    sanitize_features, FeatureMatrix, Scaler, WeightPreset, AUDIO_FEATURES, FEATURE_COUNT,
};
use crate::mood::{self, MoodProfile};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Result count used when a caller does not ask for a specific one.
pub const DEFAULT_COUNT: usize = 10;

/// Multiplier for candidates sharing the reference track's genre.
const GENRE_BOOST: f64 = 1.15;

/// Additional multiplier when the subgenre matches too.
const SUBGENRE_BOOST: f64 = 1.10;

/// Ceiling on tracks per artist when diversity re-ranking is on.
const MAX_TRACKS_PER_ARTIST: usize = 2;

/// Nostalgic-mood lift for releases before 2000.
const NOSTALGIA_PRE_2000: f64 = 1.08;

/// Nostalgic-mood lift for releases before 2010.
const NOSTALGIA_PRE_2010: f64 = 1.05;

/// Knobs for track-to-track queries.
///
/// The defaults mirror what the serving layer sends when a caller supplies
/// nothing: ten results, uniform weights, both adjustments on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarParams {
    /// Maximum number of results to return.
    pub count: usize,
    /// Weight preset applied to the feature space for this query.
    pub preset: WeightPreset,
    /// Lift candidates sharing the reference's genre and subgenre.
    pub genre_boost: bool,
    /// Cap any single artist at two tracks in the output.
    pub artist_diversity: bool,
}

impl Default for SimilarParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            preset: WeightPreset::Default,
            genre_boost: true,
            artist_diversity: true,
        }
    }
}

/// One ranked result: a catalog track, its score, and why it was picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub track: Track,
    /// Cosine similarity after any boosts; higher is more similar.
    pub similarity: f64,
    /// Human-readable reason this track made the list.
    pub explanation: String,
}

/// Catalog-level statistics for the `info` command and hosts.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub tracks: usize,
    pub unique_artists: usize,
    pub unique_genres: usize,
    pub features: Vec<FeatureSummary>,
}

/// Fitted mean and standard deviation of one feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub name: &'static str,
    pub mean: f64,
    pub std: f64,
}

/// Internal scored candidate referencing a catalog row.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    similarity: f64,
    shared_genre: bool,
}

enum QueryContext<'a> {
    Mood(&'static MoodProfile),
    Similar(&'a Track),
}

/// The recommendation service: catalog, fitted scaler, cached base matrix.
///
/// Construction standardizes the catalog exactly once. Every later query,
/// including queries under a weight preset and mood-prototype transforms,
/// reuses that single fitted scaler so all vectors live in the same space.
pub struct Recommender {
    catalog: Catalog,
    scaler: Scaler,
    base: FeatureMatrix,
}

impl Recommender {
    /// Builds the engine from an already-loaded catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use attune::catalog::Catalog;
    /// use attune::engine::Recommender;
    ///
    /// let data = "\
    /// track_id,track_name,track_artist,danceability,energy,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo
    /// a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128
    /// b,Down,Vale,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75
    /// ";
    /// let recommender = Recommender::new(Catalog::from_reader(data.as_bytes())?);
    /// let picks = recommender.recommend_by_mood("happy", 1);
    /// assert_eq!(picks[0].track.track_id, "a");
    /// # Ok::<(), attune::error::RecommendError>(())
    /// ```
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let scaler = Scaler::fit(&catalog.sanitized_feature_rows());
        let base = FeatureMatrix::build(&catalog, &scaler, WeightPreset::Default);
        info!("standardized {} tracks into the similarity space", catalog.len());

        Self {
            catalog,
            scaler,
            base,
        }
    }

    /// Loads a catalog CSV and builds the engine in one step.
    ///
    /// # Errors
    ///
    /// Returns any [`RecommendError`] the catalog loader produces.
    pub fn load(path: &Path) -> Result<Self, RecommendError> {
        Ok(Self::new(Catalog::load(path)?))
    }

    /// The catalog this engine was built from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Recommends tracks matching a named mood.
    ///
    /// The mood name is resolved case-insensitively, accepting emotion
    /// aliases like `Joy`. Names that match nothing fall back to the
    /// default mood; the substitution is logged, never an error, so a stale
    /// caller keeps getting music instead of a failure.
    ///
    /// For the `nostalgic` mood only, scores are lifted for older releases
    /// (8% before 2000, 5% before 2010).
    ///
    /// # Returns
    ///
    /// * At most `count` tracks, deduplicated by id
    /// * Sorted by descending similarity
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use attune::engine::Recommender;
    /// use std::path::Path;
    ///
    /// let recommender = Recommender::load(Path::new("songs.csv"))?;
    /// for pick in recommender.recommend_by_mood("energetic", 5) {
    ///     println!("{:.3}  {} - {}", pick.similarity, pick.track.track_name, pick.track.track_artist);
    /// }
    /// # Ok::<(), attune::error::RecommendError>(())
    /// ```
    #[must_use]
    pub fn recommend_by_mood(&self, mood_name: &str, count: usize) -> Vec<Recommendation> {
        let resolved = mood::resolve(mood_name);
        if resolved.fell_back {
            warn!(
                "unknown mood '{mood_name}', falling back to '{}'",
                resolved.profile.name
            );
        }

        let target = self
            .scaler
            .transform(sanitize_features(resolved.profile.natural_targets()));

        let mut candidates = self.score_against(&self.base, &target, None);

        if resolved.profile.name == mood::NOSTALGIC_MOOD {
            for candidate in &mut candidates {
                let year = self.catalog.tracks()[candidate.index].release_year();
                candidate.similarity *= nostalgia_factor(year);
            }
        }

        sort_by_similarity(&mut candidates);
        self.dedup_by_id(&mut candidates);
        candidates.truncate(count);

        debug!(
            "mood '{}' produced {} of {} requested tracks",
            resolved.profile.name,
            candidates.len(),
            count
        );

        let context = QueryContext::Mood(resolved.profile);
        candidates
            .iter()
            .map(|candidate| self.to_recommendation(candidate, &context))
            .collect()
    }

    /// Recommends tracks similar to a reference track id.
    ///
    /// The reference itself never appears in the output, and duplicate ids
    /// in the raw catalog are collapsed to their best-scoring row.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::TrackNotFound`] when the id is absent. An
    /// id is an exact key; a typo deserves an error, not a guess.
    ///
    /// # Examples
    ///
    /// ```
    /// use attune::catalog::Catalog;
    /// use attune::engine::{Recommender, SimilarParams};
    ///
    /// let data = "\
    /// track_id,track_name,track_artist,danceability,energy,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo
    /// a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128
    /// b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124
    /// c,Down,Moor,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75
    /// ";
    /// let recommender = Recommender::new(Catalog::from_reader(data.as_bytes())?);
    /// let picks = recommender.recommend_similar_by_id("a", &SimilarParams::default())?;
    /// assert!(picks.iter().all(|pick| pick.track.track_id != "a"));
    /// # Ok::<(), attune::error::RecommendError>(())
    /// ```
    pub fn recommend_similar_by_id(
        &self,
        track_id: &str,
        params: &SimilarParams,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let reference_index = self.catalog.position_by_id(track_id).ok_or_else(|| {
            RecommendError::TrackNotFound {
                track_id: track_id.to_string(),
            }
        })?;

        Ok(self.similar_to_index(reference_index, params))
    }

    /// Recommends tracks similar to the best name match for a query.
    ///
    /// Matching is case-insensitive, exact title first, then substring,
    /// earliest catalog row winning ties. A query that matches nothing
    /// returns an empty list rather than an error: free-text input is
    /// expected to miss sometimes.
    #[must_use]
    pub fn recommend_similar_by_name(
        &self,
        name: &str,
        params: &SimilarParams,
    ) -> Vec<Recommendation> {
        match self.catalog.find_by_name(name) {
            Some(index) => self.similar_to_index(index, params),
            None => {
                debug!("no track matched name query '{name}'");
                Vec::new()
            }
        }
    }

    /// Catalog statistics from the fitted scaler.
    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        let mut artists = HashSet::new();
        let mut genres = HashSet::new();
        for track in self.catalog.tracks() {
            artists.insert(track.track_artist.as_str());
            if let Some(genre) = track.playlist_genre.as_deref() {
                genres.insert(genre);
            }
        }

        let features = AUDIO_FEATURES
            .iter()
            .map(|&feature| FeatureSummary {
                name: feature.column(),
                mean: self.scaler.mean(feature),
                std: self.scaler.std(feature),
            })
            .collect();

        CatalogSummary {
            tracks: self.catalog.len(),
            unique_artists: artists.len(),
            unique_genres: genres.len(),
            features,
        }
    }

    fn matrix_for(&self, preset: WeightPreset) -> Cow<'_, FeatureMatrix> {
        if preset == WeightPreset::Default {
            Cow::Borrowed(&self.base)
        } else {
            Cow::Owned(FeatureMatrix::build(&self.catalog, &self.scaler, preset))
        }
    }

    /// Scores every matrix row against the target, skipping rows that carry
    /// the reference id.
    fn score_against(
        &self,
        matrix: &FeatureMatrix,
        target: &[f64; FEATURE_COUNT],
        skip_id: Option<&str>,
    ) -> Vec<Candidate> {
        let scores: Vec<f64> = matrix
            .rows()
            .par_iter()
            .map(|row| cosine_similarity(row, target))
            .collect();

        scores
            .into_iter()
            .enumerate()
            .filter(|(index, _)| {
                skip_id.map_or(true, |id| self.catalog.tracks()[*index].track_id != id)
            })
            .map(|(index, similarity)| Candidate {
                index,
                similarity,
                shared_genre: false,
            })
            .collect()
    }

    fn similar_to_index(&self, reference_index: usize, params: &SimilarParams) -> Vec<Recommendation> {
        let reference = &self.catalog.tracks()[reference_index];
        let matrix = self.matrix_for(params.preset);
        let target = *matrix.row(reference_index);

        let mut candidates = self.score_against(&matrix, &target, Some(&reference.track_id));

        if params.genre_boost {
            self.apply_genre_boost(&mut candidates, reference);
        }

        sort_by_similarity(&mut candidates);
        self.dedup_by_id(&mut candidates);

        let picked = if params.artist_diversity {
            self.diversify_by_artist(candidates, params.count)
        } else {
            candidates.truncate(params.count);
            candidates
        };

        debug!(
            "similar to '{}' ({}) produced {} of {} requested tracks",
            reference.track_name,
            reference.track_id,
            picked.len(),
            params.count
        );

        let context = QueryContext::Similar(reference);
        picked
            .iter()
            .map(|candidate| self.to_recommendation(candidate, &context))
            .collect()
    }

    /// Lifts same-genre candidates. Only positive scores are boosted, so
    /// the lift can never push a same-genre track below its unboosted rank.
    fn apply_genre_boost(&self, candidates: &mut [Candidate], reference: &Track) {
        let Some(reference_genre) = reference.playlist_genre.as_deref() else {
            return;
        };

        for candidate in candidates.iter_mut() {
            if candidate.similarity <= 0.0 {
                continue;
            }
            let track = &self.catalog.tracks()[candidate.index];
            if track.playlist_genre.as_deref() != Some(reference_genre) {
                continue;
            }

            let mut boost = GENRE_BOOST;
            if reference.playlist_subgenre.is_some()
                && track.playlist_subgenre == reference.playlist_subgenre
            {
                boost *= SUBGENRE_BOOST;
            }
            candidate.similarity *= boost;
            candidate.shared_genre = true;
        }
    }

    /// Greedy diversity pass over the already-ranked candidates.
    ///
    /// Walks the list in descending score order, skipping tracks whose
    /// artist already has [`MAX_TRACKS_PER_ARTIST`] picks, until `count`
    /// tracks are chosen or the pool runs dry. Skipped tracks are not
    /// backfilled later; a short list is better than a repetitive one.
    fn diversify_by_artist(&self, candidates: Vec<Candidate>, count: usize) -> Vec<Candidate> {
        let mut picks = Vec::with_capacity(count.min(candidates.len()));
        let mut per_artist: HashMap<&str, usize> = HashMap::new();

        for candidate in candidates {
            if picks.len() == count {
                break;
            }
            let artist = self.catalog.tracks()[candidate.index].track_artist.as_str();
            let taken = per_artist.entry(artist).or_insert(0);
            if *taken < MAX_TRACKS_PER_ARTIST {
                *taken += 1;
                picks.push(candidate);
            }
        }

        picks
    }

    /// Drops later occurrences of each track id. Candidates must already be
    /// sorted descending, so the kept occurrence is the best-scoring one.
    fn dedup_by_id(&self, candidates: &mut Vec<Candidate>) {
        let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
        candidates.retain(|candidate| {
            seen.insert(self.catalog.tracks()[candidate.index].track_id.as_str())
        });
    }

    fn to_recommendation(&self, candidate: &Candidate, context: &QueryContext<'_>) -> Recommendation {
        let track = &self.catalog.tracks()[candidate.index];

        let explanation = match context {
            QueryContext::Mood(profile) if profile.name == mood::FOCUS_MOOD => format!(
                "Matches the '{}' mood (instrumentalness {:.2}, speechiness {:.2})",
                profile.name, track.features.instrumentalness, track.features.speechiness
            ),
            QueryContext::Mood(profile) => format!(
                "Matches the '{}' mood (valence {:.2}, energy {:.2})",
                profile.name, track.features.valence, track.features.energy
            ),
            QueryContext::Similar(reference) => {
                match (candidate.shared_genre, reference.playlist_genre.as_deref()) {
                    (true, Some(genre)) => format!(
                        "Similar to '{}' by {}, shares the {} genre",
                        reference.track_name, reference.track_artist, genre
                    ),
                    _ => format!(
                        "Similar to '{}' by {}",
                        reference.track_name, reference.track_artist
                    ),
                }
            }
        };

        Recommendation {
            track: track.clone(),
            similarity: candidate.similarity,
            explanation,
        }
    }
}

/// Cosine similarity with a zero-norm guard.
///
/// A zero-norm vector has no direction to compare, so its similarity to
/// anything is defined as 0.0 rather than NaN.
#[inline]
fn cosine_similarity(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for i in 0..FEATURE_COUNT {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

const fn nostalgia_factor(year: Option<i32>) -> f64 {
    match year {
        Some(y) if y < 2000 => NOSTALGIA_PRE_2000,
        Some(y) if y < 2010 => NOSTALGIA_PRE_2010,
        _ => 1.0,
    }
}

fn sort_by_similarity(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const HEADER: &str = "track_id,track_name,track_artist,danceability,energy,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo,playlist_genre,playlist_subgenre,track_album_release_date";

    fn catalog_from(rows: &[&str]) -> Catalog {
        let mut data = String::from(HEADER);
        data.push('\n');
        for row in rows {
            data.push_str(row);
            data.push('\n');
        }
        Catalog::from_reader(data.as_bytes()).expect("fixture catalog should parse")
    }

    fn ids(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations
            .iter()
            .map(|r| r.track.track_id.as_str())
            .collect()
    }

    #[test]
    fn test_recommender_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Recommender>();
    }

    #[test]
    fn test_cosine_similarity_basics() {
        let a = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let zero = [0.0; FEATURE_COUNT];
        let mut opposite = a;
        opposite[0] = -1.0;

        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&a, &opposite) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&a, &zero), 0.0, "zero norm must score 0.0");
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_nostalgia_factor_thresholds() {
        assert_eq!(nostalgia_factor(Some(1995)), NOSTALGIA_PRE_2000);
        assert_eq!(nostalgia_factor(Some(1999)), NOSTALGIA_PRE_2000);
        assert_eq!(nostalgia_factor(Some(2000)), NOSTALGIA_PRE_2010);
        assert_eq!(nostalgia_factor(Some(2009)), NOSTALGIA_PRE_2010);
        assert_eq!(nostalgia_factor(Some(2010)), 1.0);
        assert_eq!(nostalgia_factor(None), 1.0);
    }

    #[test]
    fn test_happy_mood_prefers_bright_tracks() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "b,Down,Vale,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let picks = recommender.recommend_by_mood("happy", 2);
        assert_eq!(ids(&picks), vec!["a", "b"]);
        assert!(
            picks[0].similarity > picks[1].similarity,
            "output must be sorted by descending similarity"
        );
        assert!(picks[0].explanation.contains("happy"));
    }

    #[test]
    fn test_mood_count_caps_results() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "b,Down,Vale,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,,,",
        ]);
        let recommender = Recommender::new(catalog);

        assert_eq!(recommender.recommend_by_mood("happy", 1).len(), 1);
        assert!(recommender.recommend_by_mood("happy", 0).is_empty());
        assert_eq!(
            recommender.recommend_by_mood("happy", 50).len(),
            2,
            "count beyond the pool returns the whole pool"
        );
    }

    #[test]
    fn test_unknown_mood_behaves_like_default() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "b,Down,Vale,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let fallback = recommender.recommend_by_mood("zen-garden", 2);
        let default = recommender.recommend_by_mood("happy", 2);
        assert_eq!(fallback, default);
    }

    #[test]
    fn test_emotion_alias_reaches_the_engine() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "b,Down,Vale,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,,,",
        ]);
        let recommender = Recommender::new(catalog);

        assert_eq!(
            recommender.recommend_by_mood("Joy", 2),
            recommender.recommend_by_mood("happy", 2)
        );
    }

    #[test]
    fn test_duplicate_ids_keep_best_scoring_row() {
        // The far variant of "dup" comes first in the file; keeping it
        // would mean dedup picked by row order instead of by score.
        let catalog = catalog_from(&[
            "ref,Anchor,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "dup,Twice Far,Artist,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,,,",
            "dup,Twice Near,Artist,0.88,0.88,-4.2,0.05,0.12,0.0,0.1,0.88,126,,,",
            "c,Other,Other,0.5,0.5,-9.0,0.05,0.4,0.0,0.1,0.5,100,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let picks = recommender
            .recommend_similar_by_id("ref", &SimilarParams::default())
            .expect("reference id must exist");
        let dup_rows: Vec<_> = picks
            .iter()
            .filter(|r| r.track.track_id == "dup")
            .collect();

        assert_eq!(dup_rows.len(), 1, "duplicate ids must collapse to one row");
        assert_eq!(
            dup_rows[0].track.features.valence, 0.88,
            "the kept duplicate must be the better-scoring one"
        );
    }

    #[test]
    fn test_nostalgic_mood_lifts_older_releases() {
        // Rows 'new' and 'old' carry identical features, so without the
        // year lift they tie and keep file order (new first).
        let catalog = catalog_from(&[
            "new,Fresh Cut,A,0.5,0.45,-24.0,0.05,0.55,0.1,0.18,0.6,110,,,2015-05-01",
            "old,Worn Tape,B,0.5,0.45,-24.0,0.05,0.55,0.1,0.18,0.6,110,,,1995-02-01",
            "x,Outlier,C,0.9,0.9,-3.0,0.2,0.05,0.0,0.3,0.95,170,,,2020-01-01",
        ]);
        let recommender = Recommender::new(catalog);

        let calm = recommender.recommend_by_mood("calm", 3);
        let calm_ids = ids(&calm);
        assert!(
            calm_ids.iter().position(|id| *id == "new")
                < calm_ids.iter().position(|id| *id == "old"),
            "without the lift, ties resolve to file order"
        );

        let nostalgic = recommender.recommend_by_mood("nostalgic", 3);
        let nostalgic_ids = ids(&nostalgic);
        assert!(
            nostalgic_ids.iter().position(|id| *id == "old")
                < nostalgic_ids.iter().position(|id| *id == "new"),
            "the nostalgic lift must move the 1995 release ahead"
        );
    }

    #[test]
    fn test_similar_excludes_reference_and_unknown_id_errors() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124,,,",
            "c,Down,Moor,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let picks = recommender
            .recommend_similar_by_id("a", &SimilarParams::default())
            .expect("known id must succeed");
        assert!(!ids(&picks).contains(&"a"), "the reference must be excluded");
        assert_eq!(picks.len(), 2);

        let err = recommender
            .recommend_similar_by_id("no-such-id-000", &SimilarParams::default())
            .expect_err("unknown id must be an error");
        assert!(matches!(
            err,
            RecommendError::TrackNotFound { track_id } if track_id == "no-such-id-000"
        ));
    }

    #[test]
    fn test_similar_by_name_misses_return_empty() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,,,",
            "b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let picks = recommender.recommend_similar_by_name("zzz_not_a_real_song_zzz", &SimilarParams::default());
        assert!(picks.is_empty(), "an unmatched name is an empty success");

        let by_substring = recommender.recommend_similar_by_name("lif", &SimilarParams::default());
        assert_eq!(by_substring.len(), 1);
        assert_eq!(by_substring[0].track.track_id, "a");
    }

    #[test]
    fn test_genre_boost_lifts_only_positive_same_genre_scores() {
        let catalog = catalog_from(&[
            "ref,Anchor,R,0.9,0.9,-3.0,0.05,0.1,0.0,0.1,0.9,150,pop,dance pop,",
            "same,Kin,S,0.85,0.85,-4.0,0.05,0.15,0.0,0.1,0.85,145,pop,dance pop,",
            "anti,Inverse,T,0.1,0.1,-20.0,0.05,0.9,0.0,0.1,0.1,60,pop,electropop,",
            "other,Stranger,U,0.85,0.85,-4.0,0.05,0.15,0.0,0.1,0.85,145,rock,classic rock,",
            "plain,Unlabeled,V,0.85,0.85,-4.0,0.05,0.15,0.0,0.1,0.85,145,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let params_off = SimilarParams {
            genre_boost: false,
            artist_diversity: false,
            ..SimilarParams::default()
        };
        let params_on = SimilarParams {
            genre_boost: true,
            artist_diversity: false,
            ..SimilarParams::default()
        };

        let score_map = |params: &SimilarParams| -> HashMap<String, f64> {
            recommender
                .recommend_similar_by_id("ref", params)
                .expect("reference id must exist")
                .into_iter()
                .map(|r| (r.track.track_id, r.similarity))
                .collect()
        };

        let off = score_map(&params_off);
        let on = score_map(&params_on);

        assert!(
            on["same"] > off["same"],
            "a positive same-genre score must be lifted"
        );
        assert!(
            (on["same"] - off["same"] * GENRE_BOOST * SUBGENRE_BOOST).abs() < 1e-9,
            "genre and subgenre multipliers should stack"
        );
        assert_eq!(on["other"], off["other"], "other genres are untouched");
        assert_eq!(on["plain"], off["plain"], "missing genres are untouched");
        assert!(off["anti"] < 0.0, "fixture expects a negative-score candidate");
        assert_eq!(
            on["anti"], off["anti"],
            "non-positive scores must never be boosted"
        );
    }

    #[test]
    fn test_genre_boost_skipped_when_reference_genre_unknown() {
        let catalog = catalog_from(&[
            "ref,Anchor,R,0.9,0.9,-3.0,0.05,0.1,0.0,0.1,0.9,150,,,",
            "same,Kin,S,0.85,0.85,-4.0,0.05,0.15,0.0,0.1,0.85,145,pop,dance pop,",
            "anti,Inverse,T,0.1,0.1,-20.0,0.05,0.9,0.0,0.1,0.1,60,pop,electropop,",
        ]);
        let recommender = Recommender::new(catalog);

        let base = SimilarParams {
            artist_diversity: false,
            ..SimilarParams::default()
        };
        let no_boost = SimilarParams {
            genre_boost: false,
            ..base.clone()
        };

        let on = recommender
            .recommend_similar_by_id("ref", &base)
            .expect("reference id must exist");
        let off = recommender
            .recommend_similar_by_id("ref", &no_boost)
            .expect("reference id must exist");

        assert_eq!(on, off, "no reference genre means no boost at all");
    }

    #[test]
    fn test_artist_diversity_caps_at_two_without_backfill() {
        let catalog = catalog_from(&[
            "ref,Anchor,R,0.9,0.9,-3.0,0.05,0.1,0.0,0.1,0.9,150,,,",
            "x1,Echo One,X,0.89,0.89,-3.2,0.05,0.1,0.0,0.1,0.89,149,,,",
            "x2,Echo Two,X,0.88,0.88,-3.4,0.05,0.11,0.0,0.1,0.88,148,,,",
            "x3,Echo Three,X,0.87,0.87,-3.6,0.05,0.12,0.0,0.1,0.87,147,,,",
            "y1,Far One,Y,0.5,0.5,-9.0,0.05,0.5,0.2,0.1,0.5,100,,,",
            "y2,Far Two,Y,0.45,0.45,-10.0,0.05,0.55,0.2,0.1,0.45,95,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let diverse = recommender
            .recommend_similar_by_id(
                "ref",
                &SimilarParams {
                    genre_boost: false,
                    ..SimilarParams::default()
                },
            )
            .expect("reference id must exist");
        let x_count = diverse
            .iter()
            .filter(|r| r.track.track_artist == "X")
            .count();
        assert_eq!(x_count, 2, "artist X must be capped at two tracks");
        assert_eq!(
            diverse.len(),
            4,
            "the skipped track is dropped, not backfilled"
        );

        let flat = recommender
            .recommend_similar_by_id(
                "ref",
                &SimilarParams {
                    genre_boost: false,
                    artist_diversity: false,
                    ..SimilarParams::default()
                },
            )
            .expect("reference id must exist");
        assert_eq!(flat.len(), 5, "diversity off returns the full pool");
    }

    #[test]
    fn test_queries_are_idempotent() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,pop,dance pop,2019-01-01",
            "b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124,pop,dance pop,2018-01-01",
            "c,Down,Moor,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,rock,soft rock,1999-01-01",
        ]);
        let recommender = Recommender::new(catalog);

        let first = recommender.recommend_by_mood("happy", 3);
        let second = recommender.recommend_by_mood("happy", 3);
        assert_eq!(first, second);

        let params = SimilarParams::default();
        let one = recommender
            .recommend_similar_by_id("a", &params)
            .expect("known id must succeed");
        let two = recommender
            .recommend_similar_by_id("a", &params)
            .expect("known id must succeed");
        assert_eq!(one, two);
    }

    #[test]
    fn test_preset_changes_similarity_scores() {
        let catalog = catalog_from(&[
            "ref,Anchor,R,0.5,0.9,-5.0,0.05,0.1,0.0,0.1,0.5,160,,,",
            "x,Runner,X,0.5,0.85,-5.5,0.05,0.7,0.5,0.1,0.2,155,,,",
            "y,Porch,Y,0.5,0.3,-12.0,0.05,0.15,0.05,0.1,0.45,90,,,",
            "f1,Filler One,F,0.3,0.5,-9.0,0.05,0.4,0.2,0.1,0.6,120,,,",
            "f2,Filler Two,G,0.7,0.6,-7.0,0.05,0.3,0.1,0.1,0.35,130,,,",
        ]);
        let recommender = Recommender::new(catalog);

        let run = |preset: WeightPreset| -> Vec<String> {
            recommender
                .recommend_similar_by_id(
                    "ref",
                    &SimilarParams {
                        preset,
                        genre_boost: false,
                        artist_diversity: false,
                        ..SimilarParams::default()
                    },
                )
                .expect("reference id must exist")
                .into_iter()
                .map(|r| r.track.track_id)
                .collect()
        };

        let workout = run(WeightPreset::Workout);
        let chill = run(WeightPreset::Chill);

        let rank = |order: &[String], id: &str| order.iter().position(|x| x == id);
        assert!(
            rank(&workout, "x") < rank(&workout, "y"),
            "workout weighting should favor the high-tempo candidate"
        );
        assert!(
            rank(&chill, "y") < rank(&chill, "x"),
            "chill weighting should favor the low-energy candidate"
        );
    }

    #[test]
    fn test_summary_reports_catalog_shape() {
        let catalog = catalog_from(&[
            "a,Up,Nova,0.9,0.9,-4.0,0.05,0.1,0.0,0.1,0.9,128,pop,dance pop,2019-01-01",
            "b,Lift,Vale,0.8,0.8,-5.0,0.06,0.2,0.0,0.1,0.8,124,pop,electropop,2018-01-01",
            "c,Down,Moor,0.2,0.2,-14.0,0.04,0.8,0.0,0.1,0.1,75,rock,soft rock,1999-01-01",
        ]);
        let recommender = Recommender::new(catalog);

        let summary = recommender.summary();
        assert_eq!(summary.tracks, 3);
        assert_eq!(summary.unique_artists, 3);
        assert_eq!(summary.unique_genres, 2);
        assert_eq!(summary.features.len(), FEATURE_COUNT);
        assert_eq!(summary.features[0].name, "danceability");
    }

    #[test]
    fn test_empty_catalog_yields_empty_results() {
        let catalog = catalog_from(&[]);
        let recommender = Recommender::new(catalog);

        assert!(recommender.recommend_by_mood("happy", 5).is_empty());
        assert!(recommender
            .recommend_similar_by_name("anything", &SimilarParams::default())
            .is_empty());
        assert!(recommender
            .recommend_similar_by_id("a", &SimilarParams::default())
            .is_err());
    }
}
