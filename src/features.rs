//! # Feature Builder Module
//!
//! Turns raw catalog rows into the numeric space every similarity query runs
//! in. The pipeline is deliberately rigid:
//!
//! 1. **Sanitize** raw values (NaN becomes 0.0, +inf becomes 1.0, -inf
//!    becomes 0.0) so user-supplied CSVs cannot poison the math.
//! 2. **Standardize** each feature to zero mean and unit variance with a
//!    [`Scaler`] fitted exactly once over the full catalog.
//! 3. **Weight** each standardized column with a named [`WeightPreset`],
//!    applied multiplicatively after standardization.
//! 4. **Sanitize again** so no non-finite value survives the transform.
//!
//! The same fitted scaler must transform every vector that is ever compared
//! against the matrix, including mood targets. Mixing scalers silently skews
//! cosine scores, which is the kind of bug that never shows up in tests and
//! always shows up in playlists.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};

/// Number of audio features every track carries.
pub const FEATURE_COUNT: usize = 9;

/// The nine audio features, in the canonical column order used by the
/// catalog, the scaler, the weight presets, and the mood prototypes.
pub const AUDIO_FEATURES: [AudioFeature; FEATURE_COUNT] = [
    AudioFeature::Danceability,
    AudioFeature::Energy,
    AudioFeature::Loudness,
    AudioFeature::Speechiness,
    AudioFeature::Acousticness,
    AudioFeature::Instrumentalness,
    AudioFeature::Liveness,
    AudioFeature::Valence,
    AudioFeature::Tempo,
];

/// Identifier for a single audio feature dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFeature {
    Danceability,
    Energy,
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
}

impl AudioFeature {
    /// CSV column name for this feature.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Danceability => "danceability",
            Self::Energy => "energy",
            Self::Loudness => "loudness",
            Self::Speechiness => "speechiness",
            Self::Acousticness => "acousticness",
            Self::Instrumentalness => "instrumentalness",
            Self::Liveness => "liveness",
            Self::Valence => "valence",
            Self::Tempo => "tempo",
        }
    }
}

/// One track's audio features in natural units.
///
/// Most values live in `0.0..=1.0`. Loudness is in dB (roughly `-60.0..=0.0`)
/// and tempo is in BPM (roughly `50.0..=200.0`). Values are stored exactly as
/// loaded; sanitization happens when a matrix is built, not here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl AudioFeatures {
    /// Value of a single feature dimension.
    #[must_use]
    pub const fn get(&self, feature: AudioFeature) -> f64 {
        match feature {
            AudioFeature::Danceability => self.danceability,
            AudioFeature::Energy => self.energy,
            AudioFeature::Loudness => self.loudness,
            AudioFeature::Speechiness => self.speechiness,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Instrumentalness => self.instrumentalness,
            AudioFeature::Liveness => self.liveness,
            AudioFeature::Valence => self.valence,
            AudioFeature::Tempo => self.tempo,
        }
    }

    /// The features as an array in canonical column order.
    #[must_use]
    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        AUDIO_FEATURES.map(|feature| self.get(feature))
    }

    /// Builds features from an array in canonical column order.
    #[must_use]
    pub const fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            danceability: values[0],
            energy: values[1],
            loudness: values[2],
            speechiness: values[3],
            acousticness: values[4],
            instrumentalness: values[5],
            liveness: values[6],
            valence: values[7],
            tempo: values[8],
        }
    }
}

/// Replaces non-finite input values before standardization.
///
/// NaN maps to 0.0, positive infinity to 1.0, negative infinity to 0.0.
/// Finite values pass through untouched.
#[inline]
#[must_use]
pub fn sanitize_feature(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else if value == f64::INFINITY {
        1.0
    } else if value == f64::NEG_INFINITY {
        0.0
    } else {
        value
    }
}

/// Sanitizes a full feature row. See [`sanitize_feature`].
#[inline]
#[must_use]
pub fn sanitize_features(row: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
    row.map(sanitize_feature)
}

/// Per-feature standardization parameters, fitted once per catalog.
///
/// Uses the population standard deviation. A feature with zero variance
/// would divide by zero, so its scale is pinned to 1.0 and the transformed
/// column collapses to zeros, which keeps constant columns from dominating
/// or breaking cosine scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scaler {
    means: [f64; FEATURE_COUNT],
    stds: [f64; FEATURE_COUNT],
}

impl Scaler {
    /// Fits means and standard deviations over the given rows.
    ///
    /// Rows are expected to be sanitized already. An empty slice yields an
    /// identity-like scaler (means 0.0, scales 1.0) so an empty catalog
    /// still produces a usable, if vacuous, engine.
    #[must_use]
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        if rows.is_empty() {
            return Self {
                means: [0.0; FEATURE_COUNT],
                stds: [1.0; FEATURE_COUNT],
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let n = rows.len() as f64;

        let mut means = [0.0; FEATURE_COUNT];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = [0.0; FEATURE_COUNT];
        for row in rows {
            for i in 0..FEATURE_COUNT {
                stds[i] += (row[i] - means[i]).powi(2);
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
        }

        Self { means, stds }
    }

    /// Mean of a feature over the fitted catalog.
    #[must_use]
    pub const fn mean(&self, feature: AudioFeature) -> f64 {
        self.means[feature as usize]
    }

    /// Population standard deviation of a feature over the fitted catalog.
    #[must_use]
    pub const fn std(&self, feature: AudioFeature) -> f64 {
        self.stds[feature as usize]
    }

    #[inline]
    fn scale(&self, index: usize) -> f64 {
        if self.stds[index] == 0.0 {
            1.0
        } else {
            self.stds[index]
        }
    }

    /// Standardizes one row into zero-mean, unit-variance space.
    ///
    /// Any non-finite result is forced to 0.0, so the output is always safe
    /// to feed into a similarity computation.
    #[must_use]
    pub fn transform(&self, row: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let scaled = (row[i] - self.means[i]) / self.scale(i);
            out[i] = if scaled.is_finite() { scaled } else { 0.0 };
        }
        out
    }
}

/// Named per-feature weighting tables.
///
/// Weights multiply standardized columns, so a weight of 2.0 doubles a
/// feature's pull on cosine similarity and 0.3 mostly mutes it. The tables
/// are fixed; `Default` is the uniform table and leaves the space untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPreset {
    /// Uniform weights, every feature counts equally.
    #[default]
    Default,
    /// Emphasizes valence and energy for emotional matching.
    Mood,
    /// Emphasizes tempo, energy, and danceability.
    Workout,
    /// Emphasizes acousticness and instrumentalness, mutes energy.
    Chill,
    /// Emphasizes instrumentalness, valence, and acousticness.
    Psychedelic,
    /// Emphasizes acousticness and valence with moderate energy.
    Indie,
}

impl WeightPreset {
    /// Every available preset, in display order.
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::Mood,
        Self::Workout,
        Self::Chill,
        Self::Psychedelic,
        Self::Indie,
    ];

    /// Lowercase name used by the CLI and serialized output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Mood => "mood",
            Self::Workout => "workout",
            Self::Chill => "chill",
            Self::Psychedelic => "psychedelic",
            Self::Indie => "indie",
        }
    }

    /// Looks a preset up by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|preset| preset.name() == key)
    }

    /// The weight table in canonical feature order.
    #[must_use]
    pub const fn weights(self) -> [f64; FEATURE_COUNT] {
        match self {
            Self::Default => [1.0; FEATURE_COUNT],
            Self::Mood => [0.8, 1.5, 0.5, 0.3, 1.2, 1.0, 0.3, 1.5, 0.6],
            Self::Workout => [1.5, 2.0, 1.0, 0.3, 0.3, 0.5, 0.5, 0.8, 1.5],
            Self::Chill => [0.5, 0.5, 0.5, 0.3, 1.8, 1.5, 0.3, 1.2, 0.5],
            Self::Psychedelic => [1.0, 0.4, 0.3, 0.2, 1.5, 2.0, 0.3, 1.8, 1.2],
            Self::Indie => [0.8, 0.7, 0.5, 0.5, 1.5, 1.2, 0.8, 1.3, 1.0],
        }
    }
}

/// Standardized (and optionally weighted) catalog features.
///
/// Row `i` of the matrix always corresponds to row `i` of the catalog it was
/// built from. The matrix is immutable after construction; a different
/// preset means building a different matrix with the same fitted scaler.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    preset: WeightPreset,
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureMatrix {
    /// Builds the matrix for a catalog: sanitize, standardize, weight.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use attune::catalog::Catalog;
    /// use attune::features::{FeatureMatrix, Scaler, WeightPreset};
    /// use std::path::Path;
    ///
    /// let catalog = Catalog::load(Path::new("songs.csv"))?;
    /// let scaler = Scaler::fit(&catalog.sanitized_feature_rows());
    /// let matrix = FeatureMatrix::build(&catalog, &scaler, WeightPreset::Workout);
    /// assert_eq!(matrix.len(), catalog.len());
    /// # Ok::<(), attune::error::RecommendError>(())
    /// ```
    #[must_use]
    pub fn build(catalog: &Catalog, scaler: &Scaler, preset: WeightPreset) -> Self {
        let weights = preset.weights();
        let rows = catalog
            .tracks()
            .iter()
            .map(|track| {
                let mut row = scaler.transform(sanitize_features(track.features.to_array()));
                for (value, weight) in row.iter_mut().zip(&weights) {
                    *value *= weight;
                }
                row
            })
            .collect();

        Self { preset, rows }
    }

    /// The preset this matrix was weighted with.
    #[must_use]
    pub const fn preset(&self) -> WeightPreset {
        self.preset
    }

    /// All rows, in catalog order.
    #[must_use]
    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    /// A single row by catalog index.
    #[must_use]
    pub fn row(&self, index: usize) -> &[f64; FEATURE_COUNT] {
        &self.rows[index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
