//! Catalog loading and track lookup.
//!
//! The catalog is a plain CSV file loaded once into memory. Row order is
//! preserved exactly as it appears in the file; every index handed around
//! the crate is an index into that original order, and name matching breaks
//! ties by taking the earliest row.

use crate::error::RecommendError;
use crate::features::{sanitize_features, AudioFeatures, AUDIO_FEATURES, FEATURE_COUNT};
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Metadata columns every catalog must provide.
pub const REQUIRED_META: [&str; 3] = ["track_id", "track_name", "track_artist"];

const GENRE_COLUMN: &str = "playlist_genre";
const SUBGENRE_COLUMN: &str = "playlist_subgenre";
const RELEASE_DATE_COLUMN: &str = "track_album_release_date";

/// One catalog row.
///
/// The core schema is fixed; any column the loader does not recognize lands
/// in [`Track::extra`] untouched, so downstream consumers (JSON output,
/// evaluation metrics) can still see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub track_id: String,
    pub track_name: String,
    pub track_artist: String,
    #[serde(flatten)]
    pub features: AudioFeatures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_subgenre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_album_release_date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Track {
    /// Release year parsed from the leading `YYYY` of the release date.
    ///
    /// Returns `None` when the date is absent or does not start with four
    /// digits. Dates in the wild come as `YYYY`, `YYYY-MM`, and
    /// `YYYY-MM-DD`; all three parse here.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.track_album_release_date
            .as_deref()?
            .get(0..4)?
            .parse()
            .ok()
    }
}

/// The immutable, in-memory track table.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Loads a catalog from a CSV file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Io`] when the file cannot be opened,
    /// [`RecommendError::Schema`] when required columns are missing, and
    /// [`RecommendError::Csv`] when a record is structurally malformed.
    pub fn load(path: &Path) -> Result<Self, RecommendError> {
        let file = File::open(path).map_err(|source| RecommendError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_reader(BufReader::new(file))?;
        info!(
            "loaded {} tracks from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Loads a catalog from any CSV reader.
    ///
    /// Numeric cells that fail to parse become NaN rather than failing the
    /// load; the feature builder sanitizes them later. Missing required
    /// columns fail immediately with the full list of offenders.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Schema`] or [`RecommendError::Csv`].
    ///
    /// # Examples
    ///
    /// ```
    /// use attune::catalog::Catalog;
    ///
    /// let data = "\
    /// track_id,track_name,track_artist,danceability,energy,loudness,speechiness,acousticness,instrumentalness,liveness,valence,tempo
    /// t1,Echoes,Mira,0.7,0.6,-6.0,0.05,0.3,0.0,0.1,0.8,118
    /// ";
    /// let catalog = Catalog::from_reader(data.as_bytes())?;
    /// assert_eq!(catalog.len(), 1);
    /// # Ok::<(), attune::error::RecommendError>(())
    /// ```
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RecommendError> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut columns: HashMap<String, usize> = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            columns.entry(header.to_string()).or_insert(index);
        }

        let missing: Vec<String> = REQUIRED_META
            .iter()
            .copied()
            .chain(AUDIO_FEATURES.iter().map(|feature| feature.column()))
            .filter(|column| !columns.contains_key(*column))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(RecommendError::Schema { missing });
        }

        let known: Vec<&str> = REQUIRED_META
            .iter()
            .copied()
            .chain(AUDIO_FEATURES.iter().map(|feature| feature.column()))
            .chain([GENRE_COLUMN, SUBGENRE_COLUMN, RELEASE_DATE_COLUMN])
            .collect();

        let mut tracks = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            tracks.push(parse_track(&record, &headers, &columns, &known));
        }

        Ok(Self { tracks })
    }

    /// All tracks in file row order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Index of the first row carrying the given track id.
    ///
    /// Raw catalogs repeat ids across playlist rows; the first occurrence is
    /// the reference row, matching the original table semantics.
    #[must_use]
    pub fn position_by_id(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.track_id == track_id)
    }

    /// Index of the best name match for a free-form query.
    ///
    /// Matching is case-insensitive and two-staged. An exact title match
    /// wins; otherwise the first title containing the query as a substring
    /// wins. Within each stage, ties go to the earliest row in the file.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Option<usize> {
        let needle = query.to_lowercase();

        if let Some(index) = self
            .tracks
            .iter()
            .position(|track| track.track_name.to_lowercase() == needle)
        {
            return Some(index);
        }

        self.tracks
            .iter()
            .position(|track| track.track_name.to_lowercase().contains(&needle))
    }

    /// Sanitized feature rows for fitting a scaler or building a matrix.
    #[must_use]
    pub fn sanitized_feature_rows(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.tracks
            .iter()
            .map(|track| sanitize_features(track.features.to_array()))
            .collect()
    }
}

fn parse_track(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
    columns: &HashMap<String, usize>,
    known: &[&str],
) -> Track {
    let cell = |column: &str| -> &str {
        columns
            .get(column)
            .and_then(|&index| record.get(index))
            .unwrap_or("")
    };

    let mut values = [0.0; FEATURE_COUNT];
    for (slot, feature) in values.iter_mut().zip(AUDIO_FEATURES) {
        *slot = cell(feature.column()).parse().unwrap_or(f64::NAN);
    }

    let mut extra = BTreeMap::new();
    for (index, header) in headers.iter().enumerate() {
        if known.contains(&header) {
            continue;
        }
        if let Some(value) = record.get(index) {
            if !value.is_empty() {
                extra.insert(header.to_string(), value.to_string());
            }
        }
    }

    Track {
        track_id: cell("track_id").to_string(),
        track_name: cell("track_name").to_string(),
        track_artist: cell("track_artist").to_string(),
        features: AudioFeatures::from_array(values),
        playlist_genre: non_empty(cell(GENRE_COLUMN)),
        playlist_subgenre: non_empty(cell(SUBGENRE_COLUMN)),
        track_album_release_date: non_empty(cell(RELEASE_DATE_COLUMN)),
        extra,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
