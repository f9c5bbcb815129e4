//! Mood prototypes and mood-name resolution.
//!
//! A mood is a fixed target vector over all nine audio features, expressed
//! in normalized 0 to 1 space. Before a prototype can be compared against
//! catalog rows it is converted to natural units (tempo in BPM, loudness in
//! dB) and pushed through the same fitted scaler as the catalog.
//!
//! Unknown mood names never fail: resolution falls back to the default mood
//! and reports that it did, so callers can log the substitution.

use crate::features::{AudioFeature, AudioFeatures, AUDIO_FEATURES, FEATURE_COUNT};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Mood used when a requested name matches nothing. Always the first entry
/// of [`MOOD_PROTOTYPES`].
pub const DEFAULT_MOOD: &str = "happy";

/// Mood whose results get a release-year lift for older tracks.
pub const NOSTALGIC_MOOD: &str = "nostalgic";

/// Mood whose explanations highlight instrumental qualities instead of
/// valence and energy.
pub const FOCUS_MOOD: &str = "focus";

/// External emotion labels accepted as mood aliases.
///
/// Emotion-detection services report labels like `Joy` or `Concentration`;
/// mapping them here lets callers pass those straight through.
const EMOTION_ALIASES: [(&str, &str); 9] = [
    ("joy", "happy"),
    ("sadness", "sad"),
    ("anger", "angry"),
    ("calmness", "calm"),
    ("excitement", "energetic"),
    ("anxiety", "calm"),
    ("concentration", "focus"),
    ("amusement", "happy"),
    ("surprise", "energetic"),
];

/// A named target profile over the nine audio features.
#[derive(Debug, Clone, Serialize)]
pub struct MoodProfile {
    pub name: &'static str,
    /// One-line description shown by the CLI.
    pub summary: &'static str,
    /// Target values in normalized 0 to 1 space.
    pub targets: AudioFeatures,
}

impl MoodProfile {
    /// Target vector converted to natural units.
    ///
    /// Tempo maps from `v` to `v * 150 + 50` BPM and loudness from `v` to
    /// `v * 60 - 60` dB; every other feature already lives in 0 to 1 and
    /// passes through unchanged.
    #[must_use]
    pub fn natural_targets(&self) -> [f64; FEATURE_COUNT] {
        let raw = self.targets.to_array();
        let mut out = [0.0; FEATURE_COUNT];
        for (i, feature) in AUDIO_FEATURES.iter().enumerate() {
            out[i] = match feature {
                AudioFeature::Tempo => raw[i] * 150.0 + 50.0,
                AudioFeature::Loudness => raw[i] * 60.0 - 60.0,
                _ => raw[i],
            };
        }
        out
    }
}

// Feature order: danceability, energy, loudness, speechiness, acousticness,
// instrumentalness, liveness, valence, tempo.
lazy_static! {
    /// Every supported mood. The first entry is the default.
    pub static ref MOOD_PROTOTYPES: Vec<MoodProfile> = vec![
        MoodProfile {
            name: "happy",
            summary: "bright, high-valence tracks with upbeat energy",
            targets: AudioFeatures::from_array([0.75, 0.70, 0.75, 0.08, 0.25, 0.05, 0.15, 0.85, 0.50]),
        },
        MoodProfile {
            name: "sad",
            summary: "low-valence, low-energy tracks with an acoustic lean",
            targets: AudioFeatures::from_array([0.35, 0.30, 0.55, 0.05, 0.60, 0.10, 0.12, 0.20, 0.35]),
        },
        MoodProfile {
            name: "energetic",
            summary: "loud, fast tracks built for movement",
            targets: AudioFeatures::from_array([0.80, 0.90, 0.85, 0.10, 0.05, 0.10, 0.20, 0.75, 0.70]),
        },
        MoodProfile {
            name: "calm",
            summary: "soft acoustic tracks with gentle energy",
            targets: AudioFeatures::from_array([0.40, 0.25, 0.50, 0.04, 0.75, 0.40, 0.10, 0.55, 0.30]),
        },
        MoodProfile {
            name: "angry",
            summary: "aggressive, high-energy tracks with dark valence",
            targets: AudioFeatures::from_array([0.55, 0.85, 0.88, 0.20, 0.05, 0.05, 0.25, 0.25, 0.65]),
        },
        MoodProfile {
            name: "romantic",
            summary: "warm, smooth tracks with high valence",
            targets: AudioFeatures::from_array([0.55, 0.55, 0.65, 0.04, 0.45, 0.05, 0.10, 0.80, 0.40]),
        },
        MoodProfile {
            name: "mellow",
            summary: "relaxed mid-tempo tracks that stay out of the way",
            targets: AudioFeatures::from_array([0.50, 0.45, 0.60, 0.05, 0.55, 0.20, 0.10, 0.55, 0.38]),
        },
        MoodProfile {
            name: "nostalgic",
            summary: "familiar-feeling tracks, older releases get a lift",
            targets: AudioFeatures::from_array([0.50, 0.45, 0.60, 0.05, 0.55, 0.10, 0.18, 0.60, 0.40]),
        },
        MoodProfile {
            name: "focus",
            summary: "instrumental tracks with minimal vocals",
            targets: AudioFeatures::from_array([0.35, 0.30, 0.45, 0.02, 0.55, 0.85, 0.08, 0.45, 0.35]),
        },
    ];

    static ref ALIASES: HashMap<&'static str, &'static str> =
        EMOTION_ALIASES.iter().copied().collect();
}

/// Result of mood-name resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMood {
    pub profile: &'static MoodProfile,
    /// True when the requested name matched nothing and the default mood
    /// was substituted.
    pub fell_back: bool,
}

/// Resolves a mood name, an emotion alias, or anything else.
///
/// Lookup is case-insensitive and whitespace-tolerant. Names that match
/// neither a mood nor an alias resolve to [`DEFAULT_MOOD`] with
/// `fell_back` set, never to an error.
///
/// # Examples
///
/// ```
/// use attune::mood;
///
/// assert_eq!(mood::resolve("Energetic").profile.name, "energetic");
/// assert_eq!(mood::resolve("Joy").profile.name, "happy");
///
/// let fallback = mood::resolve("zen-garden");
/// assert_eq!(fallback.profile.name, mood::DEFAULT_MOOD);
/// assert!(fallback.fell_back);
/// ```
#[must_use]
pub fn resolve(name: &str) -> ResolvedMood {
    let key = name.trim().to_lowercase();

    if let Some(profile) = find(&key) {
        return ResolvedMood {
            profile,
            fell_back: false,
        };
    }

    if let Some(target) = ALIASES.get(key.as_str()) {
        if let Some(profile) = find(target) {
            return ResolvedMood {
                profile,
                fell_back: false,
            };
        }
    }

    ResolvedMood {
        profile: &MOOD_PROTOTYPES[0],
        fell_back: true,
    }
}

/// Looks a mood up by its exact lowercase name.
#[must_use]
pub fn find(name: &str) -> Option<&'static MoodProfile> {
    MOOD_PROTOTYPES.iter().find(|profile| profile.name == name)
}

/// The alias table as `(alias, mood)` pairs, for display.
#[must_use]
pub fn alias_pairs() -> &'static [(&'static str, &'static str)] {
    &EMOTION_ALIASES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_nine_moods_present() {
        let names: Vec<&str> = MOOD_PROTOTYPES.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "happy",
                "sad",
                "energetic",
                "calm",
                "angry",
                "romantic",
                "mellow",
                "nostalgic",
                "focus"
            ]
        );
    }

    #[test]
    fn test_default_mood_is_first_entry() {
        assert_eq!(MOOD_PROTOTYPES[0].name, DEFAULT_MOOD);
    }

    #[test]
    fn test_prototype_targets_stay_in_unit_range() {
        for profile in MOOD_PROTOTYPES.iter() {
            for value in profile.targets.to_array() {
                assert!(
                    (0.0..=1.0).contains(&value),
                    "{} targets must stay in 0..=1",
                    profile.name
                );
            }
        }
    }

    #[test]
    fn test_resolve_is_case_and_whitespace_insensitive() {
        assert_eq!(resolve("HAPPY").profile.name, "happy");
        assert_eq!(resolve("  Mellow ").profile.name, "mellow");
        assert!(!resolve("HAPPY").fell_back);
    }

    #[test]
    fn test_unknown_mood_falls_back_to_default() {
        let resolved = resolve("zen-garden");
        assert_eq!(resolved.profile.name, DEFAULT_MOOD);
        assert!(resolved.fell_back, "unknown names must set the fallback flag");
    }

    #[test]
    fn test_emotion_aliases_map_to_moods() {
        assert_eq!(resolve("Joy").profile.name, "happy");
        assert_eq!(resolve("Sadness").profile.name, "sad");
        assert_eq!(resolve("Concentration").profile.name, "focus");
        assert_eq!(resolve("Anxiety").profile.name, "calm");
        assert_eq!(resolve("Surprise").profile.name, "energetic");
        assert!(!resolve("Joy").fell_back, "aliases are real matches, not fallbacks");
    }

    #[test]
    fn test_every_alias_points_at_a_real_mood() {
        for (alias, target) in alias_pairs() {
            assert!(
                find(target).is_some(),
                "alias '{alias}' points at unknown mood '{target}'"
            );
        }
    }

    #[test]
    fn test_natural_units_conversion() {
        let profile = find("happy").expect("happy mood must exist");
        let natural = profile.natural_targets();

        // Tempo 0.50 maps to 125 BPM, loudness 0.75 maps to -15 dB.
        assert!((natural[8] - 125.0).abs() < 1e-9);
        assert!((natural[2] - (-15.0)).abs() < 1e-9);
        // Valence passes through unchanged.
        assert!((natural[7] - 0.85).abs() < 1e-9);
    }
}
