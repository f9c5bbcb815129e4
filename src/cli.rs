//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Attune using Clap
//! derive macros. It provides a type-safe way to parse command-line
//! arguments and route them to appropriate functionality.
//!
//! ## Commands
//!
//! - `mood`: Recommend tracks matching a named mood or emotion
//! - `similar`: Recommend tracks similar to a reference track
//! - `moods`: List the available moods and emotion aliases
//! - `presets`: List the available feature weight presets
//! - `info`: Show catalog statistics from the fitted feature space
//! - `sample`: Print a few catalog rows to sanity-check the data file
//! - `completion`: Generate shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! attune mood energetic -n 5
//! attune similar "golden hour" --preset workout
//! attune similar --id 6f807x0ima9a1j3VPbc7VN --json
//! attune info --data ~/Music/songs.csv
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::features::WeightPreset;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Feature weight presets selectable from the command line.
///
/// Mirrors [`WeightPreset`] so the engine type stays free of Clap traits.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum PresetArg {
    /// Uniform weighting across all nine features
    Default,
    /// Emphasize valence, energy, and acousticness
    Mood,
    /// Emphasize energy, tempo, and danceability
    Workout,
    /// Emphasize acousticness and instrumentalness, mute energy
    Chill,
    /// Emphasize instrumentalness, valence, and acousticness
    Psychedelic,
    /// Emphasize acousticness and valence with moderate energy
    Indie,
}

impl From<PresetArg> for WeightPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => WeightPreset::Default,
            PresetArg::Mood => WeightPreset::Mood,
            PresetArg::Workout => WeightPreset::Workout,
            PresetArg::Chill => WeightPreset::Chill,
            PresetArg::Psychedelic => WeightPreset::Psychedelic,
            PresetArg::Indie => WeightPreset::Indie,
        }
    }
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. The main structure carries the catalog
/// location since every query command needs it.
#[derive(Parser)]
#[command(name = "attune")]
#[command(about = "Attune - Offline music recommendations from audio features")]
#[command(version)]
pub struct Args {
    /// Path to the catalog CSV file
    ///
    /// Overrides the stored settings and the platform default location.
    /// Can also be set through the ATTUNE_DATA environment variable.
    #[arg(long, global = true, env = "ATTUNE_DATA", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
///
/// Each variant corresponds to a major piece of functionality in Attune.
/// Command arguments are embedded directly in the enum variants for
/// type safety and automatic validation.
#[derive(Subcommand)]
pub enum Command {
    /// Recommend tracks matching a mood
    ///
    /// Scores every catalog track against the named mood profile and prints
    /// the closest matches. Accepts the nine built-in moods as well as
    /// emotion words like "joy" or "anxiety"; anything unrecognized falls
    /// back to the default mood with a warning in the logs.
    ///
    /// Best for: Building a quick playlist around how you feel right now
    Mood {
        /// Mood or emotion name, case-insensitive
        ///
        /// Run `attune moods` to see every accepted name.
        #[arg(value_hint = clap::ValueHint::Other)]
        mood: String,

        /// Number of tracks to recommend
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Append list statistics and diversity metrics to the output
        #[arg(long)]
        stats: bool,

        /// Enable verbose output showing why each track was picked
        #[arg(short, long)]
        verbose: bool,
    },

    /// Recommend tracks similar to a reference track
    ///
    /// Looks the reference up by name (case-insensitive, substrings allowed)
    /// or by exact track id with --id, then ranks the rest of the catalog by
    /// similarity in the standardized feature space.
    ///
    /// Same-genre candidates get a small boost and no artist fills more than
    /// two slots; both adjustments can be switched off.
    ///
    /// Best for: "More like this one" queries
    Similar {
        /// Track name to search for
        ///
        /// Can be a partial title. The earliest catalog match wins ties.
        #[arg(
            value_hint = clap::ValueHint::Other,
            required_unless_present = "id",
            conflicts_with = "id"
        )]
        name: Option<String>,

        /// Exact track id of the reference track
        #[arg(long)]
        id: Option<String>,

        /// Number of tracks to recommend
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Feature weight preset to apply
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,

        /// Disable the same-genre score boost
        #[arg(long)]
        no_genre_boost: bool,

        /// Allow one artist to fill any number of result slots
        #[arg(long)]
        no_artist_diversity: bool,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Append list statistics and diversity metrics to the output
        #[arg(long)]
        stats: bool,

        /// Enable verbose output showing why each track was picked
        #[arg(short, long)]
        verbose: bool,
    },

    /// List available moods and emotion aliases
    Moods {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available feature weight presets with their weights
    Presets,

    /// Show catalog statistics
    ///
    /// Reports track, artist, and genre counts plus the mean and standard
    /// deviation of every audio feature as fitted from the catalog.
    Info {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a few randomly sampled catalog rows
    ///
    /// Handy after pointing --data at a new file to confirm the columns
    /// parsed the way you expected. Rows are sampled, not taken from the
    /// top, so a sorted catalog still gives a representative picture.
    Sample {
        /// Number of rows to print
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Generates completion scripts for various shells to enable tab
    /// completion of commands, flags, and mood names.
    ///
    /// Usage: attune completion bash > ~/.local/share/bash-completion/completions/attune
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List mood names for completion (hidden command)
    #[command(hide = true)]
    CompleteMoods,
}
