//! # Attune - Offline Music Recommendations
//!
//! Attune recommends tracks from a local audio-features catalog, either by
//! mood ("play me something calm") or by similarity to a reference track
//! ("more like this one"). Everything runs offline against a CSV file.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `catalog`: CSV catalog loading and track lookup
//! - `features`: Feature vectors, standardization, weight presets
//! - `mood`: Mood prototypes and emotion aliases
//! - `engine`: Cosine-similarity ranking with boosts and diversity
//! - `pipeline`: Request defaults between hosts and the engine
//! - `evaluation`: List statistics and diversity metrics
//! - `config`: Catalog location and stored settings
//!
//! ## Usage
//!
//! ```bash
//! # Recommend for a mood
//! attune mood energetic -n 5
//!
//! # Recommend tracks similar to a reference
//! attune similar "golden hour" --preset workout
//!
//! # Inspect the catalog
//! attune info
//! attune sample -n 3
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;
use rand::seq::SliceRandom;
use std::path::PathBuf;

use attune::cli::{self, Args};
use attune::completion;
use attune::config;
use attune::engine::{Recommendation, Recommender};
use attune::evaluation;
use attune::features::{WeightPreset, AUDIO_FEATURES};
use attune::mood;
use attune::pipeline::{self, SimilarRequest};

/// Resolves the catalog location and builds the engine.
///
/// The path comes from `--data`, the `ATTUNE_DATA` environment variable,
/// the stored settings file, or the platform default, in that order.
fn load_recommender(data: Option<PathBuf>) -> Result<Recommender> {
    let path = config::resolve_catalog_path(data)?;
    info!("Loading catalog from: {}", path.display());

    Recommender::load(&path).with_context(|| {
        format!(
            "Failed to load catalog from {}. Pass --data or set ATTUNE_DATA to point at a catalog CSV.",
            path.display()
        )
    })
}

/// Prints a recommendation list as an aligned table.
fn print_recommendations(recommendations: &[Recommendation], verbose: bool) {
    if recommendations.is_empty() {
        println!("No matching tracks found.");
        return;
    }

    for (rank, recommendation) in recommendations.iter().enumerate() {
        println!(
            "{:>2}. [{:.3}] {} - {}",
            rank + 1,
            recommendation.similarity,
            recommendation.track.track_name,
            recommendation.track.track_artist
        );
        if verbose {
            println!("      {}", recommendation.explanation);
        }
    }
}

/// Prints list statistics and diversity metrics under the table.
fn print_stats(recommendations: &[Recommendation]) {
    let stats = evaluation::basic_stats(recommendations);
    let diversity = evaluation::diversity_metrics(recommendations);

    println!();
    println!(
        "Tracks: {}  Artists: {}  Genres: {}",
        stats.total, stats.unique_artists, stats.unique_genres
    );
    if let (Some(mean), Some(min), Some(max)) = (
        stats.mean_popularity,
        stats.min_popularity,
        stats.max_popularity,
    ) {
        println!("Popularity: mean {mean:.1}  min {min:.0}  max {max:.0}");
    }
    println!(
        "Artist entropy: {:.3} bits (coverage {:.2})",
        diversity.artist_entropy, diversity.artist_coverage
    );
    println!(
        "Genre entropy:  {:.3} bits (coverage {:.2})",
        diversity.genre_entropy, diversity.genre_coverage
    );
}

/// Routes a recommendation list to the table or JSON printer.
fn emit_results(
    recommendations: &[Recommendation],
    json: bool,
    stats: bool,
    verbose: bool,
) -> Result<()> {
    if json {
        let value = if stats {
            serde_json::json!({
                "recommendations": recommendations,
                "stats": evaluation::basic_stats(recommendations),
                "diversity": evaluation::diversity_metrics(recommendations),
            })
        } else {
            serde_json::to_value(recommendations)?
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_recommendations(recommendations, verbose);
    if stats {
        print_stats(recommendations);
    }
    Ok(())
}

/// Main entry point for the Attune application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate module functions. All operations return Results for
/// consistent error handling throughout the application.
///
/// # Error Handling
///
/// Uses `anyhow::Result` for rich error context. Errors are automatically
/// propagated and displayed to the user with helpful context messages.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug attune mood happy` - Enable debug logging
/// - `RUST_LOG=attune::engine=debug attune similar "song"` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        cli::Command::Mood {
            mood,
            count,
            json,
            stats,
            verbose,
        } => {
            let recommender = load_recommender(args.data)?;
            info!("Recommending tracks for mood: {mood}");
            let recommendations = pipeline::recommend_for_mood(&recommender, &mood, count);
            emit_results(&recommendations, json, stats, verbose)?;
        }
        cli::Command::Similar {
            name,
            id,
            count,
            preset,
            no_genre_boost,
            no_artist_diversity,
            json,
            stats,
            verbose,
        } => {
            let recommender = load_recommender(args.data)?;
            let request = SimilarRequest {
                count,
                preset: preset.map(|p| WeightPreset::from(p).name().to_string()),
                genre_boost: no_genre_boost.then_some(false),
                artist_diversity: no_artist_diversity.then_some(false),
            };

            let recommendations = if let Some(track_id) = id {
                info!("Recommending tracks similar to id: {track_id}");
                pipeline::recommend_for_track_id(&recommender, &track_id, &request)?
            } else if let Some(query) = name {
                info!("Recommending tracks similar to: {query}");
                pipeline::recommend_for_track_name(&recommender, &query, &request)
            } else {
                anyhow::bail!("Provide a track name or --id. See 'attune similar --help'.");
            };
            emit_results(&recommendations, json, stats, verbose)?;
        }
        cli::Command::Moods { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&*mood::MOOD_PROTOTYPES)?);
            } else {
                println!("Available moods:");
                for profile in mood::MOOD_PROTOTYPES.iter() {
                    println!("  {:<12} {}", profile.name, profile.summary);
                }
                println!();
                println!("Emotion aliases:");
                for (alias, target) in mood::alias_pairs() {
                    println!("  {alias:<14} -> {target}");
                }
            }
        }
        cli::Command::Presets => {
            println!("Available weight presets:");
            for preset in WeightPreset::ALL {
                println!("  {:<12} {:?}", preset.name(), preset.weights());
            }
            println!();
            let order: Vec<&str> = AUDIO_FEATURES.iter().map(|f| f.column()).collect();
            println!("Weights follow the feature order: {}", order.join(", "));
        }
        cli::Command::Info { json } => {
            let recommender = load_recommender(args.data)?;
            let summary = recommender.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Tracks:  {}", summary.tracks);
                println!("Artists: {}", summary.unique_artists);
                println!("Genres:  {}", summary.unique_genres);
                println!();
                println!("Feature means and standard deviations:");
                for feature in &summary.features {
                    println!(
                        "  {:<18} mean {:>9.3}  std {:>8.3}",
                        feature.name, feature.mean, feature.std
                    );
                }
            }
        }
        cli::Command::Sample { count, json } => {
            let recommender = load_recommender(args.data)?;
            let tracks = recommender.catalog().tracks();
            let mut rng = rand::thread_rng();
            let sample: Vec<_> = tracks.choose_multiple(&mut rng, count).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&sample)?);
            } else if sample.is_empty() {
                println!("Catalog is empty.");
            } else {
                for (row, track) in sample.iter().enumerate() {
                    println!(
                        "{:>2}. {} - {}  [id: {}]",
                        row + 1,
                        track.track_name,
                        track.track_artist,
                        track.track_id
                    );
                }
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(&shell),
                &mut cmd,
            );
        }
        cli::Command::CompleteMoods => {
            // This is used by shell completion scripts to list mood names
            completion::print_mood_completions();
        }
    }

    Ok(())
}
