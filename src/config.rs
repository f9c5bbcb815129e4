//! # Configuration Module
//!
//! This module handles configuration management and data directory setup for
//! Attune. It provides platform-appropriate storage locations for the catalog
//! and remembers where the catalog lives between runs.
//!
//! ## Data Storage
//!
//! Attune keeps its files in the platform-standard data directory:
//! - Linux: `~/.local/share/attune/`
//! - macOS: `~/Library/Application Support/attune/`
//! - Windows: `%APPDATA%\attune\`
//!
//! Two files live there: `songs.csv`, the default catalog location, and
//! `config.json`, a small settings file written by hosts that want a
//! non-default catalog path without passing `--data` every time.
//!
//! ## Path Resolution
//!
//! [`resolve_catalog_path`] picks the catalog in a fixed order: an explicit
//! CLI path wins, then a path stored in `config.json`, then the platform
//! default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the platform-appropriate data directory for Attune.
///
/// This function locates the standard data directory for the current
/// platform and creates the `attune` subdirectory if it doesn't exist, so
/// callers can write into the returned path immediately.
///
/// # Platform Behavior
///
/// - **Linux**: `~/.local/share/attune/`
/// - **macOS**: `~/Library/Application Support/attune/`
/// - **Windows**: `%APPDATA%\attune\`
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path to the attune data directory
/// * `Err(anyhow::Error)` - If the directory cannot be determined or created
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The attune subdirectory cannot be created due to permissions
/// - The filesystem is read-only
///
/// # Examples
///
/// ```no_run
/// use attune::config::get_data_dir;
///
/// let data_dir = get_data_dir()?;
/// println!("Attune data lives in: {}", data_dir.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let attune_dir = data_dir.join("attune");
    fs::create_dir_all(&attune_dir).with_context(|| {
        format!(
            "Failed to create Attune data directory at {}. Please check file permissions.",
            attune_dir.display()
        )
    })?;

    Ok(attune_dir)
}

/// Returns the default catalog location, `songs.csv` in the data directory.
///
/// # Errors
///
/// Propagates any error from [`get_data_dir`].
pub fn get_default_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("songs.csv"))
}

/// Returns the settings file location, `config.json` in the data directory.
///
/// # Errors
///
/// Propagates any error from [`get_data_dir`].
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("config.json"))
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the catalog CSV file
    pub catalog_path: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            catalog_path: get_default_catalog_path()
                .unwrap_or_else(|_| PathBuf::from("songs.csv")),
        }
    }
}

impl RuntimeConfig {
    /// Create configuration with an explicit catalog path
    #[must_use]
    pub fn with_catalog_path(catalog_path: PathBuf) -> Self {
        Self { catalog_path }
    }

    /// Reads a settings file, returning `Ok(None)` when it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    /// A present-but-broken settings file is worth surfacing; silently
    /// ignoring it would send queries at the wrong catalog.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file at {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file at {}", path.display()))?;
        Ok(Some(config))
    }

    /// Writes the settings file as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .context("Failed to serialize settings to JSON")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file at {}", path.display()))?;
        Ok(())
    }
}

/// Picks the catalog path from explicit flag, settings file, or default.
///
/// # Errors
///
/// Returns an error when no explicit path is given and neither the settings
/// file nor the platform data directory can be consulted.
///
/// # Examples
///
/// ```no_run
/// use attune::config::resolve_catalog_path;
/// use std::path::PathBuf;
///
/// // An explicit path always wins.
/// let path = resolve_catalog_path(Some(PathBuf::from("/tmp/songs.csv")))?;
/// assert_eq!(path, PathBuf::from("/tmp/songs.csv"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn resolve_catalog_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let config_file = get_config_file_path()?;
    if let Some(config) = RuntimeConfig::load_from(&config_file)? {
        return Ok(config.catalog_path);
    }

    get_default_catalog_path()
}
