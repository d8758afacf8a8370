// SPDX-License-Identifier: MPL-2.0
//! Loading and saving of the `route_i18n.toml` settings file.
//!
//! # Configuration Sections
//!
//! - `[routing]` - What the routing layer declares: default locale, the
//!   locale list and the name used for it in mismatch warnings
//! - `[diagnostics]` - Capacity of the in-memory warning buffer
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass a directory to `load_with_override()`/`save_with_override()`
//! 3. Set `ROUTE_I18N_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use route_i18n::config;
//!
//! let (config, warning) = config::load();
//! if let Some(warning) = warning {
//!     eprintln!("{warning}");
//! }
//!
//! let route = config.routing.route("fr");
//! assert_eq!(route.locale.as_ref().map(|id| id.as_str()), Some("fr"));
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::diagnostics::RecordingSink;
use crate::domain::diagnostics::BufferCapacity;
use crate::domain::{LocaleId, RouteLocales};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "route_i18n.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// What the routing layer declares about locales.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Locale used when the requested one has no content. An empty string
    /// counts as not configured.
    #[serde(
        default = "default_default_locale",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_locale: Option<String>,

    /// Every locale the routing layer supports.
    #[serde(default = "default_locales", skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,

    /// Name of this source in mismatch warnings.
    #[serde(default = "default_source_name")]
    pub source_name: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_locale: default_default_locale(),
            locales: default_locales(),
            source_name: default_source_name(),
        }
    }
}

impl RoutingConfig {
    /// Builds the routing input for a request of `requested`.
    #[must_use]
    pub fn route(&self, requested: impl Into<LocaleId>) -> RouteLocales {
        RouteLocales {
            locale: Some(requested.into()),
            default_locale: self
                .default_locale
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(LocaleId::from),
            locales: self
                .locales
                .as_ref()
                .map(|ids| ids.iter().map(|id| LocaleId::from(id.as_str())).collect()),
        }
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Warnings kept in memory. Clamped to the supported range on use.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl DiagnosticsConfig {
    #[must_use]
    pub fn capacity(&self) -> BufferCapacity {
        BufferCapacity::new(self.capacity)
    }

    /// Recorder sized by [`capacity`](Self::capacity).
    #[must_use]
    pub fn recording_sink(&self) -> RecordingSink {
        RecordingSink::new(self.capacity())
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

/// Application configuration with sectioned structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

// =============================================================================
// Default Value Functions (for serde)
// =============================================================================

fn default_default_locale() -> Option<String> {
    Some(DEFAULT_LOCALE.to_string())
}

fn default_locales() -> Option<Vec<String>> {
    Some(DEFAULT_LOCALES.iter().map(ToString::to_string).collect())
}

fn default_source_name() -> String {
    DEFAULT_ROUTE_SOURCE.to_string()
}

fn default_capacity() -> usize {
    DEFAULT_DIAGNOSTICS_CAPACITY
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
#[must_use]
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
#[must_use]
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!("ignoring {}: {err}", path.display())),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
/// if it is not valid TOML for this schema.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
///
/// # Errors
///
/// See [`save_to_path`].
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
///
/// # Errors
///
/// See [`save_to_path`].
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failures and [`Error::Config`] if
/// serialization fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogSink;
    use tempfile::tempdir;

    fn sample() -> Config {
        Config {
            routing: RoutingConfig {
                default_locale: Some("fr".to_string()),
                locales: Some(vec!["fr".to_string(), "it".to_string()]),
                source_name: "router".to_string(),
            },
            diagnostics: DiagnosticsConfig { capacity: 64 },
        }
    }

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);

        save_to_path(&sample(), &path).expect("save should succeed");
        let loaded = load_from_path(&path).expect("load should succeed");

        assert_eq!(loaded, sample());
    }

    #[test]
    fn default_config_matches_defaults() {
        let config = Config::default();
        assert_eq!(config.routing.default_locale.as_deref(), Some(DEFAULT_LOCALE));
        assert_eq!(
            config.routing.locales,
            Some(vec!["de".to_string(), "en".to_string(), "fr".to_string()])
        );
        assert_eq!(config.routing.source_name, DEFAULT_ROUTE_SOURCE);
        assert_eq!(config.diagnostics.capacity(), BufferCapacity::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[routing]\nsource_name = \"next\"\n")
            .expect("partial config should parse");
        assert_eq!(config.routing.source_name, "next");
        assert_eq!(config.routing.default_locale.as_deref(), Some(DEFAULT_LOCALE));
        assert_eq!(config.diagnostics, DiagnosticsConfig::default());
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "not = valid = toml").expect("write file");

        assert!(matches!(load_from_path(&path), Err(Error::Config(_))));
    }

    #[test]
    fn load_from_missing_path_is_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("absent.toml");

        assert!(matches!(load_from_path(&path), Err(Error::Io(_))));
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("dir").join(CONFIG_FILE);

        save_to_path(&Config::default(), &path).expect("save should succeed");
        assert!(path.exists());
    }

    #[test]
    fn save_with_override_and_load_with_override_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        save_with_override(&sample(), Some(base_dir.clone())).expect("save should succeed");
        assert!(base_dir.join(CONFIG_FILE).exists());

        let (loaded, warning) = load_with_override(Some(base_dir));
        assert!(warning.is_none());
        assert_eq!(loaded, sample());
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none(), "should not warn for missing file");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        fs::write(base_dir.join(CONFIG_FILE), "[routing\n").expect("write file");

        let (config, warning) = load_with_override(Some(base_dir));
        let warning = warning.expect("should warn about parse error");
        assert!(warning.contains(CONFIG_FILE));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn route_carries_request_and_declared_locales() {
        let route = sample().routing.route("it");

        assert_eq!(route.locale, Some(LocaleId::from("it")));
        assert_eq!(route.default_locale, Some(LocaleId::from("fr")));
        assert_eq!(
            route.locales,
            Some(vec![LocaleId::from("fr"), LocaleId::from("it")])
        );
    }

    #[test]
    fn empty_default_locale_routes_as_missing() {
        let routing = RoutingConfig {
            default_locale: Some(String::new()),
            ..RoutingConfig::default()
        };
        assert_eq!(routing.route("en").default_locale, None);
    }

    #[test]
    fn capacity_is_clamped() {
        let diagnostics = DiagnosticsConfig { capacity: 1 };
        assert_eq!(diagnostics.capacity().get(), BufferCapacity::MIN);
    }

    #[test]
    fn configured_capacity_bounds_the_recording_sink() {
        let config: Config = toml::from_str("[diagnostics]\ncapacity = 16\n")
            .expect("diagnostics section should parse");
        let sink = config.diagnostics.recording_sink();

        for i in 0..20 {
            sink.emit(&format!("warning {i}"));
        }

        assert_eq!(sink.len(), 16);
        assert_eq!(sink.messages().first().map(String::as_str), Some("warning 4"));
        assert_eq!(sink.messages().last().map(String::as_str), Some("warning 19"));
    }
}
