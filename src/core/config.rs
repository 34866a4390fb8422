//! # Configuration
//!
//! Centralizes tunables with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.navkit/config.toml`. The library itself only needs
//! the resolved `NavigationSettings`; file loading is for the replay tool
//! and for hosts that want the same layering.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavkitConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    /// Window in which repeated push/pop calls collapse into one.
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// The settings the navigation runtime reads.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSettings {
    pub debounce_window: Duration,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub navigation: NavigationSettings,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.navkit/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".navkit").join("config.toml"))
}

/// Load config from `path`, or from `~/.navkit/config.toml` when `None`.
///
/// A missing file yields `NavkitConfig::default()`. A malformed one yields
/// `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<NavkitConfig, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(NavkitConfig::default());
        }
    };

    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(NavkitConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: NavkitConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# navkit configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [navigation]
# debounce_ms = 500                 # Or set NAVKIT_DEBOUNCE_MS

# [logging]
# level = "info"                    # "error", "warn", "info", "debug", "trace"
# file = "navkit.log"               # Omit to log to the terminal
"#;

/// Writes a commented-out default config at `path`, creating parent dirs.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    fs::write(path, DEFAULT_CONFIG_CONTENT).map_err(ConfigError::Io)?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env → CLI.
///
/// `cli_log_level` comes from a CLI flag (None = not specified).
pub fn resolve(config: &NavkitConfig, cli_log_level: Option<&str>) -> ResolvedConfig {
    // Debounce: env → config → default
    let debounce_ms = std::env::var("NAVKIT_DEBOUNCE_MS")
        .ok()
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("Ignoring NAVKIT_DEBOUNCE_MS={raw:?}: {e}");
                None
            }
        })
        .or(config.navigation.debounce_ms)
        .unwrap_or(DEFAULT_DEBOUNCE_MS);

    // Log level: CLI → env → config → default
    let log_level = cli_log_level
        .map(str::to_string)
        .or_else(|| std::env::var("NAVKIT_LOG_LEVEL").ok())
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    ResolvedConfig {
        navigation: NavigationSettings {
            debounce_window: Duration::from_millis(debounce_ms),
        },
        log_level,
        log_file: config.logging.file.as_ref().map(PathBuf::from),
    }
}
