//! RON-backed configuration for the dashboard.
//!
//! Loads `~/.config/risksignal/config.ron`. Every field is optional in the
//! file; anything missing takes its default. A missing or broken file falls
//! back to [`AppConfig::default()`] with a log line, never an error.
//!
//! Example config.ron:
//! ```ron
//! (
//!     base_url: "https://drift.internal.example",
//!     default_domain: "shop.example.com",
//!     stats_days: 14,
//!     filters_panel_open: false,
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use risksignal_client::constants::{DEFAULT_BASE_URL, DEFAULT_DAYS};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DOMAIN};

/// Errors reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON syntax error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Drift Engine origin.
    pub base_url: String,
    /// Domain the store starts on.
    pub default_domain: String,
    /// Look-back window for the stats summary.
    pub stats_days: u32,
    /// Look-back window for asset history.
    pub history_days: u32,
    /// Whether the filters panel starts open.
    pub filters_panel_open: bool,
    /// Emit ANSI colours.
    pub color: bool,
    /// Log directory; `$RISKSIGNAL_LOG_DIR` or the temp dir when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_domain: DEFAULT_DOMAIN.to_string(),
            stats_days: DEFAULT_DAYS,
            history_days: DEFAULT_DAYS,
            filters_panel_open: true,
            color: true,
            log_dir: None,
        }
    }
}

/// Get the config file path (~/.config/risksignal/config.ron).
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parse config text.
pub fn parse_config(text: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    ron::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a config file.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Load config from `explicit` or the default location.
///
/// Falls back to defaults on any problem. An explicitly named file that is
/// missing is worth a warning; a missing default file is not.
pub fn load_config(explicit: Option<&Path>) -> AppConfig {
    let (path, was_explicit) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match config_file_path() {
            Some(p) => (p, false),
            None => {
                info!("No config directory available, using default config");
                return AppConfig::default();
            }
        },
    };

    if !path.exists() {
        if was_explicit {
            warn!("Config file {:?} does not exist, using defaults", path);
        } else {
            info!("Config file not found at {:?}, using defaults", path);
        }
        return AppConfig::default();
    }

    match load_config_from_file(&path) {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("{e}");
            warn!("Falling back to default config");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = parse_config(
            r#"(default_domain: "shop.example.com", stats_days: 7)"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(cfg.default_domain, "shop.example.com");
        assert_eq!(cfg.stats_days, 7);
        assert_eq!(cfg.history_days, DEFAULT_DAYS);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.filters_panel_open);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = parse_config("(stats_days: ", Path::new("broken.ron")).unwrap_err();
        assert!(err.to_string().contains("broken.ron"));
    }

    #[test]
    fn test_load_from_tempfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"(base_url: "http://localhost:8080", color: false)"#).unwrap();
        let cfg = load_config(Some(file.path()));
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert!(!cfg.color);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not ron").unwrap();
        assert_eq!(load_config(Some(file.path())), AppConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(Some(&dir.path().join("nope.ron")));
        assert_eq!(cfg, AppConfig::default());
    }
}
