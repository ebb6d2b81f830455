//! App configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

/// Domain shown when neither the command line nor the config names one.
pub const DEFAULT_DOMAIN: &str = "example.com";

/// Log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "risksignal.log";

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "RISKSIGNAL_LOG_DIR";

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "risksignal_app=info,risksignal_client=info,warn";

/// Config directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "risksignal";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Width of the confidence bar in cells.
pub const CONFIDENCE_BAR_WIDTH: usize = 20;

/// Skeleton rows shown while the feed loads.
pub const FEED_SKELETON_ROWS: usize = 3;
