//! Client configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

/// Drift Engine origin baked in at build time.
///
/// Set `RISKSIGNAL_API_URL` when compiling to point a build at another
/// deployment; runtime configuration can still override it.
pub const DEFAULT_BASE_URL: &str = match option_env!("RISKSIGNAL_API_URL") {
    Some(url) => url,
    None => "https://drift-whvl.onrender.com",
};

/// Default look-back window for stats and asset history.
pub const DEFAULT_DAYS: u32 = 30;

/// Timeline events endpoint.
pub const TIMELINE_PATH: &str = "/api/drift/timeline";

/// Stats endpoint (per domain, or global when `domain` is omitted).
pub const STATS_PATH: &str = "/api/drift/stats";

/// Per-asset history endpoint.
pub const ASSET_HISTORY_PATH: &str = "/api/drift/asset-history";

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("risksignal/", env!("CARGO_PKG_VERSION"));
