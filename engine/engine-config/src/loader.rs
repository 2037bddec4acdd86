//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the ARBOR_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("ARBOR_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from ARBOR_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "ARBOR_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files are logged and replaced by the defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable value in {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: ARBOR_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "ARBOR_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.num_simulations,
        "ARBOR_MCTS_NUM_SIMULATIONS",
        parse
    );
    env_override!(config, mcts.c_puct, "ARBOR_MCTS_C_PUCT", parse);
    env_override!(config, mcts.temperature, "ARBOR_MCTS_TEMPERATURE", parse);
    env_override!(
        config,
        mcts.temp_threshold,
        "ARBOR_MCTS_TEMP_THRESHOLD",
        parse
    );
    env_override!(config, mcts.eval_cache, "ARBOR_MCTS_EVAL_CACHE", parse);
    env_override!(
        config,
        mcts.max_search_millis,
        "ARBOR_MCTS_MAX_SEARCH_MILLIS",
        parse
    );

    config
}
