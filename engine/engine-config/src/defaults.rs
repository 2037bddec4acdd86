//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so every binary and test
//! sees the same values without touching the filesystem.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    c_puct: f64,
    temperature: f64,
    temp_threshold: u32,
    eval_cache: bool,
    max_search_millis: u64,
}

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn temperature() -> f64 {
    DEFAULTS.mcts.temperature
}
pub fn temp_threshold() -> u32 {
    DEFAULTS.mcts.temp_threshold
}
pub fn eval_cache() -> bool {
    DEFAULTS.mcts.eval_cache
}
pub fn max_search_millis() -> u64 {
    DEFAULTS.mcts.max_search_millis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        assert_eq!(log_level(), "info");
    }

    #[test]
    fn test_mcts_defaults() {
        assert_eq!(num_simulations(), 50);
        assert!((c_puct() - 1.0).abs() < f64::EPSILON);
        assert!((temperature() - 1.0).abs() < f64::EPSILON);
        assert_eq!(temp_threshold(), 0);
        assert!(eval_cache());
        assert_eq!(max_search_millis(), 0);
    }
}
