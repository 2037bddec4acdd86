//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_sims() -> u32 {
    defaults::num_simulations()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_temperature() -> f64 {
    defaults::temperature()
}
fn d_temp_threshold() -> u32 {
    defaults::temp_threshold()
}
fn d_eval_cache() -> bool {
    defaults::eval_cache()
}
fn d_max_search_millis() -> u64 {
    defaults::max_search_millis()
}

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search settings as written in config.toml.
///
/// The search crate converts this into its own runtime config.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    /// Terminal playouts per move decision
    #[serde(default = "d_num_sims")]
    pub num_simulations: u32,
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_temperature")]
    pub temperature: f64,
    /// Moves played at `temperature` before switching to greedy (0 = never switch)
    #[serde(default = "d_temp_threshold")]
    pub temp_threshold: u32,
    #[serde(default = "d_eval_cache")]
    pub eval_cache: bool,
    /// Wall-clock bound per decision, 0 disables it
    #[serde(default = "d_max_search_millis")]
    pub max_search_millis: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            c_puct: defaults::c_puct(),
            temperature: defaults::temperature(),
            temp_threshold: defaults::temp_threshold(),
            eval_cache: defaults::eval_cache(),
            max_search_millis: defaults::max_search_millis(),
        }
    }
}
