//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared by
//! the Arbor crates, plus tracing subscriber setup driven by the configured
//! log level.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`ARBOR_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! ARBOR_<SECTION>_<KEY>=value
//!
//! Examples:
//!     ARBOR_COMMON_LOG_LEVEL=debug
//!     ARBOR_MCTS_NUM_SIMULATIONS=200
//!     ARBOR_MCTS_C_PUCT=1.5
//!     ARBOR_MCTS_EVAL_CACHE=false
//! ```

mod defaults;
mod loader;
mod logging;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use logging::init_tracing;
pub use structs::*;
