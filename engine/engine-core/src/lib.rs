//! Core traits and types shared by the Arbor search engine and game crates
//!
//! This crate defines the contract a board-game rules engine must satisfy to
//! be searched:
//! - `Rules`: legal moves, move application, terminal and win detection
//! - `Player`: the two sides of a perfect-information game
//! - `game_utils`: outcome scoring shared by search and rollouts

pub mod game_utils;
pub mod rules;

// Re-export main types for convenience
pub use game_utils::outcome_value;
pub use rules::{Action, Player, Rules, RulesError};
