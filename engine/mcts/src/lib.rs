//! Monte Carlo Tree Search (MCTS) implementation for AlphaZero-style game playing.
//!
//! This crate provides a game-agnostic MCTS engine that works with any
//! rules engine implementing the `engine-core` [`Rules`](engine_core::Rules)
//! trait, guided by an injected policy-value [`Evaluator`].
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running playouts.
//! Each playout consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCT (Upper Confidence bounds
//!    applied to Trees) to balance exploration and exploitation
//! 2. **Evaluation**: Score a terminal leaf by the game result, or ask the
//!    evaluator for a policy and value estimate (memoised by position key)
//! 3. **Expansion**: Add a child for each legal move, with priors taken from
//!    the evaluator's policy
//! 4. **Backpropagation**: Update visit counts and value estimates along the
//!    path from leaf to root
//!
//! Values live on a [0, 1] scale, seen from the player who moved into a node.
//! A search runs until the configured number of playouts has reached the end
//! of the game; root visit counts are then turned into move probabilities.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Rules;
//! use games_tictactoe::{State, TicTacToe};
//! use mcts::{MctsConfig, MctsEngine, UniformEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = TicTacToe;
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut state = State::new();
//! let config = MctsConfig::for_evaluation().with_simulations(200);
//! let mut engine = MctsEngine::new(rules, UniformEvaluator::new(9), config, &state)?;
//!
//! let result = engine.search(&state, 0.0)?;
//! let action = mcts::sample_action(&result.policy, &mut rng)?;
//!
//! // Keep the explored subtree for the next move
//! state = rules.apply_move(&state, action, rules.player_to_move(&state))?;
//! engine.advance_tree(action)?;
//! assert_eq!(engine.root().visit_count, result.visit_counts[action]);
//!
//! let reply = engine.search(&state, 0.0)?;
//! assert_eq!(reply.policy.len(), 9);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Terminal playouts per search (default: 50)
//! - `c_puct`: Exploration constant for UCT (default: 1.0)
//! - `temperature`: Temperature schedule for move selection
//! - `eval_cache`: Memoise evaluator outputs (default: on)
//! - `max_search_time`: Optional wall-clock bound per search
//!
//! It converts from the file/env based `engine_config::MctsConfig`.
//!
//! # Evaluators
//!
//! - [`UniformEvaluator`]: Uniform policy, neutral value (for testing)
//! - [`RolloutEvaluator`]: Uniform policy over legal moves, value from a
//!   random playout to the end of the game
//! - Custom evaluators can wrap neural networks
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                         MctsEngine                          |
//! +-------------------------------------------------------------+
//! |  +-------------+  +-------------+  +---------------------+  |
//! |  |  MctsTree   |  |    Rules    |  | Evaluator + Cache   |  |
//! |  |  (arena)    |  | (game sim)  |  | (policy/value)      |  |
//! |  +------+------+  +------+------+  +----------+----------+  |
//! |         |                |                    |             |
//! |         v                v                    v             |
//! |  +-------------------------------------------------------+  |
//! |  |           select -> evaluate -> expand ->             |  |
//! |  |                    backpropagate                      |  |
//! |  +-------------------------------------------------------+  |
//! +-------------------------------------------------------------+
//! ```

pub mod cache;
pub mod config;
pub mod control;
pub mod evaluator;
pub mod node;
pub mod policy;
pub mod search;
pub mod tree;

#[cfg(test)]
mod test_utils;

// Re-export main types
pub use cache::EvalCache;
pub use config::MctsConfig;
pub use control::SearchControl;
pub use evaluator::{EvalResult, Evaluator, EvaluatorError, RolloutEvaluator, UniformEvaluator};
pub use node::{MctsNode, NodeId, NEUTRAL_VALUE};
pub use policy::{sample_action, visits_to_policy, TemperatureSchedule};
pub use search::{MctsEngine, SearchError, SearchResult, SearchStats};
pub use tree::{MctsTree, TreeStats};
