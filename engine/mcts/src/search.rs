//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse tree using UCT to find a leaf
//! 2. Evaluation: Score terminal leaves by the rules, others by the oracle
//! 3. Expansion: Add children to the leaf using the oracle's policy prior
//! 4. Backpropagation: Update statistics along the path
//!
//! The engine owns the tree between moves. After a real move is played,
//! [`MctsEngine::advance_tree`] keeps the chosen child's subtree so its
//! statistics carry over into the next search.

use engine_core::{outcome_value, Action, Rules, RulesError};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::cache::EvalCache;
use crate::config::MctsConfig;
use crate::control::SearchControl;
use crate::evaluator::{EvalResult, Evaluator, EvaluatorError};
use crate::node::{MctsNode, NodeId};
use crate::policy::visits_to_policy;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Move {0} was never explored from the root")]
    UnexploredMove(Action),

    #[error("Node {0:?} has no children to select from")]
    NoChildren(NodeId),

    #[error("Policy has {actual} entries, expected {expected}")]
    InvalidPolicy { expected: usize, actual: usize },

    #[error("Evaluator value {0} is outside [0, 1]")]
    InvalidValue(f32),

    #[error("Invalid temperature: {0}")]
    InvalidTemperature(f32),

    #[error("Policy has no probability mass")]
    EmptyPolicy,

    #[error("Evaluator returned {actual} results for a batch of {expected}")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Move probabilities over the whole action space
    pub policy: Vec<f32>,

    /// Root child visit counts, 0 for unexplored actions
    pub visit_counts: Vec<u32>,

    /// Value estimate at root, from the perspective of the player who moved into it
    pub value: f32,

    /// Playouts run by this search
    pub playouts: u64,

    /// Playouts of this search that ended in a terminal position
    pub terminal_playouts: u32,

    /// Whether the search control cut the search short
    pub stopped_early: bool,
}

/// Cumulative counters over the engine's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub playouts: u64,
    pub terminal_playouts: u64,
    pub oracle_calls: u64,
    pub cache_hits: u64,
    pub tree_nodes: usize,
}

/// Outcome of one playout, for logging.
struct Playout {
    leaf: NodeId,
    depth: u32,
    value: f32,
    terminal: bool,
}

/// MCTS search engine over a rules engine `R` guided by an oracle `E`.
pub struct MctsEngine<R: Rules, E> {
    rules: R,
    evaluator: E,
    config: MctsConfig,
    tree: MctsTree,
    cache: EvalCache<R::Key>,
    control: Option<SearchControl>,
    /// Terminal playouts in the current search; the budget counter
    terminal_playouts: u32,
    stats: SearchStats,
}

impl<R, E> MctsEngine<R, E>
where
    R: Rules,
    E: Evaluator<R::Position>,
{
    /// Create an engine whose tree is rooted at `root_position`.
    ///
    /// The position is only used to decide who moved into the root.
    pub fn new(
        rules: R,
        evaluator: E,
        config: MctsConfig,
        root_position: &R::Position,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        let tree = MctsTree::new(rules.player_to_move(root_position).other());
        let cache = EvalCache::new(config.eval_cache);
        let control = config
            .max_search_time
            .map(|limit| SearchControl::new().with_time_limit(limit));

        Ok(Self {
            rules,
            evaluator,
            config,
            tree,
            cache,
            control,
            terminal_playouts: 0,
            stats: SearchStats::default(),
        })
    }

    /// Run one playout (select -> evaluate -> expand -> backpropagate).
    ///
    /// `position` must be the position at the root of the tree.
    pub fn run_simulation(&mut self, position: &R::Position) -> Result<(), SearchError> {
        let playout = self.playout(position)?;

        self.stats.playouts += 1;
        if playout.terminal {
            self.terminal_playouts += 1;
            self.stats.terminal_playouts += 1;
        }

        trace!(
            leaf = playout.leaf.0,
            depth = playout.depth,
            value = playout.value,
            terminal = playout.terminal,
            "MCTS simulation complete"
        );
        Ok(())
    }

    fn playout(&mut self, position: &R::Position) -> Result<Playout, SearchError> {
        // Selection: walk down to a childless node
        let mut current = self.tree.root();
        let mut state = position.clone();
        let mut depth = 0;

        while self.tree.get(current).is_expanded() {
            let child_id = self
                .tree
                .select_child(current, self.config.c_puct)
                .ok_or(SearchError::NoChildren(current))?;
            let child = self.tree.get(child_id);
            // Only the root lacks an action
            let Some(action) = child.action else {
                return Err(SearchError::NoChildren(current));
            };
            state = self.rules.apply_move(&state, action, child.last_mover)?;
            current = child_id;
            depth += 1;
        }

        // Terminal leaves are scored by the rules, never by the oracle
        if let Some(value) = self.terminal_value(current, &state) {
            self.tree.backpropagate(current, value);
            return Ok(Playout {
                leaf: current,
                depth,
                value,
                terminal: true,
            });
        }

        let eval = self.evaluate(&state)?;

        let legal_moves = self.rules.legal_moves(&state);
        if legal_moves.is_empty() {
            return Err(SearchError::Rules(RulesError::InvalidPosition(
                "non-terminal position without legal moves".to_string(),
            )));
        }
        let child_mover = self.rules.player_to_move(&state);
        self.tree.expand(current, &legal_moves, &eval.policy, child_mover);

        self.tree.backpropagate(current, eval.value);
        Ok(Playout {
            leaf: current,
            depth,
            value: eval.value,
            terminal: false,
        })
    }

    /// Outcome of `node` from its last mover's perspective, if the game is over.
    fn terminal_value(&mut self, node_id: NodeId, state: &R::Position) -> Option<f32> {
        let node = self.tree.get(node_id);
        if let Some(value) = node.terminal_value {
            return Some(value);
        }
        if !self.rules.is_terminal(state) {
            return None;
        }

        let value = outcome_value(&self.rules, state, node.last_mover);
        self.tree.get_mut(node_id).terminal_value = Some(value);
        Some(value)
    }

    /// Oracle output for `state`, through the cache.
    fn evaluate(&mut self, state: &R::Position) -> Result<EvalResult, SearchError> {
        let key = self.rules.position_key(state);
        let expected = self.rules.field_count();
        let evaluator = &self.evaluator;
        let oracle_calls = &mut self.stats.oracle_calls;

        self.cache.get_or_evaluate(key, || -> Result<EvalResult, SearchError> {
            *oracle_calls += 1;
            let mut batch = evaluator.evaluate_batch(&[state])?;
            if batch.len() != 1 {
                return Err(SearchError::BatchSizeMismatch {
                    expected: 1,
                    actual: batch.len(),
                });
            }
            let eval = batch.swap_remove(0);
            if eval.policy.len() != expected {
                return Err(SearchError::InvalidPolicy {
                    expected,
                    actual: eval.policy.len(),
                });
            }
            if !(0.0..=1.0).contains(&eval.value) {
                return Err(SearchError::InvalidValue(eval.value));
            }
            Ok(eval)
        })
    }

    /// Search from `position` until the budget of terminal playouts is
    /// spent or the search control says stop.
    pub fn search(
        &mut self,
        position: &R::Position,
        temperature: f32,
    ) -> Result<SearchResult, SearchError> {
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(SearchError::InvalidTemperature(temperature));
        }

        let budget = self.config.num_simulations;
        let oracle_calls_before = self.stats.oracle_calls;
        let cache_hits_before = self.cache.hits();
        self.terminal_playouts = 0;
        if let Some(control) = self.control.as_mut() {
            control.start();
        }

        let mut playouts = 0u64;
        let mut stopped_early = false;
        while self.terminal_playouts < budget {
            if let Some(control) = &self.control {
                if control.should_stop() {
                    warn!(
                        playouts,
                        terminal_playouts = self.terminal_playouts,
                        budget,
                        elapsed_ms = control.elapsed().as_millis() as u64,
                        "Search stopped before budget was spent"
                    );
                    stopped_early = true;
                    break;
                }
            }
            self.run_simulation(position)?;
            playouts += 1;
        }

        let visit_counts = self.tree.root_visits(self.rules.field_count());
        let policy = visits_to_policy(&visit_counts, temperature)?;
        let root = self.tree.get(self.tree.root());

        debug!(
            budget,
            playouts,
            oracle_calls = self.stats.oracle_calls - oracle_calls_before,
            cache_hits = self.cache.hits() - cache_hits_before,
            nodes = self.tree.len(),
            root_value = root.mean_value,
            "MCTS search complete"
        );

        Ok(SearchResult {
            policy,
            visit_counts,
            value: root.mean_value,
            playouts,
            terminal_playouts: self.terminal_playouts,
            stopped_early,
        })
    }

    /// Move probabilities for `position` after a full search.
    pub fn get_action_distribution(
        &mut self,
        position: &R::Position,
        temperature: f32,
    ) -> Result<Vec<f32>, SearchError> {
        Ok(self.search(position, temperature)?.policy)
    }

    /// Re-root the tree at the root child for `action`, discarding its siblings.
    pub fn advance_tree(&mut self, action: Action) -> Result<&MctsNode, SearchError> {
        let child = self
            .tree
            .get(self.tree.root())
            .child(action)
            .ok_or(SearchError::UnexploredMove(action))?;

        let pruned = self.tree.reroot(child);
        debug!(action, kept = self.tree.len(), pruned, "Advanced search tree");
        Ok(self.tree.get(self.tree.root()))
    }

    /// Drop the whole tree and start over from `position`. The cache is kept.
    pub fn reset_tree(&mut self, position: &R::Position) {
        self.tree = MctsTree::new(self.rules.player_to_move(position).other());
        self.terminal_playouts = 0;
    }

    pub fn reset_evaluation_cache(&mut self) {
        self.cache.clear();
    }

    pub fn eval_cache_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    /// Switch the evaluation cache on or off. Switching it off drops its entries.
    pub fn set_eval_cache(&mut self, enabled: bool) {
        self.cache.set_enabled(enabled);
        self.config.eval_cache = enabled;
    }

    pub fn exploration_constant(&self) -> f32 {
        self.config.c_puct
    }

    pub fn set_exploration_constant(&mut self, c_puct: f32) -> Result<(), SearchError> {
        let config = self.config.clone().with_c_puct(c_puct);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn simulation_budget(&self) -> u32 {
        self.config.num_simulations
    }

    pub fn set_simulation_budget(&mut self, num_simulations: u32) {
        self.config.num_simulations = num_simulations;
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    pub fn root(&self) -> &MctsNode {
        self.tree.get(self.tree.root())
    }

    /// Attach a search control, replacing any built from the config.
    pub fn set_control(&mut self, control: SearchControl) {
        self.control = Some(control);
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            cache_hits: self.cache.hits(),
            tree_nodes: self.tree.len(),
            ..self.stats.clone()
        }
    }
}
