//! Evaluator trait for position evaluation.
//!
//! The evaluator is the policy-value oracle of the search: it maps a position
//! to action probabilities and a value estimate. In AlphaZero this is a
//! neural network. For testing we provide a uniform evaluator and a random
//! rollout evaluator that need no model.

use std::sync::{Arc, Mutex};

use engine_core::{outcome_value, Rules};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::node::NEUTRAL_VALUE;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Model error: {0}")]
    ModelError(String),
}

/// Result of evaluating a position.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    /// Policy: probability distribution over actions.
    /// Index i corresponds to action i. Length must equal the rules
    /// engine's field count.
    pub policy: Vec<f32>,

    /// Value estimate in [0, 1] from the perspective of the player who made
    /// the move leading into the evaluated position.
    /// 1.0 = certain win, 0.5 = draw, 0.0 = certain loss.
    pub value: f32,
}

/// Trait for position evaluators.
///
/// Evaluators are injected into each search engine, so several engines with
/// different models can run in one process. Implementations must be pure per
/// call: the search caches results by position key.
pub trait Evaluator<P>: Send + Sync {
    /// Evaluate a single position.
    fn evaluate(&self, position: &P) -> Result<EvalResult, EvaluatorError>;

    /// Batch evaluate multiple positions (optional optimization).
    /// Default implementation calls evaluate() in a loop.
    fn evaluate_batch(&self, positions: &[&P]) -> Result<Vec<EvalResult>, EvaluatorError> {
        positions.iter().map(|p| self.evaluate(p)).collect()
    }
}

impl<P, E: Evaluator<P> + ?Sized> Evaluator<P> for &E {
    fn evaluate(&self, position: &P) -> Result<EvalResult, EvaluatorError> {
        (**self).evaluate(position)
    }

    fn evaluate_batch(&self, positions: &[&P]) -> Result<Vec<EvalResult>, EvaluatorError> {
        (**self).evaluate_batch(positions)
    }
}

impl<P, E: Evaluator<P> + ?Sized> Evaluator<P> for Arc<E> {
    fn evaluate(&self, position: &P) -> Result<EvalResult, EvaluatorError> {
        (**self).evaluate(position)
    }

    fn evaluate_batch(&self, positions: &[&P]) -> Result<Vec<EvalResult>, EvaluatorError> {
        (**self).evaluate_batch(positions)
    }
}

/// Uniform evaluator that assigns equal probability to every action.
/// Value is always 0.5 (neutral). The search renormalises the policy over
/// the legal moves, so illegal actions need no masking here.
#[derive(Debug, Clone)]
pub struct UniformEvaluator {
    num_actions: usize,
}

impl UniformEvaluator {
    pub fn new(num_actions: usize) -> Self {
        Self { num_actions }
    }
}

impl<P> Evaluator<P> for UniformEvaluator {
    fn evaluate(&self, _position: &P) -> Result<EvalResult, EvaluatorError> {
        let prob = 1.0 / self.num_actions.max(1) as f32;
        Ok(EvalResult {
            policy: vec![prob; self.num_actions],
            value: NEUTRAL_VALUE,
        })
    }
}

/// Random rollout evaluator that plays uniformly random moves to the end of
/// the game and reports the outcome as the value estimate.
///
/// The policy is uniform over the legal moves. Rollouts longer than
/// `max_depth` plies are scored as a draw.
#[derive(Debug)]
pub struct RolloutEvaluator<R> {
    rules: R,
    max_depth: u32,
    rng: Mutex<ChaCha20Rng>,
}

impl<R: Rules> RolloutEvaluator<R> {
    pub fn new(rules: R, max_depth: u32, seed: u64) -> Self {
        Self {
            rules,
            max_depth,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    fn rollout(&self, position: &R::Position) -> Result<f32, EvaluatorError> {
        let perspective = self.rules.player_to_move(position).other();
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| EvaluatorError::EvaluationFailed(format!("rng lock poisoned: {e}")))?;

        let mut current = position.clone();
        for _ in 0..self.max_depth {
            if self.rules.is_terminal(&current) {
                return Ok(outcome_value(&self.rules, &current, perspective));
            }
            let moves = self.rules.legal_moves(&current);
            let Some(&action) = moves.choose(&mut *rng) else {
                return Err(EvaluatorError::InvalidState(
                    "non-terminal position without legal moves".to_string(),
                ));
            };
            let player = self.rules.player_to_move(&current);
            current = self
                .rules
                .apply_move(&current, action, player)
                .map_err(|e| EvaluatorError::InvalidState(e.to_string()))?;
        }

        if self.rules.is_terminal(&current) {
            Ok(outcome_value(&self.rules, &current, perspective))
        } else {
            Ok(NEUTRAL_VALUE)
        }
    }
}

impl<R> Evaluator<R::Position> for RolloutEvaluator<R>
where
    R: Rules + Send + Sync,
{
    fn evaluate(&self, position: &R::Position) -> Result<EvalResult, EvaluatorError> {
        let mut policy = vec![0.0; self.rules.field_count()];
        let moves = self.rules.legal_moves(position);
        if !moves.is_empty() {
            let prob = 1.0 / moves.len() as f32;
            for action in moves {
                if let Some(slot) = policy.get_mut(action) {
                    *slot = prob;
                }
            }
        }

        let value = self.rollout(position)?;
        Ok(EvalResult { policy, value })
    }
}
