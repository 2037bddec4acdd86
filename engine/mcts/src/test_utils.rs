//! Toy rules engines and evaluators shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use engine_core::{Action, Player, Rules, RulesError};

use crate::evaluator::{EvalResult, Evaluator, EvaluatorError};

/// Take one or two stones; whoever takes the last stone wins.
///
/// Action 0 takes one stone, action 1 takes two. Different move orders reach
/// the same position, which makes it handy for cache tests.
#[derive(Debug, Clone, Copy)]
pub struct Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownPosition {
    pub remaining: u32,
    pub to_move: Player,
}

impl CountdownPosition {
    pub fn new(remaining: u32, to_move: Player) -> Self {
        Self { remaining, to_move }
    }
}

impl Rules for Countdown {
    type Position = CountdownPosition;
    type Key = CountdownPosition;

    fn field_count(&self) -> usize {
        2
    }

    fn player_to_move(&self, position: &Self::Position) -> Player {
        position.to_move
    }

    fn legal_moves(&self, position: &Self::Position) -> Vec<Action> {
        (0..2)
            .filter(|&action| action as u32 + 1 <= position.remaining)
            .collect()
    }

    fn apply_move(
        &self,
        position: &Self::Position,
        action: Action,
        player: Player,
    ) -> Result<Self::Position, RulesError> {
        let take = action as u32 + 1;
        if action > 1 || take > position.remaining {
            return Err(RulesError::IllegalMove { action });
        }
        Ok(CountdownPosition::new(position.remaining - take, player.other()))
    }

    fn is_terminal(&self, position: &Self::Position) -> bool {
        position.remaining == 0
    }

    fn has_won(&self, position: &Self::Position, player: Player) -> bool {
        position.remaining == 0 && position.to_move != player
    }

    fn position_key(&self, position: &Self::Position) -> Self::Key {
        *position
    }
}

/// Exactly three plies over actions {0, 1}.
///
/// The first player wins after `[0, 1, 0]`, the second after `[1, 1, 1]`,
/// every other sequence is a draw.
#[derive(Debug, Clone, Copy)]
pub struct ThreePly;

impl Rules for ThreePly {
    type Position = Vec<Action>;
    type Key = Vec<Action>;

    fn field_count(&self) -> usize {
        2
    }

    fn player_to_move(&self, position: &Self::Position) -> Player {
        if position.len() % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    fn legal_moves(&self, position: &Self::Position) -> Vec<Action> {
        if self.is_terminal(position) {
            Vec::new()
        } else {
            vec![0, 1]
        }
    }

    fn apply_move(
        &self,
        position: &Self::Position,
        action: Action,
        _player: Player,
    ) -> Result<Self::Position, RulesError> {
        if action > 1 || self.is_terminal(position) {
            return Err(RulesError::IllegalMove { action });
        }
        let mut next = position.clone();
        next.push(action);
        Ok(next)
    }

    fn is_terminal(&self, position: &Self::Position) -> bool {
        position.len() >= 3
    }

    fn has_won(&self, position: &Self::Position, player: Player) -> bool {
        match player {
            Player::First => position.as_slice() == [0, 1, 0],
            Player::Second => position.as_slice() == [1, 1, 1],
        }
    }

    fn position_key(&self, position: &Self::Position) -> Self::Key {
        position.clone()
    }
}

/// Returns the same output for every position.
#[derive(Debug, Clone)]
pub struct FixedEvaluator {
    pub policy: Vec<f32>,
    pub value: f32,
}

impl<P> Evaluator<P> for FixedEvaluator {
    fn evaluate(&self, _position: &P) -> Result<EvalResult, EvaluatorError> {
        Ok(EvalResult {
            policy: self.policy.clone(),
            value: self.value,
        })
    }
}

/// Wraps an evaluator and counts how often it is called.
#[derive(Debug)]
pub struct CountingEvaluator<E> {
    pub inner: E,
    pub calls: AtomicUsize,
}

impl<E> CountingEvaluator<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P, E: Evaluator<P>> Evaluator<P> for CountingEvaluator<E> {
    fn evaluate(&self, position: &P) -> Result<EvalResult, EvaluatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.evaluate(position)
    }
}

/// Always fails, as a broken model would.
#[derive(Debug, Clone, Copy)]
pub struct FailingEvaluator;

impl<P> Evaluator<P> for FailingEvaluator {
    fn evaluate(&self, _position: &P) -> Result<EvalResult, EvaluatorError> {
        Err(EvaluatorError::ModelError("weights not loaded".to_string()))
    }
}
