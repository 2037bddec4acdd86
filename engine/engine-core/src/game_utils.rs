//! Shared utilities for two-player game implementations
//!
//! Outcome scoring lives here so that the search and rollout evaluators agree
//! on what a finished game is worth.

use crate::rules::{Player, Rules};

/// Value of a finished game on the [0, 1] scale, seen from `perspective`.
///
/// # Returns
/// * `1.0` if `perspective` won
/// * `0.0` if the other player won
/// * `0.5` for a draw
///
/// Both win checks are made because some games (Go, for instance) allow the
/// player who just moved to lose.
///
/// # Example
/// ```
/// # use engine_core::{outcome_value, Action, Player, Rules, RulesError};
/// # #[derive(Debug)]
/// # struct Done(Option<Player>);
/// # impl Rules for Done {
/// #     type Position = ();
/// #     type Key = ();
/// #     fn field_count(&self) -> usize { 0 }
/// #     fn player_to_move(&self, _: &()) -> Player { Player::First }
/// #     fn legal_moves(&self, _: &()) -> Vec<Action> { Vec::new() }
/// #     fn apply_move(&self, _: &(), action: Action, _: Player) -> Result<(), RulesError> {
/// #         Err(RulesError::IllegalMove { action })
/// #     }
/// #     fn is_terminal(&self, _: &()) -> bool { true }
/// #     fn has_won(&self, _: &(), p: Player) -> bool { self.0 == Some(p) }
/// #     fn position_key(&self, _: &()) {}
/// # }
/// assert_eq!(outcome_value(&Done(Some(Player::First)), &(), Player::First), 1.0);
/// assert_eq!(outcome_value(&Done(Some(Player::First)), &(), Player::Second), 0.0);
/// assert_eq!(outcome_value(&Done(None), &(), Player::Second), 0.5);
/// ```
#[inline]
pub fn outcome_value<R: Rules + ?Sized>(
    rules: &R,
    position: &R::Position,
    perspective: Player,
) -> f32 {
    if rules.has_won(position, perspective) {
        1.0
    } else if rules.has_won(position, perspective.other()) {
        0.0
    } else {
        0.5
    }
}
