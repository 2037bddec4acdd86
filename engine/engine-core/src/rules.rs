//! Rules-engine trait used by the search
//!
//! The search never looks inside a position. Everything it needs to know
//! about a game flows through this trait, which keeps the engine generic over
//! board encodings and branching factors.

use std::hash::Hash;

/// Move identifier: an index in `0..field_count`.
pub type Action = usize;

/// One side of a two-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// The opposing player.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// Errors a rules engine may raise while applying moves.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Illegal move {action} in this position")]
    IllegalMove { action: Action },
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

/// Rules of a two-player, perfect-information board game.
///
/// Implementations must be deterministic and free of hidden state: the same
/// position must always yield the same moves, outcomes and key. The search
/// caches oracle outputs by [`Rules::position_key`] and relies on this.
///
/// # Example
///
/// ```rust
/// # use engine_core::{Action, Player, Rules, RulesError};
/// /// First player to take the last of `n` stones wins.
/// #[derive(Debug)]
/// struct Stones;
///
/// impl Rules for Stones {
///     type Position = (u32, Player);
///     type Key = (u32, Player);
///
///     fn field_count(&self) -> usize { 2 }
///     fn player_to_move(&self, pos: &Self::Position) -> Player { pos.1 }
///     fn legal_moves(&self, pos: &Self::Position) -> Vec<Action> {
///         (0..2).filter(|&a| a as u32 + 1 <= pos.0).collect()
///     }
///     fn apply_move(
///         &self,
///         pos: &Self::Position,
///         action: Action,
///         player: Player,
///     ) -> Result<Self::Position, RulesError> {
///         let take = action as u32 + 1;
///         if take > pos.0 {
///             return Err(RulesError::IllegalMove { action });
///         }
///         Ok((pos.0 - take, player.other()))
///     }
///     fn is_terminal(&self, pos: &Self::Position) -> bool { pos.0 == 0 }
///     fn has_won(&self, pos: &Self::Position, player: Player) -> bool {
///         pos.0 == 0 && pos.1 != player
///     }
///     fn position_key(&self, pos: &Self::Position) -> Self::Key { *pos }
/// }
///
/// let rules = Stones;
/// let next = rules.apply_move(&(2, Player::First), 1, Player::First).unwrap();
/// assert!(rules.is_terminal(&next));
/// assert!(rules.has_won(&next, Player::First));
/// ```
pub trait Rules {
    /// Board position. Cloned once per playout as the working position.
    type Position: Clone;

    /// Canonical, value-based encoding of a position.
    ///
    /// Two positions that are equal for the purpose of evaluation must
    /// produce equal keys, whatever move order reached them.
    type Key: Hash + Eq + Clone;

    /// Size of the move-index space. Oracle policies have this length.
    fn field_count(&self) -> usize;

    /// Player whose turn it is in `position`.
    fn player_to_move(&self, position: &Self::Position) -> Player;

    /// Legal moves in `position`, each in `0..field_count`.
    fn legal_moves(&self, position: &Self::Position) -> Vec<Action>;

    /// Apply `action` for `player` and return the resulting position.
    fn apply_move(
        &self,
        position: &Self::Position,
        action: Action,
        player: Player,
    ) -> Result<Self::Position, RulesError>;

    /// Whether the game is over in `position`.
    fn is_terminal(&self, position: &Self::Position) -> bool;

    /// Whether `player` has won at `position`.
    fn has_won(&self, position: &Self::Position, player: Player) -> bool;

    /// Canonical cache key for `position`.
    fn position_key(&self, position: &Self::Position) -> Self::Key;
}

impl<T: Rules + ?Sized> Rules for &T {
    type Position = T::Position;
    type Key = T::Key;

    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn player_to_move(&self, position: &Self::Position) -> Player {
        (**self).player_to_move(position)
    }

    fn legal_moves(&self, position: &Self::Position) -> Vec<Action> {
        (**self).legal_moves(position)
    }

    fn apply_move(
        &self,
        position: &Self::Position,
        action: Action,
        player: Player,
    ) -> Result<Self::Position, RulesError> {
        (**self).apply_move(position, action, player)
    }

    fn is_terminal(&self, position: &Self::Position) -> bool {
        (**self).is_terminal(position)
    }

    fn has_won(&self, position: &Self::Position, player: Player) -> bool {
        (**self).has_won(position, player)
    }

    fn position_key(&self, position: &Self::Position) -> Self::Key {
        (**self).position_key(position)
    }
}
