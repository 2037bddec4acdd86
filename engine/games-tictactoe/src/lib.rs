//! TicTacToe rules for the MCTS engine
//!
//! This crate provides a complete reference implementation of TicTacToe
//! demonstrating how to implement the [`Rules`] trait for the search.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Player, Rules};
//! use games_tictactoe::{State, TicTacToe};
//!
//! let rules = TicTacToe::new();
//! let state = State::new();
//! let state = rules.apply_move(&state, 4, Player::First).unwrap();
//! assert_eq!(rules.player_to_move(&state), Player::Second);
//! assert_eq!(rules.legal_moves(&state).len(), 8);
//! ```

use std::fmt;

use engine_core::{Action, Player, Rules, RulesError};

/// Number of cells, and so the size of the action space.
pub const BOARD_CELLS: usize = 9;

const EMPTY: u8 = 0;
const DRAW: u8 = 3;

/// Winning lines (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

fn mark(player: Player) -> u8 {
    match player {
        Player::First => 1,
        Player::Second => 2,
    }
}

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// player to move, and winner information. X is [`Player::First`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// Board representation: 0=empty, 1=X, 2=O
    board: [u8; BOARD_CELLS],
    to_move: Player,
    /// Winner: 0=none/ongoing, 1=X, 2=O, 3=draw
    winner: u8,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [EMPTY; BOARD_CELLS],
            to_move: Player::First, // X goes first
            winner: 0,
        }
    }

    /// Play `moves` from the initial state, alternating from X.
    pub fn from_moves(moves: &[Action]) -> Result<Self, RulesError> {
        moves
            .iter()
            .try_fold(Self::new(), |state, &cell| state.make_move(cell, state.to_move))
    }

    /// Build a state from a board of 0/1/2 cells.
    pub fn from_board(board: [u8; BOARD_CELLS], to_move: Player) -> Result<Self, RulesError> {
        if let Some(cell) = board.iter().find(|&&c| c > 2) {
            return Err(RulesError::InvalidPosition(format!(
                "unknown cell value {cell}"
            )));
        }
        Ok(Self {
            board,
            to_move,
            winner: Self::check_winner(&board),
        })
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != 0
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The winner, if the game ended with three in a row.
    pub fn winner(&self) -> Option<Player> {
        match self.winner {
            1 => Some(Player::First),
            2 => Some(Player::Second),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner == DRAW
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<Action> {
        if self.is_done() {
            return Vec::new();
        }

        (0..BOARD_CELLS)
            .filter(|&pos| self.board[pos] == EMPTY)
            .collect()
    }

    /// Place `player`'s mark on `cell` and return the new state.
    pub fn make_move(&self, cell: Action, player: Player) -> Result<State, RulesError> {
        if self.is_done() || cell >= BOARD_CELLS || self.board[cell] != EMPTY {
            return Err(RulesError::IllegalMove { action: cell });
        }

        let mut new_state = *self;
        new_state.board[cell] = mark(player);
        new_state.winner = Self::check_winner(&new_state.board);
        new_state.to_move = player.other();
        Ok(new_state)
    }

    /// Check for winner on the board
    fn check_winner(board: &[u8; BOARD_CELLS]) -> u8 {
        for line in &LINES {
            let [a, b, c] = *line;
            if board[a] != EMPTY && board[a] == board[b] && board[b] == board[c] {
                return board[a]; // Return the winning player
            }
        }

        // Check for draw (board full but no winner)
        if board.iter().all(|&cell| cell != EMPTY) {
            return DRAW;
        }

        0 // Game ongoing
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(3) {
            let line: Vec<&str> = row
                .iter()
                .map(|&cell| match cell {
                    1 => "X",
                    2 => "O",
                    _ => ".",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// TicTacToe rules
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    pub fn new() -> Self {
        Self
    }
}

impl Rules for TicTacToe {
    type Position = State;
    type Key = State;

    fn field_count(&self) -> usize {
        BOARD_CELLS
    }

    fn player_to_move(&self, position: &State) -> Player {
        position.to_move
    }

    fn legal_moves(&self, position: &State) -> Vec<Action> {
        position.legal_moves()
    }

    fn apply_move(
        &self,
        position: &State,
        action: Action,
        player: Player,
    ) -> Result<State, RulesError> {
        position.make_move(action, player)
    }

    fn is_terminal(&self, position: &State) -> bool {
        position.is_done()
    }

    fn has_won(&self, position: &State, player: Player) -> bool {
        position.winner() == Some(player)
    }

    fn position_key(&self, position: &State) -> State {
        *position
    }
}
