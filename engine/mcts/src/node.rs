//! MCTS tree node representation.
//!
//! Each node represents a position reached by one player's move from the
//! parent position. Statistics are kept from the perspective of that player
//! (`last_mover`) on a [0, 1] value scale.

use engine_core::{Action, Player};

/// Value a node holds before any playout has reached it ("undetermined").
pub const NEUTRAL_VALUE: f32 = 0.5;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from the parent position (None for root)
    pub action: Option<Action>,

    /// Player who made `action`. For the root, the opponent of the side to move.
    pub last_mover: Player,

    /// Number of playouts that passed through this node
    pub visit_count: u32,

    /// Running mean of backed-up values, from `last_mover`'s perspective.
    pub mean_value: f32,

    /// Prior probability from the oracle policy, fixed at expansion.
    pub prior: f32,

    /// Outcome of this node's position once it is known to be terminal
    pub terminal_value: Option<f32>,

    /// Children as (action, NodeId) pairs, sorted by action.
    /// Empty until node is expanded.
    pub children: Vec<(Action, NodeId)>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(last_mover: Player) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            last_mover,
            visit_count: 0,
            mean_value: NEUTRAL_VALUE,
            prior: 1.0, // Root has prior 1.0
            terminal_value: None,
            children: Vec::new(),
        }
    }

    /// Create a new, unvisited child node.
    pub fn new_child(parent: NodeId, action: Action, last_mover: Player, prior: f32) -> Self {
        Self {
            parent,
            action: Some(action),
            last_mover,
            visit_count: 0,
            mean_value: NEUTRAL_VALUE,
            prior,
            terminal_value: None,
            children: Vec::new(),
        }
    }

    /// Fold one playout value into the visit count and running mean.
    #[inline]
    pub fn record(&mut self, value: f32) {
        self.visit_count += 1;
        self.mean_value += (value - self.mean_value) / self.visit_count as f32;
    }

    /// Calculate the UCT score used for child selection.
    /// UCT(s,a) = Q(s,a) + c * P(s,a) * sqrt(N_siblings) / (1 + N(s,a))
    ///
    /// Q needs no negation: a child's value is already from the perspective
    /// of the player choosing among the children.
    ///
    /// Takes pre-computed sqrt of the siblings' visit total to avoid
    /// redundant sqrt calls when comparing multiple children.
    #[inline]
    pub fn uct_score(&self, sibling_visits_sqrt: f32, exploration: f32) -> f32 {
        let u = exploration * self.prior * sibling_visits_sqrt / (1.0 + self.visit_count as f32);
        self.mean_value + u
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this node's position is known to be terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal_value.is_some()
    }

    /// Look up the child reached by `action`.
    pub fn child(&self, action: Action) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&action, |(a, _)| *a)
            .ok()
            .map(|i| self.children[i].1)
    }
}
