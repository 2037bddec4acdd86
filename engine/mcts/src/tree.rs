//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Parent links are plain indices,
//! so the tree has no reference cycles and dropping a subtree is a
//! matter of compacting the arena.

use engine_core::{Action, Player};

use crate::node::{MctsNode, NodeId};

/// Policy mass below which an expansion falls back to uniform priors.
const MIN_PRIOR_MASS: f32 = 1e-8;

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0: re-rooting compacts the arena)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree whose root position has `last_mover` as the
    /// player who moved into it.
    pub fn new(last_mover: Player) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(last_mover)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node and return its ID.
    pub(crate) fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCT score.
    ///
    /// Children are scanned in ascending action order and only a strictly
    /// better score replaces the incumbent, so ties go to the lowest action.
    /// Returns None if the node has no children.
    pub fn select_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let sibling_visits: u32 = node
            .children
            .iter()
            .map(|(_, id)| self.get(*id).visit_count)
            .sum();
        // Pre-compute sqrt once instead of per-child comparison
        let sibling_visits_sqrt = (sibling_visits as f32).sqrt();

        let mut best: Option<(NodeId, f32)> = None;
        for &(_, child_id) in &node.children {
            let score = self.get(child_id).uct_score(sibling_visits_sqrt, exploration);
            let better = match best {
                None => true,
                Some((_, best_score)) => score > best_score || best_score.is_nan(),
            };
            if better {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Expand a node with one child per legal move not already present.
    ///
    /// Priors are read from `policy` at each move's index and renormalised
    /// over the legal moves. If the policy puts no usable mass on any legal
    /// move, the priors are uniform instead. Returns the number of children
    /// created.
    pub fn expand(
        &mut self,
        node_id: NodeId,
        legal_moves: &[Action],
        policy: &[f32],
        child_mover: Player,
    ) -> usize {
        let raw: Vec<f32> = legal_moves
            .iter()
            .map(|&action| {
                let p = policy.get(action).copied().unwrap_or(0.0);
                if p.is_finite() && p > 0.0 {
                    p
                } else {
                    0.0
                }
            })
            .collect();
        let mass: f32 = raw.iter().sum();
        let uniform = 1.0 / legal_moves.len().max(1) as f32;

        let mut created = 0;
        for (&action, &p) in legal_moves.iter().zip(raw.iter()) {
            let slot = match self
                .get(node_id)
                .children
                .binary_search_by_key(&action, |(a, _)| *a)
            {
                Ok(_) => continue, // Already expanded
                Err(slot) => slot,
            };

            let prior = if mass > MIN_PRIOR_MASS { p / mass } else { uniform };
            let child_id = self.allocate(MctsNode::new_child(node_id, action, child_mover, prior));
            self.get_mut(node_id).children.insert(slot, (action, child_id));
            created += 1;
        }
        created
    }

    /// Backpropagate a value from a leaf to the root.
    ///
    /// `value` is from the leaf's `last_mover` perspective; it is flipped to
    /// `1 - value` whenever the parent belongs to the other player.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.record(current_value);

            let mover = node.last_mover;
            current_id = node.parent;

            if current_id.is_some() && self.get(current_id).last_mover != mover {
                current_value = 1.0 - current_value;
            }
        }
    }

    /// Visit counts of the root's children over the action space.
    /// Actions never expanded at the root report 0.
    pub fn root_visits(&self, num_actions: usize) -> Vec<u32> {
        let mut visits = vec![0; num_actions];
        for &(action, id) in &self.get(self.root).children {
            if let Some(slot) = visits.get_mut(action) {
                *slot = self.get(id).visit_count;
            }
        }
        visits
    }

    /// Make `new_root` the root, dropping every node outside its subtree.
    ///
    /// Statistics inside the kept subtree are untouched. The arena is
    /// rebuilt in breadth-first order, so the new root ends up at index 0.
    /// Returns the number of nodes discarded.
    pub fn reroot(&mut self, new_root: NodeId) -> usize {
        let before = self.nodes.len();
        let mut slots: Vec<Option<MctsNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();

        // Breadth-first order of the kept subtree, and old index -> new index
        let mut order = vec![new_root];
        let mut remap = vec![NodeId::NONE; slots.len()];
        let mut i = 0;
        while i < order.len() {
            let id = order[i];
            remap[id.index()] = NodeId(i as u32);
            if let Some(node) = &slots[id.index()] {
                order.extend(node.children.iter().map(|(_, child)| *child));
            }
            i += 1;
        }

        let mut nodes = Vec::with_capacity(order.len());
        for id in order {
            if let Some(mut node) = slots[id.index()].take() {
                node.parent = if id == new_root {
                    NodeId::NONE
                } else {
                    remap[node.parent.index()]
                };
                for (_, child) in node.children.iter_mut() {
                    *child = remap[child.index()];
                }
                nodes.push(node);
            }
        }

        self.nodes = nodes;
        self.root = NodeId(0);
        before - self.nodes.len()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value,
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.get(id).children.iter().map(|(_, c)| (*c, depth + 1)));
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
