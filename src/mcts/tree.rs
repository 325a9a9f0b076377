//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. Nodes are never
//! freed during a search; the whole arena is dropped or reset between
//! decisions.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId, NodeKind};

/// Arena-based MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree<A, C, S> {
    nodes: Vec<MCTSNode<A, C, S>>,

    /// The root node ID (always 0 after initialization).
    root: NodeId,
}

impl<A, C, S> MCTSTree<A, C, S> {
    /// Create a new tree around a root node.
    pub fn new(root: MCTSNode<A, C, S>) -> Self {
        Self::with_capacity(root, 1024)
    }

    pub fn with_capacity(root: MCTSNode<A, C, S>, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(root);
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<A, C, S> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<A, C, S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode<A, C, S>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate `node` and list it as a child of its decision parent.
    pub fn add_child(&mut self, node: MCTSNode<A, C, S>) -> NodeId {
        let parent = node.parent;
        let id = self.alloc(node);
        if let NodeKind::Decision { children, .. } = &mut self.get_mut(parent).kind {
            children.push(id);
        }
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear the tree and reset with a new root.
    pub fn reset(&mut self, root: MCTSNode<A, C, S>) {
        self.nodes.clear();
        self.nodes.push(root);
        self.root = NodeId::new(0);
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<A, C, S> {
        self.get(self.root)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<A, C, S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Add `reward` to every node from `leaf` up to the root.
    ///
    /// A terminal leaf passes its own fixed score upward instead of the
    /// given reward, and its total is left untouched.
    pub fn backprop(&mut self, leaf: NodeId, reward: f64) {
        let mut current = leaf;
        let mut value = reward;
        while !current.is_none() {
            let node = self.get_mut(current);
            if node.is_terminal {
                value = node.score;
            } else {
                node.total_reward += value;
            }
            node.visits += 1;
            current = node.parent;
        }
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: self.nodes.len(),
            ..TreeStats::default()
        };
        for node in &self.nodes {
            stats.max_depth = stats.max_depth.max(node.depth);
            if node.is_terminal {
                stats.terminal_count += 1;
            }
            match &node.kind {
                NodeKind::Decision { untried, children } => {
                    stats.untried_actions += untried.len();
                    stats.expanded_actions += children.len();
                }
                NodeKind::Chance { slots } => {
                    stats.chance_count += 1;
                    stats.determinizations += slots.len();
                }
            }
        }
        stats
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TreeStats {
    pub node_count: usize,

    /// Deepest player decision reached.
    pub max_depth: u16,

    pub terminal_count: usize,

    pub chance_count: usize,

    /// Determinizations sampled across all chance nodes.
    pub determinizations: usize,

    /// Actions with a child node.
    pub expanded_actions: usize,

    /// Actions still waiting to be expanded.
    pub untried_actions: usize,
}

impl TreeStats {
    /// Expanded actions over all known actions.
    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        let total = self.expanded_actions + self.untried_actions;
        if total == 0 {
            0.0
        } else {
            self.expanded_actions as f64 / total as f64
        }
    }
}
