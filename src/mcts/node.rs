//! MCTS node structures.
//!
//! Uses arena-based allocation with index references (NodeId). A node is
//! either a decision (a player picks an action) or a chance node (the deck
//! picks the next cards). Chance nodes hold up to K sampled outcome chains,
//! each with the state it produced and the decision node that follows it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// One sampled resolution of a chance node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Determinization<C, S> {
    /// Chance outcomes in the order they were applied.
    pub outcomes: Vec<C>,
    /// State after every outcome was applied.
    pub state: S,
    /// Node reached through this resolution.
    pub successor: NodeId,
}

/// What a node does when a walk passes through it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeKind<A, C, S> {
    Decision {
        /// Actions not yet expanded. Expansion pops from the back.
        untried: Vec<A>,
        children: SmallVec<[NodeId; 8]>,
    },
    Chance {
        /// Filled lazily, never past K.
        slots: Vec<Determinization<C, S>>,
    },
}

/// A node in the MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode<A, C, S> {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Action that led here from a decision parent.
    pub action: Option<A>,

    /// Player decisions between the root and this node.
    pub depth: u16,

    pub visits: u32,

    /// Sum of backed-up rewards. Terminal nodes keep theirs at zero.
    pub total_reward: f64,

    /// Selection score. Fixed to the reward for terminal nodes.
    pub score: f64,

    pub is_terminal: bool,

    pub kind: NodeKind<A, C, S>,
}

impl<A, C, S> MCTSNode<A, C, S> {
    fn with_kind(parent: NodeId, action: Option<A>, depth: u16, kind: NodeKind<A, C, S>) -> Self {
        Self {
            parent,
            action,
            depth,
            visits: 0,
            total_reward: 0.0,
            score: 0.0,
            is_terminal: false,
            kind,
        }
    }

    /// A decision node with every legal action still to expand.
    pub fn decision(parent: NodeId, action: Option<A>, depth: u16, untried: Vec<A>) -> Self {
        Self::with_kind(
            parent,
            action,
            depth,
            NodeKind::Decision {
                untried,
                children: SmallVec::new(),
            },
        )
    }

    /// A chance node with room for `k` determinizations.
    pub fn chance(parent: NodeId, action: Option<A>, depth: u16, k: usize) -> Self {
        Self::with_kind(
            parent,
            action,
            depth,
            NodeKind::Chance {
                slots: Vec::with_capacity(k),
            },
        )
    }

    /// A finished game. Its score is the game's reward and never changes.
    pub fn terminal(parent: NodeId, action: Option<A>, depth: u16, reward: f64) -> Self {
        let mut node = Self::decision(parent, action, depth, Vec::new());
        node.is_terminal = true;
        node.score = reward;
        node
    }

    #[must_use]
    pub fn root(untried: Vec<A>) -> Self {
        Self::decision(NodeId::NONE, None, 0, untried)
    }

    #[must_use]
    pub fn is_chance(&self) -> bool {
        matches!(self.kind, NodeKind::Chance { .. })
    }

    /// Average backed-up reward, or the fixed score of a terminal node.
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.is_terminal {
            self.score
        } else if self.visits == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.visits)
        }
    }

    /// Children of a decision node, or the successors of a chance node.
    #[must_use]
    pub fn children(&self) -> SmallVec<[NodeId; 8]> {
        match &self.kind {
            NodeKind::Decision { children, .. } => children.clone(),
            NodeKind::Chance { slots } => slots.iter().map(|d| d.successor).collect(),
        }
    }

    #[must_use]
    pub fn untried_count(&self) -> usize {
        match &self.kind {
            NodeKind::Decision { untried, .. } => untried.len(),
            NodeKind::Chance { .. } => 0,
        }
    }

    /// Number of determinizations sampled so far (zero for decisions).
    #[must_use]
    pub fn determinization_count(&self) -> usize {
        match &self.kind {
            NodeKind::Chance { slots } => slots.len(),
            NodeKind::Decision { .. } => 0,
        }
    }

    /// Visited often enough, and for a decision every action expanded.
    #[must_use]
    pub fn converged(&self, threshold: u32) -> bool {
        self.visits >= threshold && self.untried_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Node = MCTSNode<u8, u8, u32>;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_node_root() {
        let node = Node::root(vec![1, 2, 3]);

        assert!(node.parent.is_none());
        assert_eq!(node.depth, 0);
        assert_eq!(node.visits, 0);
        assert!(!node.is_terminal);
        assert!(!node.is_chance());
        assert_eq!(node.untried_count(), 3);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_terminal_score_is_fixed_reward() {
        let mut node = Node::terminal(NodeId::new(0), Some(4), 1, 1.0);
        node.visits = 10;
        assert_eq!(node.mean_reward(), 1.0);
        assert!(node.converged(10));
        assert!(!node.converged(11));
    }

    #[test]
    fn test_chance_successors() {
        let mut node = Node::chance(NodeId::new(0), Some(1), 1, 2);
        assert!(node.is_chance());
        if let NodeKind::Chance { slots } = &mut node.kind {
            slots.push(Determinization {
                outcomes: vec![7, 8],
                state: 99,
                successor: NodeId::new(3),
            });
        }
        assert_eq!(node.determinization_count(), 1);
        assert_eq!(node.children().as_slice(), &[NodeId::new(3)]);
    }

    #[test]
    fn test_convergence_needs_full_expansion() {
        let mut node = Node::root(vec![1]);
        node.visits = 50;
        assert!(!node.converged(10));
        if let NodeKind::Decision { untried, .. } = &mut node.kind {
            untried.clear();
        }
        assert!(node.converged(10));
    }

    #[test]
    fn test_serialization() {
        let mut node = Node::root(vec![5]);
        node.visits = 100;

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: Node = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.visits, 100);
        assert_eq!(deserialized.untried_count(), 1);
    }
}
