//! MCTS policies for selection, evaluation and the final root decision.
//!
//! - `SelectionPolicy`: how children are scored during the walk (UCB1)
//! - `SimulationPolicy`: how a frontier state is valued (rollout, heuristic)
//! - `max_avg_reward`: the value the max-child root policy ranks by

use crate::core::rng::GameRng;
use crate::rules::RulesEngine;

use super::node::{MCTSNode, NodeId, NodeKind};
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Scores a child from its statistics. Higher is explored first.
pub trait SelectionPolicy: Send + Sync {
    fn score(&self, mean: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64;
}

/// UCB1 (Upper Confidence Bound).
///
/// Formula: Q(a) + sqrt(c * ln(N) / n(a)). Unvisited children score
/// infinity.
#[derive(Clone, Copy, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn score(&self, mean: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
        if visits == 0 {
            return f64::INFINITY;
        }
        let ln_parent = f64::from(parent_visits.max(1)).ln();
        mean + (exploration * ln_parent / f64::from(visits)).sqrt()
    }
}

/// Score `node` with `policy`. The root uses its own visit count as the
/// parent's. Terminal nodes keep their fixed score.
pub fn node_score<A, C, S>(
    tree: &MCTSTree<A, C, S>,
    node: &MCTSNode<A, C, S>,
    policy: &dyn SelectionPolicy,
    exploration: f64,
) -> f64 {
    if node.is_terminal {
        return node.score;
    }
    let parent_visits = if node.parent.is_none() {
        node.visits
    } else {
        tree.get(node.parent).visits
    };
    policy.score(node.mean_reward(), node.visits, parent_visits, exploration)
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Values the state at the end of a selection walk.
pub trait SimulationPolicy<E: RulesEngine>: Send + Sync {
    /// The state may be modified freely; it is discarded afterwards.
    fn evaluate(&self, engine: &E, state: &mut E::State, rng: &mut GameRng) -> f64;
}

/// Play the game out at random, then score the final state with the
/// heuristic, or with the game's reward when there is none.
pub struct RandomRollout<S> {
    pub heuristic: Option<fn(&S) -> f64>,
}

impl<S> RandomRollout<S> {
    #[must_use]
    pub fn new(heuristic: Option<fn(&S) -> f64>) -> Self {
        Self { heuristic }
    }
}

impl<S> Default for RandomRollout<S> {
    fn default() -> Self {
        Self { heuristic: None }
    }
}

impl<S> Clone for RandomRollout<S> {
    fn clone(&self) -> Self {
        Self { heuristic: self.heuristic }
    }
}

impl<E: RulesEngine> SimulationPolicy<E> for RandomRollout<E::State> {
    fn evaluate(&self, engine: &E, state: &mut E::State, rng: &mut GameRng) -> f64 {
        engine.rollout(state, rng);
        match self.heuristic {
            Some(heuristic) => heuristic(state),
            None => engine.reward(state),
        }
    }
}

/// Score the frontier state directly, with no rollout.
pub struct HeuristicEvaluation<S> {
    pub heuristic: fn(&S) -> f64,
}

impl<S> HeuristicEvaluation<S> {
    #[must_use]
    pub fn new(heuristic: fn(&S) -> f64) -> Self {
        Self { heuristic }
    }
}

impl<S> Clone for HeuristicEvaluation<S> {
    fn clone(&self) -> Self {
        Self { heuristic: self.heuristic }
    }
}

impl<E: RulesEngine> SimulationPolicy<E> for HeuristicEvaluation<E::State> {
    fn evaluate(&self, _engine: &E, state: &mut E::State, _rng: &mut GameRng) -> f64 {
        (self.heuristic)(state)
    }
}

// =============================================================================
// Max-Child Root Policy
// =============================================================================

/// Best average reward reachable from `id`.
///
/// Terminal nodes give their score and unconverged nodes their own
/// average. A converged decision takes the max over its children and a
/// converged chance node the visit-weighted mean over its successors.
pub fn max_avg_reward<A, C, S>(tree: &MCTSTree<A, C, S>, id: NodeId, threshold: u32) -> f64 {
    let node = tree.get(id);
    if node.is_terminal || !node.converged(threshold) {
        return node.mean_reward();
    }
    match &node.kind {
        NodeKind::Decision { children, .. } => children
            .iter()
            .map(|&child| max_avg_reward(tree, child, threshold))
            .reduce(f64::max)
            .unwrap_or_else(|| node.mean_reward()),
        NodeKind::Chance { slots } => {
            let mut weighted = 0.0;
            let mut visits = 0u32;
            for slot in slots {
                let successor = tree.get(slot.successor);
                weighted += f64::from(successor.visits) * max_avg_reward(tree, slot.successor, threshold);
                visits += successor.visits;
            }
            if visits == 0 {
                node.mean_reward()
            } else {
                weighted / f64::from(visits)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::node::Determinization;

    type Tree = MCTSTree<u8, u8, u32>;
    type Node = MCTSNode<u8, u8, u32>;

    fn visited(mut node: Node, visits: u32, total: f64) -> Node {
        node.visits = visits;
        node.total_reward = total;
        node
    }

    #[test]
    fn test_ucb1_unvisited_is_infinite() {
        assert_eq!(UCB1.score(0.0, 0, 10, 2.0), f64::INFINITY);
    }

    #[test]
    fn test_ucb1_formula() {
        let score = UCB1.score(0.5, 4, 16, 2.0);
        let expected = 0.5 + (2.0 * 16f64.ln() / 4.0).sqrt();
        assert!((score - expected).abs() < 1e-12);
        // No exploration leaves the mean.
        assert_eq!(UCB1.score(0.5, 4, 16, 0.0), 0.5);
    }

    #[test]
    fn test_root_scores_against_itself() {
        let tree = Tree::new(visited(Node::root(vec![]), 8, 4.0));
        let score = node_score(&tree, tree.root_node(), &UCB1, 2.0);
        let expected = 0.5 + (2.0 * 8f64.ln() / 8.0).sqrt();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_max_avg_reward_unconverged_uses_average() {
        let mut tree = Tree::new(visited(Node::root(vec![]), 4, 2.0));
        let root = tree.root();
        tree.add_child(visited(Node::decision(root, Some(1), 1, vec![]), 4, 4.0));
        assert_eq!(max_avg_reward(&tree, root, 10), 0.5);
        assert_eq!(max_avg_reward(&tree, root, 4), 1.0);
    }

    #[test]
    fn test_max_avg_reward_weights_chance_successors() {
        let mut tree = Tree::new(visited(Node::root(vec![]), 4, 1.0));
        let root = tree.root();
        let chance = tree.add_child(visited(Node::chance(root, Some(1), 1, 2), 4, 1.0));
        let win = tree.alloc(visited(Node::terminal(chance, None, 1, 1.0), 1, 0.0));
        let loss = tree.alloc(visited(Node::terminal(chance, None, 1, 0.0), 3, 0.0));
        if let NodeKind::Chance { slots } = &mut tree.get_mut(chance).kind {
            for successor in [win, loss] {
                slots.push(Determinization {
                    outcomes: vec![],
                    state: 0,
                    successor,
                });
            }
        }

        assert!((max_avg_reward(&tree, chance, 1) - 0.25).abs() < 1e-12);
        assert!((max_avg_reward(&tree, root, 1) - 0.25).abs() < 1e-12);
    }
}
