//! Core MCTS search algorithm.
//!
//! Implements UCT over a K-determinized tree. Player decisions branch on
//! every legal action. Chance transitions branch on at most K sampled
//! resolutions per chance node: the first K visits each sample a new one,
//! later visits replay one of them at random.

use std::time::Instant;

use crate::core::rng::GameRng;
use crate::rules::RulesEngine;

use super::config::{MCTSConfig, RootPolicy};
use super::node::{Determinization, MCTSNode, NodeId, NodeKind};
use super::policy::{max_avg_reward, node_score, RandomRollout, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::{RootChoice, SearchStats};
use super::tree::MCTSTree;

type SearchTree<E> =
    MCTSTree<<E as RulesEngine>::Action, <E as RulesEngine>::Chance, <E as RulesEngine>::State>;
type SearchNode<E> =
    MCTSNode<<E as RulesEngine>::Action, <E as RulesEngine>::Chance, <E as RulesEngine>::State>;

/// Main MCTS search context.
///
/// Generic over the rules engine type. Owns the search tree and
/// configuration. The tree is rebuilt from scratch by every call to
/// [`MCTSSearch::search`].
pub struct MCTSSearch<E: RulesEngine> {
    engine: E,

    config: MCTSConfig,

    tree: SearchTree<E>,

    /// Drives determinization sampling, replay picks and rollouts.
    rng: GameRng,

    selection: Box<dyn SelectionPolicy>,

    simulation: Box<dyn SimulationPolicy<E>>,

    stats: SearchStats,
}

impl<E> MCTSSearch<E>
where
    E: RulesEngine,
    E::State: 'static,
{
    /// Create a new MCTS search context with UCB1 selection and random
    /// rollouts scored by the game's reward.
    pub fn new(engine: E, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            engine,
            config,
            tree: MCTSTree::new(MCTSNode::root(Vec::new())),
            rng,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomRollout::<E::State>::default()),
            stats: SearchStats::default(),
        }
    }

    /// Use `rng` instead of a generator seeded from the config.
    #[must_use]
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn with_selection<P: SelectionPolicy + 'static>(mut self, selection: P) -> Self {
        self.selection = Box::new(selection);
        self
    }

    #[must_use]
    pub fn with_simulation<P: SimulationPolicy<E> + 'static>(mut self, simulation: P) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Run the configured number of simulations from `state` and return the
    /// action picked by the root policy.
    ///
    /// Returns `None` when `state` is terminal, waits on a chance
    /// transition, or has no legal action.
    pub fn search(&mut self, state: &E::State) -> Option<E::Action> {
        let start = Instant::now();
        self.reset(state);

        let root = self.tree.root_node();
        if root.is_terminal || root.is_chance() {
            log::debug!("search called on a state with no decision to make");
            return None;
        }
        if let NodeKind::Decision { untried, .. } = &root.kind {
            match untried.len() {
                0 => return None,
                1 => return untried.first().cloned(),
                _ => {}
            }
        }

        for _ in 0..self.config.simulations {
            self.simulate(state);
        }
        log::debug!(
            "{} iterations, {} nodes, {} determinizations, max depth {}",
            self.stats.iterations,
            self.tree.len(),
            self.stats.determinizations,
            self.stats.max_depth
        );
        log::debug!("{:.1}% of chance passes replayed", 100.0 * self.stats.replay_fraction());

        let action = match self.choose_root_child() {
            Some(chosen) => {
                self.record_choice(chosen);
                self.tree.get(chosen).action.clone()
            }
            None => match &self.tree.root_node().kind {
                NodeKind::Decision { untried, .. } => untried.last().cloned(),
                NodeKind::Chance { .. } => None,
            },
        };

        self.stats.finish(start.elapsed());
        if let (Some(action), Some(chosen)) = (&action, self.stats.chosen) {
            log::info!(
                "search finished: {} iterations, {} nodes in {}us, chose {action} (reward {:.3}, {} visits)",
                self.stats.iterations,
                self.tree.len(),
                self.stats.time_us,
                chosen.reward,
                chosen.visits
            );
        }
        action
    }

    /// Throw away the tree and start a new one rooted at `state`.
    pub fn reset(&mut self, state: &E::State) {
        self.stats = SearchStats::default();
        let mut root_state = state.clone();
        let root = self.make_node(NodeId::NONE, None, 0, &mut root_state);
        self.tree.reset(root);
    }

    /// One selection walk from a copy of `root_state`, then evaluation and
    /// backpropagation. `root_state` must be the state passed to `reset`.
    pub fn simulate(&mut self, root_state: &E::State) {
        let mut state = root_state.clone();
        let leaf = self.select_leaf(&mut state);

        let node = self.tree.get(leaf);
        let (depth, terminal) = (node.depth, node.is_terminal);
        let reward = if terminal {
            node.score
        } else {
            self.simulation.evaluate(&self.engine, &mut state, &mut self.rng)
        };

        self.tree.backprop(leaf, reward);
        self.refresh_scores(leaf);
        self.stats.record_walk(depth, !terminal);
    }

    /// Walk down from the root, expanding the first untried action found
    /// or following the best-scored child, until reaching a node that is
    /// terminal or has never been visited. `state` tracks the walk.
    pub fn select_leaf(&mut self, state: &mut E::State) -> NodeId {
        let mut current = self.tree.root();
        loop {
            let next = if self.tree.get(current).is_chance() {
                Some(self.deterministic_child(current, state))
            } else {
                self.expand_or_best(current, state)
            };
            let Some(next) = next else {
                return current;
            };
            current = next;

            let node = self.tree.get(current);
            if node.is_terminal || node.visits == 0 {
                break;
            }
        }
        self.deterministic_child(current, state)
    }

    /// Resolve a chance node into one of its determinizations and leave
    /// `state` at that determinization's successor. Decision nodes are
    /// returned unchanged.
    pub fn deterministic_child(&mut self, id: NodeId, state: &mut E::State) -> NodeId {
        let k = self.config.determinizations.max(1);
        let filled = match &self.tree.get(id).kind {
            NodeKind::Chance { slots } => slots.len(),
            NodeKind::Decision { .. } => return id,
        };

        if filled < k {
            let mut outcomes = Vec::new();
            while self.engine.is_stochastic(state) {
                let Some(chance) = self.engine.sample_chance(state, &mut self.rng) else {
                    break;
                };
                self.engine.apply_chance(state, &chance);
                outcomes.push(chance);
            }
            log::trace!("{id}: sampled determinization {}/{k} from {} outcomes", filled + 1, outcomes.len());

            let depth = self.tree.get(id).depth;
            let node = self.make_node(id, None, depth, state);
            let successor = self.tree.alloc(node);
            if let NodeKind::Chance { slots } = &mut self.tree.get_mut(id).kind {
                slots.push(Determinization {
                    outcomes,
                    state: state.clone(),
                    successor,
                });
            }
            self.stats.record_chance(true);
            return successor;
        }

        let pick = self.rng.gen_index(filled);
        self.stats.record_chance(false);
        match &self.tree.get(id).kind {
            NodeKind::Chance { slots } => {
                log::trace!("{id}: replaying determinization {}/{filled}", pick + 1);
                let slot = &slots[pick];
                *state = slot.state.clone();
                slot.successor
            }
            NodeKind::Decision { .. } => id,
        }
    }

    fn expand_or_best(&mut self, id: NodeId, state: &mut E::State) -> Option<NodeId> {
        let popped = match &mut self.tree.get_mut(id).kind {
            NodeKind::Decision { untried, .. } => untried.pop(),
            NodeKind::Chance { .. } => None,
        };

        if let Some(action) = popped {
            self.engine.apply_action(state, &action);
            log::trace!("{id}: expanding {action}");
            let depth = self.tree.get(id).depth + 1;
            let node = self.make_node(id, Some(action), depth, state);
            return Some(self.tree.add_child(node));
        }

        let best = self.best_child(id)?;
        if let Some(action) = &self.tree.get(best).action {
            self.engine.apply_action(state, action);
        }
        Some(best)
    }

    /// Rescore every child of `id` and return the highest. Ties go to the
    /// first child seen.
    fn best_child(&mut self, id: NodeId) -> Option<NodeId> {
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        let children = self.tree.get(id).children();
        for child in children {
            let score = self.rescore(child);
            if best.is_none() || score > best_score {
                best = Some(child);
                best_score = score;
            }
        }
        best
    }

    fn rescore(&mut self, id: NodeId) -> f64 {
        let score = node_score(&self.tree, self.tree.get(id), self.selection.as_ref(), self.config.exploration);
        self.tree.get_mut(id).score = score;
        score
    }

    fn refresh_scores(&mut self, leaf: NodeId) {
        let mut current = leaf;
        while !current.is_none() {
            self.rescore(current);
            current = self.tree.get(current).parent;
        }
    }

    fn make_node(
        &mut self,
        parent: NodeId,
        action: Option<E::Action>,
        depth: u16,
        state: &mut E::State,
    ) -> SearchNode<E> {
        self.stats.nodes_expanded += 1;
        if self.engine.is_terminal(state) {
            let reward = self.engine.reward(state);
            MCTSNode::terminal(parent, action, depth, reward)
        } else if self.engine.is_stochastic(state) {
            MCTSNode::chance(parent, action, depth, self.config.determinizations.max(1))
        } else {
            MCTSNode::decision(parent, action, depth, self.engine.legal_actions(state))
        }
    }

    fn choose_root_child(&mut self) -> Option<NodeId> {
        let root = self.tree.root();
        match self.config.root_policy {
            RootPolicy::Ucb => self.best_child(root),
            RootPolicy::MaxChild => self.max_child(root),
        }
    }

    /// Pull each root child's best reachable average up into its total,
    /// then pick the child with the highest such value.
    fn max_child(&mut self, root: NodeId) -> Option<NodeId> {
        let threshold = self.config.convergence_visits;
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        let children = self.tree.get(root).children();
        for child in children {
            let value = max_avg_reward(&self.tree, child, threshold);
            let node = self.tree.get_mut(child);
            if !node.is_terminal {
                node.total_reward = value * f64::from(node.visits);
            }
            self.rescore(child);
            if best.is_none() || value > best_value {
                best = Some(child);
                best_value = value;
            }
        }
        best
    }

    fn record_choice(&mut self, chosen: NodeId) {
        let node = self.tree.get(chosen);
        let siblings = self.tree.root_node().children().len();
        self.stats.chosen = Some(RootChoice {
            visits: node.visits,
            reward: node.mean_reward(),
            confidence: if node.is_terminal { 0.0 } else { node.score - node.mean_reward() },
            siblings,
        });
    }

    /// Action, visits and average reward of every expanded root child.
    #[must_use]
    pub fn root_children(&self) -> Vec<(E::Action, u32, f64)> {
        self.tree
            .root_node()
            .children()
            .iter()
            .filter_map(|&id| {
                let node = self.tree.get(id);
                node.action.clone().map(|a| (a, node.visits, node.mean_reward()))
            })
            .collect()
    }

    #[must_use]
    pub fn tree(&self) -> &SearchTree<E> {
        &self.tree
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
