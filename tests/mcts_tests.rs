//! MCTS integration tests on real boards.

use pandemic_search::actions::Action;
use pandemic_search::board::Board;
use pandemic_search::core::GameConfig;
use pandemic_search::game::{compound_loss_win, Game, PandemicRules};
use pandemic_search::mcts::{HeuristicEvaluation, MCTSConfig, MCTSSearch, NodeKind, RootPolicy};
use pandemic_search::rules::RulesEngine;

/// A board one action away from the end of the player's turn.
fn last_action_board(seed: u64) -> Board {
    let mut game = Game::new(GameConfig::default().with_seed(seed)).unwrap();
    game.nonplayer_actions(false);
    for _ in 0..3 {
        game.apply_action(&Action::DoNothing);
    }
    game.board_copy()
}

fn opening_board(seed: u64) -> Board {
    let mut game = Game::new(GameConfig::default().with_seed(seed)).unwrap();
    game.nonplayer_actions(false);
    game.board_copy()
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_mcts_returns_legal_action() {
    let board = opening_board(1);
    let legal = PandemicRules::default().legal_actions(&board);
    let config = MCTSConfig::fast().with_simulations(100);
    let mut search = MCTSSearch::new(PandemicRules::default(), config);

    let action = search.search(&board).unwrap();

    assert!(legal.contains(&action));
    assert_eq!(search.stats().iterations, 100);
    assert_eq!(search.tree().root_node().visits, 100);
    assert!(search.stats().nodes_expanded as usize >= search.tree().len());
}

#[test]
fn test_mcts_deterministic_with_seed() {
    let board = opening_board(2);
    let run = || {
        let config = MCTSConfig::fast().with_simulations(80).with_determinizations(2).with_seed(12345);
        let mut search = MCTSSearch::new(PandemicRules::default(), config);
        let action = search.search(&board);
        (action, search.root_children())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_heuristic_evaluation_skips_rollouts() {
    let board = opening_board(3);
    let config = MCTSConfig::fast().with_simulations(1_000).with_root_policy(RootPolicy::MaxChild);
    let mut search = MCTSSearch::new(PandemicRules::default(), config)
        .with_simulation(HeuristicEvaluation::new(compound_loss_win));

    assert!(search.search(&board).is_some());
    let stats = search.stats();
    let chosen = stats.chosen.unwrap();
    assert!((0.0..=1.0).contains(&chosen.reward));
    assert!(stats.max_depth >= 2, "depth {}", stats.max_depth);
}

#[test]
fn test_terminal_board_has_no_action() {
    let mut board = opening_board(4);
    board.set_outbreak_count(8);
    let mut search = MCTSSearch::new(PandemicRules::default(), MCTSConfig::fast());
    assert_eq!(search.search(&board), None);
}

// =============================================================================
// Determinization Tests
// =============================================================================

#[test]
fn test_single_sample_replays_identical_board() {
    let rules = PandemicRules::default();
    let root_state = last_action_board(5);
    let config = MCTSConfig::fast().with_determinizations(1);
    let mut search = MCTSSearch::new(rules, config);
    search.reset(&root_state);
    let n_actions = rules.legal_actions(&root_state).len();
    for _ in 0..(2 * n_actions) {
        search.simulate(&root_state);
    }

    let root = search.tree().root();
    let children = search.tree().get(root).children();
    assert!(!children.is_empty());
    for chance in children {
        let node = search.tree().get(chance);
        // Event cards do not end the turn.
        if !node.is_chance() {
            continue;
        }
        let action = node.action.unwrap();

        let mut first = root_state.clone();
        rules.apply_action(&mut first, &action);
        let a = search.deterministic_child(chance, &mut first);

        let mut second = root_state.clone();
        rules.apply_action(&mut second, &action);
        let b = search.deterministic_child(chance, &mut second);

        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(search.tree().get(chance).determinization_count(), 1);
    }
}

#[test]
fn test_k_samples_bound_cached_boards() {
    let root_state = last_action_board(6);
    for k in [2, 4] {
        let config = MCTSConfig::fast().with_simulations(3_000).with_determinizations(k);
        let mut search = MCTSSearch::new(PandemicRules::default(), config)
            .with_simulation(HeuristicEvaluation::new(compound_loss_win));
        search.search(&root_state);

        let mut saturated = 0;
        for (_, node) in search.tree().iter() {
            if let NodeKind::Chance { slots } = &node.kind {
                assert!(slots.len() <= k);
                if node.visits as usize > k {
                    assert_eq!(slots.len(), k);
                    saturated += 1;
                }
                for slot in slots {
                    assert!(!PandemicRules::default().is_stochastic(&slot.state));
                    assert!(!slot.outcomes.is_empty());
                }
            }
        }
        assert!(saturated > 0, "K={k}");
    }
}

#[test]
fn test_tree_stats_are_consistent() {
    let root_state = last_action_board(7);
    let config = MCTSConfig::fast().with_simulations(200).with_determinizations(3);
    let mut search = MCTSSearch::new(PandemicRules::default(), config);
    search.search(&root_state);

    let tree_stats = search.tree().stats();
    assert_eq!(tree_stats.node_count, search.tree().len());
    assert_eq!(tree_stats.determinizations as u32, search.stats().determinizations);
    assert!(tree_stats.chance_count > 0);
}
