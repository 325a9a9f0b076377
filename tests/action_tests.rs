//! Action layer integration tests over random playouts.

use pandemic_search::actions::{self, Action, ActionConstructor, ForcedDiscard};
use pandemic_search::board::Board;
use pandemic_search::core::{CityId, GameConfig, GameRng, PlayerId, Role, ATLANTA, N_CITIES};
use pandemic_search::game::Game;

/// Every decision point of a uniformly random game, as board snapshots.
fn decision_points(config: GameConfig, limit: usize) -> Vec<Board> {
    let mut game = Game::new(config).unwrap();
    let mut out = Vec::new();
    while out.len() < limit {
        game.nonplayer_actions(false);
        if game.is_terminal(true, false) {
            break;
        }
        out.push(game.board_copy());
        let Some(action) = game.random_action_uniform(false) else {
            break;
        };
        game.apply_action(&action);
    }
    assert!(!game.board().broken(), "{:?}", game.board().broken_reasons());
    out
}

fn configs() -> Vec<GameConfig> {
    vec![
        GameConfig::default(),
        GameConfig::new(vec![Role::Medic, Role::OperationsExpert], 5),
        GameConfig::new(
            vec![Role::Researcher, Role::Scientist, Role::Medic, Role::OperationsExpert],
            6,
        ),
    ]
}

#[test]
fn test_counts_match_enumeration() {
    for (i, config) in configs().into_iter().enumerate() {
        for seed in 0..5 {
            for board in decision_points(config.clone().with_seed(seed), 400) {
                let listed = actions::list_actions(&board);
                assert_eq!(listed.len(), actions::n_available_actions(&board), "config {i} seed {seed}");

                if ForcedDiscard::legal(&board) {
                    assert_eq!(ForcedDiscard::n_actions(&board), ForcedDiscard::all_actions(&board).len());
                    continue;
                }
                let summed: usize = ActionConstructor::ALL.iter().map(|c| c.n_actions(&board)).sum();
                assert_eq!(summed, listed.len());
                for con in ActionConstructor::ALL {
                    assert_eq!(con.n_actions(&board), con.all_actions(&board).len(), "{}", con.name());
                    assert_eq!(con.legal(&board), con.n_actions(&board) > 0, "{}", con.name());
                }
            }
        }
    }
}

#[test]
fn test_sampled_actions_are_listed() {
    let mut rng = GameRng::new(17);
    for board in decision_points(GameConfig::default().with_seed(9), 200) {
        let listed = actions::list_actions(&board);
        for _ in 0..3 {
            let uniform = actions::random_action_uniform(&board, &mut rng).unwrap();
            assert!(listed.contains(&uniform), "{uniform}");
            let grouped = actions::random_action_bygroup(&board, &mut rng).unwrap();
            assert!(listed.contains(&grouped), "{grouped}");
        }
    }
}

#[test]
fn test_listed_actions_execute_cleanly() {
    for board in decision_points(GameConfig::default().with_seed(21), 60) {
        for action in actions::list_actions(&board) {
            let mut copy = board.clone();
            action.execute(&mut copy);
            assert!(!copy.broken(), "{action}: {:?}", copy.broken_reasons());
            assert!(copy.find_violations().is_empty(), "{action}");
        }
    }
}

#[test]
fn test_forced_discard_preempts_everything() {
    let mut seen = false;
    for seed in 0..30 {
        for board in decision_points(GameConfig::default().with_seed(seed), 1_000) {
            if ForcedDiscard::legal(&board) {
                seen = true;
                let listed = actions::list_actions(&board);
                assert!(listed.iter().all(|a| a.kind() == "FORCEDDISCARD" || a.is_event()));
            }
        }
    }
    assert!(seen, "no playout reached the hand limit");
}

fn opening() -> Board {
    let mut game = Game::new(GameConfig::default().with_seed(13)).unwrap();
    game.nonplayer_actions(false);
    game.board_copy()
}

/// Run an action that is not on the legal list: the board must latch
/// `broken` and leave every hand and pawn where it was.
fn assert_rejected(board: &Board, action: Action) {
    let mut copy = board.clone();
    action.execute(&mut copy);
    assert!(copy.broken(), "{action} was accepted");
    assert!(copy.broken_reasons()[0].starts_with(action.kind()), "{:?}", copy.broken_reasons());
    assert_eq!(copy.players(), board.players(), "{action} changed a player");
    assert_eq!(copy.stations(), board.stations(), "{action} changed the stations");
}

#[test]
fn test_unseated_players_are_rejected() {
    let board = opening();
    let active = board.active_player();
    let held = active.hand()[0];
    let other = board.players().iter().find(|p| p.id() != active.id()).unwrap().id();

    for action in [
        Action::Give { to: PlayerId(9), card: held },
        Action::Take { from: PlayerId(3), card: held },
        Action::Airlift { user: PlayerId(7), target: other, to: CityId(5) },
        Action::Airlift { user: other, target: PlayerId(200), to: CityId(5) },
        Action::GovernmentGrant { user: PlayerId(3), city: CityId(20), remove_station: None },
        Action::QuietNight { user: PlayerId(4) },
        Action::ForcedDiscard { player: PlayerId(3), card: held },
    ] {
        assert_rejected(&board, action);
    }
}

#[test]
fn test_off_map_cities_are_rejected() {
    let board = opening();
    let active = board.turn();

    for to in [CityId(N_CITIES as u8), CityId(200)] {
        assert_rejected(&board, Action::Move { to });
        assert_rejected(&board, Action::DirectFlight { to });
        assert_rejected(&board, Action::CharterFlight { to });
        assert_rejected(&board, Action::ShuttleFlight { to });
        assert_rejected(&board, Action::Airlift { user: active, target: active, to });
        assert_rejected(&board, Action::GovernmentGrant { user: active, city: to, remove_station: None });
    }
}

#[test]
fn test_share_needs_both_players_in_one_city() {
    let mut board = opening();
    let active = board.turn();
    let (other, their_card) = board
        .players()
        .iter()
        .find(|p| p.id() != active)
        .map(|p| (p.id(), p.hand()[0]))
        .unwrap();

    Action::Move { to: ATLANTA.neighbors()[0] }.execute(&mut board);
    assert!(!board.broken());

    assert_rejected(&board, Action::Take { from: other, card: their_card });
    let mine = board.active_player().hand()[0];
    assert_rejected(&board, Action::Give { to: other, card: mine });
    assert_rejected(&board, Action::Give { to: active, card: mine });
}

#[test]
fn test_only_the_researcher_shares_other_cities() {
    let mut board = opening();
    let scientist = board.find_role(Role::Scientist).unwrap().id();
    let researcher = board.find_role(Role::Researcher).unwrap().id();

    board.set_turn(scientist).unwrap();
    let card = *board.active_player().hand().iter().find(|&&c| c != ATLANTA).unwrap();
    assert_rejected(&board, Action::Give { to: researcher, card });

    board.set_turn(researcher).unwrap();
    let card = *board.active_player().hand().iter().find(|&&c| c != ATLANTA).unwrap();
    let mut copy = board.clone();
    Action::Give { to: scientist, card }.execute(&mut copy);
    assert!(!copy.broken(), "{:?}", copy.broken_reasons());
    assert!(copy.player(scientist).unwrap().has_city(card));
    assert!(!copy.active_player().has_city(card));
}
