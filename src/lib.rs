//! # pandemic-search
//!
//! A cooperative disease-control board game engine with K-sample
//! determinized Monte Carlo Tree Search.
//!
//! ## Design Principles
//!
//! 1. **Copy the board, mutate the copy**: boards are value types. Decks
//!    are persistent vectors, so a copy per simulation is cheap.
//!
//! 2. **Explicit randomness**: one seeded `GameRng` is threaded through
//!    every operation that samples. Boards never own a generator, and the
//!    same seed replays the same game.
//!
//! 3. **Latched failure**: consistency violations never panic. They mark
//!    the board broken with a reason, and a broken board is terminal.
//!
//! ## Architecture
//!
//! - **Closed action set**: player actions, constructors and card draws are
//!   enums matched exhaustively, not trait objects.
//!
//! - **Engine-generic search**: `mcts` only sees the `RulesEngine` trait.
//!   `game::PandemicRules` plugs the board into it.
//!
//! - **K-determinization**: each chance node caches at most K sampled
//!   resolutions of its card draws and replays them on later visits.
//!
//! ## Modules
//!
//! - `core`: Map, cards, roles, RNG, configuration, errors
//! - `decks`: Player deck (epidemic chunks) and infection deck
//! - `board`: Board state, infection and outbreaks, turn stage, sanity checks
//! - `actions`: Player actions, constructors, chance draws, samplers
//! - `game`: Game facade, rollouts, heuristics, rules adapter
//! - `rules`: RulesEngine trait the search is written against
//! - `mcts`: Monte Carlo Tree Search
//! - `agents`: Random and UCT agents, the play loop

pub mod actions;
pub mod agents;
pub mod board;
pub mod core;
pub mod decks;
pub mod game;
pub mod mcts;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    CityId, Color, ConfigError, EventCard, GameConfig, GameError, GameRng, GameRngState, PlayerCard,
    PlayerId, Role,
};

pub use crate::decks::{DeckEnd, InfectDeck, PlayerDeck};

pub use crate::board::{Board, InfectionReport, TurnStage};

pub use crate::actions::{Action, ActionConstructor, ForcedDiscard, StochasticAction};

pub use crate::game::{Game, Heuristic, PandemicRules};

pub use crate::rules::{GameResult, RulesEngine};

pub use crate::mcts::{
    Determinization, HeuristicEvaluation, MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, NodeId, NodeKind,
    RandomRollout, RootChoice, RootPolicy, SearchStats, SelectionPolicy, SimulationPolicy, TreeStats, UCB1,
};

pub use crate::agents::{
    play_game, Agent, ByGroupRandomAgent, Evaluation, ListActionRandomAgent, UctAgent, UniformRandomAgent,
};
