//! The board: authoritative mutable game state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stage::{infection_rate, TurnStage};
use crate::core::card::PlayerCard;
use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::core::map::{CityId, Color, ATLANTA, N_CITIES, N_COLORS};
use crate::core::player::{Player, PlayerId, Role};
use crate::core::rng::GameRng;
use crate::decks::{DeckEnd, InfectDeck, PlayerDeck};
use crate::rules::GameResult;

/// Maximum research stations on the map.
pub const MAX_STATIONS: usize = 6;

/// Outbreaks beyond this count lose the game.
pub const MAX_OUTBREAKS: u8 = 7;

/// More than this many cubes of one color on the map loses the game.
pub const MAX_CUBES_PER_COLOR: u8 = 24;

/// Cubes a single city can hold of one color.
pub const MAX_CUBES_PER_CITY: u8 = 3;

/// Full game state.
///
/// Cloning is the primitive the search relies on: every simulation works on
/// its own copy. Decks share structure with the original until they draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) players: Vec<Player>,
    pub(crate) player_deck: PlayerDeck,
    pub(crate) infect_deck: InfectDeck,
    /// Cube counts per city, indexed by color.
    pub(crate) cubes: Vec<[u8; N_COLORS]>,
    /// Cubes on the map per color.
    pub(crate) cube_totals: [u8; N_COLORS],
    pub(crate) stations: SmallVec<[CityId; MAX_STATIONS]>,
    pub(crate) turn: PlayerId,
    pub(crate) stage: TurnStage,
    pub(crate) outbreak_count: u8,
    pub(crate) cured: [bool; N_COLORS],
    pub(crate) eradicated: [bool; N_COLORS],
    pub(crate) quiet_night: bool,
    pub(crate) is_setup: bool,
    pub(crate) won: bool,
    pub(crate) lost: bool,
    pub(crate) broken: bool,
    pub(crate) lost_reasons: Vec<String>,
    pub(crate) broken_reasons: Vec<String>,
}

impl Board {
    /// A board for the given seats, not yet set up.
    #[must_use]
    pub fn new(roles: &[Role], difficulty: u8) -> Self {
        Self {
            players: roles
                .iter()
                .zip(PlayerId::all(roles.len()))
                .map(|(&role, id)| Player::new(id, role))
                .collect(),
            player_deck: PlayerDeck::new(difficulty),
            infect_deck: InfectDeck::new(),
            cubes: vec![[0; N_COLORS]; N_CITIES],
            cube_totals: [0; N_COLORS],
            stations: SmallVec::new(),
            turn: PlayerId(0),
            stage: TurnStage::default(),
            outbreak_count: 0,
            cured: [false; N_COLORS],
            eradicated: [false; N_COLORS],
            quiet_night: false,
            is_setup: false,
            won: false,
            lost: false,
            broken: false,
            lost_reasons: Vec::new(),
            broken_reasons: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(&config.roles, config.difficulty)
    }

    /// Deal hands, pick the first player, place epidemics, infect the
    /// first nine cities and build the Atlanta station.
    ///
    /// Calling it a second time without [`clear`](Self::clear) breaks the
    /// board.
    pub fn setup(&mut self, rng: &mut GameRng) -> Result<(), GameError> {
        if self.is_setup {
            self.mark_broken(GameError::AlreadySetUp.to_string());
            return Err(GameError::AlreadySetUp);
        }

        let per_player = match self.players.len() {
            2 => 4,
            3 => 3,
            _ => 2,
        };
        let mut first: Option<(u32, usize)> = None;
        for (seat, player) in self.players.iter_mut().enumerate() {
            for _ in 0..per_player {
                let card = self.player_deck.deal(rng).ok_or(GameError::EmptyDeck("player"))?;
                if let Some(pop) = card.population() {
                    if first.map_or(true, |(best, _)| pop > best) {
                        first = Some((pop, seat));
                    }
                }
                player.add_card(card)?;
            }
        }
        self.player_deck.setup_shuffle();
        self.turn = PlayerId(first.map_or(0, |(_, seat)| seat as u8));

        for amount in 1..=3 {
            for _ in 0..3 {
                let city = self.infect_deck.draw(DeckEnd::Top, rng)?;
                self.infect(city, city.color(), amount);
            }
        }

        self.stations.clear();
        self.stations.push(ATLANTA);
        self.outbreak_count = 0;
        self.stage = TurnStage::default();
        self.quiet_night = false;
        self.is_setup = true;

        log::debug!(
            "board set up: {} players, difficulty {}, {} goes first",
            self.players.len(),
            self.player_deck.difficulty(),
            self.turn
        );
        Ok(())
    }

    /// Reset to the freshly constructed state, keeping seats and difficulty.
    /// This is the only way to clear `broken`.
    pub fn clear(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.player_deck = PlayerDeck::new(self.player_deck.difficulty());
        self.infect_deck = InfectDeck::new();
        for cell in &mut self.cubes {
            *cell = [0; N_COLORS];
        }
        self.cube_totals = [0; N_COLORS];
        self.stations.clear();
        self.turn = PlayerId(0);
        self.stage = TurnStage::default();
        self.outbreak_count = 0;
        self.cured = [false; N_COLORS];
        self.eradicated = [false; N_COLORS];
        self.quiet_night = false;
        self.is_setup = false;
        self.won = false;
        self.lost = false;
        self.broken = false;
        self.lost_reasons.clear();
        self.broken_reasons.clear();
    }

    // =========================================================================
    // Players and turn
    // =========================================================================

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player in seat `id`. Seats past the player count are an
    /// illegal reference, not a panic.
    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id.index()).ok_or_else(|| no_seat(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players.get_mut(id.index()).ok_or_else(|| no_seat(id))
    }

    #[must_use]
    pub const fn turn(&self) -> PlayerId {
        self.turn
    }

    pub fn set_turn(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.player(player)?;
        self.turn = player;
        Ok(())
    }

    // `turn` only ever holds a seated player: `set_turn` checks it and
    // `end_turn` wraps around the player count.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        &self.players[self.turn.index()]
    }

    pub fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.turn.index()]
    }

    /// The seat holding `role`, if it is in the game.
    #[must_use]
    pub fn find_role(&self, role: Role) -> Option<&Player> {
        self.players.iter().find(|p| p.role() == role)
    }

    /// Players other than the active one standing in the active city.
    pub fn colocated_players(&self) -> impl Iterator<Item = &Player> {
        let active = self.active_player();
        self.players
            .iter()
            .filter(move |p| p.id() != active.id() && p.position() == active.position())
    }

    /// The first player whose hand is over the limit.
    #[must_use]
    pub fn over_limit_player(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.hand_full()).map(Player::id)
    }

    #[must_use]
    pub const fn stage(&self) -> TurnStage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: TurnStage) {
        self.stage = stage;
    }

    /// Advance past one player action.
    pub(crate) fn advance_player_action(&mut self) {
        self.stage = self.stage.after_player_action();
    }

    /// Hand the turn to the next seat.
    pub(crate) fn end_turn(&mut self) {
        self.stage = TurnStage::default();
        self.turn = PlayerId(((self.turn.index() + 1) % self.players.len()) as u8);
        for player in &mut self.players {
            player.used_operations_expert_flight = false;
        }
    }

    // =========================================================================
    // Cubes, stations, cures
    // =========================================================================

    #[must_use]
    pub fn cubes(&self, city: CityId, color: Color) -> u8 {
        self.cubes[city.index()][color.index()]
    }

    /// Cubes of `color` on the whole map.
    #[must_use]
    pub fn total_cubes(&self, color: Color) -> u8 {
        self.cube_totals[color.index()]
    }

    /// Set a city's cube count directly, keeping the color total in step.
    pub fn set_cubes(&mut self, city: CityId, color: Color, count: u8) {
        let count = count.min(MAX_CUBES_PER_CITY);
        let cell = &mut self.cubes[city.index()][color.index()];
        let total = &mut self.cube_totals[color.index()];
        *total = total.saturating_sub(*cell).saturating_add(count);
        *cell = count;
    }

    /// Colors with at least one cube in `city`.
    pub fn colors_present(&self, city: CityId) -> impl Iterator<Item = Color> + '_ {
        Color::ALL.into_iter().filter(move |&c| self.cubes(city, c) > 0)
    }

    #[must_use]
    pub fn stations(&self) -> &[CityId] {
        &self.stations
    }

    #[must_use]
    pub fn has_station(&self, city: CityId) -> bool {
        self.stations.contains(&city)
    }

    /// Build a station, first removing `replace` if the map is full.
    pub fn add_station(&mut self, city: CityId, replace: Option<CityId>) -> Result<(), GameError> {
        if self.has_station(city) {
            return Err(GameError::IllegalAction(format!("{city} already has a research station")));
        }
        if let Some(old) = replace {
            let idx = self
                .stations
                .iter()
                .position(|&s| s == old)
                .ok_or_else(|| GameError::IllegalAction(format!("{old} has no research station to remove")))?;
            self.stations.remove(idx);
        }
        if self.stations.len() >= MAX_STATIONS {
            return Err(GameError::IllegalAction("all research stations are in use".into()));
        }
        self.stations.push(city);
        Ok(())
    }

    #[must_use]
    pub fn is_cured(&self, color: Color) -> bool {
        self.cured[color.index()]
    }

    #[must_use]
    pub fn cured_count(&self) -> usize {
        self.cured.iter().filter(|&&c| c).count()
    }

    #[must_use]
    pub fn is_eradicated(&self, color: Color) -> bool {
        self.eradicated[color.index()]
    }

    /// Mark `color` cured, and eradicated if none of it is on the map.
    pub fn cure(&mut self, color: Color) {
        self.cured[color.index()] = true;
        self.check_eradicated(color);
    }

    pub(crate) fn check_eradicated(&mut self, color: Color) {
        if self.is_cured(color) && self.total_cubes(color) == 0 {
            self.eradicated[color.index()] = true;
        }
    }

    // =========================================================================
    // Counters and decks
    // =========================================================================

    #[must_use]
    pub const fn outbreak_count(&self) -> u8 {
        self.outbreak_count
    }

    pub fn set_outbreak_count(&mut self, count: u8) {
        self.outbreak_count = count;
    }

    #[must_use]
    pub fn epidemics_drawn(&self) -> u8 {
        self.player_deck.epidemics_drawn()
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.player_deck.difficulty()
    }

    /// Infection cards to draw this turn.
    #[must_use]
    pub fn infection_rate(&self) -> u8 {
        infection_rate(self.epidemics_drawn())
    }

    #[must_use]
    pub const fn player_deck(&self) -> &PlayerDeck {
        &self.player_deck
    }

    #[must_use]
    pub const fn infect_deck(&self) -> &InfectDeck {
        &self.infect_deck
    }

    /// Commit a player-deck draw sampled earlier.
    pub(crate) fn update_player_deck(&mut self, card: PlayerCard) -> Result<(), GameError> {
        self.player_deck.update(card)
    }

    /// Commit an infection-deck draw sampled earlier.
    pub(crate) fn update_infect_deck(&mut self, card: CityId, end: DeckEnd) -> Result<(), GameError> {
        self.infect_deck.update(card, end)
    }

    pub(crate) fn readd_infect_discard(&mut self) {
        self.infect_deck.readd_discard();
    }

    #[must_use]
    pub const fn quiet_night(&self) -> bool {
        self.quiet_night
    }

    pub(crate) fn set_quiet_night(&mut self, active: bool) {
        self.quiet_night = active;
    }

    #[must_use]
    pub const fn is_setup(&self) -> bool {
        self.is_setup
    }

    // =========================================================================
    // Status
    // =========================================================================

    #[must_use]
    pub const fn won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub const fn lost(&self) -> bool {
        self.lost
    }

    #[must_use]
    pub const fn broken(&self) -> bool {
        self.broken
    }

    #[must_use]
    pub fn lost_reasons(&self) -> &[String] {
        &self.lost_reasons
    }

    #[must_use]
    pub fn broken_reasons(&self) -> &[String] {
        &self.broken_reasons
    }

    /// Every reason the game is over, losses first.
    #[must_use]
    pub fn terminal_reasons(&self) -> Vec<String> {
        let mut reasons = self.lost_reasons.clone();
        reasons.extend(self.broken_reasons.iter().cloned());
        if self.won {
            reasons.insert(0, "all four diseases cured".to_string());
        }
        reasons
    }

    /// Latch the broken flag. Only [`clear`](Self::clear) resets it.
    pub fn mark_broken(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("board broken: {reason}");
        self.broken = true;
        if !self.broken_reasons.contains(&reason) {
            self.broken_reasons.push(reason);
        }
    }

    pub(crate) fn mark_lost(&mut self, reason: &str) {
        if !self.lost {
            log::debug!("game lost: {reason}");
        }
        self.lost = true;
        if !self.lost_reasons.iter().any(|r| r == reason) {
            self.lost_reasons.push(reason.to_string());
        }
    }

    /// Apply passive effects and evaluate win and loss conditions.
    pub fn update_status(&mut self) {
        if let Some(pos) = self.find_role(Role::Medic).map(Player::position) {
            for color in Color::ALL {
                if self.is_cured(color) && self.cubes(pos, color) > 0 {
                    self.set_cubes(pos, color, 0);
                }
            }
        }
        for color in Color::ALL {
            self.check_eradicated(color);
        }

        if self.cured.iter().all(|&c| c) {
            self.won = true;
        }
        if self.won {
            return;
        }
        if self.player_deck.is_empty() {
            self.mark_lost("the player deck is empty");
        }
        if self.outbreak_count > MAX_OUTBREAKS {
            self.mark_lost("more than 7 outbreaks");
        }
        if self.cube_totals.iter().any(|&t| t > MAX_CUBES_PER_COLOR) {
            self.mark_lost("more than 24 cubes of one color on the map");
        }
    }

    /// Refresh status and report whether the game is over.
    pub fn is_terminal(&mut self) -> bool {
        self.update_status();
        self.won || self.lost || self.broken
    }

    /// Terminal flags without refreshing status.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.won || self.lost || self.broken
    }

    /// How the game ended, if it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameResult> {
        if self.won {
            Some(GameResult::Won)
        } else if self.lost {
            Some(GameResult::Lost)
        } else if self.broken {
            Some(GameResult::Broken)
        } else {
            None
        }
    }
}

fn no_seat(id: PlayerId) -> GameError {
    GameError::IllegalAction(format!("{id} is not seated"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_player() -> Board {
        Board::new(&[Role::QuarantineSpecialist, Role::Scientist, Role::Researcher], 4)
    }

    #[test]
    fn test_setup_deals_and_infects() {
        let mut rng = GameRng::new(42);
        let mut board = three_player();
        board.setup(&mut rng).unwrap();

        for p in board.players() {
            assert_eq!(p.hand_size(), 3);
            assert_eq!(p.position(), ATLANTA);
        }
        // 9 cities infected with 1 + 2 + 3 cubes each wave
        let total: u32 = Color::ALL.iter().map(|&c| u32::from(board.total_cubes(c))).sum();
        assert_eq!(total, 18);
        assert_eq!(board.infect_deck().discard().len(), 9);
        assert_eq!(board.stations(), &[ATLANTA]);
        assert_eq!(board.player_deck().remaining_cards(), 51 - 9 + 4);
        assert_eq!(board.stage(), TurnStage::PlayerAction(0));
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_first_player_has_highest_population() {
        let mut rng = GameRng::new(7);
        let mut board = three_player();
        board.setup(&mut rng).unwrap();

        let best = |p: &Player| p.hand().iter().map(|c| c.population()).max().unwrap_or(0);
        let first = best(board.active_player());
        assert!(board.players().iter().all(|p| best(p) <= first));
    }

    #[test]
    fn test_setup_twice_breaks() {
        let mut rng = GameRng::new(1);
        let mut board = three_player();
        board.setup(&mut rng).unwrap();
        assert_eq!(board.setup(&mut rng), Err(GameError::AlreadySetUp));
        assert!(board.broken());
        assert!(board.broken_reasons()[0].contains("setup()"));
        assert!(board.is_terminal());

        board.clear();
        assert!(!board.broken());
        board.setup(&mut rng).unwrap();
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_stations() {
        let mut board = three_player();
        for c in [3, 10, 20, 30, 40, 45] {
            board.add_station(CityId(c), None).unwrap();
        }
        assert!(board.add_station(CityId(3), None).is_err());
        assert!(board.add_station(CityId(1), None).is_err());
        board.add_station(CityId(1), Some(CityId(45))).unwrap();
        assert!(board.has_station(CityId(1)));
        assert!(!board.has_station(CityId(45)));
        assert_eq!(board.stations().len(), MAX_STATIONS);
    }

    #[test]
    fn test_medic_clears_cured_color() {
        let mut board = Board::new(&[Role::Medic, Role::Scientist], 4);
        board.set_cubes(ATLANTA, Color::Blue, 2);
        board.set_cubes(ATLANTA, Color::Red, 1);
        board.update_status();
        assert_eq!(board.cubes(ATLANTA, Color::Blue), 2);

        board.cure(Color::Blue);
        assert!(!board.is_eradicated(Color::Blue));
        board.update_status();
        assert_eq!(board.cubes(ATLANTA, Color::Blue), 0);
        assert_eq!(board.cubes(ATLANTA, Color::Red), 1);
        assert!(board.is_eradicated(Color::Blue));
    }

    #[test]
    fn test_win_and_loss_conditions() {
        let mut rng = GameRng::new(3);
        let mut board = three_player();
        board.setup(&mut rng).unwrap();

        board.set_outbreak_count(8);
        assert!(board.is_terminal());
        assert_eq!(board.outcome(), Some(GameResult::Lost));
        assert!(board.lost_reasons()[0].contains("outbreaks"));

        let mut board = three_player();
        board.setup(&mut rng).unwrap();
        for color in Color::ALL {
            board.cure(color);
        }
        assert!(board.is_terminal());
        assert_eq!(board.outcome(), Some(GameResult::Won));
    }
}
