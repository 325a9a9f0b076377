//! Players, roles and hands.
//!
//! ## PlayerId
//!
//! Seat index in turn order. The first seat is `PlayerId(0)`.
//!
//! ## Role
//!
//! Each role changes a small number of rules: the number of cards needed
//! to cure, and hooks consulted by infection resolution and by the action
//! constructors (quarantine blocking, medic treatment, researcher sharing,
//! operations expert building and flights).
//!
//! ## Hands
//!
//! City cards and event cards are held separately. The hand limit counts
//! both; a hand over the limit must be reduced by a forced discard before
//! anything else happens.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::card::{EventCard, PlayerCard};
use super::error::GameError;
use super::map::{CityId, Color, ATLANTA, N_COLORS};

/// Maximum hand size a player may keep.
pub const HAND_LIMIT: usize = 7;

/// Player seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use pandemic_search::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Player roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    QuarantineSpecialist,
    Medic,
    Scientist,
    Researcher,
    OperationsExpert,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::QuarantineSpecialist,
        Role::Medic,
        Role::Scientist,
        Role::Researcher,
        Role::OperationsExpert,
    ];

    /// Cards of one color needed to cure it.
    #[must_use]
    pub const fn cure_cards_required(self) -> usize {
        match self {
            Role::Scientist => 4,
            _ => 5,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::QuarantineSpecialist => "Quarantine Specialist",
            Role::Medic => "Medic",
            Role::Scientist => "Scientist",
            Role::Researcher => "Researcher",
            Role::OperationsExpert => "Operations Expert",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One seat at the table: role, position and hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    role: Role,
    position: CityId,
    hand: SmallVec<[CityId; 8]>,
    events: SmallVec<[EventCard; 3]>,
    /// Operations Expert's once-per-turn station flight has been used.
    pub used_operations_expert_flight: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, role: Role) -> Self {
        Self {
            id,
            role,
            position: ATLANTA,
            hand: SmallVec::new(),
            events: SmallVec::new(),
            used_operations_expert_flight: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub const fn position(&self) -> CityId {
        self.position
    }

    pub fn set_position(&mut self, city: CityId) {
        self.position = city;
    }

    /// City cards in hand, in the order received.
    #[must_use]
    pub fn hand(&self) -> &[CityId] {
        &self.hand
    }

    #[must_use]
    pub fn events(&self) -> &[EventCard] {
        &self.events
    }

    /// City and event cards together.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len() + self.events.len()
    }

    /// Whether the hand exceeds the limit and must be discarded down.
    #[must_use]
    pub fn hand_full(&self) -> bool {
        self.hand_size() > HAND_LIMIT
    }

    #[must_use]
    pub fn has_city(&self, city: CityId) -> bool {
        self.hand.contains(&city)
    }

    #[must_use]
    pub fn has_event(&self, event: EventCard) -> bool {
        self.events.contains(&event)
    }

    /// Count of city cards per color.
    #[must_use]
    pub fn color_counts(&self) -> [usize; N_COLORS] {
        let mut counts = [0; N_COLORS];
        for city in &self.hand {
            counts[city.color().index()] += 1;
        }
        counts
    }

    /// Whether this player holds enough cards to cure `color`.
    #[must_use]
    pub fn can_cure(&self, color: Color) -> bool {
        self.color_counts()[color.index()] >= self.role.cure_cards_required()
    }

    /// Add a drawn or received card. Epidemics never enter a hand.
    pub fn add_card(&mut self, card: PlayerCard) -> Result<(), GameError> {
        match card {
            PlayerCard::City(city) => self.hand.push(city),
            PlayerCard::Event(event) => self.events.push(event),
            PlayerCard::Epidemic(_) => {
                return Err(GameError::IllegalAction(format!(
                    "{card} cannot be added to {}'s hand",
                    self.id
                )))
            }
        }
        Ok(())
    }

    pub fn remove_city(&mut self, city: CityId) -> Result<(), GameError> {
        let idx = self
            .hand
            .iter()
            .position(|&c| c == city)
            .ok_or(GameError::CardNotHeld { player: self.id, card: city })?;
        self.hand.remove(idx);
        Ok(())
    }

    pub fn remove_event(&mut self, event: EventCard) -> Result<(), GameError> {
        let idx = self
            .events
            .iter()
            .position(|&e| e == event)
            .ok_or(GameError::EventNotHeld { player: self.id, event })?;
        self.events.remove(idx);
        Ok(())
    }

    /// Discard the cards spent on a cure: the most recently received
    /// cards of that color, as many as the role requires.
    pub fn remove_cure_cards(&mut self, color: Color) -> Result<(), GameError> {
        let needed = self.role.cure_cards_required();
        if self.color_counts()[color.index()] < needed {
            return Err(GameError::IllegalAction(format!(
                "{} cannot cure {color} with the cards held",
                self.id
            )));
        }
        let mut removed = 0;
        let mut i = self.hand.len();
        while i > 0 && removed < needed {
            i -= 1;
            if self.hand[i].color() == color {
                self.hand.remove(i);
                removed += 1;
            }
        }
        Ok(())
    }

    /// Drop every card and return to Atlanta.
    pub fn reset(&mut self) {
        self.hand.clear();
        self.events.clear();
        self.position = ATLANTA;
        self.used_operations_expert_flight = false;
    }
}
