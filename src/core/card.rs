//! Player-deck card identities.
//!
//! Card indices follow one numbering: 0-47 are city cards, 48-50 the
//! three event cards, and 51 onward the epidemics in draw order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::map::{CityId, N_CITIES};

/// Index of the first epidemic card.
pub const FIRST_EPIDEMIC_INDEX: usize = 51;

/// Event cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventCard {
    QuietNight,
    GovernmentGrant,
    Airlift,
}

impl EventCard {
    pub const ALL: [EventCard; 3] = [EventCard::QuietNight, EventCard::GovernmentGrant, EventCard::Airlift];

    #[must_use]
    pub const fn index(self) -> usize {
        N_CITIES + self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventCard::QuietNight => "Quiet Night",
            EventCard::GovernmentGrant => "Government Grant",
            EventCard::Airlift => "Airlift",
        }
    }
}

/// A card that can be drawn from the player deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerCard {
    City(CityId),
    Event(EventCard),
    /// The n-th epidemic (0-based) to be drawn this game.
    Epidemic(u8),
}

impl PlayerCard {
    /// The global card index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerCard::City(city) => city.index(),
            PlayerCard::Event(event) => event.index(),
            PlayerCard::Epidemic(n) => FIRST_EPIDEMIC_INDEX + n as usize,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        if index < N_CITIES {
            PlayerCard::City(CityId(index as u8))
        } else if index < FIRST_EPIDEMIC_INDEX {
            PlayerCard::Event(EventCard::ALL[index - N_CITIES])
        } else {
            PlayerCard::Epidemic((index - FIRST_EPIDEMIC_INDEX) as u8)
        }
    }

    #[must_use]
    pub const fn is_epidemic(self) -> bool {
        matches!(self, PlayerCard::Epidemic(_))
    }

    /// Population used for first-player determination; events and
    /// epidemics have none.
    #[must_use]
    pub fn population(self) -> Option<u32> {
        match self {
            PlayerCard::City(city) => Some(city.population()),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCard::City(city) => write!(f, "{city}"),
            PlayerCard::Event(event) => f.write_str(event.name()),
            PlayerCard::Epidemic(n) => write!(f, "Epidemic {}", n + 1),
        }
    }
}
