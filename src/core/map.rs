//! Static world map: cities, disease colors, populations and adjacency.
//!
//! The map is read-only and shared by every board. Cities are numbered
//! 0-47 in blocks of twelve per color, which lets a city's color be
//! recovered from its index alone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cities on the map.
pub const N_CITIES: usize = 48;

/// Number of disease colors.
pub const N_COLORS: usize = 4;

/// The starting city and starting research station.
pub const ATLANTA: CityId = CityId(3);

/// Disease color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Yellow,
    Black,
    Red,
}

impl Color {
    /// All colors in index order.
    pub const ALL: [Color; N_COLORS] = [Color::Blue, Color::Yellow, Color::Black, Color::Red];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Blue => "BLUE",
            Color::Yellow => "YELLOW",
            Color::Black => "BLACK",
            Color::Red => "RED",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a city on the map (0-47).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(pub u8);

impl CityId {
    /// Create a city id, rejecting indices off the map.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < N_CITIES).then(|| Self(index as u8))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every city on the map.
    pub fn all() -> impl Iterator<Item = CityId> {
        (0..N_CITIES as u8).map(CityId)
    }

    #[must_use]
    pub fn city(self) -> &'static City {
        &CITIES[self.index()]
    }

    #[must_use]
    pub fn color(self) -> Color {
        self.city().color
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.city().name
    }

    #[must_use]
    pub fn population(self) -> u32 {
        self.city().population
    }

    #[must_use]
    pub fn neighbors(self) -> &'static [CityId] {
        self.city().neighbors
    }

    /// Whether `other` is in this city's adjacency list.
    #[must_use]
    pub fn is_adjacent(self, other: CityId) -> bool {
        self.neighbors().contains(&other)
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CITIES.get(self.index()) {
            Some(city) => f.write_str(city.name),
            None => write!(f, "City({})", self.0),
        }
    }
}

/// Static city data.
#[derive(Debug)]
pub struct City {
    pub id: CityId,
    pub name: &'static str,
    pub population: u32,
    pub color: Color,
    pub neighbors: &'static [CityId],
}

macro_rules! city {
    ($id:expr, $pop:expr, $color:ident, $name:expr, [$($n:expr),*]) => {
        City {
            id: CityId($id),
            name: $name,
            population: $pop,
            color: Color::$color,
            neighbors: &[$(CityId($n)),*],
        }
    };
}

/// The full map, indexed by `CityId`.
pub static CITIES: [City; N_CITIES] = [
    city!(0, 5_864_000, Blue, "San Francisco", [1, 12, 47, 38]),
    city!(1, 9_121_000, Blue, "Chicago", [0, 2, 3, 12, 13]),
    city!(2, 3_429_000, Blue, "Montreal", [1, 4, 5]),
    city!(3, 4_715_000, Blue, "Atlanta", [1, 4, 14]),
    city!(4, 4_679_000, Blue, "Washington", [2, 3, 5, 14]),
    city!(5, 20_464_000, Blue, "New York", [2, 4, 6, 7]),
    city!(6, 8_568_000, Blue, "London", [5, 7, 8, 10]),
    city!(7, 5_427_000, Blue, "Madrid", [5, 6, 8, 18, 24]),
    city!(8, 10_755_000, Blue, "Paris", [6, 7, 9, 10, 24]),
    city!(9, 5_232_000, Blue, "Milan", [8, 10, 25]),
    city!(10, 575_000, Blue, "Essen", [6, 8, 9, 11]),
    city!(11, 4_879_000, Blue, "St. Petersburg", [10, 25, 26]),
    city!(12, 14_900_000, Yellow, "Los Angeles", [0, 1, 13, 36]),
    city!(13, 19_463_000, Yellow, "Mexico City", [1, 12, 14, 15, 16]),
    city!(14, 5_582_000, Yellow, "Miami", [3, 4, 13, 15]),
    city!(15, 8_702_000, Yellow, "Bogota", [13, 14, 16, 18, 19]),
    city!(16, 9_121_000, Yellow, "Lima", [13, 15, 17]),
    city!(17, 6_015_000, Yellow, "Santiago", [16]),
    city!(18, 20_186_000, Yellow, "Sao Paulo", [15, 19, 7, 20]),
    city!(19, 13_639_000, Yellow, "Buenos Aires", [15, 18]),
    city!(20, 11_547_000, Yellow, "Lagos", [18, 21, 22]),
    city!(21, 9_046_000, Yellow, "Kinshasa", [20, 22, 23]),
    city!(22, 4_887_000, Yellow, "Khartoum", [20, 21, 23, 27]),
    city!(23, 3_888_000, Yellow, "Johannesburg", [21, 22]),
    city!(24, 2_946_000, Black, "Algiers", [7, 8, 25, 27]),
    city!(25, 13_576_000, Black, "Istanbul", [9, 11, 24, 26, 27, 28]),
    city!(26, 15_512_000, Black, "Moscow", [11, 25, 29]),
    city!(27, 14_718_000, Black, "Cairo", [24, 25, 28, 30, 22]),
    city!(28, 6_204_000, Black, "Baghdad", [25, 27, 29, 30, 31]),
    city!(29, 7_419_000, Black, "Tehran", [26, 28, 31, 32]),
    city!(30, 5_037_000, Black, "Riyadh", [27, 28, 31]),
    city!(31, 20_711_000, Black, "Karachi", [28, 29, 30, 32, 33]),
    city!(32, 22_242_000, Black, "Delhi", [29, 31, 33, 34, 35]),
    city!(33, 16_910_000, Black, "Mumbai", [31, 32, 35]),
    city!(34, 14_374_000, Black, "Kolkata", [32, 35, 40, 41]),
    city!(35, 8_865_000, Black, "Chennai", [32, 33, 34, 40, 37]),
    city!(36, 3_785_000, Red, "Sydney", [37, 38, 12]),
    city!(37, 26_063_000, Red, "Jakarta", [35, 40, 39, 36]),
    city!(38, 20_767_000, Red, "Manila", [39, 41, 42, 36, 0]),
    city!(39, 8_314_000, Red, "Ho Chi Minh City", [37, 40, 41, 38]),
    city!(40, 7_151_000, Red, "Bangkok", [34, 35, 37, 39, 41]),
    city!(41, 7_106_000, Red, "Hong Kong", [34, 38, 39, 40, 42, 43]),
    city!(42, 8_338_000, Red, "Taipei", [38, 41, 43, 44]),
    city!(43, 13_482_000, Red, "Shanghai", [45, 46, 47, 41, 42]),
    city!(44, 2_871_000, Red, "Osaka", [42, 47]),
    city!(45, 17_311_000, Red, "Beijing", [43, 46]),
    city!(46, 22_547_000, Red, "Seoul", [45, 43, 47]),
    city!(47, 13_189_000, Red, "Tokyo", [46, 43, 44, 0]),
];
