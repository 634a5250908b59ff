//! City and genre catalogs
//!
//! This module defines the fixed set of cities the app covers and the
//! genre chips shown in the discovery screen. Filter criteria are only
//! accepted when they name a member of these catalogs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing catalog values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The city identifier is not part of the fixed catalog
    #[error("Unknown city: {0}")]
    UnknownCity(String),
}

/// Identifier for a city in the fixed catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CityId {
    /// Podgorica
    Podgorica,
    /// Bar
    Bar,
    /// Nikšić
    Niksic,
    /// Cetinje
    Cetinje,
    /// Berane
    Berane,
    /// Bijelo Polje
    BijeloPolje,
    /// Kolašin
    Kolasin,
}

impl CityId {
    /// All catalog cities, in display order
    pub const ALL: [CityId; 7] = [
        CityId::Podgorica,
        CityId::Bar,
        CityId::Niksic,
        CityId::Cetinje,
        CityId::Berane,
        CityId::BijeloPolje,
        CityId::Kolasin,
    ];

    /// Stable identifier string used in criteria and wire records
    pub fn as_str(&self) -> &'static str {
        match self {
            CityId::Podgorica => "podgorica",
            CityId::Bar => "bar",
            CityId::Niksic => "niksic",
            CityId::Cetinje => "cetinje",
            CityId::Berane => "berane",
            CityId::BijeloPolje => "bijelo-polje",
            CityId::Kolasin => "kolasin",
        }
    }

    /// Display name shown in the city picker
    pub fn display_name(&self) -> &'static str {
        match self {
            CityId::Podgorica => "Podgorica",
            CityId::Bar => "Bar",
            CityId::Niksic => "Nikšić",
            CityId::Cetinje => "Cetinje",
            CityId::Berane => "Berane",
            CityId::BijeloPolje => "Bijelo Polje",
            CityId::Kolasin => "Kolašin",
        }
    }

    /// ASCII spelling of the display name, for matching free-form text
    fn ascii_name(&self) -> &'static str {
        match self {
            CityId::Podgorica => "podgorica",
            CityId::Bar => "bar",
            CityId::Niksic => "niksic",
            CityId::Cetinje => "cetinje",
            CityId::Berane => "berane",
            CityId::BijeloPolje => "bijelo polje",
            CityId::Kolasin => "kolasin",
        }
    }

    /// Derive a city from a free-form location string
    ///
    /// Location strings from the event feed usually end with the city
    /// name ("Stara Varoš, Podgorica"). Matching is case-insensitive and
    /// tolerates both the diacritic and ASCII spellings. Returns `None`
    /// when no catalog city is named.
    pub fn from_location(location: &str) -> Option<CityId> {
        let normalized = location.to_lowercase();
        CityId::ALL.into_iter().find(|city| {
            normalized.contains(city.ascii_name())
                || normalized.contains(&city.display_name().to_lowercase())
        })
    }
}

impl FromStr for CityId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        CityId::ALL
            .into_iter()
            .find(|city| city.as_str() == normalized)
            .ok_or_else(|| CatalogError::UnknownCity(s.to_string()))
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// City filter selection: a specific city or all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CitySelection {
    /// No city restriction ("All Cities")
    #[default]
    All,
    /// Restrict to a single catalog city
    City(CityId),
}

impl CitySelection {
    /// Identifier string ("all" or the city id)
    pub fn as_str(&self) -> &'static str {
        match self {
            CitySelection::All => "all",
            CitySelection::City(city) => city.as_str(),
        }
    }

    /// Check whether this selection admits the given city
    pub fn admits(&self, city: CityId) -> bool {
        match self {
            CitySelection::All => true,
            CitySelection::City(selected) => *selected == city,
        }
    }
}

impl FromStr for CitySelection {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CitySelection::All)
        } else {
            Ok(CitySelection::City(s.parse()?))
        }
    }
}

impl fmt::Display for CitySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A city picker entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    /// Catalog identifier
    pub id: CityId,
    /// Display name
    pub name: &'static str,
    /// Emoji shown next to the name
    pub emoji: &'static str,
}

/// City picker entries, in display order
pub const CITIES: [City; 7] = [
    City { id: CityId::Podgorica, name: "Podgorica", emoji: "🏛️" },
    City { id: CityId::Bar, name: "Bar", emoji: "🏖️" },
    City { id: CityId::Niksic, name: "Nikšić", emoji: "🏔️" },
    City { id: CityId::Cetinje, name: "Cetinje", emoji: "👑" },
    City { id: CityId::Berane, name: "Berane", emoji: "🌲" },
    City { id: CityId::BijeloPolje, name: "Bijelo Polje", emoji: "🌊" },
    City { id: CityId::Kolasin, name: "Kolašin", emoji: "⛷️" },
];

/// Genre chips shown in the discovery screen ("All" is the cleared state)
pub const GENRES: [&str; 6] = [
    "Live Music",
    "DJ Set",
    "Festival",
    "Club Night",
    "Concert",
    "Party",
];
