use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::settlement::Settlement;

/// Tag identifying one of the supported side games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Nassau,
    Skins,
    Wolf,
    Bingo,
    Bloodsome,
    Stableford,
    Banker,
    Vegas,
}

impl GameType {
    pub const ALL: [GameType; 8] = [
        GameType::Nassau,
        GameType::Skins,
        GameType::Wolf,
        GameType::Bingo,
        GameType::Bloodsome,
        GameType::Stableford,
        GameType::Banker,
        GameType::Vegas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Nassau => "nassau",
            GameType::Skins => "skins",
            GameType::Wolf => "wolf",
            GameType::Bingo => "bingo",
            GameType::Bloodsome => "bloodsome",
            GameType::Stableford => "stableford",
            GameType::Banker => "banker",
            GameType::Vegas => "vegas",
        }
    }

    /// Capitalized name used in result headings.
    pub fn title(self) -> &'static str {
        match self {
            GameType::Nassau => "Nassau",
            GameType::Skins => "Skins",
            GameType::Wolf => "Wolf",
            GameType::Bingo => "Bingo",
            GameType::Bloodsome => "Bloodsome",
            GameType::Stableford => "Stableford",
            GameType::Banker => "Banker",
            GameType::Vegas => "Vegas",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a game name that matches no supported game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGame(pub String);

impl fmt::Display for UnknownGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game type '{}'", self.0)
    }
}

impl std::error::Error for UnknownGame {}

impl FromStr for GameType {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        GameType::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

/// Catalog entry describing a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
}

/// Derived result of a game; every result carries a settlement.
pub trait GameOutcome {
    fn settlement(&self) -> &Settlement;
}

/// Core trait every side-game engine implements.
///
/// Engines are pure: the same round always produces the same outcome, and a
/// partially entered round never panics. Raw input is normalized when the
/// round is deserialized, so `compute` only ever sees typed values.
pub trait ScoringGame {
    /// Configuration plus per-hole input for one round of this game.
    type Round: Default + Clone + Serialize + DeserializeOwned;
    /// Everything derived from a round.
    type Outcome: GameOutcome + Clone + PartialEq + fmt::Debug + Serialize;

    fn game_type(&self) -> GameType;

    fn metadata(&self) -> GameMetadata;

    fn compute(&self, round: &Self::Round) -> Self::Outcome;
}
