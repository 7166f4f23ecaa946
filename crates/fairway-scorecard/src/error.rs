use std::fmt;

use fairway_core::game_trait::GameType;

/// Failure of a key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// No backing store (no browser storage, unwritable directory).
    Unavailable(String),
    /// The write would exceed the store's capacity.
    QuotaExceeded { key: String, needed: usize, quota: usize },
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(why) => write!(f, "storage unavailable: {why}"),
            StorageError::QuotaExceeded { key, needed, quota } => {
                write!(f, "storing '{key}' needs {needed} bytes, quota is {quota}")
            },
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// An imported file that cannot become a round. The current round is left alone.
#[derive(Debug)]
pub enum ImportError {
    InvalidFormat(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidFormat(why) => write!(f, "invalid round file: {why}"),
        }
    }
}

impl std::error::Error for ImportError {}

#[derive(Debug)]
pub enum ExportError {
    Serialize(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Serialize(e) => write!(f, "failed to serialize round: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Serialize(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialize(e)
    }
}

/// A config value outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// An edit that does not apply to the active round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The active game has no such input (e.g. a wolf pick in Vegas).
    NotApplicable { game: GameType, input: &'static str },
    HoleOutOfRange(usize),
    PlayerOutOfRange { player: usize, players: usize },
    InvalidScore(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NotApplicable { game, input } => {
                write!(f, "{} has no {input} input", game.title())
            },
            EditError::HoleOutOfRange(hole) => write!(f, "hole {hole} is not between 1 and 18"),
            EditError::PlayerOutOfRange { player, players } => {
                write!(f, "player {player} is not between 1 and {players}")
            },
            EditError::InvalidScore(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for EditError {}
