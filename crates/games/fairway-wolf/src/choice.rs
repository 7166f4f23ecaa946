use serde::{Serialize, Serializer};

use fairway_core::hole::{HoleValue, RawEntry};

pub const PLAYERS: usize = 4;

/// The wolf's decision on a hole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WolfChoice {
    /// Nothing recorded yet.
    #[default]
    None,
    /// The wolf plays one against three.
    Alone,
    /// The wolf picks the player in this 0-based slot as partner.
    Partner(usize),
}

impl WolfChoice {
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_ascii_lowercase();
        if text == "alone" {
            return WolfChoice::Alone;
        }
        match text.strip_prefix('p').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if (1..=PLAYERS).contains(&n) => WolfChoice::Partner(n - 1),
            _ => WolfChoice::None,
        }
    }

    pub fn as_code(&self) -> String {
        match self {
            WolfChoice::None => String::new(),
            WolfChoice::Alone => "alone".to_string(),
            WolfChoice::Partner(i) => format!("p{}", i + 1),
        }
    }
}

impl HoleValue for WolfChoice {
    fn from_raw(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Text(text) => WolfChoice::parse(&text),
            _ => WolfChoice::None,
        }
    }
}

impl Serialize for WolfChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_code())
    }
}
