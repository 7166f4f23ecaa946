use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One of the two parties in a head-to-head game (players in Nassau, teams
/// in Bloodsome and Vegas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "p1", alias = "1", alias = "t1")]
    One,
    #[serde(rename = "p2", alias = "2", alias = "t2")]
    Two,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// The side that is behind for a status measured from side one's view.
    pub fn trailing(status: i32) -> Option<Side> {
        match status.signum() {
            1 => Some(Side::Two),
            -1 => Some(Side::One),
            _ => None,
        }
    }
}

/// A two-player team. Names may be empty; defaults are applied when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    #[serde(alias = "pA", alias = "pC")]
    pub first: String,
    #[serde(alias = "pB", alias = "pD")]
    pub second: String,
}

impl Team {
    /// `"first/second"` with fallbacks for blank names.
    pub fn label(&self, first_default: &str, second_default: &str) -> String {
        format!(
            "{}/{}",
            or_default(&self.first, first_default),
            or_default(&self.second, second_default)
        )
    }
}

/// Display name for the player in slot `index` (0-based).
pub fn player_label(names: &[String], index: usize) -> String {
    match names.get(index) {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("Player {}", index + 1),
    }
}

/// Default team labels, as shown on the card: `A/B` versus `C/D`.
pub fn team_labels(teams: &[Team; 2]) -> [String; 2] {
    [teams[0].label("A", "B"), teams[1].label("C", "D")]
}

/// Per-slot rows, written either as an array in slot order or as an object
/// keyed by slot: `p1`..`p4`, `t1`/`t2`, or team letters `pA`..`pD`.
///
/// Missing slots keep their default; unknown keys are dropped.
pub fn slot_rows<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Rows<R> {
        List(Vec<R>),
        Keyed(BTreeMap<String, R>),
    }

    let mut slots: [T; N] = std::array::from_fn(|_| T::default());
    match Option::<Rows<T>>::deserialize(deserializer)? {
        Some(Rows::List(rows)) => {
            for (slot, row) in slots.iter_mut().zip(rows) {
                *slot = row;
            }
        },
        Some(Rows::Keyed(rows)) => {
            for (key, row) in rows {
                match slot_index(&key).filter(|&i| i < N) {
                    Some(i) => slots[i] = row,
                    None => tracing::debug!(key, "dropping row for unknown slot"),
                }
            }
        },
        None => {},
    }
    Ok(slots)
}

/// 0-based slot for keys like `p3`, `t2` or `pC`.
fn slot_index(key: &str) -> Option<usize> {
    let rest = key
        .trim()
        .strip_prefix(|c: char| matches!(c, 'p' | 'P' | 't' | 'T'))?;
    if let Ok(n) = rest.parse::<usize>() {
        return n.checked_sub(1);
    }
    let mut letters = rest.chars();
    match (letters.next(), letters.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(usize::from(c.to_ascii_uppercase() as u8 - b'A'))
        },
        _ => None,
    }
}

fn or_default<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = name.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}
