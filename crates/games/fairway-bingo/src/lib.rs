use serde::{Deserialize, Serialize};

use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Totals};
use fairway_core::player::{player_label, slot_rows};
use fairway_core::settlement::{Balance, NO_POINTS, Settlement};

pub const PLAYERS: usize = 4;
pub const DEFAULT_POINT_VALUE: f64 = 0.5;

/// The three points available on every hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// First on the green.
    Bingo,
    /// Closest to the pin once everyone is on.
    Bango,
    /// First in the hole.
    Bongo,
}

impl Mark {
    pub const ALL: [Mark; 3] = [Mark::Bingo, Mark::Bango, Mark::Bongo];
}

impl std::str::FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bingo" | "bi" => Ok(Mark::Bingo),
            "bango" | "ba" => Ok(Mark::Bango),
            "bongo" | "bo" => Ok(Mark::Bongo),
            other => Err(format!("unknown mark '{other}'")),
        }
    }
}

/// One player's marks across the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerMarks {
    #[serde(alias = "bi")]
    pub bingo: PerHole<bool>,
    #[serde(alias = "ba")]
    pub bango: PerHole<bool>,
    #[serde(alias = "bo")]
    pub bongo: PerHole<bool>,
}

impl PlayerMarks {
    pub fn row(&self, mark: Mark) -> &PerHole<bool> {
        match mark {
            Mark::Bingo => &self.bingo,
            Mark::Bango => &self.bango,
            Mark::Bongo => &self.bongo,
        }
    }

    pub fn row_mut(&mut self, mark: Mark) -> &mut PerHole<bool> {
        match mark {
            Mark::Bingo => &mut self.bingo,
            Mark::Bango => &mut self.bango,
            Mark::Bongo => &mut self.bongo,
        }
    }

    /// Marks held on a 0-based hole.
    pub fn count(&self, index: usize) -> i32 {
        Mark::ALL
            .iter()
            .filter(|&&m| self.row(m).get(index))
            .count() as i32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BingoRound {
    pub players: Vec<String>,
    pub point_value: f64,
    #[serde(deserialize_with = "slot_rows")]
    pub marks: [PlayerMarks; PLAYERS],
}

impl Default for BingoRound {
    fn default() -> Self {
        Self {
            players: vec![String::new(); PLAYERS],
            point_value: DEFAULT_POINT_VALUE,
            marks: [PlayerMarks::default(); PLAYERS],
        }
    }
}

impl BingoRound {
    /// Give `mark` on a 0-based hole to `player`, taking it from anyone else.
    pub fn award(&mut self, index: usize, mark: Mark, player: usize) {
        if index >= HOLES || player >= PLAYERS {
            tracing::warn!(hole = index + 1, player = player + 1, "mark out of range ignored");
            return;
        }
        for (p, marks) in self.marks.iter_mut().enumerate() {
            marks.row_mut(mark).set(index, p == player);
        }
    }

    /// Take `mark` on a 0-based hole away from whoever holds it.
    pub fn clear(&mut self, index: usize, mark: Mark) {
        if index >= HOLES {
            return;
        }
        for marks in self.marks.iter_mut() {
            marks.row_mut(mark).set(index, false);
        }
    }

    /// Holder of a mark on a hole.
    pub fn holder(&self, index: usize, mark: Mark) -> Option<usize> {
        (0..PLAYERS).find(|&p| self.marks[p].row(mark).get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BingoResult {
    pub points: Vec<[i32; PLAYERS]>,
    pub point_totals: [Totals; PLAYERS],
    pub average: f64,
    pub winnings: [f64; PLAYERS],
    pub settlement: Settlement,
}

impl GameOutcome for BingoResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Bingo-Bango-Bongo: one point per mark, settled against the field average.
pub struct Bingo;

impl ScoringGame for Bingo {
    type Round = BingoRound;
    type Outcome = BingoResult;

    fn game_type(&self) -> GameType {
        GameType::Bingo
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Bingo Bango Bongo".to_string(),
            description: "Points for first on, closest once on, and first in".to_string(),
            min_players: 2,
            max_players: 4,
        }
    }

    fn compute(&self, round: &BingoRound) -> BingoResult {
        let mut point_totals = [Totals::default(); PLAYERS];
        let points: Vec<[i32; PLAYERS]> = (0..HOLES)
            .map(|i| {
                let hole: [i32; PLAYERS] = std::array::from_fn(|p| round.marks[p].count(i));
                for (totals, value) in point_totals.iter_mut().zip(hole) {
                    totals.add(i, value);
                }
                hole
            })
            .collect();

        let sum: i32 = point_totals.iter().map(|t| t.total).sum();
        let average = f64::from(sum) / PLAYERS as f64;
        let winnings: [f64; PLAYERS] = std::array::from_fn(|p| {
            (f64::from(point_totals[p].total) - average) * round.point_value
        });
        let balances = winnings
            .iter()
            .enumerate()
            .map(|(p, &amount)| Balance {
                party: player_label(&round.players, p),
                amount,
            })
            .collect();

        tracing::debug!(average, "bingo recomputed");

        BingoResult {
            points,
            point_totals,
            average,
            winnings,
            settlement: Settlement::collect_and_pay(balances, NO_POINTS),
        }
    }
}
