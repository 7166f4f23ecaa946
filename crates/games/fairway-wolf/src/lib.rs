pub mod choice;

use serde::{Deserialize, Serialize};

use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Score, SegmentTotals, Totals};
use fairway_core::player::{player_label, slot_rows};
use fairway_core::settlement::{Balance, NO_POINTS, Settlement};

pub use choice::{PLAYERS, WolfChoice};

pub const DEFAULT_POINT_VALUE: f64 = 1.0;
pub const DEFAULT_LONE_MULTIPLIER: i32 = 3;

/// Points the lone wolf gives up when beaten, one to each opponent.
const LONE_LOSS: i32 = -3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WolfRound {
    pub players: Vec<String>,
    pub point_value: f64,
    /// Points the lone wolf earns for winning a hole.
    pub lone_multiplier: i32,
    pub selections: PerHole<WolfChoice>,
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; PLAYERS],
}

impl Default for WolfRound {
    fn default() -> Self {
        Self {
            players: vec![String::new(); PLAYERS],
            point_value: DEFAULT_POINT_VALUE,
            lone_multiplier: DEFAULT_LONE_MULTIPLIER,
            selections: PerHole::default(),
            scores: [PerHole::default(); PLAYERS],
        }
    }
}

/// The wolf on a 0-based hole index. Rotates through the four slots.
pub fn wolf_for_hole(index: usize) -> usize {
    index % PLAYERS
}

/// Points for each player on one hole, or `None` when the hole is not scored
/// (no choice, missing scores, or a partner that is the wolf or no player).
pub fn score_hole(
    index: usize,
    choice: WolfChoice,
    scores: [Score; PLAYERS],
    lone_multiplier: i32,
) -> Option<[i32; PLAYERS]> {
    if choice == WolfChoice::None {
        return None;
    }
    let mut strokes = [0u8; PLAYERS];
    for (slot, score) in strokes.iter_mut().zip(scores) {
        *slot = score?;
    }
    let lowest = strokes.iter().copied().min()?;
    let wolf = wolf_for_hole(index);

    let points = match choice {
        WolfChoice::None => return None,
        WolfChoice::Alone => {
            let won = strokes[wolf] == lowest;
            let (wolf_points, others) = if won {
                (lone_multiplier, -1)
            } else {
                (LONE_LOSS, 1)
            };
            std::array::from_fn(|p| if p == wolf { wolf_points } else { others })
        },
        WolfChoice::Partner(partner) if partner >= PLAYERS => {
            tracing::warn!(
                hole = index + 1,
                partner = partner.saturating_add(1),
                "partner slot out of range, hole skipped"
            );
            return None;
        },
        WolfChoice::Partner(partner) if partner == wolf => {
            tracing::warn!(hole = index + 1, wolf = wolf + 1, "wolf chose themselves as partner, hole skipped");
            return None;
        },
        WolfChoice::Partner(partner) => {
            let team_best = strokes[wolf].min(strokes[partner]);
            let sign = if team_best == lowest { 1 } else { -1 };
            std::array::from_fn(|p| {
                if p == wolf {
                    2 * sign
                } else if p == partner {
                    sign
                } else {
                    -sign
                }
            })
        },
    };
    Some(points)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WolfResult {
    /// Wolf slot for every hole.
    pub wolves: Vec<usize>,
    /// Points per hole per player; all zero for unscored holes.
    pub points: Vec<[i32; PLAYERS]>,
    pub point_totals: [Totals; PLAYERS],
    pub score_totals: [SegmentTotals; PLAYERS],
    pub winnings: [f64; PLAYERS],
    pub settlement: Settlement,
}

impl GameOutcome for WolfResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Wolf: a rotating captain picks a partner or goes it alone on each hole.
pub struct Wolf;

impl ScoringGame for Wolf {
    type Round = WolfRound;
    type Outcome = WolfResult;

    fn game_type(&self) -> GameType {
        GameType::Wolf
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Wolf".to_string(),
            description: "Rotating wolf picks a partner after the tee shots or plays alone"
                .to_string(),
            min_players: 4,
            max_players: 4,
        }
    }

    fn compute(&self, round: &WolfRound) -> WolfResult {
        let mut points = Vec::with_capacity(HOLES);
        let mut point_totals = [Totals::default(); PLAYERS];

        for i in 0..HOLES {
            let scores = std::array::from_fn(|p| round.scores[p].get(i));
            let hole = score_hole(i, round.selections.get(i), scores, round.lone_multiplier)
                .unwrap_or([0; PLAYERS]);
            for (totals, value) in point_totals.iter_mut().zip(hole) {
                totals.add(i, value);
            }
            points.push(hole);
        }

        let winnings: [f64; PLAYERS] =
            std::array::from_fn(|p| f64::from(point_totals[p].total) * round.point_value);
        let balances = winnings
            .iter()
            .enumerate()
            .map(|(p, &amount)| Balance {
                party: player_label(&round.players, p),
                amount,
            })
            .collect();

        tracing::debug!(?winnings, "wolf recomputed");

        WolfResult {
            wolves: (0..HOLES).map(wolf_for_hole).collect(),
            points,
            point_totals,
            score_totals: std::array::from_fn(|p| round.scores[p].segment_totals()),
            winnings,
            settlement: Settlement::collect_and_pay(balances, NO_POINTS),
        }
    }
}
