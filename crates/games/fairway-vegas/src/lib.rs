use serde::{Deserialize, Serialize};

use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Score, SegmentTotals, Totals};
use fairway_core::player::{Team, slot_rows};
use fairway_core::settlement::Settlement;

pub const PLAYERS: usize = 4;
pub const DEFAULT_POINT_VALUE: f64 = 1.0;
pub const TIED: &str = "Match is tied - no settlement required";

/// Scores for players A and B make team one; C and D make team two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VegasRound {
    #[serde(deserialize_with = "slot_rows")]
    pub teams: [Team; 2],
    pub point_value: f64,
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; PLAYERS],
}

impl Default for VegasRound {
    fn default() -> Self {
        Self {
            teams: [Team::default(), Team::default()],
            point_value: DEFAULT_POINT_VALUE,
            scores: [PerHole::default(); PLAYERS],
        }
    }
}

impl VegasRound {
    pub fn team_names(&self) -> [String; 2] {
        [
            format!("Team 1 ({})", self.teams[0].label("A", "B")),
            format!("Team 2 ({})", self.teams[1].label("C", "D")),
        ]
    }
}

/// Two scores read low digit first: 3 and 7 make 37 either way round.
pub fn team_number(a: Score, b: Score) -> Option<i32> {
    let (a, b) = (i32::from(a?), i32::from(b?));
    Some(a.min(b) * 10 + a.max(b))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VegasResult {
    pub team_numbers: [Vec<Option<i32>>; 2],
    /// Team two's number minus team one's; positive favors team one.
    pub diffs: Vec<Option<i32>>,
    pub diff_totals: Totals,
    pub score_totals: [SegmentTotals; PLAYERS],
    pub amount: f64,
    pub settlement: Settlement,
}

impl GameOutcome for VegasResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Vegas: each team's two scores combine into a two-digit number.
pub struct Vegas;

impl ScoringGame for Vegas {
    type Round = VegasRound;
    type Outcome = VegasResult;

    fn game_type(&self) -> GameType {
        GameType::Vegas
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Vegas".to_string(),
            description: "Team scores paired into two-digit numbers, low number wins the difference"
                .to_string(),
            min_players: 4,
            max_players: 4,
        }
    }

    fn compute(&self, round: &VegasRound) -> VegasResult {
        let team_numbers: [Vec<Option<i32>>; 2] = std::array::from_fn(|t| {
            (0..HOLES)
                .map(|i| team_number(round.scores[2 * t].get(i), round.scores[2 * t + 1].get(i)))
                .collect()
        });

        let mut diff_totals = Totals::default();
        let diffs: Vec<Option<i32>> = (0..HOLES)
            .map(|i| {
                let diff = Some(team_numbers[1][i]? - team_numbers[0][i]?);
                if let Some(d) = diff {
                    diff_totals.add(i, d);
                }
                diff
            })
            .collect();

        let amount = f64::from(diff_totals.total) * round.point_value;
        let names = round.team_names();
        let mut settlement = Settlement::head_to_head(&names[0], &names[1], amount);
        if diff_totals.total == 0 {
            settlement.summary = TIED.to_string();
        }

        tracing::debug!(total = diff_totals.total, amount, "vegas recomputed");

        VegasResult {
            team_numbers,
            diffs,
            diff_totals,
            score_totals: std::array::from_fn(|p| round.scores[p].segment_totals()),
            amount: amount.abs(),
            settlement,
        }
    }
}
