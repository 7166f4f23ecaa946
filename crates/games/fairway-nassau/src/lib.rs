pub mod press;

use serde::{Deserialize, Serialize};

use fairway_core::format::{StatusClass, classify_status, format_match_status};
use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Score, SegmentTotals, Totals};
use fairway_core::match_play::MatchTrack;
use fairway_core::player::{Side, player_label, slot_rows};
use fairway_core::settlement::Settlement;

pub use press::{
    Press, PressRejected, PressResult, PressRule, auto_presses, manual_press, press_eligibility,
};

pub const DEFAULT_WAGER: f64 = 5.0;
pub const DEFAULT_PAR: u8 = 4;

/// Configuration and hole-by-hole input for a two-player Nassau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NassauRound {
    pub players: Vec<String>,
    /// Stake for each of front, back, overall and every press.
    pub wager: f64,
    pub press_rule: PressRule,
    pub par: PerHole<Score>,
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; 2],
    pub presses: Vec<Press>,
}

impl Default for NassauRound {
    fn default() -> Self {
        Self {
            players: vec![String::new(); 2],
            wager: DEFAULT_WAGER,
            press_rule: PressRule::Manual,
            par: PerHole::filled(Some(DEFAULT_PAR)),
            scores: [PerHole::default(); 2],
            presses: Vec::new(),
        }
    }
}

impl NassauRound {
    pub fn names(&self) -> [String; 2] {
        [player_label(&self.players, 0), player_label(&self.players, 1)]
    }

    pub fn track(&self) -> MatchTrack {
        MatchTrack::from_scores(&self.scores[0], &self.scores[1])
    }

    /// Open a manual press for `side` at the current hole and keep it.
    pub fn request_press(&mut self, side: Side) -> Result<Press, PressRejected> {
        let press = manual_press(&self.track(), side)?;
        tracing::info!(
            hole = press.hole_started,
            side = ?side,
            status = press.status_at_start,
            "manual press added"
        );
        self.presses.push(press);
        Ok(press)
    }
}

/// One row of the Nassau card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NassauHole {
    /// `HALVE` or `<winner> +N`; `None` until both scores are in.
    pub result_text: Option<String>,
    pub status_text: Option<String>,
    pub status_class: Option<StatusClass>,
    /// A press starts on this hole.
    pub has_press: bool,
}

/// One of the three Nassau bets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NassauBet {
    pub status: i32,
    pub status_text: String,
    /// The same status read mid-round, e.g. `"P1 9 & 0"` for a closed-out nine.
    pub in_play_text: String,
    pub status_class: StatusClass,
    /// Amount side one wins on this bet (negative when side two wins).
    pub value: f64,
}

impl NassauBet {
    fn new(status: i32, wager: f64, names: &[String; 2]) -> Self {
        Self {
            status,
            status_text: format_match_status(status, 0, true, &names[0], &names[1]),
            in_play_text: format_match_status(status, 0, false, &names[0], &names[1]),
            status_class: classify_status(status),
            value: wager * f64::from(status.signum()),
        }
    }
}

/// Presses started on each nine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PressCounts {
    pub front: usize,
    pub back: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NassauResult {
    pub track: MatchTrack,
    pub holes: Vec<NassauHole>,
    pub par_totals: Totals,
    pub score_totals: [SegmentTotals; 2],
    pub front: NassauBet,
    pub back: NassauBet,
    pub overall: NassauBet,
    pub press_results: Vec<PressResult>,
    pub press_counts: PressCounts,
    pub presses_value: f64,
    /// Net amount owed to side one.
    pub total_value: f64,
    /// Presses opened automatically by this computation; the round store
    /// appends them to the round.
    pub auto_presses: Vec<Press>,
    /// Whether each side may request a manual press now.
    pub can_press: [bool; 2],
    pub settlement: Settlement,
}

impl GameOutcome for NassauResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Nassau: three match-play bets (front, back, overall) plus presses.
pub struct Nassau;

impl ScoringGame for Nassau {
    type Round = NassauRound;
    type Outcome = NassauResult;

    fn game_type(&self) -> GameType {
        GameType::Nassau
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Nassau".to_string(),
            description: "Match play on the front nine, back nine and full eighteen, with presses"
                .to_string(),
            min_players: 2,
            max_players: 2,
        }
    }

    fn compute(&self, round: &NassauRound) -> NassauResult {
        let names = round.names();
        let track = round.track();

        let new_presses = match round.press_rule {
            PressRule::Auto2Down => auto_presses(&track, &round.presses),
            PressRule::Manual => Vec::new(),
        };
        let all_presses: Vec<Press> = round
            .presses
            .iter()
            .chain(new_presses.iter())
            .copied()
            .collect();

        let holes = (0..HOLES)
            .map(|i| hole_line(i, &track, &all_presses, &names))
            .collect();

        let press_results: Vec<PressResult> = all_presses
            .iter()
            .map(|&p| PressResult::resolve(p, &track))
            .filter(|r| r.final_status.is_some())
            .collect();
        let presses_value: f64 = press_results.iter().map(|r| r.value(round.wager)).sum();

        let front = NassauBet::new(track.front(), round.wager, &names);
        let back = NassauBet::new(track.back(), round.wager, &names);
        let overall = NassauBet::new(track.overall(), round.wager, &names);
        let total_value = front.value + back.value + overall.value + presses_value;

        let front_presses = all_presses.iter().filter(|p| p.is_front()).count();
        let press_counts = PressCounts {
            front: front_presses,
            back: all_presses.len() - front_presses,
            total: all_presses.len(),
        };

        tracing::debug!(
            status = track.overall(),
            presses = all_presses.len(),
            total_value,
            "nassau recomputed"
        );

        NassauResult {
            holes,
            par_totals: round.par.recorded_totals(),
            score_totals: [
                round.scores[0].segment_totals(),
                round.scores[1].segment_totals(),
            ],
            front,
            back,
            overall,
            press_results,
            press_counts,
            presses_value,
            total_value,
            auto_presses: new_presses,
            can_press: press_eligibility(&track, round.press_rule),
            settlement: Settlement::head_to_head(&names[0], &names[1], total_value),
            track,
        }
    }
}

fn hole_line(index: usize, track: &MatchTrack, presses: &[Press], names: &[String; 2]) -> NassauHole {
    let has_press = presses
        .iter()
        .any(|p| usize::from(p.hole_started) == index + 1);
    let Some(diff) = track.hole_results[index] else {
        return NassauHole {
            result_text: None,
            status_text: None,
            status_class: None,
            has_press,
        };
    };

    let result_text = match diff.signum() {
        0 => "HALVE".to_string(),
        -1 => format!("{} +{}", names[0], diff.abs()),
        _ => format!("{} +{}", names[1], diff.abs()),
    };
    let status = track.match_status[index];
    let remaining = MatchTrack::remaining_after(index);
    NassauHole {
        result_text: Some(result_text),
        status_text: Some(format_match_status(
            status,
            remaining,
            remaining == 0,
            &names[0],
            &names[1],
        )),
        status_class: Some(classify_status(status)),
        has_press,
    }
}
