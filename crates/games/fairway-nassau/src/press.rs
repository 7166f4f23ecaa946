use std::fmt;

use serde::{Deserialize, Serialize};

use fairway_core::hole::{HOLES, NINE};
use fairway_core::match_play::MatchTrack;
use fairway_core::player::Side;

/// How presses are opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressRule {
    /// The trailing player asks for a press.
    #[default]
    #[serde(rename = "manual")]
    Manual,
    /// A press opens automatically whenever a player falls two down.
    #[serde(rename = "auto-2down")]
    Auto2Down,
}

impl std::str::FromStr for PressRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "manual" => Ok(PressRule::Manual),
            "auto-2down" | "auto" => Ok(PressRule::Auto2Down),
            other => Err(format!("unknown press rule '{other}'")),
        }
    }
}

/// A side bet that starts mid-match and runs to the last played hole.
///
/// Immutable once created; resolved at compute time against the latest status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Press {
    /// 1-based hole the press starts on.
    #[serde(alias = "hole")]
    pub hole_started: u8,
    #[serde(alias = "player")]
    pub bettor_side: Side,
    /// Match status at the start hole, from side one's view.
    #[serde(alias = "initialMatchStatus")]
    pub status_at_start: i32,
    #[serde(default)]
    pub auto: bool,
}

impl Press {
    pub fn is_front(&self) -> bool {
        usize::from(self.hole_started) <= NINE
    }

    fn start_index(&self) -> Option<usize> {
        let hole = usize::from(self.hole_started);
        (1..=HOLES).contains(&hole).then(|| hole - 1)
    }
}

/// A press measured against the current match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressResult {
    pub press: Press,
    /// 1-based last hole counted, `None` while no hole after the start is scored.
    pub end_hole: Option<u8>,
    /// Change in status since the press started; `None` while pending.
    pub final_status: Option<i32>,
}

impl PressResult {
    pub fn resolve(press: Press, track: &MatchTrack) -> Self {
        let end = press
            .start_index()
            .and_then(|start| track.last_complete_hole_from(start + 1));
        let final_status = end.map(|hole| track.match_status[hole - 1] - press.status_at_start);
        Self {
            press,
            end_hole: end.and_then(|h| u8::try_from(h).ok()),
            final_status,
        }
    }

    /// Wager won by side one on this press (negative when side two wins).
    pub fn value(&self, wager: f64) -> f64 {
        match self.final_status.map(i32::signum) {
            Some(1) => wager,
            Some(-1) => -wager,
            _ => 0.0,
        }
    }
}

/// New automatic presses for every transition from one to two down that does
/// not already have a press starting on that hole.
pub fn auto_presses(track: &MatchTrack, existing: &[Press]) -> Vec<Press> {
    let mut created: Vec<Press> = Vec::new();
    for i in 1..HOLES {
        if !track.has_result(i) {
            continue;
        }
        let prev = track.match_status[i - 1];
        let current = track.match_status[i];
        let went_two_down = (prev == 1 && current == 2) || (prev == -1 && current == -2);
        if !went_two_down {
            continue;
        }
        let Some(trailing) = Side::trailing(current) else {
            continue;
        };
        let hole = (i + 1) as u8;
        let taken = existing
            .iter()
            .chain(created.iter())
            .any(|p| p.hole_started == hole);
        if taken {
            continue;
        }
        tracing::info!(hole, side = ?trailing, "auto press opened");
        created.push(Press {
            hole_started: hole,
            bettor_side: trailing,
            status_at_start: current,
            auto: true,
        });
    }
    created
}

/// Which sides may ask for a manual press right now: the rule must be manual,
/// at least one hole must be decided, and only the side currently behind may
/// press.
pub fn press_eligibility(track: &MatchTrack, rule: PressRule) -> [bool; 2] {
    if rule != PressRule::Manual {
        return [false; 2];
    }
    let Some(hole) = track.current_hole() else {
        return [false; 2];
    };
    match Side::trailing(track.match_status[hole - 1]) {
        Some(side) => {
            let mut eligible = [false; 2];
            eligible[side.index()] = true;
            eligible
        },
        None => [false; 2],
    }
}

/// Why a manual press was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressRejected {
    /// No hole has scores for both players yet.
    NoScoresYet,
    /// The active round is not a Nassau.
    NotNassau,
}

impl PressRejected {
    pub fn reason(&self) -> &'static str {
        match self {
            PressRejected::NoScoresYet => "no-scores-yet",
            PressRejected::NotNassau => "not-nassau",
        }
    }
}

impl fmt::Display for PressRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressRejected::NoScoresYet => {
                write!(f, "please enter scores before adding a press")
            },
            PressRejected::NotNassau => write!(f, "presses are only available in Nassau"),
        }
    }
}

impl std::error::Error for PressRejected {}

/// Open a manual press at the current hole for `side`.
pub fn manual_press(track: &MatchTrack, side: Side) -> Result<Press, PressRejected> {
    let hole = track.current_hole().ok_or(PressRejected::NoScoresYet)?;
    Ok(Press {
        hole_started: hole as u8,
        bettor_side: side,
        status_at_start: track.match_status[hole - 1],
        auto: false,
    })
}
