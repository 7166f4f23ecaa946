use serde::{Deserialize, Serialize, Serializer};

use fairway_core::format::{StatusClass, classify_status, format_match_status};
use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, HoleValue, PerHole, RawEntry, Score, SegmentTotals, Totals};
use fairway_core::match_play::MatchTrack;
use fairway_core::player::{Team, slot_rows, team_labels};
use fairway_core::settlement::Settlement;

pub const DEFAULT_WAGER: f64 = 10.0;
pub const DEFAULT_PAR: u8 = 4;

/// Which teammate's drive the team played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Drive {
    /// Not chosen; the hole's default applies.
    #[default]
    Unset,
    First,
    Second,
}

impl Drive {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "first" | "1" | "pa" | "pc" => Drive::First,
            "second" | "2" | "pb" | "pd" => Drive::Second,
            _ => Drive::Unset,
        }
    }

    /// Odd holes default to the first teammate, even holes to the second.
    pub fn default_for(index: usize) -> Drive {
        if index % 2 == 0 {
            Drive::First
        } else {
            Drive::Second
        }
    }

    pub fn resolve(self, index: usize) -> Drive {
        match self {
            Drive::Unset => Drive::default_for(index),
            chosen => chosen,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Drive::Unset => "",
            Drive::First => "first",
            Drive::Second => "second",
        }
    }
}

impl HoleValue for Drive {
    fn from_raw(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Text(text) => Drive::parse(&text),
            RawEntry::Number(n) if n == 1.0 => Drive::First,
            RawEntry::Number(n) if n == 2.0 => Drive::Second,
            _ => Drive::Unset,
        }
    }
}

impl Serialize for Drive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BloodsomeRound {
    #[serde(deserialize_with = "slot_rows")]
    pub teams: [Team; 2],
    pub wager: f64,
    pub par: PerHole<Score>,
    /// Team score per hole.
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; 2],
    #[serde(deserialize_with = "slot_rows")]
    pub drives: [PerHole<Drive>; 2],
}

impl Default for BloodsomeRound {
    fn default() -> Self {
        Self {
            teams: [Team::default(), Team::default()],
            wager: DEFAULT_WAGER,
            par: PerHole::filled(Some(DEFAULT_PAR)),
            scores: [PerHole::default(); 2],
            drives: [PerHole::default(); 2],
        }
    }
}

/// Drives used by each teammate, split by nine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriveCounts {
    pub first: Totals,
    pub second: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodsomeSegment {
    pub status: i32,
    pub status_text: String,
    pub status_class: StatusClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodsomeResult {
    pub track: MatchTrack,
    /// Status text after each decided hole.
    pub hole_status: Vec<Option<String>>,
    /// Drive actually credited on each hole, per team.
    pub drives: [Vec<Drive>; 2],
    pub drive_counts: [DriveCounts; 2],
    pub par_totals: Totals,
    pub score_totals: [SegmentTotals; 2],
    pub front: BloodsomeSegment,
    pub back: BloodsomeSegment,
    pub overall: BloodsomeSegment,
    pub settlement: Settlement,
}

impl GameOutcome for BloodsomeResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Bloodsome: two-player teams in an alternate-shot match where the opponents
/// pick which drive each team must play.
pub struct Bloodsome;

impl ScoringGame for Bloodsome {
    type Round = BloodsomeRound;
    type Outcome = BloodsomeResult;

    fn game_type(&self) -> GameType {
        GameType::Bloodsome
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Bloodsome".to_string(),
            description: "Alternate-shot team match where opponents choose your drive"
                .to_string(),
            min_players: 4,
            max_players: 4,
        }
    }

    fn compute(&self, round: &BloodsomeRound) -> BloodsomeResult {
        let names = team_labels(&round.teams);
        let track = MatchTrack::from_scores(&round.scores[0], &round.scores[1]);

        let hole_status = (0..HOLES)
            .map(|i| {
                track.has_result(i).then(|| {
                    let remaining = MatchTrack::remaining_after(i);
                    format_match_status(
                        track.match_status[i],
                        remaining,
                        remaining == 0,
                        &names[0],
                        &names[1],
                    )
                })
            })
            .collect();

        let drives: [Vec<Drive>; 2] = std::array::from_fn(|t| {
            (0..HOLES)
                .map(|i| round.drives[t].get(i).resolve(i))
                .collect()
        });
        let drive_counts: [DriveCounts; 2] = std::array::from_fn(|t| {
            let mut counts = DriveCounts::default();
            for i in 0..HOLES {
                if round.scores[t].get(i).is_none() {
                    continue;
                }
                match drives[t][i] {
                    Drive::Second => counts.second.add(i, 1),
                    _ => counts.first.add(i, 1),
                }
            }
            counts
        });

        let segment = |status: i32| BloodsomeSegment {
            status,
            status_text: format_match_status(status, 0, true, &names[0], &names[1]),
            status_class: classify_status(status),
        };
        let amount = round.wager * f64::from(track.overall().signum());

        tracing::debug!(status = track.overall(), amount, "bloodsome recomputed");

        BloodsomeResult {
            hole_status,
            drives,
            drive_counts,
            par_totals: round.par.recorded_totals(),
            score_totals: [
                round.scores[0].segment_totals(),
                round.scores[1].segment_totals(),
            ],
            front: segment(track.front()),
            back: segment(track.back()),
            overall: segment(track.overall()),
            settlement: Settlement::head_to_head(&names[0], &names[1], amount),
            track,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairway_core::hole::scores_from;
    use fairway_core::test_helpers::{
        contract_blank_round_is_square, contract_compute_is_deterministic,
        contract_metadata_is_complete, contract_partial_rounds_are_safe,
        contract_round_survives_json, contract_settlement_is_zero_sum,
    };

    fn round(t1: &[u8], t2: &[u8]) -> BloodsomeRound {
        BloodsomeRound {
            scores: [scores_from(t1), scores_from(t2)],
            ..BloodsomeRound::default()
        }
    }

    #[test]
    fn drives_default_by_hole_parity() {
        assert_eq!(Drive::Unset.resolve(0), Drive::First);
        assert_eq!(Drive::Unset.resolve(1), Drive::Second);
        assert_eq!(Drive::Second.resolve(0), Drive::Second);
        assert_eq!(Drive::parse("pC"), Drive::First);
        assert_eq!(Drive::parse("pB"), Drive::Second);
    }

    #[test]
    fn leading_team_collects_the_wager() {
        let result = Bloodsome.compute(&round(&[4, 4, 5], &[5, 4, 5]));
        assert_eq!(result.overall.status_text, "A/B 1");
        assert_eq!(result.settlement.summary, "C/D owes A/B $10.00");
        assert_eq!(result.hole_status[0].as_deref(), Some("A/B 1 UP"));
        assert_eq!(result.hole_status[3], None);
    }

    #[test]
    fn all_square_match() {
        let result = Bloodsome.compute(&round(&[4, 5], &[5, 4]));
        assert_eq!(result.overall.status_text, "TIED");
        assert_eq!(
            result.settlement.summary,
            "All square - no money changes hands"
        );
    }

    #[test]
    fn team_names_appear_in_text() {
        let mut r = round(&[6], &[4]);
        r.teams[1] = Team {
            first: "Cy".into(),
            second: "Di".into(),
        };
        let result = Bloodsome.compute(&r);
        assert_eq!(result.settlement.summary, "A/B owes Cy/Di $10.00");
    }

    #[test]
    fn drive_counts_follow_played_holes() {
        let mut r = round(&[4, 4, 4, 4], &[4, 4]);
        r.drives[0].set(1, Drive::First);
        let result = Bloodsome.compute(&r);
        assert_eq!(result.drive_counts[0].first.front, 3);
        assert_eq!(result.drive_counts[0].second.front, 1);
        assert_eq!(result.drive_counts[1].first.total, 1);
        assert_eq!(result.drive_counts[1].second.total, 1);
    }

    #[test]
    fn legacy_drive_codes_deserialize() {
        let json = r#"{"drives": [["pA", "pA"], ["pD", ""]]}"#;
        let r: BloodsomeRound = serde_json::from_str(json).unwrap();
        assert_eq!(r.drives[0].get(1), Drive::First);
        assert_eq!(r.drives[1].get(0), Drive::Second);
        assert_eq!(r.drives[1].get(1), Drive::Unset);
    }

    #[test]
    fn contracts() {
        let r = round(&[4, 5, 4, 3, 5, 4], &[5, 5, 4, 4, 4, 4]);
        contract_metadata_is_complete(&Bloodsome);
        contract_compute_is_deterministic(&Bloodsome, &r);
        contract_blank_round_is_square(&Bloodsome);
        contract_round_survives_json(&Bloodsome, &r);
        contract_settlement_is_zero_sum(&Bloodsome.compute(&r));
        contract_partial_rounds_are_safe(&Bloodsome, &r, |r, holes| {
            let mut partial = r.clone();
            for row in partial.scores.iter_mut() {
                for i in holes..HOLES {
                    row.set(i, None);
                }
            }
            partial
        });
    }
}
