use serde::{Deserialize, Serialize};

use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Score, SegmentTotals, Totals};
use fairway_core::player::{player_label, slot_rows};
use fairway_core::settlement::{Balance, NO_POINTS, Settlement};
use fairway_core::stableford::{PointSystem, stableford_points};

pub const PLAYERS: usize = 4;
pub const DEFAULT_POINT_VALUE: f64 = 1.0;
pub const DEFAULT_PAR: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StablefordRound {
    pub players: Vec<String>,
    #[serde(alias = "pointSystem")]
    pub system: PointSystem,
    pub point_value: f64,
    pub par: PerHole<Score>,
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; PLAYERS],
}

impl Default for StablefordRound {
    fn default() -> Self {
        Self {
            players: vec![String::new(); PLAYERS],
            system: PointSystem::Standard,
            point_value: DEFAULT_POINT_VALUE,
            par: PerHole::filled(Some(DEFAULT_PAR)),
            scores: [PerHole::default(); PLAYERS],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StablefordResult {
    /// Points per hole per player; `None` where score or par is missing.
    pub points: Vec<[Option<i32>; PLAYERS]>,
    pub point_totals: [Totals; PLAYERS],
    pub score_totals: [SegmentTotals; PLAYERS],
    pub par_totals: Totals,
    /// Players with at least one recorded score.
    pub active: Vec<usize>,
    pub winnings: [f64; PLAYERS],
    pub settlement: Settlement,
}

impl GameOutcome for StablefordResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Each active player settles against every other active player on the
/// difference in total points.
pub fn pairwise_winnings(totals: &[i32; PLAYERS], active: &[usize], point_value: f64) -> [f64; PLAYERS] {
    std::array::from_fn(|p| {
        if !active.contains(&p) {
            return 0.0;
        }
        active
            .iter()
            .filter(|&&o| o != p)
            .map(|&o| f64::from(totals[p] - totals[o]) * point_value)
            .sum()
    })
}

/// Stableford: points against par, highest total wins.
pub struct Stableford;

impl ScoringGame for Stableford {
    type Round = StablefordRound;
    type Outcome = StablefordResult;

    fn game_type(&self) -> GameType {
        GameType::Stableford
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Stableford".to_string(),
            description: "Points for each hole relative to par, standard or modified table"
                .to_string(),
            min_players: 2,
            max_players: 4,
        }
    }

    fn compute(&self, round: &StablefordRound) -> StablefordResult {
        let mut point_totals = [Totals::default(); PLAYERS];
        let points: Vec<[Option<i32>; PLAYERS]> = (0..HOLES)
            .map(|i| {
                let hole: [Option<i32>; PLAYERS] = std::array::from_fn(|p| {
                    stableford_points(round.scores[p].get(i), round.par.get(i), round.system)
                });
                for (totals, value) in point_totals.iter_mut().zip(hole) {
                    totals.add(i, value.unwrap_or(0));
                }
                hole
            })
            .collect();

        let active: Vec<usize> = (0..PLAYERS)
            .filter(|&p| round.scores[p].recorded() > 0)
            .collect();
        let totals = point_totals.map(|t| t.total);
        let winnings = pairwise_winnings(&totals, &active, round.point_value);
        let balances = active
            .iter()
            .map(|&p| Balance {
                party: player_label(&round.players, p),
                amount: winnings[p],
            })
            .collect();

        tracing::debug!(system = round.system.as_str(), ?totals, "stableford recomputed");

        StablefordResult {
            points,
            point_totals,
            score_totals: std::array::from_fn(|p| round.scores[p].segment_totals()),
            par_totals: round.par.recorded_totals(),
            active,
            winnings,
            settlement: Settlement::collect_and_pay(balances, NO_POINTS),
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
        contract_round_survives_json, contract_settlement_is_zero_sum, make_names,
    };

    fn sample_round() -> StablefordRound {
        StablefordRound {
            players: make_names(4),
            scores: [
                scores_from(&[4, 3, 5]),
                scores_from(&[5, 5, 5]),
                scores_from(&[3, 4, 6]),
                PerHole::default(),
            ],
            ..StablefordRound::default()
        }
    }

    #[test]
    fn standard_points_and_totals() {
        let result = Stableford.compute(&sample_round());
        assert_eq!(result.points[0], [Some(2), Some(1), Some(3), None]);
        assert_eq!(result.point_totals[0].total, 6);
        assert_eq!(result.point_totals[1].total, 3);
        assert_eq!(result.point_totals[2].total, 5);
        assert_eq!(result.active, vec![0, 1, 2]);
    }

    #[test]
    fn pairwise_settlement_among_active_players() {
        let result = Stableford.compute(&sample_round());
        // Ann: (6-3) + (6-5) = 4; Bo: (3-6) + (3-5) = -5; Cy: (5-6) + (5-3) = 1.
        assert_eq!(result.winnings, [4.0, -5.0, 1.0, 0.0]);
        assert_eq!(
            result.settlement.summary,
            "Ann collects $4.00, Bo pays $5.00, Cy collects $1.00"
        );
        contract_settlement_is_zero_sum(&result);
    }

    #[test]
    fn modified_system_can_go_negative() {
        let mut round = sample_round();
        round.system = PointSystem::Modified;
        round.scores[1] = scores_from(&[8]);
        let result = Stableford.compute(&round);
        assert_eq!(result.points[0][1], Some(-2));
    }

    #[test]
    fn missing_par_scores_nothing() {
        let mut round = sample_round();
        round.par.set(0, None);
        let result = Stableford.compute(&round);
        assert_eq!(result.points[0], [None; PLAYERS]);
        assert_eq!(result.par_totals.front, 32);
    }

    #[test]
    fn legacy_system_names_deserialize() {
        let round: StablefordRound =
            serde_json::from_str(r#"{"pointSystem": "stableford-modified"}"#).unwrap();
        assert_eq!(round.system, PointSystem::Modified);
    }

    #[test]
    fn contracts() {
        let round = sample_round();
        contract_metadata_is_complete(&Stableford);
        contract_compute_is_deterministic(&Stableford, &round);
        contract_blank_round_is_square(&Stableford);
        contract_round_survives_json(&Stableford, &round);
        contract_partial_rounds_are_safe(&Stableford, &round, |r, holes| {
            let mut partial = r.clone();
            for row in partial.scores.iter_mut() {
                for i in holes..HOLES {
                    row.set(i, None);
                }
            }
            partial
        });
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pairwise_settlement_is_zero_sum(
                totals in prop::array::uniform4(-10i32..60),
                mask in prop::array::uniform4(any::<bool>()),
                value in 0.25f64..5.0,
            ) {
                let active: Vec<usize> = (0..PLAYERS).filter(|&p| mask[p]).collect();
                let winnings = pairwise_winnings(&totals, &active, value);
                let net: f64 = winnings.iter().sum();
                prop_assert!(net.abs() < 1e-6);
            }
        }
    }
}
