use serde::{Deserialize, Deserializer, Serialize};

use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Score, SegmentTotals, Totals};
use fairway_core::player::{player_label, slot_rows};
use fairway_core::settlement::{Balance, NO_POINTS, Settlement};
use fairway_core::stableford::{PointSystem, stableford_points};

pub const PLAYERS: usize = 4;
pub const DEFAULT_QUOTA: i32 = 36;
pub const DEFAULT_POINT_VALUE: f64 = 1.0;
pub const DEFAULT_PAR: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankerRound {
    pub players: Vec<String>,
    /// Stableford points each player is expected to make over 18 holes.
    pub quotas: [i32; PLAYERS],
    pub point_value: f64,
    #[serde(alias = "pointSystem")]
    pub system: PointSystem,
    pub par: PerHole<Score>,
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; PLAYERS],
    /// Elected banker per hole as a 1-based slot; unset holes rotate.
    #[serde(deserialize_with = "elected_bankers")]
    pub bankers: PerHole<Option<u8>>,
}

/// Banker elections as stored. Slots past the foursome are dropped here,
/// once, so those holes rotate.
fn elected_bankers<'de, D>(deserializer: D) -> Result<PerHole<Option<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut bankers = PerHole::<Option<u8>>::deserialize(deserializer)?;
    let mut dropped = Vec::new();
    for i in 0..HOLES {
        if bankers.get(i).is_some_and(|slot| usize::from(slot) > PLAYERS) {
            bankers.set(i, None);
            dropped.push(i + 1);
        }
    }
    if !dropped.is_empty() {
        tracing::warn!(holes = ?dropped, "banker slots out of range, those holes rotate");
    }
    Ok(bankers)
}

impl Default for BankerRound {
    fn default() -> Self {
        Self {
            players: vec![String::new(); PLAYERS],
            quotas: [DEFAULT_QUOTA; PLAYERS],
            point_value: DEFAULT_POINT_VALUE,
            system: PointSystem::Standard,
            par: PerHole::filled(Some(DEFAULT_PAR)),
            scores: [PerHole::default(); PLAYERS],
            bankers: PerHole::default(),
        }
    }
}

impl BankerRound {
    /// 0-based banker slot for a 0-based hole index.
    pub fn banker_for(&self, index: usize) -> usize {
        match self.bankers.get(index) {
            Some(slot) if (1..=PLAYERS).contains(&usize::from(slot)) => usize::from(slot) - 1,
            _ => index % PLAYERS,
        }
    }

    /// Quota spread evenly over the round.
    pub fn quota_per_hole(&self, player: usize) -> f64 {
        f64::from(self.quotas[player]) / HOLES as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankerResult {
    pub bankers: Vec<usize>,
    pub points: Vec<[Option<i32>; PLAYERS]>,
    /// Money won (positive) or lost on each hole per player.
    pub hole_amounts: Vec<[f64; PLAYERS]>,
    pub point_totals: [Totals; PLAYERS],
    pub score_totals: [SegmentTotals; PLAYERS],
    /// Total points minus quota.
    pub vs_quota: [i32; PLAYERS],
    pub winnings: [f64; PLAYERS],
    pub settlement: Settlement,
}

impl GameOutcome for BankerResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Banker: one player banks each hole and plays every other player
/// individually on Stableford points net of quota.
pub struct Banker;

impl ScoringGame for Banker {
    type Round = BankerRound;
    type Outcome = BankerResult;

    fn game_type(&self) -> GameType {
        GameType::Banker
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Banker".to_string(),
            description: "The banker takes on each player hole by hole against quota"
                .to_string(),
            min_players: 4,
            max_players: 4,
        }
    }

    fn compute(&self, round: &BankerRound) -> BankerResult {
        let mut point_totals = [Totals::default(); PLAYERS];
        let mut winnings = [0.0f64; PLAYERS];
        let mut bankers = Vec::with_capacity(HOLES);
        let mut points = Vec::with_capacity(HOLES);
        let mut hole_amounts = Vec::with_capacity(HOLES);

        for i in 0..HOLES {
            let hole: [Option<i32>; PLAYERS] = std::array::from_fn(|p| {
                stableford_points(round.scores[p].get(i), round.par.get(i), round.system)
            });
            for (totals, value) in point_totals.iter_mut().zip(hole) {
                totals.add(i, value.unwrap_or(0));
            }

            let banker = round.banker_for(i);
            let mut amounts = [0.0f64; PLAYERS];
            if let Some(bank_pts) = hole[banker] {
                let bank_net = f64::from(bank_pts) - round.quota_per_hole(banker);
                for p in (0..PLAYERS).filter(|&p| p != banker) {
                    let Some(pts) = hole[p] else {
                        continue;
                    };
                    let diff = f64::from(pts) - round.quota_per_hole(p) - bank_net;
                    let amount = diff * round.point_value;
                    amounts[p] += amount;
                    amounts[banker] -= amount;
                }
            }
            for (total, amount) in winnings.iter_mut().zip(amounts) {
                *total += amount;
            }

            bankers.push(banker);
            points.push(hole);
            hole_amounts.push(amounts);
        }

        let vs_quota = std::array::from_fn(|p| point_totals[p].total - round.quotas[p]);
        let balances = winnings
            .iter()
            .enumerate()
            .map(|(p, &amount)| Balance {
                party: player_label(&round.players, p),
                amount,
            })
            .collect();

        tracing::debug!(?winnings, "banker recomputed");

        BankerResult {
            bankers,
            points,
            hole_amounts,
            point_totals,
            score_totals: std::array::from_fn(|p| round.scores[p].segment_totals()),
            vs_quota,
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

    fn sample_round() -> BankerRound {
        BankerRound {
            players: make_names(4),
            scores: [
                scores_from(&[4, 4]),
                scores_from(&[3, 5]),
                scores_from(&[5, 4]),
                scores_from(&[4, 6]),
            ],
            ..BankerRound::default()
        }
    }

    #[test]
    fn banker_rotates_unless_elected() {
        let mut round = BankerRound::default();
        assert_eq!(round.banker_for(0), 0);
        assert_eq!(round.banker_for(6), 2);
        round.bankers.set(6, Some(4));
        assert_eq!(round.banker_for(6), 3);
        round.bankers.set(6, Some(9));
        assert_eq!(round.banker_for(6), 2);
    }

    #[test]
    fn out_of_range_elections_are_dropped_on_load() {
        let round: BankerRound =
            serde_json::from_str(r#"{"bankers": [9, 2, null, 0, "3"]}"#).unwrap();
        assert_eq!(round.bankers.get(0), None);
        assert_eq!(round.bankers.get(1), Some(2));
        assert_eq!(round.bankers.get(3), None);
        assert_eq!(round.bankers.get(4), Some(3));
        assert_eq!(round.banker_for(0), 0);
        assert_eq!(round.banker_for(1), 1);
    }

    #[test]
    fn equal_quotas_reduce_to_point_difference() {
        let result = Banker.compute(&sample_round());
        // Hole 1, Ann banks on 2 points: Bo +1, Cy -1, Di 0.
        assert_eq!(result.bankers[0], 0);
        assert_eq!(result.hole_amounts[0], [0.0, 1.0, -1.0, 0.0]);
        // Hole 2, Bo banks on 1 point: Ann +1, Cy +1, Di -1.
        assert_eq!(result.hole_amounts[1], [1.0, -1.0, 1.0, -1.0]);
        assert_eq!(result.winnings, [1.0, 0.0, 0.0, -1.0]);
        contract_settlement_is_zero_sum(&result);
    }

    #[test]
    fn quota_handicaps_the_stronger_player() {
        let mut round = sample_round();
        round.quotas[1] = 54;
        let result = Banker.compute(&round);
        // Bo must make 3 a hole; on hole 1 Bo's 3 points only break even.
        assert!((result.hole_amounts[0][1] - 0.0).abs() < 1e-9);
        assert_eq!(result.vs_quota[1], 4 - 54);
        assert_eq!(result.point_totals[1].total, 4);
    }

    #[test]
    fn banker_without_a_score_plays_nobody() {
        let mut round = sample_round();
        round.scores[0].set(0, None);
        let result = Banker.compute(&round);
        assert_eq!(result.hole_amounts[0], [0.0; PLAYERS]);
    }

    #[test]
    fn contracts() {
        let round = sample_round();
        contract_metadata_is_complete(&Banker);
        contract_compute_is_deterministic(&Banker, &round);
        contract_blank_round_is_square(&Banker);
        contract_round_survives_json(&Banker, &round);
        contract_partial_rounds_are_safe(&Banker, &round, |r, holes| {
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
            fn every_hole_is_zero_sum(
                rows in prop::collection::vec(prop::array::uniform4(prop::option::of(2u8..=8)), HOLES),
                quotas in prop::array::uniform4(18i32..=40),
            ) {
                let mut round = BankerRound { quotas, ..BankerRound::default() };
                for (i, hole) in rows.iter().enumerate() {
                    for p in 0..PLAYERS {
                        round.scores[p].set(i, hole[p]);
                    }
                }
                let result = Banker.compute(&round);
                for amounts in &result.hole_amounts {
                    prop_assert!(amounts.iter().sum::<f64>().abs() < 1e-9);
                }
            }
        }
    }
}
