use serde::{Deserialize, Serialize};

use fairway_core::game_trait::{GameMetadata, GameOutcome, GameType, ScoringGame};
use fairway_core::hole::{HOLES, PerHole, Score, SegmentTotals};
use fairway_core::player::{player_label, slot_rows};
use fairway_core::settlement::{Balance, Settlement};

pub const PLAYERS: usize = 4;
pub const DEFAULT_WAGER: f64 = 1.0;
pub const DEFAULT_PAR: u8 = 4;
pub const NO_SKINS: &str = "No skins won yet";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkinsRound {
    pub players: Vec<String>,
    /// Value of each hole before carries.
    pub wager: f64,
    /// Tied holes roll their value into the next played hole.
    pub carryover: bool,
    /// A skin only stands when won at par or better.
    pub validation: bool,
    pub par: PerHole<Score>,
    #[serde(deserialize_with = "slot_rows")]
    pub scores: [PerHole<Score>; PLAYERS],
}

impl Default for SkinsRound {
    fn default() -> Self {
        Self {
            players: vec![String::new(); PLAYERS],
            wager: DEFAULT_WAGER,
            carryover: true,
            validation: false,
            par: PerHole::filled(Some(DEFAULT_PAR)),
            scores: [PerHole::default(); PLAYERS],
        }
    }
}

impl SkinsRound {
    /// Slots with at least one recorded score; every slot before any scores.
    pub fn active_players(&self) -> Vec<usize> {
        let active: Vec<usize> = (0..PLAYERS)
            .filter(|&p| self.scores[p].recorded() > 0)
            .collect();
        if active.is_empty() {
            (0..PLAYERS).collect()
        } else {
            active
        }
    }
}

/// What happened on one hole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinsHole {
    pub played: bool,
    pub winner: Option<usize>,
    /// Money at stake on the hole, carries included.
    pub value: f64,
    /// Value rolled forward out of this hole.
    pub carry_out: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinsResult {
    pub active: Vec<usize>,
    pub holes: Vec<SkinsHole>,
    pub skins_won: [u32; PLAYERS],
    /// Gross value of the skins each player took.
    pub winnings: [f64; PLAYERS],
    /// Winnings less each player's share of everything paid out.
    pub net: [f64; PLAYERS],
    pub total_pot: f64,
    /// Value still riding on the next played hole.
    pub pending_carry: f64,
    pub score_totals: [SegmentTotals; PLAYERS],
    pub settlement: Settlement,
}

impl GameOutcome for SkinsResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// The unique lowest score among `active`, if there is one.
fn sole_low(active: &[usize], strokes: &[u8; PLAYERS]) -> Option<usize> {
    let low = active.iter().map(|&p| strokes[p]).min()?;
    let mut at_low = active.iter().filter(|&&p| strokes[p] == low);
    let winner = *at_low.next()?;
    at_low.next().is_none().then_some(winner)
}

/// Skins: low score alone wins the hole's value.
pub struct Skins;

impl ScoringGame for Skins {
    type Round = SkinsRound;
    type Outcome = SkinsResult;

    fn game_type(&self) -> GameType {
        GameType::Skins
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Skins".to_string(),
            description: "Each hole is worth a skin; ties carry the value forward".to_string(),
            min_players: 2,
            max_players: 4,
        }
    }

    fn compute(&self, round: &SkinsRound) -> SkinsResult {
        let active = round.active_players();
        let mut holes = Vec::with_capacity(HOLES);
        let mut skins_won = [0u32; PLAYERS];
        let mut winnings = [0.0f64; PLAYERS];
        let mut carry = 0.0;
        let mut played_count = 0u32;

        for i in 0..HOLES {
            let mut strokes = [0u8; PLAYERS];
            let mut complete = active.len() >= 2;
            for &p in &active {
                match round.scores[p].get(i) {
                    Some(s) => strokes[p] = s,
                    None => complete = false,
                }
            }
            if !complete {
                holes.push(SkinsHole::default());
                continue;
            }

            played_count += 1;
            let value = round.wager + carry;
            let winner = sole_low(&active, &strokes).filter(|&w| {
                !round.validation
                    || round.par.get(i).is_none_or(|par| strokes[w] <= par)
            });

            let carry_out = match winner {
                Some(w) => {
                    skins_won[w] += 1;
                    winnings[w] += value;
                    0.0
                },
                None if round.carryover => value,
                None => 0.0,
            };
            carry = carry_out;
            holes.push(SkinsHole {
                played: true,
                winner,
                value,
                carry_out,
            });
        }

        let awarded: f64 = winnings.iter().sum();
        let share = awarded / active.len() as f64;
        let net: [f64; PLAYERS] = std::array::from_fn(|p| {
            if active.contains(&p) {
                winnings[p] - share
            } else {
                0.0
            }
        });
        let balances = active
            .iter()
            .map(|&p| Balance {
                party: player_label(&round.players, p),
                amount: net[p],
            })
            .collect();

        tracing::debug!(played = played_count, awarded, carry, "skins recomputed");

        SkinsResult {
            active,
            holes,
            skins_won,
            winnings,
            net,
            total_pot: round.wager * f64::from(played_count),
            pending_carry: carry,
            score_totals: std::array::from_fn(|p| round.scores[p].segment_totals()),
            settlement: Settlement::collect_and_pay(balances, NO_SKINS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairway_core::test_helpers::{
        contract_blank_round_is_square, contract_compute_is_deterministic,
        contract_metadata_is_complete, contract_partial_rounds_are_safe,
        contract_round_survives_json, contract_settlement_is_zero_sum, make_names,
    };

    fn round_with(holes: &[[u8; 4]]) -> SkinsRound {
        let mut round = SkinsRound {
            players: make_names(4),
            ..SkinsRound::default()
        };
        for (i, hole) in holes.iter().enumerate() {
            for p in 0..PLAYERS {
                round.scores[p].set(i, Some(hole[p]));
            }
        }
        round
    }

    #[test]
    fn outright_low_wins_the_skin() {
        let result = Skins.compute(&round_with(&[[3, 4, 4, 5]]));
        assert_eq!(result.holes[0].winner, Some(0));
        assert_eq!(result.skins_won, [1, 0, 0, 0]);
        assert_eq!(result.total_pot, 1.0);
        assert_eq!(result.net, [0.75, -0.25, -0.25, -0.25]);
    }

    #[test]
    fn ties_carry_into_next_hole() {
        let result = Skins.compute(&round_with(&[[4, 4, 5, 5], [4, 4, 4, 4], [5, 3, 4, 4]]));
        assert_eq!(result.holes[0].carry_out, 1.0);
        assert_eq!(result.holes[1].value, 2.0);
        assert_eq!(result.holes[2].value, 3.0);
        assert_eq!(result.holes[2].winner, Some(1));
        assert_eq!(result.winnings[1], 3.0);
        assert_eq!(result.pending_carry, 0.0);
        contract_settlement_is_zero_sum(&result);
    }

    #[test]
    fn dead_skins_without_carryover() {
        let mut round = round_with(&[[4, 4, 5, 5], [5, 3, 4, 4]]);
        round.carryover = false;
        let result = Skins.compute(&round);
        assert_eq!(result.holes[0].carry_out, 0.0);
        assert_eq!(result.holes[1].value, 1.0);
        assert_eq!(result.winnings[1], 1.0);
    }

    #[test]
    fn validation_requires_par_or_better() {
        let mut round = round_with(&[[5, 6, 6, 6]]);
        round.validation = true;
        let result = Skins.compute(&round);
        assert_eq!(result.holes[0].winner, None);
        assert_eq!(result.pending_carry, 1.0);

        round.par.set(0, None);
        let result = Skins.compute(&round);
        assert_eq!(result.holes[0].winner, Some(0));
    }

    #[test]
    fn inactive_players_are_left_out() {
        let mut round = SkinsRound {
            players: make_names(4),
            ..SkinsRound::default()
        };
        round.scores[0].set(0, Some(4));
        round.scores[2].set(0, Some(5));
        let result = Skins.compute(&round);
        assert_eq!(result.active, vec![0, 2]);
        assert!(result.holes[0].played);
        assert_eq!(result.net, [0.5, 0.0, -0.5, 0.0]);
        assert_eq!(result.settlement.summary, "Ann collects $0.50, Cy pays $0.50");
    }

    #[test]
    fn hole_waits_for_every_active_player() {
        let mut round = round_with(&[[4, 4, 4, 4]]);
        round.scores[0].set(1, Some(3));
        let result = Skins.compute(&round);
        assert!(!result.holes[1].played);
        assert_eq!(result.total_pot, 1.0);
    }

    #[test]
    fn contracts() {
        let round = round_with(&[[4, 4, 5, 5], [3, 4, 4, 4], [5, 5, 5, 4], [4, 4, 4, 4]]);
        contract_metadata_is_complete(&Skins);
        contract_compute_is_deterministic(&Skins, &round);
        contract_blank_round_is_square(&Skins);
        contract_round_survives_json(&Skins, &round);
        contract_settlement_is_zero_sum(&Skins.compute(&round));
        contract_partial_rounds_are_safe(&Skins, &round, |r, holes| {
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
            fn settlement_always_nets_to_zero(
                rows in prop::collection::vec(prop::array::uniform4(prop::option::of(2u8..=7)), HOLES),
                carryover in any::<bool>(),
                validation in any::<bool>(),
            ) {
                let mut round = SkinsRound { carryover, validation, ..SkinsRound::default() };
                for (i, hole) in rows.iter().enumerate() {
                    for p in 0..PLAYERS {
                        round.scores[p].set(i, hole[p]);
                    }
                }
                let result = Skins.compute(&round);
                let net: f64 = result.net.iter().sum();
                prop_assert!(net.abs() < 1e-9);
                let paid: f64 = result.winnings.iter().sum();
                prop_assert!(paid <= result.total_pot + 1e-9);
            }
        }
    }
}
