pub mod format;
pub mod game_registry;
pub mod game_trait;
pub mod hole;
pub mod match_play;
pub mod player;
pub mod settlement;
pub mod stableford;
pub mod validation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use serde::de::DeserializeOwned;

    use crate::game_trait::{GameOutcome, ScoringGame};
    use crate::hole::{HOLES, PerHole, Score};

    /// Four sensible player names.
    pub fn make_names(n: usize) -> Vec<String> {
        ["Ann", "Bo", "Cy", "Di"]
            .iter()
            .take(n)
            .map(|s| s.to_string())
            .collect()
    }

    /// A full row of the same score.
    pub fn flat_row(score: u8) -> PerHole<Score> {
        PerHole::filled(Some(score))
    }

    /// A row with only the given 1-based holes recorded.
    pub fn sparse_row(entries: &[(usize, u8)]) -> PerHole<Score> {
        let mut row = PerHole::default();
        for &(hole, score) in entries {
            row.set(hole - 1, Some(score));
        }
        row
    }

    /// Round-trip a round through JSON, the way persistence does.
    pub fn through_json<T: serde::Serialize + DeserializeOwned>(value: &T) -> T {
        let json = serde_json::to_string(value).expect("round must serialize");
        serde_json::from_str(&json).expect("round must deserialize")
    }

    // ================================================================
    // Scoring Game Contract Tests
    // ================================================================
    // Every ScoringGame implementation must pass these. Game crates call them
    // from their own #[cfg(test)] modules with a populated round.

    /// compute() must return the same outcome for the same round.
    pub fn contract_compute_is_deterministic<G: ScoringGame>(game: &G, round: &G::Round) {
        let first = game.compute(round);
        let second = game.compute(round);
        assert_eq!(first, second, "compute() must be deterministic");
    }

    /// A round with nothing entered must settle with no money moving.
    pub fn contract_blank_round_is_square<G: ScoringGame>(game: &G) {
        let outcome = game.compute(&G::Round::default());
        for balance in &outcome.settlement().balances {
            assert_eq!(
                balance.amount, 0.0,
                "blank round must not move money (party {})",
                balance.party
            );
        }
    }

    /// Computing every prefix of a round (holes entered one at a time) must
    /// never panic and must always produce a finite settlement.
    pub fn contract_partial_rounds_are_safe<G, F>(game: &G, round: &G::Round, truncate: F)
    where
        G: ScoringGame,
        F: Fn(&G::Round, usize) -> G::Round,
    {
        for holes in 0..=HOLES {
            let partial = truncate(round, holes);
            let outcome = game.compute(&partial);
            for balance in &outcome.settlement().balances {
                assert!(
                    balance.amount.is_finite(),
                    "settlement must be finite after {holes} holes"
                );
            }
        }
    }

    /// A round that went through JSON must produce the same outcome.
    pub fn contract_round_survives_json<G: ScoringGame>(game: &G, round: &G::Round) {
        let restored = through_json(round);
        assert_eq!(
            game.compute(round),
            game.compute(&restored),
            "outcome must survive a JSON round trip of the round"
        );
    }

    /// Balances of a closed game must sum to zero.
    pub fn contract_settlement_is_zero_sum<O: GameOutcome>(outcome: &O) {
        let net = outcome.settlement().net();
        assert!(net.abs() < 1e-9, "balances must sum to zero, got {net}");
    }

    /// Metadata must be filled in and consistent.
    pub fn contract_metadata_is_complete<G: ScoringGame>(game: &G) {
        let meta = game.metadata();
        assert!(!meta.name.is_empty(), "game name must not be empty");
        assert!(!meta.description.is_empty(), "description must not be empty");
        assert!(meta.min_players >= 2, "side games need at least two players");
        assert!(meta.min_players <= meta.max_players);
    }
}
