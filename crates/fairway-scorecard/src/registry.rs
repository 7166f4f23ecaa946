use std::collections::BTreeMap;

use fairway_core::game_registry::GameEntry;
use fairway_core::game_trait::{GameType, ScoringGame};

use crate::config::GameDefaults;
use crate::round::{Round, RoundState};

/// Catalog of the games this host can score.
pub struct GameRegistry {
    entries: BTreeMap<GameType, GameEntry>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            entries: BTreeMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(&fairway_nassau::Nassau);
        self.register(&fairway_skins::Skins);
        self.register(&fairway_wolf::Wolf);
        self.register(&fairway_bingo::Bingo);
        self.register(&fairway_bloodsome::Bloodsome);
        self.register(&fairway_stableford::Stableford);
        self.register(&fairway_banker::Banker);
        self.register(&fairway_vegas::Vegas);
    }

    fn register<G: ScoringGame>(&mut self, game: &G) {
        let id = game.game_type();
        self.entries.insert(
            id,
            GameEntry {
                id,
                metadata: game.metadata(),
            },
        );
    }

    pub fn get(&self, id: GameType) -> Option<&GameEntry> {
        self.entries.get(&id)
    }

    /// Entries in menu order.
    pub fn entries(&self) -> impl Iterator<Item = &GameEntry> {
        self.entries.values()
    }

    /// Games playable by a group of `players`.
    pub fn for_players(&self, players: usize) -> Vec<&GameEntry> {
        self.entries().filter(|e| e.supports(players)).collect()
    }

    /// Start a fresh round of a registered game.
    pub fn start(&self, id: GameType, defaults: &GameDefaults) -> Option<RoundState> {
        let entry = self.get(id)?;
        tracing::info!(game = %id, name = %entry.metadata.name, "new round");
        Some(RoundState::from_round(Round::with_defaults(id, defaults)))
    }

    /// Return the number of registered game types.
    pub fn available_games(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_games_registered() {
        let registry = GameRegistry::new();
        assert_eq!(registry.available_games(), GameType::ALL.len());
        for game in GameType::ALL {
            let entry = registry.get(game).unwrap();
            assert_eq!(entry.id, game);
            assert!(!entry.metadata.description.is_empty());
        }
    }

    #[test]
    fn entries_follow_menu_order() {
        let registry = GameRegistry::new();
        let ids: Vec<GameType> = registry.entries().map(|e| e.id).collect();
        assert_eq!(ids, GameType::ALL.to_vec());
    }

    #[test]
    fn two_players_cannot_play_team_games() {
        let registry = GameRegistry::new();
        let ids: Vec<GameType> = registry.for_players(2).iter().map(|e| e.id).collect();
        assert!(ids.contains(&GameType::Nassau));
        assert!(ids.contains(&GameType::Skins));
        assert!(!ids.contains(&GameType::Vegas));
        assert!(!ids.contains(&GameType::Wolf));
    }

    #[test]
    fn start_applies_defaults() {
        let registry = GameRegistry::new();
        let defaults = GameDefaults {
            wager: Some(2.0),
            ..GameDefaults::default()
        };
        let state = registry.start(GameType::Skins, &defaults).unwrap();
        let Round::Skins(round) = state.round() else {
            panic!("expected skins");
        };
        assert_eq!(round.wager, 2.0);
    }
}
