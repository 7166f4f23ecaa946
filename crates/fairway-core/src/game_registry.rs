use serde::Serialize;

use crate::game_trait::{GameMetadata, GameType};

/// A registered game entry in the game catalog.
#[derive(Debug, Clone, Serialize)]
pub struct GameEntry {
    pub id: GameType,
    pub metadata: GameMetadata,
}

impl GameEntry {
    pub fn supports(&self, players: usize) -> bool {
        (usize::from(self.metadata.min_players)..=usize::from(self.metadata.max_players))
            .contains(&players)
    }
}
