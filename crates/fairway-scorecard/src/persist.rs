use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use fairway_core::game_trait::GameType;

use crate::error::{ExportError, ImportError};
use crate::round::{Round, RoundState};
use crate::storage::KeyValueStore;

/// Version stamped into saved and exported rounds.
pub const FORMAT_VERSION: &str = "1.0";
pub const METADATA_KEY: &str = "_metadata";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub version: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exported: bool,
}

impl SaveMetadata {
    fn now(exported: bool) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            exported,
        }
    }
}

/// The round as a JSON object with `_metadata` alongside its fields.
fn document(state: &RoundState, exported: bool) -> Result<Value, serde_json::Error> {
    let mut doc = serde_json::to_value(state.round())?;
    if let Value::Object(map) = &mut doc {
        map.insert(
            METADATA_KEY.to_string(),
            serde_json::to_value(SaveMetadata::now(exported))?,
        );
    }
    Ok(doc)
}

fn round_from(mut map: Map<String, Value>) -> Result<Round, serde_json::Error> {
    map.remove(METADATA_KEY);
    serde_json::from_value(Value::Object(map))
}

/// Write the round under `key`. Returns false when the store refuses it;
/// the round carries on in memory.
pub fn save(store: &mut impl KeyValueStore, key: &str, state: &RoundState) -> bool {
    let json = match document(state, false).and_then(|doc| serde_json::to_string(&doc)) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize round");
            return false;
        },
    };
    match store.set(key, &json) {
        Ok(()) => {
            tracing::info!(key, game = %state.game_type(), bytes = json.len(), "round saved");
            true
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "could not save round");
            false
        },
    }
}

/// Read the round saved under `key`. Unreadable data is removed so the next
/// load starts clean.
pub fn load(store: &mut impl KeyValueStore, key: &str) -> Option<RoundState> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read saved round");
            return None;
        },
    };

    let parsed = serde_json::from_str::<Map<String, Value>>(&raw).and_then(round_from);
    match parsed {
        Ok(round) => {
            tracing::info!(key, game = %round.game_type(), "round restored");
            Some(RoundState::from_round(round))
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "saved round is corrupt, discarding");
            if let Err(e) = store.remove(key) {
                tracing::warn!(key, error = %e, "could not remove corrupt round");
            }
            None
        },
    }
}

pub fn clear(store: &mut impl KeyValueStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => {
            tracing::info!(key, "saved round cleared");
            true
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "could not clear saved round");
            false
        },
    }
}

/// Pretty JSON for a shareable round file.
pub fn export_round(state: &RoundState) -> Result<Vec<u8>, ExportError> {
    let doc = document(state, true)?;
    let bytes = serde_json::to_vec_pretty(&doc)?;
    tracing::info!(game = %state.game_type(), bytes = bytes.len(), "round exported");
    Ok(bytes)
}

/// Parse a round file. The game type is matched case-insensitively.
pub fn import_round(bytes: &[u8]) -> Result<RoundState, ImportError> {
    let mut map: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|e| ImportError::InvalidFormat(format!("not a JSON object: {e}")))?;

    let game = match map.get("gameType") {
        Some(Value::String(name)) => name
            .parse::<GameType>()
            .map_err(|e| ImportError::InvalidFormat(e.to_string()))?,
        Some(_) => return Err(ImportError::InvalidFormat("gameType must be a string".into())),
        None => return Err(ImportError::InvalidFormat("missing gameType".into())),
    };
    map.insert("gameType".to_string(), Value::String(game.as_str().to_string()));

    let round = round_from(map).map_err(|e| ImportError::InvalidFormat(e.to_string()))?;
    tracing::info!(game = %game, "round imported");
    Ok(RoundState::from_round(round))
}

/// `fairway-<game>-<YYYY-MM-DD>.json`
pub fn export_file_name(game: GameType, date: NaiveDate) -> String {
    format!("fairway-{}-{}.json", game.as_str(), date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "golfGameState";

    fn scored_state() -> RoundState {
        let mut state = RoundState::new(GameType::Skins);
        state.edit(|r| r.set_score(1, 1, Some(3))).unwrap();
        state.edit(|r| r.set_score(2, 1, Some(5))).unwrap();
        state
    }

    #[test]
    fn save_then_load_restores_the_round() {
        let mut store = MemoryStore::new();
        let state = scored_state();
        assert!(save(&mut store, KEY, &state));
        assert_eq!(load(&mut store, KEY), Some(state));
    }

    #[test]
    fn saved_json_carries_metadata() {
        let mut store = MemoryStore::new();
        save(&mut store, KEY, &scored_state());
        let raw = store.get(KEY).unwrap().unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["gameType"], "skins");
        assert_eq!(doc[METADATA_KEY]["version"], FORMAT_VERSION);
        assert!(doc[METADATA_KEY].get("exported").is_none());
    }

    #[test]
    fn every_accepted_edit_survives_save_and_load() {
        use fairway_core::hole::MAX_STROKES;

        let mut state = RoundState::new(GameType::Stableford);
        state.edit(|r| r.set_score(1, 1, Some(MAX_STROKES))).unwrap();
        state.edit(|r| r.set_score(2, 18, Some(1))).unwrap();
        state.edit(|r| r.set_par(1, Some(MAX_STROKES))).unwrap();
        state.edit(|r| r.set_par(2, Some(1))).unwrap();
        assert!(state.edit(|r| r.set_score(1, 2, Some(40))).is_err());
        assert!(state.edit(|r| r.set_par(3, Some(0))).is_err());

        let mut store = MemoryStore::new();
        assert!(save(&mut store, KEY, &state));
        assert_eq!(load(&mut store, KEY), Some(state.clone()));

        let bytes = export_round(&state).unwrap();
        assert_eq!(import_round(&bytes).unwrap(), state);
    }

    #[test]
    fn nothing_saved_loads_nothing() {
        let mut store = MemoryStore::new();
        assert_eq!(load(&mut store, KEY), None);
    }

    #[test]
    fn corrupt_data_is_removed() {
        let mut store = MemoryStore::new();
        store.set(KEY, "{not json").unwrap();
        assert_eq!(load(&mut store, KEY), None);
        assert_eq!(store.get(KEY).unwrap(), None);

        store.set(KEY, r#"{"gameType": "croquet"}"#).unwrap();
        assert_eq!(load(&mut store, KEY), None);
        assert_eq!(store.get(KEY).unwrap(), None);
    }

    #[test]
    fn refused_writes_report_false() {
        let state = scored_state();
        assert!(!save(&mut MemoryStore::unavailable(), KEY, &state));
        assert!(!save(&mut MemoryStore::with_quota(16), KEY, &state));
    }

    #[test]
    fn clear_forgets_the_round() {
        let mut store = MemoryStore::new();
        save(&mut store, KEY, &scored_state());
        assert!(clear(&mut store, KEY));
        assert_eq!(load(&mut store, KEY), None);
    }

    #[test]
    fn export_is_pretty_and_marked() {
        let bytes = export_round(&scored_state()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains('\n'));
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc[METADATA_KEY]["exported"], true);
        assert_eq!(import_round(&bytes).unwrap(), scored_state());
    }

    #[test]
    fn import_rejects_bad_files() {
        let cases: [&[u8]; 4] = [
            b"[1, 2, 3]",
            br#"{"scores": []}"#,
            br#"{"gameType": "polo"}"#,
            br#"{"gameType": 7}"#,
        ];
        for bytes in cases {
            assert!(matches!(
                import_round(bytes),
                Err(ImportError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn import_accepts_keyed_player_rows() {
        let json = br#"{
            "gameType": "Nassau",
            "players": ["Ann", "Bo"],
            "wager": 10,
            "pressRule": "manual",
            "scores": {"p1": [4, "5", null], "p2": [5, "", 4.0]},
            "presses": [{"hole": 2, "player": "2", "initialMatchStatus": 1}],
            "results": {"holeResults": [], "matchStatus": []},
            "settlement": {}
        }"#;
        let state = import_round(json).unwrap();
        let Round::Nassau(round) = state.round() else {
            panic!("expected nassau");
        };
        assert_eq!(round.wager, 10.0);
        assert_eq!(round.scores[0].get(0), Some(4));
        assert_eq!(round.scores[0].get(1), Some(5));
        assert_eq!(round.scores[1].get(1), None);
        assert_eq!(round.scores[1].get(2), Some(4));
        assert_eq!(round.presses[0].hole_started, 2);
        assert_eq!(round.presses[0].status_at_start, 1);
    }

    #[test]
    fn import_accepts_keyed_teams_and_marks() {
        let vegas = br#"{
            "gameType": "vegas",
            "teams": {"t1": {"pA": "Ann", "pB": "Bo"}, "t2": {"pC": "Cy", "pD": ""}},
            "pointValue": 1,
            "scores": {"pA": [3], "pB": [7], "pC": [4], "pD": [4]}
        }"#;
        let state = import_round(vegas).unwrap();
        let Round::Vegas(round) = state.round() else {
            panic!("expected vegas");
        };
        assert_eq!(round.teams[0].second, "Bo");
        assert_eq!(round.teams[1].first, "Cy");
        assert_eq!(round.scores[1].get(0), Some(7));
        assert_eq!(round.scores[3].get(0), Some(4));
        // 44 - 37: team two owes team one.
        assert_eq!(state.result().settlement().balances[0].amount, 7.0);

        let bloodsome = br#"{
            "gameType": "bloodsome",
            "teams": {"t1": {"pA": "Ann", "pB": "Bo"}, "t2": {"pC": "Cy", "pD": "Di"}},
            "drives": {"t1": ["pB"], "t2": ["pC"]},
            "scores": {"t1": [4], "t2": [5]}
        }"#;
        let Round::Bloodsome(round) = import_round(bloodsome).unwrap().round().clone() else {
            panic!("expected bloodsome");
        };
        assert_eq!(round.drives[0].get(0), fairway_bloodsome::Drive::Second);
        assert_eq!(round.scores[1].get(0), Some(5));

        let bingo = br#"{
            "gameType": "bingo",
            "marks": {
                "p1": {"bi": [true], "ba": [false], "bo": [false]},
                "p3": {"bi": [false], "ba": [true], "bo": [true]}
            }
        }"#;
        let Round::Bingo(round) = import_round(bingo).unwrap().round().clone() else {
            panic!("expected bingo");
        };
        assert_eq!(round.marks[0].count(0), 1);
        assert_eq!(round.marks[1].count(0), 0);
        assert_eq!(round.marks[2].count(0), 2);
    }

    #[test]
    fn export_names_carry_game_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            export_file_name(GameType::Bloodsome, date),
            "fairway-bloodsome-2024-06-01.json"
        );
    }
}
