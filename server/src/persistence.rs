//! Whole-table snapshot persistence for game sessions
//!
//! After every state-changing session operation the server writes the full
//! session table to a JSON file, positions stored in their compact textual
//! notation rather than the raw grid. The file is loaded once at startup to
//! repopulate the table. In-memory state stays authoritative: a failed
//! write is logged and never aborts the operation that triggered it.

use crate::engine::Position;
use crate::session::{GameSession, SessionManager, SessionStatus};
use log::warn;
use serde::{Deserialize, Serialize};
use shared::Color;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPlayer {
    player_id: String,
    color: Color,
    token: String,
}

#[derive(Debug, Serialize, Deserialize)]
enum PersistedStatus {
    Active,
    Completed { reason: String },
    Forfeited { winner: String },
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedGame {
    fen: String,
    players: Vec<PersistedPlayer>,
    status: PersistedStatus,
    updated_at: u64,
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}

/// Snapshot file for the session table.
pub struct GameStore {
    path: PathBuf,
}

impl GameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Writes the current session table to disk.
    pub fn save(&self, manager: &SessionManager) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut table = std::collections::BTreeMap::new();
        for session in manager.sessions() {
            let players = session
                .participants
                .iter()
                .map(|p| PersistedPlayer {
                    player_id: p.player_id.clone(),
                    color: p.color,
                    token: p.token.clone(),
                })
                .collect();

            let status = match &session.status {
                SessionStatus::Active => PersistedStatus::Active,
                SessionStatus::Completed { reason } => PersistedStatus::Completed {
                    reason: reason.clone(),
                },
                SessionStatus::Forfeited { winner } => PersistedStatus::Forfeited {
                    winner: winner.clone(),
                },
                SessionStatus::Cancelled => PersistedStatus::Cancelled,
            };

            table.insert(
                session.game_id.clone(),
                PersistedGame {
                    fen: session.position.fen(),
                    players,
                    status,
                    updated_at: unix_timestamp(),
                },
            );
        }

        let json = serde_json::to_string_pretty(&table)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(&self.path, json)
    }

    /// Loads the persisted session table. Missing or unreadable files yield
    /// an empty table; a damaged entry is skipped with a warning rather
    /// than discarding the rest.
    pub fn load(&self) -> Vec<GameSession> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return Vec::new(),
        };

        let table: std::collections::BTreeMap<String, PersistedGame> =
            match serde_json::from_str(&data) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Ignoring corrupt snapshot {}: {}", self.path.display(), e);
                    return Vec::new();
                }
            };

        let mut sessions = Vec::new();
        for (game_id, game) in table {
            let position = match Position::from_fen(&game.fen) {
                Ok(position) => position,
                Err(e) => {
                    warn!("Skipping persisted game {}: {}", game_id, e);
                    continue;
                }
            };
            if game.players.len() != 2 {
                warn!(
                    "Skipping persisted game {}: expected 2 players, found {}",
                    game_id,
                    game.players.len()
                );
                continue;
            }

            let status = match game.status {
                PersistedStatus::Active => SessionStatus::Active,
                PersistedStatus::Completed { reason } => SessionStatus::Completed { reason },
                PersistedStatus::Forfeited { winner } => SessionStatus::Forfeited { winner },
                PersistedStatus::Cancelled => SessionStatus::Cancelled,
            };

            let mut players = game.players;
            let second = players.pop().unwrap();
            let first = players.pop().unwrap();
            sessions.push(GameSession::restore(
                game_id,
                position,
                [
                    (first.player_id, first.color, first.token),
                    (second.player_id, second.color, second.token),
                ],
                status,
            ));
        }
        sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> GameStore {
        let unique = format!(
            "chess_arena_test_{}_{}/games.json",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        );
        GameStore::new(std::env::temp_dir().join(unique))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let store = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = temp_store();
        let mut manager = SessionManager::new();
        let mut rng = rng();

        let game_id = manager.create_session(1, 2, &mut rng).game_id.clone();
        let mover = manager
            .session(&game_id)
            .unwrap()
            .turn_owner()
            .player_id
            .clone();
        manager
            .session_mut(&game_id)
            .unwrap()
            .submit_move(&mover, "e4")
            .unwrap();

        store.save(&manager).unwrap();
        let restored = store.load();

        assert_eq!(restored.len(), 1);
        let session = &restored[0];
        let original = manager.session(&game_id).unwrap();

        assert_eq!(session.game_id, game_id);
        assert_eq!(session.position.fen(), original.position.fen());
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.turn_owner().color, Color::Black);
        for (restored_seat, original_seat) in
            session.participants.iter().zip(original.participants.iter())
        {
            assert_eq!(restored_seat.player_id, original_seat.player_id);
            assert_eq!(restored_seat.color, original_seat.color);
            assert_eq!(restored_seat.token, original_seat.token);
            // Restored seats come back unbound.
            assert!(restored_seat.connection_id.is_none());
        }
    }

    #[test]
    fn test_terminal_status_survives_roundtrip() {
        let store = temp_store();
        let mut manager = SessionManager::new();
        let mut rng = rng();

        let game_id = manager.create_session(1, 2, &mut rng).game_id.clone();
        {
            let session = manager.session_mut(&game_id).unwrap();
            session.status = SessionStatus::Forfeited {
                winner: "p2".to_string(),
            };
        }

        store.save(&manager).unwrap();
        let restored = store.load();

        assert_eq!(
            restored[0].status,
            SessionStatus::Forfeited {
                winner: "p2".to_string()
            }
        );
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let store = temp_store();
        let mut manager = SessionManager::new();
        let mut rng = rng();

        let game_id = manager.create_session(1, 2, &mut rng).game_id.clone();
        store.save(&manager).unwrap();

        manager.remove_session(&game_id);
        store.save(&manager).unwrap();

        assert!(store.load().is_empty());
    }
}
