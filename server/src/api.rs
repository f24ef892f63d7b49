//! Legacy request/response surface over the session table
//!
//! Non-real-time operations that bypass matchmaking: games created here have
//! no queue provenance and no disconnect-grace behavior until a seat is
//! explicitly attached. The surface operates on the same session table and
//! rule engine as the live protocol; whatever outer transport fronts it is
//! an external concern.

use crate::engine::Position;
use crate::persistence::GameStore;
use crate::render;
use crate::session::{SessionError, SessionManager, SessionStatus};
use log::error;
use rand::Rng;
use shared::Color;
use std::fmt;

/// Rejection of a legacy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    UnknownGame,
    NotYourTurn { current_turn: Color },
    IllegalMove { message: String },
    GameOver,
    ReplayFailed { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UnknownGame => write!(f, "unknown game"),
            ApiError::NotYourTurn { current_turn } => {
                write!(f, "it is {}'s turn to move", current_turn)
            }
            ApiError::IllegalMove { message } => write!(f, "{}", message),
            ApiError::GameOver => write!(f, "game is already over"),
            ApiError::ReplayFailed { message } => write!(f, "replay failed: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Board state as returned by every legacy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub game_id: String,
    pub board: Vec<Vec<char>>,
    pub rendered: String,
    pub fen: String,
    pub game_over: bool,
    pub game_over_reason: String,
}

/// Result of creating a game through the legacy surface.
#[derive(Debug, Clone)]
pub struct CreatedGame {
    pub game_id: String,
    pub white_player_id: String,
    pub black_player_id: String,
}

/// Facade over the session table for the legacy operations.
pub struct ArenaApi<'a> {
    sessions: &'a mut SessionManager,
    store: Option<&'a GameStore>,
}

impl<'a> ArenaApi<'a> {
    pub fn new(sessions: &'a mut SessionManager) -> Self {
        Self {
            sessions,
            store: None,
        }
    }

    /// Persist the table through `store` after each state-changing call.
    pub fn with_store(sessions: &'a mut SessionManager, store: &'a GameStore) -> Self {
        Self {
            sessions,
            store: Some(store),
        }
    }

    /// Creates a detached game and returns its identifiers.
    pub fn create_game(&mut self, rng: &mut impl Rng) -> CreatedGame {
        let session = self.sessions.create_detached(rng);
        let created = CreatedGame {
            game_id: session.game_id.clone(),
            white_player_id: session.participant_by_color(Color::White).player_id.clone(),
            black_player_id: session.participant_by_color(Color::Black).player_id.clone(),
        };
        self.persist();
        created
    }

    /// Current board state of a game.
    pub fn board(&self, game_id: &str) -> Result<BoardView, ApiError> {
        let session = self.sessions.session(game_id).ok_or(ApiError::UnknownGame)?;
        Ok(Self::view(game_id, session))
    }

    /// All legal moves in the game's current position.
    pub fn legal_moves(&self, game_id: &str) -> Result<Vec<String>, ApiError> {
        let session = self.sessions.session(game_id).ok_or(ApiError::UnknownGame)?;
        Ok(session.position.legal_moves())
    }

    /// Whose turn it is to move.
    pub fn turn(&self, game_id: &str) -> Result<Color, ApiError> {
        let session = self.sessions.session(game_id).ok_or(ApiError::UnknownGame)?;
        Ok(session.position.turn())
    }

    /// Submits a move for the given side.
    pub fn submit_move(
        &mut self,
        game_id: &str,
        color: Color,
        san: &str,
    ) -> Result<BoardView, ApiError> {
        let session = self
            .sessions
            .session_mut(game_id)
            .ok_or(ApiError::UnknownGame)?;
        let player_id = session.participant_by_color(color).player_id.clone();

        match session.submit_move(&player_id, san) {
            Ok(_) => {}
            Err(SessionError::NotYourTurn { current_turn }) => {
                return Err(ApiError::NotYourTurn { current_turn })
            }
            Err(SessionError::IllegalMove { message }) => {
                return Err(ApiError::IllegalMove { message })
            }
            Err(SessionError::SessionTerminal) => return Err(ApiError::GameOver),
            Err(other) => {
                return Err(ApiError::ReplayFailed {
                    message: other.to_string(),
                })
            }
        }

        let view = Self::view(game_id, self.sessions.session(game_id).unwrap());
        self.persist();
        Ok(view)
    }

    /// Replays a game from a PGN-style move script, replacing the game's
    /// position. The replay is atomic: a script that fails partway leaves
    /// the game exactly as it was.
    pub fn replay(&mut self, game_id: &str, movetext: &str) -> Result<BoardView, ApiError> {
        let session = self
            .sessions
            .session_mut(game_id)
            .ok_or(ApiError::UnknownGame)?;

        let mut position = Position::initial();
        for san in parse_movetext(movetext) {
            position = position
                .apply_san(&san)
                .map_err(|e| ApiError::ReplayFailed {
                    message: e.to_string(),
                })?;
        }

        session.position = position;
        session.status = if session.position.is_game_over() {
            SessionStatus::Completed {
                reason: session.position.status_description(),
            }
        } else {
            SessionStatus::Active
        };

        let view = Self::view(game_id, self.sessions.session(game_id).unwrap());
        self.persist();
        Ok(view)
    }

    /// Resets a game to the starting position.
    pub fn reset(&mut self, game_id: &str) -> Result<BoardView, ApiError> {
        let session = self
            .sessions
            .session_mut(game_id)
            .ok_or(ApiError::UnknownGame)?;

        session.position = Position::initial();
        session.status = SessionStatus::Active;

        let view = Self::view(game_id, self.sessions.session(game_id).unwrap());
        self.persist();
        Ok(view)
    }

    fn view(game_id: &str, session: &crate::session::GameSession) -> BoardView {
        let snapshot = session.snapshot();
        BoardView {
            game_id: game_id.to_string(),
            rendered: render::render(&snapshot.board),
            board: snapshot.board,
            fen: snapshot.fen,
            game_over: snapshot.game_over,
            game_over_reason: snapshot.status_description,
        }
    }

    fn persist(&self) {
        if let Some(store) = self.store {
            if let Err(e) = store.save(self.sessions) {
                error!("Failed to write game snapshot: {}", e);
            }
        }
    }
}

/// Splits PGN-style movetext into bare SAN tokens, dropping move numbers
/// and result markers.
pub fn parse_movetext(movetext: &str) -> Vec<String> {
    movetext
        .split_whitespace()
        .filter(|token| !matches!(*token, "1-0" | "0-1" | "1/2-1/2" | "*"))
        .map(|token| {
            token
                .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
                .to_string()
        })
        .filter(|san| !san.is_empty())
        .collect()
}
