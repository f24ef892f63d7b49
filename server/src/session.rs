//! Game session supervision: participant connectivity, disconnect grace
//! periods and forfeit/cancellation decisions
//!
//! A `GameSession` is pure state-machine logic: it never spawns tasks, never
//! touches the network and never sleeps. Disconnect deadlines are armed by
//! the network layer; the session only records who is disconnected and
//! stamps every grace period with a sequence number so a deadline that
//! fires after being superseded (reconnect, or a fresh disconnect) is
//! recognized as stale and ignored. This keeps the entire lifecycle
//! testable without a transport.

use crate::engine::Position;
use log::info;
use rand::Rng;
use shared::Color;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Generates a random 128-bit hex identifier.
pub fn random_id(rng: &mut impl Rng) -> String {
    format!("{:032x}", rng.gen::<u128>())
}

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// The rule engine reported a terminal position.
    Completed { reason: String },
    /// A participant failed to reconnect within the grace period.
    Forfeited { winner: String },
    /// Both participants were disconnected at the same time.
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }
}

/// One seat in a session.
#[derive(Debug, Clone)]
pub struct Participant {
    pub player_id: String,
    /// Live connection currently bound to this seat; `None` while
    /// disconnected or for seats that were never attached to a transport.
    pub connection_id: Option<u64>,
    /// Fixed at creation, never reassigned.
    pub color: Color,
    /// Secret required to reconnect into this seat.
    pub token: String,
    pub disconnected_at: Option<Instant>,
    /// Sequence of the currently armed forfeit deadline. Only meaningful
    /// while `disconnected_at` is set.
    pub timer_seq: u64,
}

/// Rejection of a session operation. Rejections are side-effect-free: the
/// position, turn owner and connectivity state are left exactly as they
/// were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotParticipant,
    NotYourTurn { current_turn: Color },
    IllegalMove { message: String },
    SessionTerminal,
    /// Reconnect for a seat that is not waiting for one.
    ReconnectNotPending,
    InvalidToken,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotParticipant => write!(f, "not a participant of this game"),
            SessionError::NotYourTurn { current_turn } => {
                write!(f, "it is {}'s turn to move", current_turn)
            }
            SessionError::IllegalMove { message } => write!(f, "{}", message),
            SessionError::SessionTerminal => write!(f, "game is already over"),
            SessionError::ReconnectNotPending => {
                write!(f, "no reconnection pending for this player")
            }
            SessionError::InvalidToken => write!(f, "invalid reconnection token"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Successful move application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub game_over: bool,
    pub status_description: String,
}

/// What a disconnect resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// Seat freed, grace period running: arm a forfeit deadline carrying
    /// `timer_seq` and notify the opponent if they are still connected.
    GracePeriod {
        player_id: String,
        timer_seq: u64,
        opponent_connection: Option<u64>,
    },
    /// The opponent was already down; no one is left to resume for.
    Cancelled,
}

/// Successful reconnection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectOutcome {
    /// Forfeit deadline to disarm, if one was armed.
    pub disarmed_seq: Option<u64>,
    pub opponent_connection: Option<u64>,
}

/// Forfeit resolution after an expired grace period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForfeitOutcome {
    pub winner_player_id: String,
    pub winner_connection: Option<u64>,
}

/// Read-only view of a session for board queries and the legacy surface.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub game_id: String,
    pub fen: String,
    pub board: Vec<Vec<char>>,
    pub turn: Color,
    pub game_over: bool,
    pub status_description: String,
}

/// One two-party match and its rule-engine position handle.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub game_id: String,
    pub participants: [Participant; 2],
    pub position: Position,
    pub status: SessionStatus,
    next_timer_seq: u64,
}

impl GameSession {
    /// Creates a session for two freshly matched connections.
    ///
    /// Colors are assigned uniformly at random. Panics if both seats would
    /// be bound to the same connection; the queue's dedup rule makes that
    /// unreachable.
    pub fn create(
        game_id: String,
        connection_a: u64,
        connection_b: u64,
        rng: &mut impl Rng,
    ) -> Self {
        assert_ne!(
            connection_a, connection_b,
            "a session must have two distinct connections"
        );

        let a_is_white: bool = rng.gen();
        let (color_a, color_b) = if a_is_white {
            (Color::White, Color::Black)
        } else {
            (Color::Black, Color::White)
        };

        let session = Self {
            game_id,
            participants: [
                Participant {
                    player_id: random_id(rng),
                    connection_id: Some(connection_a),
                    color: color_a,
                    token: random_id(rng),
                    disconnected_at: None,
                    timer_seq: 0,
                },
                Participant {
                    player_id: random_id(rng),
                    connection_id: Some(connection_b),
                    color: color_b,
                    token: random_id(rng),
                    disconnected_at: None,
                    timer_seq: 0,
                },
            ],
            position: Position::initial(),
            status: SessionStatus::Active,
            next_timer_seq: 1,
        };

        info!(
            "Game {} created ({} as white, {} as black)",
            session.game_id,
            session.participant_by_color(Color::White).player_id,
            session.participant_by_color(Color::Black).player_id,
        );
        session
    }

    /// Creates a session with no transport bindings, for the legacy
    /// request/response surface. No disconnect-grace behavior applies until
    /// a seat is explicitly attached via reconnection.
    pub fn create_detached(game_id: String, rng: &mut impl Rng) -> Self {
        Self {
            game_id,
            participants: [
                Participant {
                    player_id: random_id(rng),
                    connection_id: None,
                    color: Color::White,
                    token: random_id(rng),
                    disconnected_at: None,
                    timer_seq: 0,
                },
                Participant {
                    player_id: random_id(rng),
                    connection_id: None,
                    color: Color::Black,
                    token: random_id(rng),
                    disconnected_at: None,
                    timer_seq: 0,
                },
            ],
            position: Position::initial(),
            status: SessionStatus::Active,
            next_timer_seq: 1,
        }
    }

    /// Rebuilds a session from its persisted state. Seats come back
    /// unbound; participants resume via reconnection.
    pub fn restore(
        game_id: String,
        position: Position,
        players: [(String, Color, String); 2],
        status: SessionStatus,
    ) -> Self {
        let [first, second] = players;
        Self {
            game_id,
            participants: [
                Participant {
                    player_id: first.0,
                    connection_id: None,
                    color: first.1,
                    token: first.2,
                    disconnected_at: None,
                    timer_seq: 0,
                },
                Participant {
                    player_id: second.0,
                    connection_id: None,
                    color: second.1,
                    token: second.2,
                    disconnected_at: None,
                    timer_seq: 0,
                },
            ],
            position,
            status,
            next_timer_seq: 1,
        }
    }

    pub fn participant(&self, player_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.player_id == player_id)
    }

    pub fn participant_by_color(&self, color: Color) -> &Participant {
        self.participants
            .iter()
            .find(|p| p.color == color)
            .expect("colors are a permutation of white and black")
    }

    /// The participant whose turn it is according to the rule engine.
    pub fn turn_owner(&self) -> &Participant {
        self.participant_by_color(self.position.turn())
    }

    fn index_of_player(&self, player_id: &str) -> Option<usize> {
        self.participants
            .iter()
            .position(|p| p.player_id == player_id)
    }

    fn index_of_connection(&self, connection_id: u64) -> Option<usize> {
        self.participants
            .iter()
            .position(|p| p.connection_id == Some(connection_id))
    }

    /// Applies a move for `player_id`. Rejections leave the session
    /// untouched; success advances the position, recomputes the turn owner
    /// and transitions to `Completed` on a terminal position.
    pub fn submit_move(
        &mut self,
        player_id: &str,
        san: &str,
    ) -> Result<MoveOutcome, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionTerminal);
        }

        let idx = self
            .index_of_player(player_id)
            .ok_or(SessionError::NotParticipant)?;

        let current_turn = self.position.turn();
        if self.participants[idx].color != current_turn {
            return Err(SessionError::NotYourTurn { current_turn });
        }

        let next = self.position.apply_san(san).map_err(|_| {
            let legal = self.position.legal_moves();
            let shown: Vec<&str> = legal.iter().take(20).map(String::as_str).collect();
            let ellipsis = if legal.len() > 20 { "..." } else { "" };
            SessionError::IllegalMove {
                message: format!(
                    "ILLEGAL MOVE ATTEMPTED: '{}' | Position: {} | Legal moves ({}): {}{}",
                    san,
                    self.position.fen(),
                    legal.len(),
                    shown.join(", "),
                    ellipsis
                ),
            }
        })?;

        self.position = next;

        let game_over = self.position.is_game_over();
        let status_description = self.position.status_description();
        if game_over {
            info!("Game {} completed: {}", self.game_id, status_description);
            self.status = SessionStatus::Completed {
                reason: status_description.clone(),
            };
        }

        Ok(MoveOutcome {
            game_over,
            status_description,
        })
    }

    /// Read-only state snapshot. Never fails.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game_id: self.game_id.clone(),
            fen: self.position.fen(),
            board: self.position.grid(),
            turn: self.position.turn(),
            game_over: self.status.is_terminal(),
            status_description: match &self.status {
                SessionStatus::Active => self.position.status_description(),
                SessionStatus::Completed { reason } => reason.clone(),
                SessionStatus::Forfeited { winner } => {
                    format!("Forfeit - {} wins", winner)
                }
                SessionStatus::Cancelled => "Cancelled".to_string(),
            },
        }
    }

    /// Routes a transport drop to the owning seat.
    ///
    /// Each disconnect arms a fresh grace deadline; any deadline armed by an
    /// earlier disconnect of the same seat is superseded, never stacked.
    /// Returns `None` when the connection is not bound here or the session
    /// is already terminal.
    pub fn on_disconnect(
        &mut self,
        connection_id: u64,
        now: Instant,
    ) -> Option<DisconnectOutcome> {
        if self.status.is_terminal() {
            return None;
        }

        let idx = self.index_of_connection(connection_id)?;
        let opponent_idx = 1 - idx;

        let timer_seq = self.next_timer_seq;
        self.next_timer_seq += 1;

        self.participants[idx].connection_id = None;
        self.participants[idx].disconnected_at = Some(now);
        self.participants[idx].timer_seq = timer_seq;

        let opponent_down = self.participants[opponent_idx].connection_id.is_none();
        if opponent_down {
            info!(
                "Game {} cancelled: both participants disconnected",
                self.game_id
            );
            self.status = SessionStatus::Cancelled;
            return Some(DisconnectOutcome::Cancelled);
        }

        info!(
            "Game {}: player {} disconnected, grace period started",
            self.game_id, self.participants[idx].player_id
        );
        Some(DisconnectOutcome::GracePeriod {
            player_id: self.participants[idx].player_id.clone(),
            timer_seq,
            opponent_connection: self.participants[opponent_idx].connection_id,
        })
    }

    /// Rebinds a seat to a new connection during its grace period (or
    /// attaches a seat restored from disk). Disarms the pending forfeit
    /// deadline, if any.
    pub fn on_reconnect(
        &mut self,
        player_id: &str,
        token: &str,
        new_connection_id: u64,
    ) -> Result<ReconnectOutcome, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionTerminal);
        }

        let idx = self
            .index_of_player(player_id)
            .ok_or(SessionError::NotParticipant)?;

        if self.participants[idx].token != token {
            return Err(SessionError::InvalidToken);
        }
        if self.participants[idx].connection_id.is_some() {
            return Err(SessionError::ReconnectNotPending);
        }

        let disarmed_seq = self.participants[idx]
            .disconnected_at
            .take()
            .map(|_| self.participants[idx].timer_seq);
        self.participants[idx].connection_id = Some(new_connection_id);

        info!(
            "Game {}: player {} reconnected on connection {}",
            self.game_id, player_id, new_connection_id
        );
        Ok(ReconnectOutcome {
            disarmed_seq,
            opponent_connection: self.participants[1 - idx].connection_id,
        })
    }

    /// Resolves an expired forfeit deadline. Returns `None` when the
    /// deadline is stale: the seat reconnected, a later disconnect armed a
    /// fresh deadline, or the session already ended.
    pub fn forfeit_expired(
        &mut self,
        player_id: &str,
        timer_seq: u64,
    ) -> Option<ForfeitOutcome> {
        if self.status.is_terminal() {
            return None;
        }

        let idx = self.index_of_player(player_id)?;
        let seat = &self.participants[idx];
        if seat.disconnected_at.is_none() || seat.timer_seq != timer_seq {
            return None;
        }

        let winner = &self.participants[1 - idx];
        let outcome = ForfeitOutcome {
            winner_player_id: winner.player_id.clone(),
            winner_connection: winner.connection_id,
        };

        info!(
            "Game {} forfeited: {} failed to reconnect, {} wins",
            self.game_id, player_id, outcome.winner_player_id
        );
        self.status = SessionStatus::Forfeited {
            winner: outcome.winner_player_id.clone(),
        };
        Some(outcome)
    }
}

/// Process-wide table of live sessions.
///
/// The table never indexes connections: the registry is the single source
/// of truth for which session a connection belongs to.
pub struct SessionManager {
    sessions: HashMap<String, GameSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Creates a session for two matched connections and returns it.
    pub fn create_session(
        &mut self,
        connection_a: u64,
        connection_b: u64,
        rng: &mut impl Rng,
    ) -> &GameSession {
        let game_id = random_id(rng);
        let session = GameSession::create(game_id.clone(), connection_a, connection_b, rng);
        self.sessions.insert(game_id.clone(), session);
        &self.sessions[&game_id]
    }

    /// Creates a detached session for the legacy surface.
    pub fn create_detached(&mut self, rng: &mut impl Rng) -> &GameSession {
        let game_id = random_id(rng);
        let session = GameSession::create_detached(game_id.clone(), rng);
        self.sessions.insert(game_id.clone(), session);
        &self.sessions[&game_id]
    }

    pub fn insert(&mut self, session: GameSession) {
        self.sessions.insert(session.game_id.clone(), session);
    }

    pub fn session(&self, game_id: &str) -> Option<&GameSession> {
        self.sessions.get(game_id)
    }

    pub fn session_mut(&mut self, game_id: &str) -> Option<&mut GameSession> {
        self.sessions.get_mut(game_id)
    }

    /// Drops a session and frees its in-memory resources.
    pub fn remove_session(&mut self, game_id: &str) -> Option<GameSession> {
        self.sessions.remove(game_id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &GameSession> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn new_session() -> GameSession {
        GameSession::create("g1".to_string(), 1, 2, &mut rng())
    }

    fn white_id(session: &GameSession) -> String {
        session.participant_by_color(Color::White).player_id.clone()
    }

    fn black_id(session: &GameSession) -> String {
        session.participant_by_color(Color::Black).player_id.clone()
    }

    #[test]
    fn test_create_assigns_complementary_colors() {
        let session = new_session();

        let colors: Vec<Color> = session.participants.iter().map(|p| p.color).collect();
        assert!(colors.contains(&Color::White));
        assert!(colors.contains(&Color::Black));
        assert_ne!(
            session.participants[0].player_id,
            session.participants[1].player_id
        );
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[test]
    #[should_panic]
    fn test_create_rejects_duplicate_connection() {
        GameSession::create("g1".to_string(), 1, 1, &mut rng());
    }

    #[test]
    fn test_turn_owner_starts_with_white() {
        let session = new_session();
        assert_eq!(session.turn_owner().color, Color::White);
        assert_eq!(session.turn_owner().player_id, white_id(&session));
    }

    #[test]
    fn test_submit_move_advances_turn() {
        let mut session = new_session();
        let white = white_id(&session);

        let outcome = session.submit_move(&white, "e4").unwrap();
        assert!(!outcome.game_over);
        assert_eq!(session.turn_owner().color, Color::Black);
    }

    #[test]
    fn test_submit_move_out_of_turn_is_side_effect_free() {
        let mut session = new_session();
        let black = black_id(&session);
        let fen_before = session.position.fen();

        let err = session.submit_move(&black, "e5").unwrap_err();
        assert_eq!(
            err,
            SessionError::NotYourTurn {
                current_turn: Color::White
            }
        );
        assert_eq!(session.position.fen(), fen_before);
        assert_eq!(session.turn_owner().color, Color::White);
    }

    #[test]
    fn test_submit_move_unknown_player() {
        let mut session = new_session();
        let err = session.submit_move("nobody", "e4").unwrap_err();
        assert_eq!(err, SessionError::NotParticipant);
    }

    #[test]
    fn test_submit_illegal_move_is_side_effect_free() {
        let mut session = new_session();
        let white = white_id(&session);
        let fen_before = session.position.fen();

        let err = session.submit_move(&white, "Ke2").unwrap_err();
        match err {
            SessionError::IllegalMove { message } => {
                assert!(message.contains("ILLEGAL MOVE ATTEMPTED: 'Ke2'"));
                assert!(message.contains("Legal moves (20)"));
            }
            other => panic!("expected IllegalMove, got {:?}", other),
        }
        assert_eq!(session.position.fen(), fen_before);
    }

    #[test]
    fn test_terminal_move_completes_session() {
        let mut session = new_session();
        let white = white_id(&session);
        let black = black_id(&session);

        for (player, san) in [
            (&white, "e4"),
            (&black, "e5"),
            (&white, "Bc4"),
            (&black, "Nc6"),
            (&white, "Qh5"),
            (&black, "Nf6"),
        ] {
            session.submit_move(player, san).unwrap();
        }
        let outcome = session.submit_move(&white, "Qxf7#").unwrap();

        assert!(outcome.game_over);
        assert_eq!(outcome.status_description, "Checkmate - White wins");
        assert_eq!(
            session.status,
            SessionStatus::Completed {
                reason: "Checkmate - White wins".to_string()
            }
        );

        // Terminal sessions accept no further moves.
        let err = session.submit_move(&black, "a6").unwrap_err();
        assert_eq!(err, SessionError::SessionTerminal);
    }

    #[test]
    fn test_disconnect_starts_grace_period() {
        let mut session = new_session();

        match session.on_disconnect(1, Instant::now()).unwrap() {
            DisconnectOutcome::GracePeriod {
                player_id,
                timer_seq,
                opponent_connection,
            } => {
                assert_eq!(Some(&player_id), session.participants.iter().find(|p| p.connection_id.is_none()).map(|p| &p.player_id));
                assert_eq!(timer_seq, 1);
                assert_eq!(opponent_connection, Some(2));
            }
            DisconnectOutcome::Cancelled => panic!("opponent was still connected"),
        }
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[test]
    fn test_second_disconnect_cancels() {
        let mut session = new_session();
        let now = Instant::now();

        session.on_disconnect(1, now).unwrap();
        let outcome = session.on_disconnect(2, now).unwrap();

        assert_eq!(outcome, DisconnectOutcome::Cancelled);
        assert_eq!(session.status, SessionStatus::Cancelled);
    }

    #[test]
    fn test_disconnect_unknown_connection() {
        let mut session = new_session();
        assert!(session.on_disconnect(99, Instant::now()).is_none());
    }

    #[test]
    fn test_reconnect_within_grace_restores_session() {
        let mut session = new_session();
        let now = Instant::now();

        let (player_id, timer_seq) = match session.on_disconnect(1, now).unwrap() {
            DisconnectOutcome::GracePeriod {
                player_id,
                timer_seq,
                ..
            } => (player_id, timer_seq),
            other => panic!("expected grace period, got {:?}", other),
        };
        let token = session.participant(&player_id).unwrap().token.clone();

        let outcome = session.on_reconnect(&player_id, &token, 3).unwrap();
        assert_eq!(outcome.disarmed_seq, Some(timer_seq));
        assert_eq!(outcome.opponent_connection, Some(2));

        let seat = session.participant(&player_id).unwrap();
        assert_eq!(seat.connection_id, Some(3));
        assert!(seat.disconnected_at.is_none());
        assert_eq!(session.status, SessionStatus::Active);

        // The disarmed deadline is stale if it fires anyway.
        assert!(session.forfeit_expired(&player_id, timer_seq).is_none());
    }

    #[test]
    fn test_reconnect_with_invalid_token() {
        let mut session = new_session();
        let now = Instant::now();

        let player_id = match session.on_disconnect(1, now).unwrap() {
            DisconnectOutcome::GracePeriod { player_id, .. } => player_id,
            other => panic!("expected grace period, got {:?}", other),
        };

        let err = session.on_reconnect(&player_id, "wrong", 3).unwrap_err();
        assert_eq!(err, SessionError::InvalidToken);
        assert!(session.participant(&player_id).unwrap().connection_id.is_none());
    }

    #[test]
    fn test_reconnect_while_connected_is_rejected() {
        let mut session = new_session();
        let player_id = session.participants[0].player_id.clone();
        let token = session.participants[0].token.clone();

        let err = session.on_reconnect(&player_id, &token, 3).unwrap_err();
        assert_eq!(err, SessionError::ReconnectNotPending);
    }

    #[test]
    fn test_forfeit_after_grace_period() {
        let mut session = new_session();
        let now = Instant::now() - Duration::from_secs(70);

        let (player_id, timer_seq) = match session.on_disconnect(1, now).unwrap() {
            DisconnectOutcome::GracePeriod {
                player_id,
                timer_seq,
                ..
            } => (player_id, timer_seq),
            other => panic!("expected grace period, got {:?}", other),
        };

        let outcome = session.forfeit_expired(&player_id, timer_seq).unwrap();
        assert_eq!(outcome.winner_connection, Some(2));
        assert_eq!(
            session.status,
            SessionStatus::Forfeited {
                winner: outcome.winner_player_id.clone()
            }
        );

        // Terminal: nothing else can happen.
        assert!(session.on_disconnect(2, Instant::now()).is_none());
        let white = white_id(&session);
        assert_eq!(
            session.submit_move(&white, "e4").unwrap_err(),
            SessionError::SessionTerminal
        );
    }

    #[test]
    fn test_repeat_disconnect_supersedes_earlier_deadline() {
        let mut session = new_session();
        let now = Instant::now();

        let (player_id, first_seq) = match session.on_disconnect(1, now).unwrap() {
            DisconnectOutcome::GracePeriod {
                player_id,
                timer_seq,
                ..
            } => (player_id, timer_seq),
            other => panic!("expected grace period, got {:?}", other),
        };
        let token = session.participant(&player_id).unwrap().token.clone();
        session.on_reconnect(&player_id, &token, 3).unwrap();

        let second_seq = match session.on_disconnect(3, now).unwrap() {
            DisconnectOutcome::GracePeriod { timer_seq, .. } => timer_seq,
            other => panic!("expected grace period, got {:?}", other),
        };
        assert_ne!(first_seq, second_seq);

        // The first deadline must not resolve the second grace period.
        assert!(session.forfeit_expired(&player_id, first_seq).is_none());
        assert_eq!(session.status, SessionStatus::Active);

        let outcome = session.forfeit_expired(&player_id, second_seq).unwrap();
        assert_eq!(outcome.winner_connection, Some(2));
    }

    #[test]
    fn test_detached_session_has_no_bindings() {
        let session = GameSession::create_detached("g2".to_string(), &mut rng());

        assert!(session.participants.iter().all(|p| p.connection_id.is_none()));
        assert_eq!(session.participants[0].color, Color::White);
        assert_eq!(session.participants[1].color, Color::Black);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.turn, Color::White);
        assert!(!snapshot.game_over);
    }

    #[test]
    fn test_restored_session_attaches_via_reconnect() {
        let position = Position::initial().apply_san("e4").unwrap();
        let mut session = GameSession::restore(
            "g3".to_string(),
            position,
            [
                ("pw".to_string(), Color::White, "tw".to_string()),
                ("pb".to_string(), Color::Black, "tb".to_string()),
            ],
            SessionStatus::Active,
        );

        let outcome = session.on_reconnect("pb", "tb", 5).unwrap();
        // No grace deadline was armed for a restored seat.
        assert_eq!(outcome.disarmed_seq, None);
        assert_eq!(session.participant("pb").unwrap().connection_id, Some(5));
        assert_eq!(session.turn_owner().player_id, "pb");
    }

    #[test]
    fn test_manager_create_and_remove() {
        let mut manager = SessionManager::new();
        let mut rng = rng();

        let game_id = manager.create_session(1, 2, &mut rng).game_id.clone();
        assert_eq!(manager.len(), 1);
        assert!(manager.session(&game_id).is_some());

        manager.remove_session(&game_id);
        assert!(manager.is_empty());
        assert!(manager.session(&game_id).is_none());
    }
}
