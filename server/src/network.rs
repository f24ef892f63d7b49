//! Server network layer: UDP transport, message routing and lifecycle timers
//!
//! This is the only module aware of wire frame shapes. Inbound frames are
//! decoded by a receiver task and funneled into the main loop, which owns
//! the matchmaking queue and the session table and serializes every mutation
//! (moves on one game can never be applied concurrently). The registry is
//! shared with a liveness checker task behind an `RwLock`; no lock is ever
//! held across an await that takes another.
//!
//! Grace deadlines (queue wait, forfeit) are independent spawned tasks that
//! sleep once and post a sequence-stamped message back to the loop. A
//! disarm aborts the task, and the sequence is validated again on arrival,
//! so a deadline racing its disarm can never resolve a superseded state.

use crate::persistence::GameStore;
use crate::queue::{JoinOutcome, MatchQueue};
use crate::registry::{Association, ConnectionRegistry};
use crate::render;
use crate::session::{DisconnectOutcome, GameSession, MoveOutcome, SessionManager};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{GameEndStatus, Packet, PROTOCOL_VERSION};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Tunable limits and windows for a server instance.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// How long a queued connection waits before queue-timeout eviction.
    pub queue_timeout: Duration,
    /// Grace period granted to a disconnected participant.
    pub forfeit_timeout: Duration,
    /// Transport silence treated as a connection drop.
    pub liveness_timeout: Duration,
    /// Location of the session snapshot file.
    pub snapshot_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections: 64,
            queue_timeout: Duration::from_secs(60),
            forfeit_timeout: Duration::from_secs(60),
            liveness_timeout: Duration::from_secs(10),
            snapshot_path: PathBuf::from("/tmp/chess_arena/games.json"),
        }
    }
}

/// Messages sent from background tasks to the main server loop.
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    /// A connection stayed silent past the liveness window.
    ConnectionTimeout {
        connection_id: u64,
    },
    /// A queued connection's waiting deadline fired.
    QueueDeadline {
        connection_id: u64,
        timer_seq: u64,
    },
    /// A disconnected participant's grace deadline fired.
    ForfeitDeadline {
        game_id: String,
        player_id: String,
        timer_seq: u64,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the main loop to the network sender task.
#[derive(Debug)]
pub enum OutboundMessage {
    SendPacket { packet: Packet, addr: SocketAddr },
}

/// Main server coordinating transport, matchmaking and session supervision.
pub struct Server {
    socket: Arc<UdpSocket>,
    registry: Arc<RwLock<ConnectionRegistry>>,
    queue: MatchQueue,
    sessions: SessionManager,
    store: GameStore,
    config: ServerConfig,
    rng: StdRng,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,

    // Armed deadline tasks, disarmed by abort and revalidated by sequence
    queue_timers: HashMap<u64, JoinHandle<()>>,
    forfeit_timers: HashMap<(String, String), JoinHandle<()>>,
}

impl Server {
    pub async fn new(
        addr: &str,
        config: ServerConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let store = GameStore::new(config.snapshot_path.clone());
        let mut sessions = SessionManager::new();
        let restored = store.load();
        if !restored.is_empty() {
            info!("Restored {} persisted game(s)", restored.len());
        }
        for session in restored {
            sessions.insert(session);
        }

        Ok(Server {
            socket,
            registry: Arc::new(RwLock::new(ConnectionRegistry::new(config.max_connections))),
            queue: MatchQueue::new(),
            sessions,
            store,
            config,
            rng: StdRng::from_entropy(),
            server_tx,
            server_rx,
            out_tx,
            out_rx,
            queue_timers: HashMap::new(),
            forfeit_timers: HashMap::new(),
        })
    }

    /// Address the server is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes the outgoing packet queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let mut out_rx = std::mem::replace(&mut self.out_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = out_rx.recv().await {
                match message {
                    OutboundMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors transport liveness
    fn spawn_liveness_checker(&self) {
        let registry = Arc::clone(&self.registry);
        let server_tx = self.server_tx.clone();
        let window = self.config.liveness_timeout;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let registry_guard = registry.read().await;
                    registry_guard.check_timeouts(window)
                };

                for connection_id in timed_out {
                    if let Err(e) =
                        server_tx.send(ServerMessage::ConnectionTimeout { connection_id })
                    {
                        error!("Failed to send timeout message: {}", e);
                        break;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.out_tx.send(OutboundMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    async fn send_to_connection(&self, connection_id: u64, packet: Packet) {
        let addr = {
            let registry = self.registry.read().await;
            registry.addr_of(connection_id)
        };
        match addr {
            Some(addr) => self.send(packet, addr),
            None => debug!(
                "Dropping outbound packet for vanished connection {}",
                connection_id
            ),
        }
    }

    fn send_error(&self, message: impl Into<String>, addr: SocketAddr) {
        self.send(
            Packet::Error {
                message: message.into(),
            },
            addr,
        );
    }

    fn persist(&self) {
        // In-memory state stays authoritative; a failed write is reported
        // and the triggering operation proceeds.
        if let Err(e) = self.store.save(&self.sessions) {
            error!("Failed to write game snapshot: {}", e);
        }
    }

    fn arm_queue_timer(&mut self, connection_id: u64, timer_seq: u64) {
        let server_tx = self.server_tx.clone();
        let timeout = self.config.queue_timeout;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = server_tx.send(ServerMessage::QueueDeadline {
                connection_id,
                timer_seq,
            });
        });
        if let Some(old) = self.queue_timers.insert(connection_id, handle) {
            old.abort();
        }
    }

    fn disarm_queue_timer(&mut self, connection_id: u64) {
        if let Some(handle) = self.queue_timers.remove(&connection_id) {
            handle.abort();
        }
    }

    fn arm_forfeit_timer(&mut self, game_id: String, player_id: String, timer_seq: u64) {
        let server_tx = self.server_tx.clone();
        let timeout = self.config.forfeit_timeout;
        let key = (game_id.clone(), player_id.clone());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = server_tx.send(ServerMessage::ForfeitDeadline {
                game_id,
                player_id,
                timer_seq,
            });
        });
        if let Some(old) = self.forfeit_timers.insert(key, handle) {
            old.abort();
        }
    }

    fn disarm_forfeit_timer(&mut self, game_id: &str, player_id: &str) {
        if let Some(handle) = self
            .forfeit_timers
            .remove(&(game_id.to_string(), player_id.to_string()))
        {
            handle.abort();
        }
    }

    /// Routes one inbound frame to the queue or the owning session.
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        let sender = {
            let registry = self.registry.read().await;
            registry.find_by_addr(addr)
        };
        if let Some(connection_id) = sender {
            let mut registry = self.registry.write().await;
            registry.touch(connection_id);
        }

        match packet {
            Packet::Connect { client_version } => {
                self.handle_connect(client_version, sender, addr).await;
            }

            Packet::JoinQueue => match sender {
                Some(connection_id) => self.handle_join_queue(connection_id, addr).await,
                None => self.send_error("unknown connection, connect first", addr),
            },

            Packet::MakeMove {
                game_id,
                player_id,
                san,
            } => match sender {
                Some(connection_id) => {
                    self.handle_make_move(connection_id, addr, &game_id, &player_id, &san)
                        .await;
                }
                None => self.send_error("unknown connection, connect first", addr),
            },

            Packet::GetBoard { game_id } => match sender {
                Some(connection_id) => {
                    self.handle_get_board(connection_id, addr, &game_id).await;
                }
                None => self.send_error("unknown connection, connect first", addr),
            },

            Packet::Reconnect {
                game_id,
                player_id,
                token,
            } => match sender {
                Some(connection_id) => {
                    self.handle_reconnect(connection_id, addr, &game_id, &player_id, &token)
                        .await;
                }
                None => self.send_error("unknown connection, connect first", addr),
            },

            Packet::Ping => {
                if sender.is_some() {
                    self.send(Packet::Pong, addr);
                } else {
                    self.send_error("unknown connection, connect first", addr);
                }
            }

            Packet::Disconnect => {
                if let Some(connection_id) = sender {
                    self.handle_transport_drop(connection_id, "client disconnect")
                        .await;
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
                self.send_error("unexpected packet type", addr);
            }
        }
    }

    async fn handle_connect(
        &mut self,
        client_version: u32,
        existing: Option<u64>,
        addr: SocketAddr,
    ) {
        if client_version != PROTOCOL_VERSION {
            self.send_error(
                format!(
                    "unsupported protocol version {} (server speaks {})",
                    client_version, PROTOCOL_VERSION
                ),
                addr,
            );
            return;
        }

        // A fresh handshake from a known address replaces the old transport
        // session; the old one is routed through normal disconnect handling
        // so any game seat enters its grace period.
        if let Some(existing_id) = existing {
            info!("Replacing existing connection {} from {}", existing_id, addr);
            self.handle_transport_drop(existing_id, "superseded by new handshake")
                .await;
        }

        let registered = {
            let mut registry = self.registry.write().await;
            registry.register(addr)
        };

        match registered {
            Some(connection_id) => {
                self.send(Packet::Connected { connection_id }, addr);
            }
            None => {
                self.send_error("Server full", addr);
            }
        }
    }

    async fn handle_join_queue(&mut self, connection_id: u64, addr: SocketAddr) {
        let association = {
            let registry = self.registry.read().await;
            registry.lookup(connection_id).cloned()
        };

        match association {
            Ok(Association::Idle) | Ok(Association::Queued) => {}
            Ok(Association::InGame { .. }) => {
                self.send_error("already in a game", addr);
                return;
            }
            Err(e) => {
                self.send_error(e.to_string(), addr);
                return;
            }
        }

        {
            let mut registry = self.registry.write().await;
            registry.set_association(connection_id, Association::Queued);
        }

        // Re-joining is idempotent: the entry is replaced and its waiting
        // deadline re-armed, never duplicated.
        let timer_seq = match self.queue.join(connection_id, Instant::now()) {
            JoinOutcome::Joined { timer_seq } => timer_seq,
            JoinOutcome::Rejoined { timer_seq, .. } => timer_seq,
        };
        self.arm_queue_timer(connection_id, timer_seq);

        while let Some((first, second)) = self.queue.try_pair() {
            self.create_match(first, second).await;
        }
    }

    /// Creates a session for two paired connections and announces the match.
    async fn create_match(&mut self, first: u64, second: u64) {
        self.disarm_queue_timer(first);
        self.disarm_queue_timer(second);

        let (game_id, first_move, seats) = {
            let session = self.sessions.create_session(first, second, &mut self.rng);
            let seats: Vec<(u64, String, shared::Color, String)> = session
                .participants
                .iter()
                .map(|p| {
                    (
                        p.connection_id.expect("fresh sessions bind both seats"),
                        p.player_id.clone(),
                        p.color,
                        p.token.clone(),
                    )
                })
                .collect();
            (
                session.game_id.clone(),
                session.turn_owner().player_id.clone(),
                seats,
            )
        };

        {
            let mut registry = self.registry.write().await;
            for (connection_id, player_id, _, _) in &seats {
                registry.set_association(
                    *connection_id,
                    Association::InGame {
                        game_id: game_id.clone(),
                        player_id: player_id.clone(),
                    },
                );
            }
        }

        self.persist();
        info!(
            "Matched connections {} and {} into game {}",
            first, second, game_id
        );

        for (connection_id, player_id, color, token) in seats {
            self.send_to_connection(
                connection_id,
                Packet::MatchFound {
                    game_id: game_id.clone(),
                    player_id,
                    assigned_color: color,
                    first_move: first_move.clone(),
                    token,
                },
            )
            .await;
        }
    }

    /// Checks that the sender's registry association covers the referenced
    /// game (and player, when one is named).
    async fn authorize(
        &self,
        connection_id: u64,
        game_id: &str,
        player_id: Option<&str>,
    ) -> Result<(), String> {
        let registry = self.registry.read().await;
        match registry.lookup(connection_id) {
            Ok(Association::InGame {
                game_id: own_game,
                player_id: own_player,
            }) => {
                if own_game.as_str() == game_id
                    && player_id.map_or(true, |p| p == own_player.as_str())
                {
                    Ok(())
                } else {
                    Err("not a participant of this game".to_string())
                }
            }
            Ok(_) => Err("not a participant of this game".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    async fn handle_make_move(
        &mut self,
        connection_id: u64,
        addr: SocketAddr,
        game_id: &str,
        player_id: &str,
        san: &str,
    ) {
        if let Err(message) = self.authorize(connection_id, game_id, Some(player_id)).await {
            self.send_error(message, addr);
            return;
        }

        let session = match self.sessions.session_mut(game_id) {
            Some(session) => session,
            None => {
                self.send_error("unknown game", addr);
                return;
            }
        };

        let outcome = match session.submit_move(player_id, san) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.send_error(e.to_string(), addr);
                return;
            }
        };

        let (packet, recipients) = {
            let session = self.sessions.session(game_id).expect("session still live");
            (
                move_made_packet(session, san, &outcome),
                connected_participants(session),
            )
        };

        self.persist();
        for recipient in recipients {
            self.send_to_connection(recipient, packet.clone()).await;
        }

        if outcome.game_over {
            self.teardown_session(game_id).await;
        }
    }

    async fn handle_get_board(&mut self, connection_id: u64, addr: SocketAddr, game_id: &str) {
        if let Err(message) = self.authorize(connection_id, game_id, None).await {
            self.send_error(message, addr);
            return;
        }

        match self.sessions.session(game_id) {
            Some(session) => {
                let packet = board_state_packet(session);
                self.send(packet, addr);
            }
            None => self.send_error("unknown game", addr),
        }
    }

    async fn handle_reconnect(
        &mut self,
        connection_id: u64,
        addr: SocketAddr,
        game_id: &str,
        player_id: &str,
        token: &str,
    ) {
        let association = {
            let registry = self.registry.read().await;
            registry.lookup(connection_id).cloned()
        };
        match association {
            Ok(Association::Idle) => {}
            Ok(_) => {
                self.send_error("connection is busy, cannot take over a seat", addr);
                return;
            }
            Err(e) => {
                self.send_error(e.to_string(), addr);
                return;
            }
        }

        let session = match self.sessions.session_mut(game_id) {
            Some(session) => session,
            None => {
                self.send_error("unknown game", addr);
                return;
            }
        };

        let outcome = match session.on_reconnect(player_id, token, connection_id) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.send_error(e.to_string(), addr);
                return;
            }
        };

        if outcome.disarmed_seq.is_some() {
            self.disarm_forfeit_timer(game_id, player_id);
        }

        {
            let mut registry = self.registry.write().await;
            registry.set_association(
                connection_id,
                Association::InGame {
                    game_id: game_id.to_string(),
                    player_id: player_id.to_string(),
                },
            );
        }

        let resume = {
            let session = self.sessions.session(game_id).expect("session still live");
            board_state_packet(session)
        };
        self.send(resume, addr);

        if let Some(opponent) = outcome.opponent_connection {
            self.send_to_connection(
                opponent,
                Packet::OpponentReconnected {
                    message: "Opponent reconnected, game resumes".to_string(),
                    player_id: player_id.to_string(),
                },
            )
            .await;
        }
    }

    /// Routes a transport drop (explicit, superseded or liveness timeout)
    /// to whatever the connection was doing. The registry entry outlives
    /// the transport until the owning component has been notified.
    async fn handle_transport_drop(&mut self, connection_id: u64, reason: &str) {
        let association = {
            let registry = self.registry.read().await;
            match registry.lookup(connection_id) {
                Ok(association) => association.clone(),
                Err(_) => return,
            }
        };

        info!("Connection {} dropped ({})", connection_id, reason);

        match association {
            Association::Idle => {}
            Association::Queued => {
                self.queue.cancel(connection_id);
                self.disarm_queue_timer(connection_id);
            }
            Association::InGame { game_id, .. } => {
                let outcome = self
                    .sessions
                    .session_mut(&game_id)
                    .and_then(|session| session.on_disconnect(connection_id, Instant::now()));

                match outcome {
                    Some(DisconnectOutcome::GracePeriod {
                        player_id,
                        timer_seq,
                        opponent_connection,
                    }) => {
                        let grace = self.config.forfeit_timeout.as_secs();
                        self.arm_forfeit_timer(game_id.clone(), player_id.clone(), timer_seq);
                        if let Some(opponent) = opponent_connection {
                            self.send_to_connection(
                                opponent,
                                Packet::OpponentDisconnected {
                                    message: format!(
                                        "Opponent disconnected, waiting {}s for them to reconnect",
                                        grace
                                    ),
                                    disconnected_player_id: player_id,
                                },
                            )
                            .await;
                        }
                    }
                    Some(DisconnectOutcome::Cancelled) => {
                        // Both seats down: terminal, nobody left to notify.
                        self.persist();
                        self.teardown_session(&game_id).await;
                    }
                    None => {}
                }
            }
        }

        let mut registry = self.registry.write().await;
        registry.remove(connection_id);
    }

    async fn handle_queue_deadline(&mut self, connection_id: u64, timer_seq: u64) {
        if !self.queue.expire(connection_id, timer_seq) {
            return;
        }
        self.queue_timers.remove(&connection_id);

        {
            let mut registry = self.registry.write().await;
            registry.set_association(connection_id, Association::Idle);
        }

        self.send_to_connection(
            connection_id,
            Packet::QueueTimeout {
                message: "No opponent found within the waiting window".to_string(),
            },
        )
        .await;
    }

    async fn handle_forfeit_deadline(
        &mut self,
        game_id: String,
        player_id: String,
        timer_seq: u64,
    ) {
        self.forfeit_timers
            .remove(&(game_id.clone(), player_id.clone()));

        let outcome = match self.sessions.session_mut(&game_id) {
            Some(session) => session.forfeit_expired(&player_id, timer_seq),
            None => None,
        };

        let outcome = match outcome {
            Some(outcome) => outcome,
            // Stale deadline: the player reconnected or the game ended.
            None => return,
        };

        self.persist();
        if let Some(winner_connection) = outcome.winner_connection {
            self.send_to_connection(
                winner_connection,
                Packet::GameOver {
                    status: GameEndStatus::Forfeit,
                    winner: Some(outcome.winner_player_id.clone()),
                    message: "Opponent failed to reconnect in time".to_string(),
                },
            )
            .await;
        }
        self.teardown_session(&game_id).await;
    }

    /// Releases both seats back to `Idle` (connections already gone are
    /// simply dropped) and frees session-local resources.
    async fn teardown_session(&mut self, game_id: &str) {
        let session = match self.sessions.remove_session(game_id) {
            Some(session) => session,
            None => return,
        };

        for participant in &session.participants {
            self.disarm_forfeit_timer(game_id, &participant.player_id);
        }

        let mut registry = self.registry.write().await;
        for participant in &session.participants {
            if let Some(connection_id) = participant.connection_id {
                registry.set_association(connection_id, Association::Idle);
            }
        }
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_liveness_checker();

        info!("Server started successfully");

        while let Some(message) = self.server_rx.recv().await {
            match message {
                ServerMessage::PacketReceived { packet, addr } => {
                    self.handle_packet(packet, addr).await;
                }
                ServerMessage::ConnectionTimeout { connection_id } => {
                    self.handle_transport_drop(connection_id, "liveness timeout")
                        .await;
                }
                ServerMessage::QueueDeadline {
                    connection_id,
                    timer_seq,
                } => {
                    self.handle_queue_deadline(connection_id, timer_seq).await;
                }
                ServerMessage::ForfeitDeadline {
                    game_id,
                    player_id,
                    timer_seq,
                } => {
                    self.handle_forfeit_deadline(game_id, player_id, timer_seq)
                        .await;
                }
                ServerMessage::Shutdown => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Connections of participants that still have a live transport.
fn connected_participants(session: &GameSession) -> Vec<u64> {
    session
        .participants
        .iter()
        .filter_map(|p| p.connection_id)
        .collect()
}

fn board_state_packet(session: &GameSession) -> Packet {
    let snapshot = session.snapshot();
    Packet::BoardState {
        game_id: snapshot.game_id,
        rendered: render::render(&snapshot.board),
        board: snapshot.board,
        fen: snapshot.fen,
        turn: snapshot.turn,
        game_over: snapshot.game_over,
        status: snapshot.status_description,
    }
}

fn move_made_packet(session: &GameSession, san: &str, outcome: &MoveOutcome) -> Packet {
    let snapshot = session.snapshot();
    Packet::MoveMade {
        game_id: snapshot.game_id,
        san: san.to_string(),
        rendered: render::render(&snapshot.board),
        board: snapshot.board,
        fen: snapshot.fen,
        game_over: outcome.game_over,
        status: outcome.status_description.clone(),
    }
}
