//! Connection registry: the authoritative map from connection identity to
//! its current association
//!
//! This module owns the answer to "what is this connection doing right now".
//! Every other component reads and writes associations exclusively through
//! the registry, so concurrent connection events can never observe an
//! ambiguous state. It also tracks transport liveness: UDP has no close
//! event, so a connection that stays silent past the liveness window is the
//! disconnect signal.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Current role of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// Connected, not waiting and not playing.
    Idle,
    /// Waiting in the matchmaking queue.
    Queued,
    /// Bound to a seat in a live game.
    InGame { game_id: String, player_id: String },
}

/// Lookup of an unknown connection id. The only fallible registry operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownConnection(pub u64);

impl std::fmt::Display for UnknownConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown connection {}", self.0)
    }
}

impl std::error::Error for UnknownConnection {}

/// One live transport session.
#[derive(Debug)]
pub struct Connection {
    /// Unique connection identifier, never reused.
    pub id: u64,
    /// Network address for sending responses.
    pub addr: SocketAddr,
    /// Last time we received any packet from this connection.
    pub last_activity: Instant,
    /// What the connection is currently doing.
    pub association: Association,
}

impl Connection {
    pub fn new(id: u64, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_activity: Instant::now(),
            association: Association::Idle,
        }
    }

    /// True if no packet has arrived within the liveness window.
    pub fn is_timed_out(&self, window: Duration) -> bool {
        self.last_activity.elapsed() > window
    }
}

/// Registry of all live connections, indexed by id.
///
/// Ids come from a monotone counter so a reconnecting client always gets a
/// fresh identity; stale ids can then be detected instead of silently
/// aliasing a new transport session.
pub struct ConnectionRegistry {
    connections: HashMap<u64, Connection>,
    next_connection_id: u64,
    max_connections: usize,
}

impl ConnectionRegistry {
    pub fn new(max_connections: usize) -> Self {
        Self {
            connections: HashMap::new(),
            next_connection_id: 1,
            max_connections,
        }
    }

    /// Registers a new connection, returning its id, or `None` at capacity.
    ///
    /// New connections start `Idle`.
    pub fn register(&mut self, addr: SocketAddr) -> Option<u64> {
        if self.connections.len() >= self.max_connections {
            return None;
        }

        let connection_id = self.next_connection_id;
        self.next_connection_id += 1;

        info!("Connection {} registered from {}", connection_id, addr);
        self.connections
            .insert(connection_id, Connection::new(connection_id, addr));

        Some(connection_id)
    }

    /// Current association of a connection.
    pub fn lookup(&self, connection_id: u64) -> Result<&Association, UnknownConnection> {
        self.connections
            .get(&connection_id)
            .map(|conn| &conn.association)
            .ok_or(UnknownConnection(connection_id))
    }

    /// Rebinds a connection's association. Returns false for unknown ids.
    ///
    /// This is the single mutation point for associations; callers never
    /// update them through any other path.
    pub fn set_association(&mut self, connection_id: u64, association: Association) -> bool {
        if let Some(conn) = self.connections.get_mut(&connection_id) {
            conn.association = association;
            true
        } else {
            false
        }
    }

    /// Removes a connection, returning its final state so disconnect
    /// handling can still read the association after the transport is gone.
    pub fn remove(&mut self, connection_id: u64) -> Option<Connection> {
        let removed = self.connections.remove(&connection_id);
        if removed.is_some() {
            info!("Connection {} removed", connection_id);
        }
        removed
    }

    /// Reply address of a connection, if it is still live.
    pub fn addr_of(&self, connection_id: u64) -> Option<SocketAddr> {
        self.connections.get(&connection_id).map(|conn| conn.addr)
    }

    /// Finds a connection id by its network address.
    ///
    /// Used to associate incoming packets with the transport session they
    /// belong to.
    pub fn find_by_addr(&self, addr: SocketAddr) -> Option<u64> {
        self.connections
            .iter()
            .find(|(_, conn)| conn.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Refreshes the liveness timestamp after an inbound packet.
    pub fn touch(&mut self, connection_id: u64) {
        if let Some(conn) = self.connections.get_mut(&connection_id) {
            conn.last_activity = Instant::now();
        }
    }

    /// Ids of connections silent beyond the liveness window.
    ///
    /// Entries are not removed here: the caller must first route the drop to
    /// whatever the connection was doing (queue entry, game seat) and only
    /// then release the registry entry.
    pub fn check_timeouts(&self, window: Duration) -> Vec<u64> {
        self.connections
            .iter()
            .filter(|(_, conn)| conn.is_timed_out(window))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    #[cfg(test)]
    pub fn connection_mut(&mut self, connection_id: u64) -> Option<&mut Connection> {
        self.connections.get_mut(&connection_id)
    }
}
