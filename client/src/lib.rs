//! # Match Client Library
//!
//! Client-side plumbing for the match server protocol. The library wraps
//! the UDP transport and the bincode frame codec behind a small async API:
//! connect, queue for an opponent, submit moves, query the board, and
//! reconnect into a seat after a transport failure.
//!
//! The interactive terminal client in `main.rs` builds on this to play
//! games by hand; integration tests use it to drive a real server over
//! loopback.
//!
//! ## Connection Flow
//!
//! 1. `ArenaClient::connect` performs the handshake and learns the
//!    connection id assigned by the server.
//! 2. `join_queue` enters matchmaking; the server answers with
//!    `MatchFound` once an opponent arrives, carrying the game id, the
//!    player id, the assigned color and the reconnection token.
//! 3. Moves and board queries reference the game and player ids from the
//!    match announcement; the server rejects anything that does not match
//!    the connection's current association.
//! 4. After a transport failure, a fresh `connect` followed by `reconnect`
//!    with the saved token resumes the same seat within the grace period.

pub mod network;

pub use network::ArenaClient;
