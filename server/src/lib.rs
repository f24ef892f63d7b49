//! # Match Server Library
//!
//! This library implements the session-coordination core of a two-party
//! real-time match server. Anonymous connections are paired into chess
//! games, moves are relayed between the participants over a persistent
//! bidirectional connection, and sessions survive transient network failure
//! through reconnection grace periods.
//!
//! ## Core Responsibilities
//!
//! ### Connection Lifecycle
//! Every transport session is tracked by the connection registry from the
//! connect handshake to its drop. The registry is the single source of
//! truth for what a connection is doing (idle, queued, or bound to a game
//! seat), so concurrent connection events can never observe an ambiguous
//! association.
//!
//! ### Matchmaking
//! Connections waiting for an opponent sit in a FIFO queue. Pairing always
//! selects the two longest-waiting distinct connections, assigns colors at
//! random and creates a session; waiting longer than the queue window ends
//! in eviction, never in a half-created game.
//!
//! ### Session Supervision
//! Each game session owns its participants' connectivity state. A dropped
//! participant gets a grace period to reconnect; expiry resolves to a
//! forfeit, and losing both participants cancels the session. Move
//! legality, turn tracking and terminal detection are delegated to the
//! rule engine adapter.
//!
//! ## Architecture Design
//!
//! ### Single-Owner Event Loop
//! All mutable coordination state (queue, session table) is owned by one
//! event loop that processes network events and deadline expiries
//! sequentially, eliminating races between connection events. The registry
//! is additionally shared with a liveness-checker task behind a lock.
//!
//! ### Cancellable Deadlines
//! Queue eviction and forfeit grace periods are one-shot sleeping tasks
//! stamped with a sequence number. Disarming aborts the task, and expiry
//! messages are revalidated against the current sequence, so a deadline
//! racing its disarm can never fire against superseded state.
//!
//! ## Module Organization
//!
//! - [`registry`]: connection identities and associations
//! - [`queue`]: FIFO matchmaking with dedup and timed eviction
//! - [`session`]: per-game supervision, grace periods, forfeits
//! - [`network`]: UDP transport, frame routing, deadline tasks
//! - [`engine`]: rule engine adapter (move legality, FEN, terminal state)
//! - [`render`]: text board rendering
//! - [`persistence`]: whole-table JSON snapshots
//! - [`api`]: non-real-time legacy operations over the session table
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("127.0.0.1:9002", ServerConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod engine;
pub mod network;
pub mod persistence;
pub mod queue;
pub mod registry;
pub mod render;
pub mod session;
