use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire protocol version checked during the connect handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Side assignment for a participant in a game.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// How a game ended when it did not finish over the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GameEndStatus {
    Forfeit,
    Cancelled,
}

impl fmt::Display for GameEndStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndStatus::Forfeit => write!(f, "forfeit"),
            GameEndStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    // Client -> server
    Connect {
        client_version: u32,
    },
    JoinQueue,
    MakeMove {
        game_id: String,
        player_id: String,
        san: String,
    },
    GetBoard {
        game_id: String,
    },
    Reconnect {
        game_id: String,
        player_id: String,
        token: String,
    },
    Ping,
    Disconnect,

    // Server -> client
    Connected {
        connection_id: u64,
    },
    MatchFound {
        game_id: String,
        player_id: String,
        assigned_color: Color,
        /// Player id of whoever holds the side that moves first.
        first_move: String,
        /// Secret required to reconnect into this seat.
        token: String,
    },
    MoveMade {
        game_id: String,
        san: String,
        board: Vec<Vec<char>>,
        rendered: String,
        fen: String,
        game_over: bool,
        status: String,
    },
    BoardState {
        game_id: String,
        board: Vec<Vec<char>>,
        rendered: String,
        fen: String,
        turn: Color,
        game_over: bool,
        status: String,
    },
    OpponentDisconnected {
        message: String,
        disconnected_player_id: String,
    },
    OpponentReconnected {
        message: String,
        player_id: String,
    },
    GameOver {
        status: GameEndStatus,
        winner: Option<String>,
        message: String,
    },
    QueueTimeout {
        message: String,
    },
    Pong,
    Error {
        message: String,
    },
}
