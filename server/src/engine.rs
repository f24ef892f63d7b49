//! Rule engine adapter wrapping `shakmaty` behind an opaque position handle
//!
//! The rest of the server never interprets chess state directly: it holds a
//! `Position`, submits SAN text, and reads back turn ownership, terminal
//! status, FEN and a displayable grid. Keeping the adapter this narrow means
//! session coordination can be tested without caring which rule set is
//! plugged in underneath.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Outcome, Position as _, Rank, Square};
use shared::Color;
use std::fmt;

/// Error produced when a submitted move cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The text is not valid algebraic notation.
    UnparsableNotation(String),
    /// The notation parsed but names no legal move in this position.
    IllegalMove(String),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::UnparsableNotation(san) => {
                write!(f, "unparsable move notation '{}'", san)
            }
            MoveError::IllegalMove(san) => write!(f, "illegal move '{}'", san),
        }
    }
}

impl std::error::Error for MoveError {}

/// Error produced when restoring a position from persisted notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFen(pub String);

impl fmt::Display for InvalidFen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid FEN '{}'", self.0)
    }
}

impl std::error::Error for InvalidFen {}

/// Opaque handle to a board position.
///
/// Applying a move never mutates in place: `apply_san` yields the successor
/// position, so a rejected move provably leaves the caller's state untouched.
#[derive(Debug, Clone)]
pub struct Position {
    inner: Chess,
}

impl Position {
    /// Starting position; the side to move is the engine's first-move side.
    pub fn initial() -> Self {
        Self {
            inner: Chess::default(),
        }
    }

    /// Restores a position from its FEN notation.
    pub fn from_fen(fen: &str) -> Result<Self, InvalidFen> {
        let parsed: Fen = fen.parse().map_err(|_| InvalidFen(fen.to_string()))?;
        let inner: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| InvalidFen(fen.to_string()))?;
        Ok(Self { inner })
    }

    /// Which side moves next.
    pub fn turn(&self) -> Color {
        match self.inner.turn() {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }

    /// Applies a move in standard algebraic notation, returning the
    /// successor position.
    pub fn apply_san(&self, san: &str) -> Result<Position, MoveError> {
        let parsed: San = san
            .parse()
            .map_err(|_| MoveError::UnparsableNotation(san.to_string()))?;
        let mv = parsed
            .to_move(&self.inner)
            .map_err(|_| MoveError::IllegalMove(san.to_string()))?;
        let next = self
            .inner
            .clone()
            .play(&mv)
            .map_err(|_| MoveError::IllegalMove(san.to_string()))?;
        Ok(Self { inner: next })
    }

    /// All legal moves from this position in algebraic notation.
    pub fn legal_moves(&self) -> Vec<String> {
        self.inner
            .legal_moves()
            .iter()
            .map(|mv| San::from_move(&self.inner, mv).to_string())
            .collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    /// Human-readable terminal status, empty while the game is in progress.
    pub fn status_description(&self) -> String {
        if !self.inner.is_game_over() {
            return String::new();
        }

        if self.inner.is_checkmate() {
            // The side to move is the side that got mated.
            let winner = match self.inner.turn() {
                shakmaty::Color::White => "Black",
                shakmaty::Color::Black => "White",
            };
            return format!("Checkmate - {} wins", winner);
        }
        if self.inner.is_stalemate() {
            return "Stalemate - Draw".to_string();
        }
        if self.inner.is_insufficient_material() {
            return "Insufficient material - Draw".to_string();
        }

        "Game over".to_string()
    }

    /// Winning side of a decisive terminal position, if any.
    pub fn winner(&self) -> Option<Color> {
        match self.inner.outcome() {
            Some(Outcome::Decisive { winner }) => Some(match winner {
                shakmaty::Color::White => Color::White,
                shakmaty::Color::Black => Color::Black,
            }),
            _ => None,
        }
    }

    /// Compact textual notation of the position, used on the wire and on disk.
    pub fn fen(&self) -> String {
        Fen::from_position(self.inner.clone(), EnPassantMode::Legal).to_string()
    }

    /// 8x8 grid of piece symbols, eighth rank first, `' '` for empty squares.
    pub fn grid(&self) -> Vec<Vec<char>> {
        let board = self.inner.board();
        Rank::ALL
            .iter()
            .rev()
            .map(|rank| {
                File::ALL
                    .iter()
                    .map(|file| {
                        board
                            .piece_at(Square::from_coords(*file, *rank))
                            .map(|piece| piece.char())
                            .unwrap_or(' ')
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial_turn_is_white() {
        let position = Position::initial();
        assert_eq!(position.turn(), Color::White);
        assert!(!position.is_game_over());
    }

    #[test]
    fn test_initial_fen() {
        assert_eq!(Position::initial().fen(), INITIAL_FEN);
    }

    #[test]
    fn test_apply_legal_move() {
        let position = Position::initial();
        let next = position.apply_san("e4").unwrap();

        assert_eq!(next.turn(), Color::Black);
        // The original position is untouched.
        assert_eq!(position.fen(), INITIAL_FEN);
        assert_ne!(next.fen(), INITIAL_FEN);
    }

    #[test]
    fn test_reject_unparsable_notation() {
        let position = Position::initial();
        let err = position.apply_san("not a move").unwrap_err();
        assert!(matches!(err, MoveError::UnparsableNotation(_)));
    }

    #[test]
    fn test_reject_illegal_move() {
        let position = Position::initial();
        // Well-formed notation, but no knight can reach e5 from the start.
        let err = position.apply_san("Ne5").unwrap_err();
        assert!(matches!(err, MoveError::IllegalMove(_)));
    }

    #[test]
    fn test_initial_legal_move_count() {
        let moves = Position::initial().legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&"e4".to_string()));
        assert!(moves.contains(&"Nf3".to_string()));
    }

    #[test]
    fn test_fen_roundtrip() {
        let position = Position::initial().apply_san("e4").unwrap();
        let restored = Position::from_fen(&position.fen()).unwrap();

        assert_eq!(restored.fen(), position.fen());
        assert_eq!(restored.turn(), Color::Black);
    }

    #[test]
    fn test_invalid_fen_rejected() {
        assert!(Position::from_fen("garbage").is_err());
    }

    #[test]
    fn test_scholars_mate_is_terminal() {
        let mut position = Position::initial();
        for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"] {
            position = position.apply_san(san).unwrap();
        }

        assert!(position.is_game_over());
        assert_eq!(position.status_description(), "Checkmate - White wins");
        assert_eq!(position.winner(), Some(Color::White));
    }

    #[test]
    fn test_terminal_position_has_no_moves() {
        let mut position = Position::initial();
        for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"] {
            position = position.apply_san(san).unwrap();
        }

        assert!(position.legal_moves().is_empty());
        assert!(matches!(
            position.apply_san("a6").unwrap_err(),
            MoveError::IllegalMove(_)
        ));
    }

    #[test]
    fn test_initial_grid_layout() {
        let grid = Position::initial().grid();

        assert_eq!(grid.len(), 8);
        assert_eq!(grid[0], vec!['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r']);
        assert_eq!(grid[1], vec!['p'; 8]);
        assert_eq!(grid[4], vec![' '; 8]);
        assert_eq!(grid[6], vec!['P'; 8]);
        assert_eq!(grid[7], vec!['R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R']);
    }
}
