//! A chess rules engine.
//!
//! This crate implements the full rules of chess over immutable position
//! snapshots: legal move generation, move application, and outcome
//! detection, including castling, en passant, promotion, and all of the
//! drawing rules. Positions convert to and from Forsyth-Edwards Notation.
//!
//! ```
//! use chessrules::{Game, Square};
//!
//! let mut game = Game::new();
//! game.play(Square::E2, Square::E4, None)?;
//! game.play(Square::E7, Square::E5, None)?;
//! assert_eq!(game.outcome(), None);
//! # Ok::<_, chessrules::IllegalMove>(())
//! ```

mod attacks;
mod bitboard;
mod castles;
mod color;
mod fen;
mod file;
mod game;
mod r#move;
mod outcome;
mod piece;
mod position;
mod promotion;
mod rank;
mod role;
mod square;

pub use bitboard::*;
pub use castles::*;
pub use color::*;
pub use fen::*;
pub use file::*;
pub use game::*;
pub use outcome::*;
pub use piece::*;
pub use position::*;
pub use promotion::*;
pub use r#move::*;
pub use rank::*;
pub use role::*;
pub use square::*;
