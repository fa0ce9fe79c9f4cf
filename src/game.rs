use crate::{Fen, IllegalMove, Outcome, Position, Promotion, Square};
use std::collections::HashMap;

/// A game of chess played out move by move.
///
/// Tracks how often each piece placement has occurred, which a single
/// [`Position`] snapshot cannot see, and reports the conclusion of the
/// game once one of the terminal rules applies.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    position: Position,
    repetitions: HashMap<String, u32>,
}

impl Game {
    /// Starts a game from the standard initial position.
    pub fn new() -> Self {
        Game::with_position(Position::default())
    }

    /// Starts a game from an arbitrary position.
    pub fn with_position(position: Position) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(Fen::from(&position).placement().to_string(), 1);

        Game {
            position,
            repetitions,
        }
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The conclusion of the game, if it is over.
    ///
    /// Checkmate takes precedence over every drawing rule, and the drawing
    /// rules are checked in a fixed order: stalemate, fifty moves,
    /// threefold repetition, insufficient material.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.position.is_checkmate() {
            Some(Outcome::Checkmate(!self.position.turn()))
        } else if self.position.is_stalemate() {
            Some(Outcome::Stalemate)
        } else if self.position.halfmoves() >= 100 {
            Some(Outcome::FiftyMoves)
        } else if self.seen(&self.position) >= 3 {
            Some(Outcome::ThreefoldRepetition)
        } else if self.position.has_insufficient_material() {
            Some(Outcome::InsufficientMaterial)
        } else {
            None
        }
    }

    fn seen(&self, position: &Position) -> u32 {
        self.repetitions
            .get(Fen::from(position).placement())
            .copied()
            .unwrap_or(0)
    }

    /// Plays a move, advancing the game.
    ///
    /// Returns the conclusion of the game if this move ends it. An illegal
    /// request leaves the game untouched.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Result<Option<Outcome>, IllegalMove> {
        let next = self.position.play(from, to, promotion)?;

        *self
            .repetitions
            .entry(Fen::from(&next).placement().to_string())
            .or_insert(0) += 1;

        self.position = next;
        Ok(self.outcome())
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
