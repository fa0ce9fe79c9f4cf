use crate::Color;
use derive_more::Display;

/// One of the possible conclusions of a game of chess.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Outcome {
    #[display("checkmate by the {_0} player")]
    Checkmate(Color),

    #[display("draw by stalemate")]
    Stalemate,

    #[display("draw by the fifty move rule")]
    FiftyMoves,

    #[display("draw by threefold repetition")]
    ThreefoldRepetition,

    #[display("draw by insufficient material")]
    InsufficientMaterial,
}

impl Outcome {
    /// Whether the outcome is a draw and neither side has won.
    #[inline(always)]
    pub fn is_draw(&self) -> bool {
        !self.is_decisive()
    }

    /// Whether the outcome is a decisive win by one of the sides.
    #[inline(always)]
    pub fn is_decisive(&self) -> bool {
        matches!(self, Outcome::Checkmate(_))
    }

    /// The winning side, if the outcome is decisive.
    #[inline(always)]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate(c) => Some(c),
            _ => None,
        }
    }
}
