use crate::{Color, Role};
use derive_more::{Display, Error};
use std::{fmt, str::FromStr};

/// A chess [piece][`Role`] of a certain [`Color`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    pub role: Role,
    pub color: Color,
}

impl Piece {
    /// Constructs [`Piece`] from a pair of [`Role`] and [`Color`].
    #[inline(always)]
    pub fn new(role: Role, color: Color) -> Self {
        Piece { role, color }
    }

    /// The same piece for the opposite side.
    #[inline(always)]
    pub fn flip(&self) -> Self {
        Piece::new(self.role, !self.color)
    }
}

/// Prints the piece as its FEN letter, uppercase for white.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.role {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
        };

        match self.color {
            Color::White => fmt::Display::fmt(&c.to_ascii_uppercase(), f),
            Color::Black => fmt::Display::fmt(&c, f),
        }
    }
}

/// The reason why parsing [`Piece`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse piece")]
pub struct ParsePieceError;

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [c] = s.chars().collect::<Vec<_>>()[..] else {
            return Err(ParsePieceError);
        };

        let color = match c.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };

        match c.to_ascii_lowercase().to_string().parse::<Role>() {
            Ok(role) => Ok(Piece::new(role, color)),
            Err(_) => Err(ParsePieceError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn piece_has_a_mirror_of_the_same_role_and_opposite_color(p: Piece) {
        assert_eq!(p.flip().role, p.role);
        assert_eq!(p.flip().color, !p.color);
    }

    #[proptest]
    fn flipping_piece_twice_is_an_identity(p: Piece) {
        assert_eq!(p.flip().flip(), p);
    }

    #[proptest]
    fn white_pieces_print_uppercase(r: Role) {
        let p = Piece::new(r, Color::White);
        assert!(p.to_string().chars().all(|c| c.is_ascii_uppercase()));
    }

    #[proptest]
    fn black_pieces_print_lowercase(r: Role) {
        let p = Piece::new(r, Color::Black);
        assert!(p.to_string().chars().all(|c| c.is_ascii_lowercase()));
    }

    #[proptest]
    fn parsing_printed_piece_is_an_identity(p: Piece) {
        assert_eq!(p.to_string().parse(), Ok(p));
    }

    #[proptest]
    fn parsing_piece_fails_for_unknown_letter(
        #[filter(!"pnbrqkPNBRQK".contains(#c))] c: char,
    ) {
        assert_eq!(c.to_string().parse::<Piece>(), Err(ParsePieceError));
    }

    #[proptest]
    fn parsing_piece_fails_if_length_not_one(#[filter(#s.chars().count() != 1)] s: String) {
        assert_eq!(s.parse::<Piece>(), Err(ParsePieceError));
    }
}
