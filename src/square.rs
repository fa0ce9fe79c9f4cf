use crate::{Bitboard, Color, File, ParseFileError, ParseRankError, Rank};
use derive_more::{Display, Error, From};
use std::{fmt, str::FromStr};

/// A square on the chess board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(i8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

#[rustfmt::skip]
const SQUARES: [Square; 64] = {
    use Square::*;
    [
        A1, B1, C1, D1, E1, F1, G1, H1,
        A2, B2, C2, D2, E2, F2, G2, H2,
        A3, B3, C3, D3, E3, F3, G3, H3,
        A4, B4, C4, D4, E4, F4, G4, H4,
        A5, B5, C5, D5, E5, F5, G5, H5,
        A6, B6, C6, D6, E6, F6, G6, H6,
        A7, B7, C7, D7, E7, F7, G7, H7,
        A8, B8, C8, D8, E8, F8, G8, H8,
    ]
};

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub fn new(f: File, r: Rank) -> Self {
        SQUARES[(r.get() * 8 + f.get()) as usize]
    }

    /// This square's [`File`].
    #[inline(always)]
    pub fn file(&self) -> File {
        File::ALL[(self.get() % 8) as usize]
    }

    /// This square's [`Rank`].
    #[inline(always)]
    pub fn rank(&self) -> Rank {
        Rank::ALL[(self.get() / 8) as usize]
    }

    /// This square's index in the range `0..64`.
    #[inline(always)]
    pub fn get(&self) -> i8 {
        *self as i8
    }

    /// An iterator over all squares, rank by rank from [`Square::A1`].
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        SQUARES.into_iter()
    }

    /// Returns a [`Bitboard`] that only contains this square.
    #[inline(always)]
    pub fn bitboard(self) -> Bitboard {
        Bitboard::new(1 << self.get())
    }

    /// The square `dr` ranks up and `df` files to the right, if on the board.
    #[inline(always)]
    pub fn moved(self, dr: i8, df: i8) -> Option<Self> {
        let r = Rank::try_new(self.rank().get() + dr)?;
        let f = File::try_new(self.file().get() + df)?;
        Some(Square::new(f, r))
    }

    /// The square one rank ahead from the perspective of a [`Color`].
    #[inline(always)]
    pub fn forward(self, color: Color) -> Option<Self> {
        match color {
            Color::White => self.moved(1, 0),
            Color::Black => self.moved(-1, 0),
        }
    }

    /// The square one rank behind from the perspective of a [`Color`].
    #[inline(always)]
    pub fn backward(self, color: Color) -> Option<Self> {
        self.forward(!color)
    }

    /// The square one file towards [`File::A`].
    #[inline(always)]
    pub fn left(self) -> Option<Self> {
        self.moved(0, -1)
    }

    /// The square one file towards [`File::H`].
    #[inline(always)]
    pub fn right(self) -> Option<Self> {
        self.moved(0, 1)
    }

    /// Whether this square is on the pawn starting rank of a [`Color`].
    #[inline(always)]
    pub fn is_pawn_home(self, color: Color) -> bool {
        self.rank() == Rank::pawn_home(color)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file(), f)?;
        fmt::Display::fmt(&self.rank(), f)?;
        Ok(())
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display("failed to parse square")]
    InvalidFile(ParseFileError),
    #[display("failed to parse square")]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}
