use crate::{File, Rank, Square};
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Constructor, Not};
use std::fmt::{self, Write};

/// A set of squares on a chess board.
#[derive(
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Constructor,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(transparent)]
pub struct Bitboard(u64);

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('\n')?;
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                let sq = Square::new(file, rank);
                f.write_char(if self.contains(sq) { '■' } else { '◻' })?;
                f.write_char(if file < File::H { ' ' } else { '\n' })?;
            }
        }

        Ok(())
    }
}

impl Bitboard {
    /// An empty set.
    #[inline(always)]
    pub const fn empty() -> Self {
        Bitboard(0)
    }

    /// The number of squares in the set.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether this [`Square`] is in the set.
    #[inline(always)]
    pub const fn contains(&self, sq: Square) -> bool {
        self.0 & (1 << sq as i8) != 0
    }

    /// This set with the given [`Square`] included.
    #[inline(always)]
    pub const fn with(&self, sq: Square) -> Self {
        Bitboard(self.0 | 1 << sq as i8)
    }

    /// This set with the given [`Square`] removed.
    #[inline(always)]
    pub const fn without(&self, sq: Square) -> Self {
        Bitboard(self.0 & !(1 << sq as i8))
    }

    /// The single square in the set, if it contains exactly one.
    #[inline(always)]
    pub fn single(&self) -> Option<Square> {
        match self.len() {
            1 => self.into_iter().next(),
            _ => None,
        }
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        Squares(self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    #[inline(always)]
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Bitboard::empty(), |bb, sq| bb.with(sq))
    }
}

/// An iterator over the [`Square`]s in a [`Bitboard`], in ascending order.
#[derive(Debug, Clone)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }

        let sq = Square::iter().nth(self.0.trailing_zeros() as usize);
        self.0 &= self.0 - 1;
        sq
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Squares {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn len_counts_squares_in_the_set(bb: Bitboard) {
        assert_eq!(bb.len(), bb.into_iter().count());
    }

    #[proptest]
    fn with_inserts_square(bb: Bitboard, sq: Square) {
        assert!(bb.with(sq).contains(sq));
    }

    #[proptest]
    fn without_removes_square(bb: Bitboard, sq: Square) {
        assert!(!bb.without(sq).contains(sq));
    }

    #[proptest]
    fn iterated_squares_are_members(bb: Bitboard) {
        for sq in bb {
            assert!(bb.contains(sq));
        }
    }

    #[proptest]
    fn collecting_iterated_squares_is_an_identity(bb: Bitboard) {
        assert_eq!(Bitboard::from_iter(bb), bb);
    }

    #[proptest]
    fn single_returns_the_only_square(sq: Square) {
        assert_eq!(sq.bitboard().single(), Some(sq));
    }

    #[proptest]
    fn single_fails_unless_set_has_one_square(#[filter(#bb.len() != 1)] bb: Bitboard) {
        assert_eq!(bb.single(), None);
    }

    #[proptest]
    fn union_contains_squares_of_both_sets(a: Bitboard, b: Bitboard, sq: Square) {
        assert_eq!((a | b).contains(sq), a.contains(sq) || b.contains(sq));
    }

    #[proptest]
    fn intersection_contains_common_squares(a: Bitboard, b: Bitboard, sq: Square) {
        assert_eq!((a & b).contains(sq), a.contains(sq) && b.contains(sq));
    }

    #[proptest]
    fn complement_contains_no_common_squares(bb: Bitboard, sq: Square) {
        assert_ne!((!bb).contains(sq), bb.contains(sq));
    }
}
