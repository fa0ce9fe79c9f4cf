use crate::{Color, File, Rank, Square};
use bitflags::bitflags;

bitflags! {
    /// The castling rights of one side.
    ///
    /// Rights are only ever lost over the course of a game, never regained.
    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct CastleRights: u8 {
        const KING_SIDE = 0b01;
        const QUEEN_SIDE = 0b10;
    }
}

impl CastleRights {
    /// Whether castling towards the given side is still allowed.
    #[inline(always)]
    pub fn allows(&self, side: CastleSide) -> bool {
        self.contains(side.rights())
    }

    /// These rights with the given side's right removed.
    #[inline(always)]
    pub fn without(&self, side: CastleSide) -> Self {
        self.difference(side.rights())
    }
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for CastleRights {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;
        any::<u8>().prop_map(CastleRights::from_bits_truncate).boxed()
    }
}

/// One of the two directions a king can castle towards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// The [`CastleRights`] flag for this side.
    #[inline(always)]
    pub fn rights(&self) -> CastleRights {
        match self {
            CastleSide::KingSide => CastleRights::KING_SIDE,
            CastleSide::QueenSide => CastleRights::QUEEN_SIDE,
        }
    }

    /// The home corner of the rook that castles towards this side.
    #[inline(always)]
    pub fn rook_home(&self, color: Color) -> Square {
        match self {
            CastleSide::KingSide => Square::new(File::H, Rank::back(color)),
            CastleSide::QueenSide => Square::new(File::A, Rank::back(color)),
        }
    }

    /// The square the rook lands on when castling towards this side.
    #[inline(always)]
    pub fn rook_target(&self, color: Color) -> Square {
        match self {
            CastleSide::KingSide => Square::new(File::F, Rank::back(color)),
            CastleSide::QueenSide => Square::new(File::D, Rank::back(color)),
        }
    }

    /// The square the king lands on when castling towards this side.
    #[inline(always)]
    pub fn king_target(&self, color: Color) -> Square {
        match self {
            CastleSide::KingSide => Square::new(File::G, Rank::back(color)),
            CastleSide::QueenSide => Square::new(File::C, Rank::back(color)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn rights_without_a_side_no_longer_allow_it(cr: CastleRights, side: CastleSide) {
        assert!(!cr.without(side).allows(side));
    }

    #[proptest]
    fn removing_a_side_preserves_the_other(cr: CastleRights, side: CastleSide) {
        let other = match side {
            CastleSide::KingSide => CastleSide::QueenSide,
            CastleSide::QueenSide => CastleSide::KingSide,
        };

        assert_eq!(cr.without(side).allows(other), cr.allows(other));
    }

    #[proptest]
    fn full_rights_allow_both_sides(side: CastleSide) {
        assert!(CastleRights::all().allows(side));
    }

    #[proptest]
    fn castling_squares_are_on_the_back_rank(side: CastleSide, c: Color) {
        assert_eq!(side.rook_home(c).rank(), Rank::back(c));
        assert_eq!(side.rook_target(c).rank(), Rank::back(c));
        assert_eq!(side.king_target(c).rank(), Rank::back(c));
    }

    #[proptest]
    fn rook_lands_between_king_target_and_its_home_file(side: CastleSide, c: Color) {
        let king = side.king_target(c);

        match side {
            CastleSide::KingSide => assert_eq!(king.left(), Some(side.rook_target(c))),
            CastleSide::QueenSide => assert_eq!(king.right(), Some(side.rook_target(c))),
        }
    }
}
