use crate::{CastleSide, Promotion, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A chess move between two [`Square`]s.
///
/// The variant describes how the move is applied; equality and hashing are
/// deliberately defined over the endpoints alone, so that a tagged move can
/// be matched against a legal-move list by its `(from, to)` pair.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Move {
    /// A regular move or capture.
    Normal { from: Square, to: Square },

    /// An en passant capture of the pawn behind `to`.
    EnPassant { from: Square, to: Square },

    /// A pawn move onto the last rank, replacing the pawn.
    Promotion {
        from: Square,
        to: Square,
        promotion: Promotion,
    },

    /// A king move of two files, relocating the corresponding rook.
    Castle {
        from: Square,
        to: Square,
        side: CastleSide,
    },
}

impl Move {
    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        match *self {
            Move::Normal { from, .. }
            | Move::EnPassant { from, .. }
            | Move::Promotion { from, .. }
            | Move::Castle { from, .. } => from,
        }
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        match *self {
            Move::Normal { to, .. }
            | Move::EnPassant { to, .. }
            | Move::Promotion { to, .. }
            | Move::Castle { to, .. } => to,
        }
    }

    /// The [`Promotion`] specifier, if this is a promotion.
    #[inline(always)]
    pub fn promotion(&self) -> Option<Promotion> {
        match *self {
            Move::Promotion { promotion, .. } => Some(promotion),
            _ => None,
        }
    }
}

impl PartialEq for Move {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.whence() == other.whence() && self.whither() == other.whither()
    }
}

impl Eq for Move {}

impl Hash for Move {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.whence().hash(state);
        self.whither().hash(state);
    }
}

/// Prints the move in pure coordinate notation, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.whence(), self.whither())?;

        if let Some(p) = self.promotion() {
            write!(f, "{}", p)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use test_strategy::proptest;

    fn hashed(m: &Move) -> u64 {
        let mut hasher = DefaultHasher::new();
        m.hash(&mut hasher);
        hasher.finish()
    }

    #[proptest]
    fn moves_with_same_endpoints_compare_equal(m: Move, n: Move) {
        assert_eq!(
            m == n,
            m.whence() == n.whence() && m.whither() == n.whither()
        );
    }

    #[proptest]
    fn equal_moves_hash_alike(m: Move) {
        let n = Move::Normal {
            from: m.whence(),
            to: m.whither(),
        };

        assert_eq!(m, n);
        assert_eq!(hashed(&m), hashed(&n));
    }

    #[proptest]
    fn promotion_move_equals_normal_move_with_same_endpoints(
        from: Square,
        to: Square,
        p: Promotion,
    ) {
        assert_eq!(
            Move::Promotion {
                from,
                to,
                promotion: p
            },
            Move::Normal { from, to }
        );
    }

    #[proptest]
    fn move_displays_its_endpoints(m: Move) {
        let s = m.to_string();
        assert!(s.starts_with(&m.whence().to_string()));
        assert!(s[2..].starts_with(&m.whither().to_string()));
    }

    #[proptest]
    fn only_promotions_carry_a_promotion_specifier(m: Move) {
        assert_eq!(
            m.promotion().is_some(),
            matches!(m, Move::Promotion { .. })
        );
    }
}
