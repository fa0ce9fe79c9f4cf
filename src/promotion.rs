use crate::Role;
use derive_more::{Display, Error};
use std::str::FromStr;

/// A piece a pawn can be promoted to.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Promotion {
    #[display("n")]
    Knight,
    #[display("b")]
    Bishop,
    #[display("r")]
    Rook,
    #[display("q")]
    Queen,
}

impl Promotion {
    /// The corresponding [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        match self {
            Promotion::Knight => Role::Knight,
            Promotion::Bishop => Role::Bishop,
            Promotion::Rook => Role::Rook,
            Promotion::Queen => Role::Queen,
        }
    }
}

/// The reason why parsing [`Promotion`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse promotion")]
pub struct ParsePromotionError;

impl FromStr for Promotion {
    type Err = ParsePromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(Promotion::Knight),
            "b" => Ok(Promotion::Bishop),
            "r" => Ok(Promotion::Rook),
            "q" => Ok(Promotion::Queen),
            _ => Err(ParsePromotionError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn promotion_is_never_a_pawn_or_king(p: Promotion) {
        assert_ne!(p.role(), Role::Pawn);
        assert_ne!(p.role(), Role::King);
    }

    #[proptest]
    fn promotion_prints_like_its_role(p: Promotion) {
        assert_eq!(p.to_string(), p.role().to_string());
    }

    #[proptest]
    fn parsing_printed_promotion_is_an_identity(p: Promotion) {
        assert_eq!(p.to_string().parse(), Ok(p));
    }

    #[proptest]
    fn parsing_promotion_fails_if_not_one_of_lowercase_nbrq(
        #[filter(!['n', 'b', 'r', 'q'].contains(&#c))] c: char,
    ) {
        assert_eq!(c.to_string().parse::<Promotion>(), Err(ParsePromotionError));
    }
}
