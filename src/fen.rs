use crate::{CastleRights, CastleSide, Color, File, Piece, Placement, Position, Rank, Square};
use derive_more::{Display, Error};
use std::str::FromStr;

/// A position in Forsyth-Edwards Notation.
///
/// The wrapped text is guaranteed syntactically valid: six space-separated
/// fields with a well-formed placement, side to move, castling rights,
/// en passant square, and clocks.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash)]
pub struct Fen(String);

impl Fen {
    /// The piece placement field.
    ///
    /// Two positions that repeat for the purpose of the threefold rule
    /// share this field, regardless of clocks.
    pub fn placement(&self) -> &str {
        self.0
            .split(' ')
            .next()
            .expect("expected a placement field")
    }

    /// The FEN text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The standard initial position.
impl Default for Fen {
    fn default() -> Self {
        Fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string())
    }
}

/// The reason why parsing a FEN string failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseFenError {
    #[display("failed to parse the piece placement field")]
    InvalidPlacement,

    #[display("failed to parse the side to move")]
    InvalidSideToMove,

    #[display("failed to parse the castling rights")]
    InvalidCastlingRights,

    #[display("failed to parse the en passant square")]
    InvalidEnPassantSquare,

    #[display("failed to parse the halfmove clock")]
    InvalidHalfmoveClock,

    #[display("failed to parse the fullmove number")]
    InvalidFullmoveNumber,

    #[display("expected six space-separated fields")]
    InvalidSyntax,
}

fn parse_position(s: &str) -> Result<Position, ParseFenError> {
    let fields: Vec<&str> = s.split(' ').collect();
    let [placement, turn, castling, en_passant, halfmoves, fullmoves] = fields[..] else {
        return Err(ParseFenError::InvalidSyntax);
    };

    let segments: Vec<&str> = placement.split('/').collect();
    if segments.len() != 8 {
        return Err(ParseFenError::InvalidPlacement);
    }

    let mut pieces = Placement::new();
    for (rank, segment) in Rank::iter().rev().zip(segments) {
        let mut width = 0i8;
        for c in segment.chars() {
            match c.to_digit(10) {
                Some(n @ 1..=8) => width += n as i8,
                Some(_) => return Err(ParseFenError::InvalidPlacement),
                None => {
                    let piece: Piece = c
                        .to_string()
                        .parse()
                        .map_err(|_| ParseFenError::InvalidPlacement)?;

                    let file = File::try_new(width).ok_or(ParseFenError::InvalidPlacement)?;
                    pieces.insert(Square::new(file, rank), piece);
                    width += 1;
                }
            }
        }

        if width != 8 {
            return Err(ParseFenError::InvalidPlacement);
        }
    }

    let turn = match turn {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(ParseFenError::InvalidSideToMove),
    };

    let mut white_rights = CastleRights::empty();
    let mut black_rights = CastleRights::empty();
    if castling != "-" {
        for c in castling.chars() {
            let (rights, side) = match c {
                'K' => (&mut white_rights, CastleSide::KingSide),
                'Q' => (&mut white_rights, CastleSide::QueenSide),
                'k' => (&mut black_rights, CastleSide::KingSide),
                'q' => (&mut black_rights, CastleSide::QueenSide),
                _ => return Err(ParseFenError::InvalidCastlingRights),
            };

            if rights.allows(side) {
                return Err(ParseFenError::InvalidCastlingRights);
            }

            *rights |= side.rights();
        }
    }

    let en_passant = match en_passant {
        "-" => None,
        s => Some(s.parse().map_err(|_| ParseFenError::InvalidEnPassantSquare)?),
    };

    let halfmoves = halfmoves
        .parse()
        .map_err(|_| ParseFenError::InvalidHalfmoveClock)?;

    let fullmoves = fullmoves
        .parse()
        .map_err(|_| ParseFenError::InvalidFullmoveNumber)?;

    Ok(Position::from_parts(
        pieces,
        turn,
        white_rights,
        black_rights,
        en_passant,
        halfmoves,
        fullmoves,
    ))
}

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_position(s)?;
        Ok(Fen(s.to_string()))
    }
}

impl FromStr for Position {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_position(s)
    }
}

impl From<&Position> for Fen {
    fn from(pos: &Position) -> Self {
        Fen(pos.to_string())
    }
}

impl TryFrom<&Fen> for Position {
    type Error = ParseFenError;

    fn try_from(fen: &Fen) -> Result<Self, Self::Error> {
        fen.0.parse()
    }
}

impl TryFrom<Fen> for Position {
    type Error = ParseFenError;

    fn try_from(fen: Fen) -> Result<Self, Self::Error> {
        (&fen).try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn the_default_fen_is_the_initial_position() {
        let pos: Position = Fen::default().try_into().unwrap();
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn the_placement_field_comes_before_the_first_space() {
        assert_eq!(
            Fen::default().placement(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[proptest]
    fn printing_and_parsing_a_position_is_an_identity(pos: Position) {
        assert_eq!(pos.to_string().parse::<Position>(), Ok(pos));
    }

    #[proptest]
    fn the_fen_of_a_position_converts_back_to_it(pos: Position) {
        assert_eq!(Position::try_from(Fen::from(&pos)), Ok(pos));
    }

    #[test]
    fn parsing_fails_unless_there_are_six_fields() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 w - -".parse::<Fen>(),
            Err(ParseFenError::InvalidSyntax)
        );
    }

    #[test]
    fn parsing_fails_for_an_unknown_piece_letter() {
        assert_eq!(
            "4x3/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidPlacement)
        );
    }

    #[test]
    fn parsing_fails_for_a_rank_that_is_not_eight_files_wide() {
        assert_eq!(
            "9/8/8/8/8/8/8/8 w - - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidPlacement)
        );

        assert_eq!(
            "ppppppppp/8/8/8/8/8/8/8 w - - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidPlacement)
        );
    }

    #[test]
    fn parsing_fails_unless_there_are_eight_ranks() {
        assert_eq!(
            "8/8/8/8/8/8/8 w - - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidPlacement)
        );
    }

    #[test]
    fn parsing_fails_for_an_invalid_side_to_move() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 white - - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidSideToMove)
        );
    }

    #[test]
    fn parsing_fails_for_duplicate_castling_rights() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 w KK - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidCastlingRights)
        );
    }

    #[test]
    fn parsing_fails_for_an_unknown_castling_letter() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 w A - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidCastlingRights)
        );
    }

    #[test]
    fn parsing_fails_for_an_invalid_en_passant_square() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 w - e9 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidEnPassantSquare)
        );
    }

    #[test]
    fn parsing_fails_for_invalid_clocks() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 w - - x 1".parse::<Fen>(),
            Err(ParseFenError::InvalidHalfmoveClock)
        );

        assert_eq!(
            "8/8/8/8/8/8/8/8 w - - 0 x".parse::<Fen>(),
            Err(ParseFenError::InvalidFullmoveNumber)
        );
    }
}
