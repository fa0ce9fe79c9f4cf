use crate::{Bitboard, Color, Placement, Role, Square};

const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (1, -2),
    (-2, 1),
    (-1, 2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The squares a king reaches in one step, bounded by the board edge.
pub(crate) fn king_steps(sq: Square) -> Bitboard {
    KING_STEPS
        .iter()
        .filter_map(|&(dr, df)| sq.moved(dr, df))
        .collect()
}

/// The squares a knight reaches, bounded by the board edge.
pub(crate) fn knight_steps(sq: Square) -> Bitboard {
    KNIGHT_STEPS
        .iter()
        .filter_map(|&(dr, df)| sq.moved(dr, df))
        .collect()
}

/// Walks one ray, stopping at the first occupied square.
///
/// The blocking square is included unless it holds a piece of `color` and
/// `include_same_color` is false.
fn ray(
    placement: &Placement,
    from: Square,
    (dr, df): (i8, i8),
    color: Color,
    include_same_color: bool,
) -> Bitboard {
    let mut squares = Bitboard::empty();
    let mut current = from;

    while let Some(next) = current.moved(dr, df) {
        match placement.get(&next) {
            None => squares = squares.with(next),
            Some(p) if include_same_color || p.color != color => {
                return squares.with(next);
            }
            Some(_) => return squares,
        }

        current = next;
    }

    squares
}

/// The squares a bishop on `sq` reaches along its diagonals.
pub(crate) fn bishop_rays(
    placement: &Placement,
    sq: Square,
    color: Color,
    include_same_color: bool,
) -> Bitboard {
    BISHOP_DIRECTIONS
        .iter()
        .fold(Bitboard::empty(), |bb, &dir| {
            bb | ray(placement, sq, dir, color, include_same_color)
        })
}

/// The squares a rook on `sq` reaches along its rank and file.
pub(crate) fn rook_rays(
    placement: &Placement,
    sq: Square,
    color: Color,
    include_same_color: bool,
) -> Bitboard {
    ROOK_DIRECTIONS.iter().fold(Bitboard::empty(), |bb, &dir| {
        bb | ray(placement, sq, dir, color, include_same_color)
    })
}

/// The squares attacked by the piece on `sq`, or the empty set if vacant.
///
/// "Attacked" means the piece could capture on or defends the square: pawn
/// attacks ignore occupancy, and sliding attacks include the first occupied
/// square of either color.
pub(crate) fn attacks_from(placement: &Placement, sq: Square) -> Bitboard {
    let Some(piece) = placement.get(&sq) else {
        return Bitboard::empty();
    };

    match piece.role {
        Role::Pawn => [
            sq.forward(piece.color).and_then(Square::left),
            sq.forward(piece.color).and_then(Square::right),
        ]
        .into_iter()
        .flatten()
        .collect(),

        Role::King => king_steps(sq),
        Role::Knight => knight_steps(sq),
        Role::Bishop => bishop_rays(placement, sq, piece.color, true),
        Role::Rook => rook_rays(placement, sq, piece.color, true),

        Role::Queen => {
            bishop_rays(placement, sq, piece.color, true)
                | rook_rays(placement, sq, piece.color, true)
        }
    }
}

/// The union of attacks from every piece of the given color.
pub(crate) fn all_attacked_squares(placement: &Placement, by: Color) -> Bitboard {
    placement
        .iter()
        .filter(|(_, p)| p.color == by)
        .fold(Bitboard::empty(), |bb, (&sq, _)| {
            bb | attacks_from(placement, sq)
        })
}

/// The squares of the pieces of the given color that attack `king`.
pub(crate) fn check_squares(placement: &Placement, by: Color, king: Square) -> Bitboard {
    placement
        .iter()
        .filter(|(_, p)| p.color == by)
        .filter(|(&sq, _)| attacks_from(placement, sq).contains(king))
        .map(|(&sq, _)| sq)
        .collect()
}

/// The full ray from a ranged attacker through and past the king.
///
/// The king may not retreat along this line, since the attacker would still
/// reach it on the new square. Empty for pawn and knight attackers.
pub(crate) fn king_danger_squares(
    king: Square,
    attacker: Square,
    placement: &Placement,
) -> Bitboard {
    let Some(piece) = placement.get(&attacker) else {
        return Bitboard::empty();
    };

    if !piece.role.is_ranged() {
        return Bitboard::empty();
    }

    let dr = (king.rank() - attacker.rank()).signum();
    let df = (king.file() - attacker.file()).signum();

    let mut squares = Bitboard::empty();
    let mut current = attacker;
    while let Some(next) = current.moved(dr, df) {
        squares = squares.with(next);
        current = next;
    }

    squares
}

/// The squares on which a check by a ranged attacker can be blocked.
///
/// Includes the attacker's own square (capturing resolves the check too) and
/// every square up to, but not including, the king. Empty for pawn and
/// knight attackers, whose checks cannot be interposed against.
pub(crate) fn king_block_squares(
    king: Square,
    attacker: Square,
    placement: &Placement,
) -> Bitboard {
    let Some(piece) = placement.get(&attacker) else {
        return Bitboard::empty();
    };

    if !piece.role.is_ranged() {
        return Bitboard::empty();
    }

    let dr = (king.rank() - attacker.rank()).signum();
    let df = (king.file() - attacker.file()).signum();

    let mut squares = Bitboard::empty();
    let mut current = attacker;
    loop {
        if placement.get(&current).map(|p| p.role) == Some(Role::King) {
            return squares;
        }

        squares = squares.with(current);

        match current.moved(dr, df) {
            Some(next) => current = next,
            None => return squares,
        }
    }
}

/// Whether an attacker of the given role slides along the `(dr, df)` line
/// from `from` to `to`, with the line's direction as a step.
fn sliding_line(role: Role, from: Square, to: Square) -> Option<(i8, i8)> {
    let dr = to.rank() - from.rank();
    let df = to.file() - from.file();

    let orthogonal = (dr == 0) != (df == 0);
    let diagonal = dr != 0 && dr.abs() == df.abs();

    let reaches = match role {
        Role::Rook => orthogonal,
        Role::Bishop => diagonal,
        Role::Queen => orthogonal || diagonal,
        _ => false,
    };

    reaches.then_some((dr.signum(), df.signum()))
}

/// The pinned pieces of the king's side, with the axis each may move along.
///
/// A piece is pinned when it is the only one standing between an enemy
/// ranged attacker and the king, on a line the attacker slides along. The
/// axis includes the attacker's square, so capturing the attacker remains
/// available to the pinned piece.
pub(crate) fn pinned_pieces(king: Square, placement: &Placement) -> Vec<(Square, Bitboard)> {
    let Some(owner) = placement.get(&king).map(|p| p.color) else {
        return Vec::new();
    };

    let mut pins = Vec::new();
    for (&sq, piece) in placement {
        if piece.color == owner || !piece.role.is_ranged() {
            continue;
        }

        let Some((dr, df)) = sliding_line(piece.role, sq, king) else {
            continue;
        };

        // the attacker-to-king line, attacker inclusive, king exclusive
        let mut axis = sq.bitboard();
        let mut current = sq;
        while let Some(next) = current.moved(dr, df) {
            if next == king {
                break;
            }

            axis = axis.with(next);
            current = next;
        }

        let between: Bitboard = axis
            .without(sq)
            .into_iter()
            .filter(|s| placement.contains_key(s))
            .collect();

        if let Some(pinned) = between.single() {
            pins.push((pinned, axis));
        }
    }

    pins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Piece;
    use Color::*;
    use Role::*;
    use Square::*;

    fn board(pieces: &[(Square, Role, Color)]) -> Placement {
        pieces
            .iter()
            .map(|&(sq, r, c)| (sq, Piece::new(r, c)))
            .collect()
    }

    #[test]
    fn pawn_attacks_both_forward_diagonals_regardless_of_occupancy() {
        let placement = board(&[(E4, Pawn, White)]);
        assert_eq!(attacks_from(&placement, E4), Bitboard::from_iter([D5, F5]));

        let placement = board(&[(E4, Pawn, Black)]);
        assert_eq!(attacks_from(&placement, E4), Bitboard::from_iter([D3, F3]));
    }

    #[test]
    fn pawn_attacks_are_clipped_at_the_board_edge() {
        let placement = board(&[(A2, Pawn, White)]);
        assert_eq!(attacks_from(&placement, A2), B3.bitboard());
    }

    #[test]
    fn sliding_attacks_include_the_first_occupied_square_of_either_color() {
        let placement = board(&[(A1, Rook, White), (A4, Pawn, White), (D1, Knight, Black)]);

        let attacks = attacks_from(&placement, A1);
        assert!(attacks.contains(A4));
        assert!(attacks.contains(D1));
        assert!(!attacks.contains(A5));
        assert!(!attacks.contains(E1));
    }

    #[test]
    fn attacks_from_a_vacant_square_are_empty() {
        assert_eq!(attacks_from(&board(&[]), E4), Bitboard::empty());
    }

    #[test]
    fn check_squares_finds_every_checker() {
        let placement = board(&[
            (E1, King, White),
            (E8, Rook, Black),
            (D3, Knight, Black),
            (A8, Bishop, Black),
        ]);

        assert_eq!(
            check_squares(&placement, Black, E1),
            Bitboard::from_iter([E8, D3])
        );
    }

    #[test]
    fn king_danger_squares_extend_past_the_king() {
        let placement = board(&[(E1, King, White), (E8, Rook, Black)]);
        let danger = king_danger_squares(E1, E8, &placement);

        assert!(danger.contains(E1));
        assert!(!danger.contains(E8));
        assert_eq!(danger, Bitboard::from_iter([E7, E6, E5, E4, E3, E2, E1]));
    }

    #[test]
    fn knight_checks_have_no_danger_or_block_squares() {
        let placement = board(&[(E1, King, White), (D3, Knight, Black)]);
        assert_eq!(king_danger_squares(E1, D3, &placement), Bitboard::empty());
        assert_eq!(king_block_squares(E1, D3, &placement), Bitboard::empty());
    }

    #[test]
    fn king_block_squares_span_attacker_up_to_the_king() {
        let placement = board(&[(E1, King, White), (E6, Rook, Black)]);
        assert_eq!(
            king_block_squares(E1, E6, &placement),
            Bitboard::from_iter([E6, E5, E4, E3, E2])
        );
    }

    #[test]
    fn piece_between_rook_and_king_is_pinned_to_the_file() {
        let placement = board(&[(E1, King, White), (E4, Bishop, White), (E8, Rook, Black)]);

        let pins = pinned_pieces(E1, &placement);
        assert_eq!(pins.len(), 1);

        let (pinned, axis) = pins[0];
        assert_eq!(pinned, E4);
        assert_eq!(axis, Bitboard::from_iter([E8, E7, E6, E5, E4, E3, E2]));
    }

    #[test]
    fn bishop_does_not_pin_along_a_file() {
        let placement = board(&[(E1, King, White), (E4, Rook, White), (E8, Bishop, Black)]);
        assert!(pinned_pieces(E1, &placement).is_empty());
    }

    #[test]
    fn two_pieces_between_attacker_and_king_pin_neither() {
        let placement = board(&[
            (E1, King, White),
            (E3, Pawn, White),
            (E5, Knight, White),
            (E8, Queen, Black),
        ]);

        assert!(pinned_pieces(E1, &placement).is_empty());
    }

    #[test]
    fn all_attacked_squares_union_every_piece_of_the_color() {
        let placement = board(&[(A1, Rook, Black), (H8, Bishop, Black), (E1, King, White)]);

        let attacked = all_attacked_squares(&placement, Black);
        assert!(attacked.contains(A8));
        assert!(attacked.contains(E1));
        assert!(attacked.contains(G7));
        assert!(attacked.contains(E5));
        assert!(!attacked.contains(B3));
    }
}
