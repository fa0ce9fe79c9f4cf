use crate::{attacks, Bitboard, CastleRights, CastleSide, Color, File, Move, Piece, Promotion, Rank, Role, Square};
use derive_more::{Display, Error};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// The piece placement: a sparse mapping from occupied [`Square`]s to [`Piece`]s.
pub type Placement = BTreeMap<Square, Piece>;

/// The reason why a move request was rejected.
///
/// Illegal requests are an expected outcome of user or network input; they
/// are reported as a value and leave the position untouched.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("{_0}")]
pub struct IllegalMove(#[error(not(source))] String);

impl IllegalMove {
    fn new(reason: impl Into<String>) -> Self {
        IllegalMove(reason.into())
    }

    /// A human-readable description of why the move was rejected.
    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Facts derived from a snapshot, computed at most once per instance.
#[derive(Debug, Clone)]
struct Analysis {
    king: Square,
    checkers: Bitboard,
    attacked: Bitboard,
    danger: Bitboard,
    block: Bitboard,
    pins: Vec<(Square, Bitboard)>,
}

/// An immutable snapshot of a game of chess.
///
/// A position fully describes the state of the game: piece placement, side
/// to move, castling rights, en passant target, and both clocks. Derived
/// facts such as the legal move list are computed lazily and memoized per
/// instance, never shared across snapshots. Applying a move produces a new
/// snapshot and leaves the original untouched.
#[derive(Clone)]
pub struct Position {
    placement: Placement,
    turn: Color,
    white_rights: CastleRights,
    black_rights: CastleRights,
    en_passant: Option<Square>,
    halfmoves: u32,
    fullmoves: u32,
    analysis: OnceLock<Analysis>,
    moves: OnceLock<Vec<Move>>,
}

impl Position {
    pub(crate) fn from_parts(
        placement: Placement,
        turn: Color,
        white_rights: CastleRights,
        black_rights: CastleRights,
        en_passant: Option<Square>,
        halfmoves: u32,
        fullmoves: u32,
    ) -> Self {
        Position {
            placement,
            turn,
            white_rights,
            black_rights,
            en_passant,
            halfmoves,
            fullmoves,
            analysis: OnceLock::new(),
            moves: OnceLock::new(),
        }
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The castling rights of the given side.
    #[inline(always)]
    pub fn castles(&self, side: Color) -> CastleRights {
        match side {
            Color::White => self.white_rights,
            Color::Black => self.black_rights,
        }
    }

    /// The en passant target square, if a pawn just advanced two squares.
    #[inline(always)]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    /// The number of halfmoves since the last capture or pawn advance.
    #[inline(always)]
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// The current move number since the start of the game.
    ///
    /// It starts at 1, and is incremented after every move by black.
    #[inline(always)]
    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    /// The [`Piece`] on the given [`Square`], if any.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.placement.get(&sq).copied()
    }

    /// An iterator over all pieces on the board.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Square, Piece)> + '_ {
        self.placement.iter().map(|(&sq, &p)| (sq, p))
    }

    pub(crate) fn placement(&self) -> &Placement {
        &self.placement
    }

    /// The [`Square`] occupied by the king of the side to move.
    pub fn king(&self) -> Square {
        self.analysis().king
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        !self.analysis().checkers.is_empty()
    }

    /// Whether the side to move is in checkmate.
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.moves().is_empty()
    }

    /// Whether the side to move has no legal move while not in check.
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.moves().is_empty()
    }

    fn analysis(&self) -> &Analysis {
        self.analysis.get_or_init(|| {
            let king = self
                .placement
                .iter()
                .find(|(_, p)| p.role == Role::King && p.color == self.turn)
                .map(|(&sq, _)| sq)
                .expect("expected king on the board");

            let checkers = attacks::check_squares(&self.placement, !self.turn, king);
            let attacked = attacks::all_attacked_squares(&self.placement, !self.turn);

            let danger = checkers.into_iter().fold(Bitboard::empty(), |bb, sq| {
                bb | attacks::king_danger_squares(king, sq, &self.placement)
            });

            let block = checkers.into_iter().fold(Bitboard::empty(), |bb, sq| {
                bb | attacks::king_block_squares(king, sq, &self.placement)
            });

            Analysis {
                king,
                checkers,
                attacked,
                danger,
                block,
                pins: attacks::pinned_pieces(king, &self.placement),
            }
        })
    }

    /// All legal moves for the side to move.
    pub fn moves(&self) -> &[Move] {
        self.moves.get_or_init(|| {
            let squares: Vec<_> = self.placement.keys().copied().collect();
            squares.iter().flat_map(|&sq| self.moves_for(sq)).collect()
        })
    }

    /// The legal moves of the piece on the given [`Square`].
    pub fn moves_from(&self, sq: Square) -> impl Iterator<Item = Move> + '_ {
        self.moves().iter().copied().filter(move |m| m.whence() == sq)
    }

    /// The legal destination squares of the piece on the given [`Square`].
    pub fn destinations(&self, sq: Square) -> Vec<Square> {
        self.moves_from(sq).map(|m| m.whither()).collect()
    }

    /// Every square with at least one legal move, mapped to its destinations.
    pub fn move_targets(&self) -> BTreeMap<Square, Vec<Square>> {
        let mut targets = BTreeMap::<_, Vec<_>>::new();
        for m in self.moves() {
            targets.entry(m.whence()).or_default().push(m.whither());
        }

        targets
    }

    fn moves_for(&self, sq: Square) -> Vec<Move> {
        let a = self.analysis();

        match a.checkers.len() {
            0 => self.pseudo_legal(sq),

            // capture the checker, interpose on its ray, or step the king
            // off the extended attack line
            1 => {
                let mut moves = self.pseudo_legal(sq);
                moves.retain(|m| {
                    if m.whence() == a.king {
                        !a.danger.contains(m.whither()) && !matches!(m, Move::Castle { .. })
                    } else {
                        a.block.contains(m.whither()) || a.checkers.contains(m.whither())
                    }
                });

                moves
            }

            // double check: only the king may move
            _ if sq == a.king => attacks::king_steps(sq)
                .into_iter()
                .filter(|&to| {
                    self.placement.get(&to).map(|p| p.color) != Some(self.turn)
                        && !a.attacked.contains(to)
                        && !a.danger.contains(to)
                })
                .map(|to| Move::Normal { from: sq, to })
                .collect(),

            _ => Vec::new(),
        }
    }

    /// Pseudo-legal moves of the piece on `sq`, with pins already applied
    /// but check evasion left to the caller.
    fn pseudo_legal(&self, sq: Square) -> Vec<Move> {
        let Some(&piece) = self.placement.get(&sq) else {
            return Vec::new();
        };

        if piece.color != self.turn {
            return Vec::new();
        }

        let a = self.analysis();
        let mut moves = Vec::new();

        match piece.role {
            Role::King => {
                for to in attacks::king_steps(sq) {
                    if self.placement.get(&to).map(|p| p.color) != Some(piece.color)
                        && !a.attacked.contains(to)
                    {
                        moves.push(Move::Normal { from: sq, to });
                    }
                }

                for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                    if self.castles(self.turn).allows(side) && self.can_castle(side) {
                        moves.push(Move::Castle {
                            from: sq,
                            to: side.king_target(self.turn),
                            side,
                        });
                    }
                }
            }

            Role::Pawn => {
                if let Some(ahead) = sq.forward(piece.color) {
                    if !self.placement.contains_key(&ahead) {
                        moves.push(self.pawn_advance(sq, ahead));

                        if sq.is_pawn_home(piece.color) {
                            if let Some(jump) = ahead.forward(piece.color) {
                                if !self.placement.contains_key(&jump) {
                                    moves.push(Move::Normal { from: sq, to: jump });
                                }
                            }
                        }
                    }

                    for to in [ahead.left(), ahead.right()].into_iter().flatten() {
                        if self.placement.get(&to).map(|p| p.color) == Some(!piece.color) {
                            moves.push(self.pawn_advance(sq, to));
                        } else if self.en_passant == Some(to) {
                            moves.push(Move::EnPassant { from: sq, to });
                        }
                    }
                }
            }

            Role::Knight => {
                for to in attacks::knight_steps(sq) {
                    if self.placement.get(&to).map(|p| p.color) != Some(piece.color) {
                        moves.push(Move::Normal { from: sq, to });
                    }
                }
            }

            Role::Bishop => {
                for to in attacks::bishop_rays(&self.placement, sq, piece.color, false) {
                    moves.push(Move::Normal { from: sq, to });
                }
            }

            Role::Rook => {
                for to in attacks::rook_rays(&self.placement, sq, piece.color, false) {
                    moves.push(Move::Normal { from: sq, to });
                }
            }

            Role::Queen => {
                let rays = attacks::bishop_rays(&self.placement, sq, piece.color, false)
                    | attacks::rook_rays(&self.placement, sq, piece.color, false);

                for to in rays {
                    moves.push(Move::Normal { from: sq, to });
                }
            }
        }

        moves.retain(|m| {
            a.pins
                .iter()
                .all(|&(pinned, axis)| m.whence() != pinned || axis.contains(m.whither()))
        });

        moves
    }

    /// A pawn push or capture, tagged as a promotion on the far rank.
    ///
    /// The queen stands in for the actual choice, which a request supplies
    /// at application time; move equality ignores it either way.
    fn pawn_advance(&self, from: Square, to: Square) -> Move {
        if to.rank() == Rank::promotion(self.turn) {
            Move::Promotion {
                from,
                to,
                promotion: Promotion::Queen,
            }
        } else {
            Move::Normal { from, to }
        }
    }

    fn can_castle(&self, side: CastleSide) -> bool {
        let back = Rank::back(self.turn);

        if self.analysis().king != Square::new(File::E, back) {
            return false;
        }

        if self.piece_on(side.rook_home(self.turn)) != Some(Piece::new(Role::Rook, self.turn)) {
            return false;
        }

        let a = self.analysis();
        let path = match side {
            CastleSide::KingSide => [File::F, File::G],
            CastleSide::QueenSide => [File::D, File::C],
        };

        for file in path {
            let sq = Square::new(file, back);
            if self.placement.contains_key(&sq) || a.attacked.contains(sq) {
                return false;
            }
        }

        // the rook's path must also be clear, though b1/b8 may be attacked
        side != CastleSide::QueenSide || !self.placement.contains_key(&Square::new(File::B, back))
    }

    /// Applies a move request, producing the next snapshot.
    ///
    /// The request is matched against the legal moves by its endpoints and
    /// then retagged from context: a king stepping two files castles, a pawn
    /// onto the en passant target captures en passant, and a pawn onto the
    /// far rank promotes to the supplied choice. A pawn reaching the far
    /// rank without a promotion choice is rejected.
    pub fn play(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Result<Position, IllegalMove> {
        let Some(&piece) = self.placement.get(&from) else {
            return Err(IllegalMove::new(format!("no piece at {from}")));
        };

        if !self.moves().contains(&Move::Normal { from, to }) {
            return Err(IllegalMove::new(format!("move {from}{to} is not available")));
        }

        let m = self.annotate(piece, from, to, promotion)?;
        Ok(self.apply(&m))
    }

    fn annotate(
        &self,
        piece: Piece,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Result<Move, IllegalMove> {
        if piece.role == Role::King && from == Square::new(File::E, Rank::back(self.turn)) {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if to == side.king_target(self.turn) {
                    return Ok(Move::Castle { from, to, side });
                }
            }
        }

        if piece.role == Role::Pawn && self.en_passant == Some(to) {
            return Ok(Move::EnPassant { from, to });
        }

        if piece.role == Role::Pawn && to.rank() == Rank::promotion(self.turn) {
            return match promotion {
                Some(promotion) => Ok(Move::Promotion {
                    from,
                    to,
                    promotion,
                }),

                None => Err(IllegalMove::new(format!(
                    "move {from}{to} requires a promotion choice"
                ))),
            };
        }

        Ok(Move::Normal { from, to })
    }

    /// Applies a legal [`Move`], producing the next snapshot.
    pub(crate) fn apply(&self, m: &Move) -> Position {
        let mut placement = self.placement.clone();
        let mover = placement
            .remove(&m.whence())
            .expect("expected a piece on the move's origin square");

        let captures = placement.contains_key(&m.whither());

        match *m {
            Move::Normal { to, .. } => {
                placement.insert(to, mover);
            }

            Move::Promotion { to, promotion, .. } => {
                placement.insert(to, Piece::new(promotion.role(), mover.color));
            }

            Move::EnPassant { to, .. } => {
                placement.insert(to, mover);
                let captured = to
                    .backward(mover.color)
                    .expect("expected the captured pawn behind the en passant target");
                placement.remove(&captured);
            }

            Move::Castle { to, side, .. } => {
                placement.insert(to, mover);
                let rook = placement
                    .remove(&side.rook_home(mover.color))
                    .expect("expected rook on its home corner when castling");
                placement.insert(side.rook_target(mover.color), rook);
            }
        }

        let mut own = self.castles(self.turn);
        if mover.role == Role::King {
            own = CastleRights::empty();
        } else {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if m.whence() == side.rook_home(self.turn) {
                    own = own.without(side);
                }
            }
        }

        let mut their = self.castles(!self.turn);
        if captures {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if m.whither() == side.rook_home(!self.turn) {
                    their = their.without(side);
                }
            }
        }

        let en_passant = if mover.role == Role::Pawn
            && m.whence().is_pawn_home(self.turn)
            && Some(m.whither())
                == m.whence()
                    .forward(self.turn)
                    .and_then(|sq| sq.forward(self.turn))
        {
            m.whence().forward(self.turn)
        } else {
            None
        };

        let halfmoves = if mover.role == Role::Pawn || captures {
            0
        } else {
            self.halfmoves + 1
        };

        let fullmoves = match self.turn {
            Color::White => self.fullmoves,
            Color::Black => self.fullmoves + 1,
        };

        let (white_rights, black_rights) = match self.turn {
            Color::White => (own, their),
            Color::Black => (their, own),
        };

        Position::from_parts(
            placement,
            !self.turn,
            white_rights,
            black_rights,
            en_passant,
            halfmoves,
            fullmoves,
        )
    }

    /// Whether neither side retains enough material to deliver mate.
    ///
    /// Detects king versus king, king and one minor piece versus king, and
    /// king and bishop each with both bishops on same-colored squares.
    pub(crate) fn has_insufficient_material(&self) -> bool {
        let mut minors = Vec::new();

        for (&sq, p) in &self.placement {
            match p.role {
                Role::King => {}
                Role::Knight | Role::Bishop => minors.push((sq, *p)),
                _ => return false,
            }
        }

        match minors[..] {
            [] | [_] => true,

            [(a, pa), (b, pb)] => {
                pa.role == Role::Bishop
                    && pb.role == Role::Bishop
                    && pa.color != pb.color
                    && (a.rank().get() + a.file().get()) % 2
                        == (b.rank().get() + b.file().get()) % 2
            }

            _ => false,
        }
    }
}

/// The standard initial position.
impl Default for Position {
    fn default() -> Self {
        const BACK: [Role; 8] = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];

        let mut placement = Placement::new();
        for (file, role) in File::iter().zip(BACK) {
            placement.insert(
                Square::new(file, Rank::First),
                Piece::new(role, Color::White),
            );

            placement.insert(
                Square::new(file, Rank::Second),
                Piece::new(Role::Pawn, Color::White),
            );

            placement.insert(
                Square::new(file, Rank::Seventh),
                Piece::new(Role::Pawn, Color::Black),
            );

            placement.insert(
                Square::new(file, Rank::Eighth),
                Piece::new(role, Color::Black),
            );
        }

        Position::from_parts(
            placement,
            Color::White,
            CastleRights::all(),
            CastleRights::all(),
            None,
            0,
            1,
        )
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.placement == other.placement
            && self.turn == other.turn
            && self.white_rights == other.white_rights
            && self.black_rights == other.black_rights
            && self.en_passant == other.en_passant
            && self.halfmoves == other.halfmoves
            && self.fullmoves == other.fullmoves
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.placement.hash(state);
        self.turn.hash(state);
        self.white_rights.hash(state);
        self.black_rights.hash(state);
        self.en_passant.hash(state);
        self.halfmoves.hash(state);
        self.fullmoves.hash(state);
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({self})")
    }
}

/// Prints the position in FEN.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut skip = 0;
            for file in File::iter() {
                match self.placement.get(&Square::new(file, rank)) {
                    None => skip += 1,
                    Some(p) => {
                        if skip > 0 {
                            write!(f, "{skip}")?;
                            skip = 0;
                        }

                        write!(f, "{p}")?;
                    }
                }
            }

            if skip > 0 {
                write!(f, "{skip}")?;
            }

            if rank > Rank::First {
                f.write_char('/')?;
            }
        }

        match self.turn {
            Color::White => f.write_str(" w ")?,
            Color::Black => f.write_str(" b ")?,
        }

        let mut rights = String::new();
        for color in Color::iter() {
            let letters = match color {
                Color::White => ['K', 'Q'],
                Color::Black => ['k', 'q'],
            };

            if self.castles(color).allows(CastleSide::KingSide) {
                rights.push(letters[0]);
            }

            if self.castles(color).allows(CastleSide::QueenSide) {
                rights.push(letters[1]);
            }
        }

        if rights.is_empty() {
            f.write_char('-')?;
        } else {
            f.write_str(&rights)?;
        }

        match self.en_passant {
            Some(sq) => write!(f, " {sq}")?,
            None => f.write_str(" -")?,
        }

        write!(f, " {} {}", self.halfmoves, self.fullmoves)
    }
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Position {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    /// A random playout from the initial position.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;
        use proptest::sample::Selector;

        (0..128usize, any::<Selector>())
            .prop_map(|(plies, selector)| {
                let mut pos = Position::default();

                for _ in 0..plies {
                    let m = match selector.try_select(pos.moves().iter().copied()) {
                        Some(m) => m,
                        None => break,
                    };

                    pos = pos.apply(&m);
                }

                pos
            })
            .boxed()
    }
}
