use chessrules::{CastleRights, Color, Fen, Game, Position, Role, Square};

#[test]
fn the_opening_position_offers_twenty_moves() {
    let pos = Position::default();
    assert_eq!(pos.moves().len(), 20);

    // sixteen pawn moves and four knight moves from ten squares
    let targets = pos.move_targets();
    assert_eq!(targets.len(), 10);
    assert_eq!(targets[&Square::G1], vec![Square::F3, Square::H3]);
}

#[test]
fn a_short_opening_updates_every_fen_field() {
    let mut game = Game::new();

    game.play(Square::E2, Square::E4, None).unwrap();
    assert_eq!(
        Fen::from(game.position()).as_str(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );

    game.play(Square::E7, Square::E5, None).unwrap();
    assert_eq!(
        Fen::from(game.position()).as_str(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );

    game.play(Square::G1, Square::F3, None).unwrap();
    assert_eq!(
        Fen::from(game.position()).as_str(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );

    game.play(Square::B8, Square::C6, None).unwrap();
    assert!(!game.position().is_check());
    assert_eq!(game.position().castles(Color::White), CastleRights::all());
    assert_eq!(game.position().castles(Color::Black), CastleRights::all());

    // both kings are still boxed in
    assert!(!game.position().destinations(Square::E1).contains(&Square::G1));
}

#[test]
fn the_en_passant_window_lasts_a_single_ply() {
    let mut game = Game::new();

    game.play(Square::E2, Square::E4, None).unwrap();
    game.play(Square::A7, Square::A6, None).unwrap();
    game.play(Square::E4, Square::E5, None).unwrap();
    game.play(Square::D7, Square::D5, None).unwrap();

    // the capture is available right away
    assert_eq!(game.position().en_passant_square(), Some(Square::D6));
    assert!(game.position().destinations(Square::E5).contains(&Square::D6));

    // but expires if white plays elsewhere
    game.play(Square::G1, Square::F3, None).unwrap();
    game.play(Square::A6, Square::A5, None).unwrap();

    assert_eq!(game.position().en_passant_square(), None);
    assert!(!game.position().destinations(Square::E5).contains(&Square::D6));
}

#[test]
fn kingside_castling_in_a_real_game() {
    let mut game = Game::new();

    for (from, to) in [
        (Square::E2, Square::E4),
        (Square::E7, Square::E5),
        (Square::G1, Square::F3),
        (Square::B8, Square::C6),
        (Square::F1, Square::C4),
        (Square::G8, Square::F6),
    ] {
        game.play(from, to, None).unwrap();
    }

    assert!(game.position().destinations(Square::E1).contains(&Square::G1));
    game.play(Square::E1, Square::G1, None).unwrap();

    let pos = game.position();
    assert_eq!(pos.piece_on(Square::G1).map(|p| p.role), Some(Role::King));
    assert_eq!(pos.piece_on(Square::F1).map(|p| p.role), Some(Role::Rook));
    assert_eq!(pos.piece_on(Square::H1), None);
    assert_eq!(pos.castles(Color::White), CastleRights::empty());
    assert_eq!(pos.castles(Color::Black), CastleRights::all());
}

#[test]
fn a_game_survives_a_rejected_request() {
    let mut game = Game::new();
    let fen = Fen::from(game.position());

    assert!(game.play(Square::D1, Square::D5, None).is_err());
    assert_eq!(Fen::from(game.position()), fen);
    assert_eq!(game.outcome(), None);

    // and legal play continues as if nothing happened
    assert!(game.play(Square::D2, Square::D4, None).is_ok());
}
