use crate::components::{ActivePiece, Board, Direction, GameState, GameStatus, PieceRng, TetrominoType};
use crate::tests::test_utils::{fill_row, occupy, pos};

#[test]
fn test_catalog_order_and_rotation_counts() {
    let counts: Vec<usize> = TetrominoType::ALL
        .iter()
        .map(|shape| shape.rotation_count())
        .collect();
    assert_eq!(counts, vec![2, 4, 2, 2, 4, 4, 1]);
    assert_eq!(TetrominoType::ALL[0], TetrominoType::I);
    assert_eq!(TetrominoType::ALL[6], TetrominoType::O);
}

#[test]
fn test_every_rotation_has_four_distinct_cells() {
    for shape in TetrominoType::ALL {
        for rotation in 0..shape.rotation_count() {
            let mut cells = shape.cells_at(rotation, pos(0, 0));
            assert_eq!(cells.len(), 4, "{shape:?} rotation {rotation}");
            cells.sort_by_key(|c| (c.x, c.y));
            cells.dedup();
            assert_eq!(cells.len(), 4, "{shape:?} rotation {rotation}");
            assert!(cells.iter().all(|c| (0..4).contains(&c.x) && (0..4).contains(&c.y)));
        }
    }
}

#[test]
fn test_cells_come_out_column_by_column() {
    let cells = TetrominoType::J.cells_at(0, pos(0, 0));
    assert_eq!(cells, vec![pos(0, 2), pos(1, 0), pos(1, 1), pos(1, 2)]);

    let shifted = TetrominoType::J.cells_at(0, pos(3, 5));
    assert_eq!(shifted, vec![pos(3, 7), pos(4, 5), pos(4, 6), pos(4, 7)]);
}

#[test]
fn test_rotation_index_wraps() {
    assert_eq!(
        TetrominoType::I.cells_at(2, pos(0, 0)),
        TetrominoType::I.cells_at(0, pos(0, 0))
    );
}

#[test]
fn test_random_shape_is_deterministic_for_seed() {
    let mut a = PieceRng::with_seed(1234);
    let mut b = PieceRng::with_seed(1234);

    let first: Vec<TetrominoType> = (0..50).map(|_| TetrominoType::random(&mut a.0)).collect();
    let second: Vec<TetrominoType> = (0..50).map(|_| TetrominoType::random(&mut b.0)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_random_shape_covers_catalog() {
    let mut rng = fastrand::Rng::with_seed(5);
    let mut seen = [false; 7];
    for _ in 0..500 {
        let shape = TetrominoType::random(&mut rng);
        let index = TetrominoType::ALL.iter().position(|&s| s == shape).unwrap();
        seen[index] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_direction_offsets() {
    assert_eq!(Direction::Left.dx(), -1);
    assert_eq!(Direction::Right.dx(), 1);
    assert_eq!(pos(2, 3).offset(Direction::Left.dx(), 1), pos(1, 4));
}

#[test]
fn test_new_board_is_empty() {
    let board = Board::new(12, 20);
    assert_eq!(board.cells.len(), 12);
    assert!(board.cells.iter().all(|column| column.len() == 20));
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_out_of_bounds_reads_empty_and_writes_are_ignored() {
    let mut board = Board::new(4, 4);

    assert!(!board.is_occupied(pos(-1, 0)));
    assert!(!board.is_occupied(pos(0, 4)));

    board.set(pos(4, 0), true);
    board.set(pos(0, -1), true);
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_free_cells_respect_the_active_piece() {
    let mut board = Board::new(4, 4);
    occupy(&mut board, &[(1, 1), (2, 2)]);
    let piece = ActivePiece {
        tetromino_type: TetrominoType::O,
        rotation: 0,
        cells: vec![pos(1, 1)],
    };

    assert!(board.is_free_for(pos(0, 0), None));
    assert!(!board.is_free_for(pos(1, 1), None));
    assert!(board.is_free_for(pos(1, 1), Some(&piece)));
    assert!(!board.is_free_for(pos(2, 2), Some(&piece)));
    assert!(!board.is_free_for(pos(-1, 0), Some(&piece)));
}

#[test]
fn test_row_full_and_collapse() {
    let mut board = Board::new(3, 3);
    fill_row(&mut board, 2);
    occupy(&mut board, &[(0, 0), (2, 1)]);

    assert!(board.is_row_full(2));
    assert!(!board.is_row_full(1));
    assert!(!board.is_row_full(3));

    board.collapse_row(2);

    assert!(board.is_occupied(pos(0, 1)));
    assert!(board.is_occupied(pos(2, 2)));
    assert_eq!(board.occupied_count(), 2);
    assert!((0..3).all(|x| !board.is_occupied(pos(x, 0))));
}

#[test]
fn test_collapse_top_row_just_empties_it() {
    let mut board = Board::new(3, 3);
    fill_row(&mut board, 0);
    occupy(&mut board, &[(1, 2)]);

    board.collapse_row(0);

    assert_eq!(board.occupied_count(), 1);
    assert!(board.is_occupied(pos(1, 2)));
}

#[test]
fn test_board_clear() {
    let mut board = Board::new(4, 4);
    fill_row(&mut board, 3);
    board.clear();
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_game_state_reset() {
    let mut game_state = GameState {
        score: 900,
        lines_cleared: 7,
        status: GameStatus::Ended,
        is_record: true,
    };
    assert!(game_state.is_over());

    game_state.reset();

    assert_eq!(game_state.score, 0);
    assert_eq!(game_state.lines_cleared, 0);
    assert_eq!(game_state.status, GameStatus::Active);
    assert!(!game_state.is_record);
}

#[test]
fn test_far_out_of_range_positions_are_off_board() {
    let mut board = Board::new(4, 4);

    for (x, y) in [(i32::MIN, 0), (0, i32::MIN), (i32::MAX, 0), (0, i32::MAX)] {
        assert!(!board.in_bounds(pos(x, y)));
        assert!(!board.is_occupied(pos(x, y)));
        board.set(pos(x, y), true);
    }
    assert_eq!(board.occupied_count(), 0);
}
