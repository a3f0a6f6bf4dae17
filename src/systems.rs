use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    ActivePiece, Board, Direction, GameState, GameStatus, PieceRng, Position, TetrominoType,
};
use crate::game::{POINTS_PER_DROP_STEP, POINTS_PER_LINE};
use crate::records::RecordStore;
use crate::sound::{AudioState, SoundEffect};

/// What a gravity tick did to the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Locked,
    Idle,
}

/// Returns the falling piece and its entity, if there is one.
pub fn active_piece(world: &mut World) -> Option<(Entity, ActivePiece)> {
    let mut query = world.query::<(Entity, &ActivePiece)>();
    query
        .iter(world)
        .next()
        .map(|(entity, piece)| (entity, piece.clone()))
}

pub fn has_active_piece(world: &mut World) -> bool {
    active_piece(world).is_some()
}

/// Spawns a random shape at the top center of the board.
pub fn spawn_tetromino(world: &mut World) {
    let tetromino_type = match world.get_resource_mut::<PieceRng>() {
        Some(mut rng) => TetrominoType::random(&mut rng.0),
        None => TetrominoType::random(&mut fastrand::Rng::new()),
    };

    let spawn_x = {
        let board = world.resource::<Board>();
        i32::try_from(board.width / 2).unwrap_or(i32::MAX)
    };

    spawn_shape(world, tetromino_type, spawn_x);
}

/// Places `tetromino_type` in its first rotation with its 4x4 box at column
/// `spawn_x`, row 0.
///
/// Ends the game when any target cell is blocked. Does nothing while a piece
/// is already falling or the game is over. Returns whether a piece was placed.
pub fn spawn_shape(world: &mut World, tetromino_type: TetrominoType, spawn_x: i32) -> bool {
    if world.resource::<GameState>().is_over() {
        return false;
    }
    if has_active_piece(world) {
        debug!("Spawn skipped, a piece is still falling");
        return false;
    }

    let cells = tetromino_type.cells_at(0, Position { x: spawn_x, y: 0 });

    let blocked = {
        let board = world.resource::<Board>();
        cells.iter().any(|&cell| !board.is_free_for(cell, None))
    };

    if blocked {
        end_game(world);
        return false;
    }

    {
        let mut board = world.resource_mut::<Board>();
        for &cell in &cells {
            board.set(cell, true);
        }
    }

    debug!("Spawned {tetromino_type:?} at column {spawn_x}");
    world.spawn(ActivePiece {
        tetromino_type,
        rotation: 0,
        cells,
    });
    true
}

fn end_game(world: &mut World) {
    let score = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.status = GameStatus::Ended;
        game_state.score
    };

    let is_record = world
        .get_resource_mut::<RecordStore>()
        .is_some_and(|mut records| records.submit(score));
    world.resource_mut::<GameState>().is_record = is_record;

    if let Some(audio_state) = world.get_resource::<AudioState>() {
        audio_state.play_sound(SoundEffect::GameOver);
    }

    info!("Game over with score {score} (new record: {is_record})");
}

// Moves the piece onto `cells` if every one of them is free. All or nothing.
fn try_relocate(
    world: &mut World,
    entity: Entity,
    piece: &ActivePiece,
    cells: Vec<Position>,
    rotation: usize,
) -> bool {
    {
        let board = world.resource::<Board>();
        if !cells
            .iter()
            .all(|&cell| board.is_free_for(cell, Some(piece)))
        {
            return false;
        }
    }

    {
        let mut board = world.resource_mut::<Board>();
        for &cell in &piece.cells {
            board.set(cell, false);
        }
        for &cell in &cells {
            board.set(cell, true);
        }
    }

    world.entity_mut(entity).insert(ActivePiece {
        tetromino_type: piece.tetromino_type,
        rotation,
        cells,
    });
    true
}

/// One gravity tick: drop the piece a row, or lock it where it stands.
///
/// A locked piece stays on the board; the caller spawns the next one.
pub fn gravity_step(world: &mut World) -> StepOutcome {
    let Some((entity, piece)) = active_piece(world) else {
        return StepOutcome::Idle;
    };

    let lowered: Vec<Position> = piece.cells.iter().map(|cell| cell.offset(0, 1)).collect();

    if try_relocate(world, entity, &piece, lowered, piece.rotation) {
        trace!("Piece moved down");
        StepOutcome::Moved
    } else {
        debug!("Locking {:?}", piece.tetromino_type);
        world.despawn(entity);
        StepOutcome::Locked
    }
}

/// Shifts the piece one column. Rejected moves leave everything untouched.
pub fn move_tetromino(world: &mut World, direction: Direction) -> bool {
    let Some((entity, piece)) = active_piece(world) else {
        return false;
    };

    let shifted: Vec<Position> = piece
        .cells
        .iter()
        .map(|cell| cell.offset(direction.dx(), 0))
        .collect();

    try_relocate(world, entity, &piece, shifted, piece.rotation)
}

/// Advances the piece to its next rotation around its first cell.
///
/// From an even rotation index the pivot column is taken one to the left,
/// which keeps the catalog shapes roughly centered. There is no kick search:
/// if any rotated cell is off the board or blocked, nothing changes.
pub fn rotate_tetromino(world: &mut World) -> bool {
    let Some((entity, piece)) = active_piece(world) else {
        return false;
    };
    let Some(&pivot) = piece.cells.first() else {
        return false;
    };

    let origin = if piece.rotation % 2 == 0 {
        pivot.offset(-1, 0)
    } else {
        pivot
    };
    let rotation = (piece.rotation + 1) % piece.tetromino_type.rotation_count();
    let rotated = piece.tetromino_type.cells_at(rotation, origin);

    try_relocate(world, entity, &piece, rotated, rotation)
}

/// Clears every fully occupied row in one top-to-bottom pass, collapsing the
/// rows above each one. Returns the number of rows cleared.
pub fn clear_full_rows(world: &mut World) -> u32 {
    let cleared = {
        let mut board = world.resource_mut::<Board>();
        let mut cleared = 0u32;
        for y in 0..board.height {
            if board.is_row_full(y) {
                board.collapse_row(y);
                cleared += 1;
            }
        }
        cleared
    };

    if cleared == 0 {
        return 0;
    }

    if let Some(audio_state) = world.get_resource::<AudioState>() {
        for _ in 0..cleared {
            audio_state.play_sound(SoundEffect::LineClear);
        }
    }

    let mut game_state = world.resource_mut::<GameState>();
    game_state.score += POINTS_PER_LINE * cleared;
    game_state.lines_cleared += cleared;
    info!("Cleared {cleared} rows, score {}", game_state.score);

    cleared
}

/// Drops the piece until it locks, scoring every gravity step taken,
/// the locking one included. Returns the number of steps.
pub fn hard_drop(world: &mut World) -> u32 {
    let mut steps = 0;

    while has_active_piece(world) {
        world.resource_mut::<GameState>().score += POINTS_PER_DROP_STEP;
        steps += 1;
        gravity_step(world);
    }

    if steps > 0 {
        debug!("Hard drop took {steps} steps");
    }
    steps
}

/// Empties the board, zeroes the score and spawns a fresh piece.
pub fn restart_game(world: &mut World) {
    let pieces: Vec<Entity> = world
        .query_filtered::<Entity, With<ActivePiece>>()
        .iter(world)
        .collect();
    for entity in pieces {
        world.despawn(entity);
    }

    world.resource_mut::<GameState>().reset();
    world.resource_mut::<Board>().clear();

    info!("Restarting game");
    spawn_tetromino(world);
}
