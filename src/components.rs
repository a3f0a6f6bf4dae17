#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;

use crate::game::SHAPE_GRID;

// Rotation states per shape, each listing the occupied `y * 4 + x` slots of the 4x4 box.
// Catalog order matters: seeded games depend on it.
const I_ROTATIONS: &[[u8; 4]] = &[[1, 5, 9, 13], [4, 5, 6, 7]];
const J_ROTATIONS: &[[u8; 4]] = &[[1, 5, 8, 9], [1, 5, 6, 7], [1, 2, 5, 9], [1, 2, 3, 7]];
const S_ROTATIONS: &[[u8; 4]] = &[[1, 2, 4, 5], [0, 4, 5, 9]];
const Z_ROTATIONS: &[[u8; 4]] = &[[0, 1, 5, 6], [1, 4, 5, 8]];
const L_ROTATIONS: &[[u8; 4]] = &[[1, 5, 9, 10], [1, 2, 3, 5], [1, 2, 6, 10], [2, 4, 5, 6]];
const T_ROTATIONS: &[[u8; 4]] = &[[0, 1, 2, 5], [1, 4, 5, 9], [1, 4, 5, 6], [1, 5, 6, 9]];
const O_ROTATIONS: &[[u8; 4]] = &[[1, 2, 5, 6]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoType {
    I,
    J,
    S,
    Z,
    L,
    T,
    O,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::L,
        TetrominoType::T,
        TetrominoType::O,
    ];

    /// Picks a shape uniformly from the catalog.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(0..Self::ALL.len())]
    }

    #[must_use]
    pub fn rotations(self) -> &'static [[u8; 4]] {
        match self {
            TetrominoType::I => I_ROTATIONS,
            TetrominoType::J => J_ROTATIONS,
            TetrominoType::S => S_ROTATIONS,
            TetrominoType::Z => Z_ROTATIONS,
            TetrominoType::L => L_ROTATIONS,
            TetrominoType::T => T_ROTATIONS,
            TetrominoType::O => O_ROTATIONS,
        }
    }

    #[must_use]
    pub fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    /// Absolute cells of `rotation` with the 4x4 box placed at `origin`.
    ///
    /// Cells come out column by column (x outer, y inner). The first cell is
    /// the rotation pivot, so callers must not reorder them.
    #[must_use]
    pub fn cells_at(self, rotation: usize, origin: Position) -> Vec<Position> {
        let slots = &self.rotations()[rotation % self.rotation_count()];
        let mut cells = Vec::with_capacity(slots.len());

        for x in 0..SHAPE_GRID {
            for y in 0..SHAPE_GRID {
                if slots.contains(&(y * SHAPE_GRID + x)) {
                    cells.push(Position {
                        x: origin.x + i32::from(x),
                        y: origin.y + i32::from(y),
                    });
                }
            }
        }

        cells
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The falling piece. Its cells are always marked occupied on the [`Board`].
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub tetromino_type: TetrominoType,
    pub rotation: usize,
    pub cells: Vec<Position>,
}

impl ActivePiece {
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<bool>>,
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![false; height]; width],
        }
    }

    pub fn clear(&mut self) {
        for column in &mut self.cells {
            column.fill(false);
        }
    }

    // Grid indices of `position`, if it lies on the board
    fn index(&self, position: Position) -> Option<(usize, usize)> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Out-of-bounds positions read as empty.
    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.index(position).is_some_and(|(x, y)| self.cells[x][y])
    }

    pub fn set(&mut self, position: Position, occupied: bool) {
        if let Some((x, y)) = self.index(position) {
            self.cells[x][y] = occupied;
        }
    }

    /// A target cell is free when it is on the board and either empty or
    /// already held by `piece`.
    #[must_use]
    pub fn is_free_for(&self, position: Position, piece: Option<&ActivePiece>) -> bool {
        self.in_bounds(position)
            && (!self.is_occupied(position) || piece.is_some_and(|p| p.contains(position)))
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.height && (0..self.width).all(|x| self.cells[x][y])
    }

    /// Empties row `y` and shifts every row above it down by one. Row 0 ends up empty.
    pub fn collapse_row(&mut self, y: usize) {
        if y >= self.height {
            return;
        }

        for column in &mut self.cells {
            for y2 in (1..=y).rev() {
                column[y2] = column[y2 - 1];
            }
            column[0] = false;
        }
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|column| column.iter().filter(|&&cell| cell).count())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Active,
    Ended,
}

#[derive(Debug, Resource, Clone, Default)]
pub struct GameState {
    pub score: u32,
    pub lines_cleared: u32,
    pub status: GameStatus,
    pub is_record: bool,
}

impl GameState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Ended
    }
}

/// Source of piece selection. Seed it to replay a game.
#[derive(Resource, Debug, Clone)]
pub struct PieceRng(pub fastrand::Rng);

impl PieceRng {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for PieceRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}
