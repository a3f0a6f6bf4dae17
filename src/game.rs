#![warn(clippy::all, clippy::pedantic)]

// Default board dimensions
pub const BOARD_WIDTH: usize = 12;
pub const BOARD_HEIGHT: usize = 20;

// Every shape is described inside a 4x4 box
pub const SHAPE_GRID: u8 = 4;

// Scoring
pub const POINTS_PER_LINE: u32 = 100;
pub const POINTS_PER_DROP_STEP: u32 = 10;

// Volume change per key press
pub const VOLUME_STEP: f32 = 0.1;

// Gravity timer
pub const GRAVITY_INTERVAL_MS: u64 = 200;

// Persisted record list
pub const RECORDS_FILE_PATH: &str = "data/records.txt";
pub const RECORDS_DELIMITER: char = ';';
