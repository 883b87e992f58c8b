pub mod app;
pub mod config;
pub mod engine;
pub mod events;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod snake;
pub mod speed;
pub mod state;
pub mod store;
pub mod term;
pub mod ui;

pub use engine::GameController;
pub use events::{EndReason, GameEvent};
pub use snake::Direction;
pub use speed::SpeedSetting;
pub use state::{GameState, Phase};
pub use store::{FileStore, MemoryStore, ScoreStore};

pub const GRID_SIZE: i16 = 20;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FOOD_SCORE: u32 = 10;

/// A grid position. Signed so that a head stepping off the board can be
/// represented and rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self, grid_size: i16) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }
}
