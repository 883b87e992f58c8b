use rand::Rng;

use crate::snake::{Direction, Snake};
use crate::{Cell, GRID_SIZE, INITIAL_SNAKE_LENGTH};

/// Rejection-sampling attempts before falling back to enumerating free cells.
pub const MAX_FOOD_ATTEMPTS: usize = 64;

const START_HEAD: Cell = Cell::new(10, 10);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// One session's worth of simulation data. Only the engine mutates it; the
/// renderer and UI get a shared borrow.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) snake: Snake,
    pub(crate) direction: Direction,
    pub(crate) pending_direction: Direction,
    pub(crate) food: Cell,
    pub(crate) score: u32,
    pub(crate) phase: Phase,
}

impl GameState {
    /// The canonical starting board: a 3-cell snake heading right from
    /// (10, 10) and one piece of food.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let snake = Snake::new(START_HEAD, INITIAL_SNAKE_LENGTH, Direction::Right);
        // A 3-cell snake always leaves room on a 20x20 board.
        let food = place_food(&snake, GRID_SIZE, rng).unwrap_or_default();

        GameState {
            snake,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food,
            score: 0,
            phase: Phase::Idle,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Direction used by the most recent step.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid_size(&self) -> i16 {
        GRID_SIZE
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Picks a uniformly random free cell, or `None` if the snake covers the
/// whole board.
pub fn place_food<R: Rng + ?Sized>(snake: &Snake, grid_size: i16, rng: &mut R) -> Option<Cell> {
    for _ in 0..MAX_FOOD_ATTEMPTS {
        let candidate = Cell::new(rng.gen_range(0..grid_size), rng.gen_range(0..grid_size));
        if !snake.contains(candidate) {
            return Some(candidate);
        }
    }

    // Crowded board, sample among what is left.
    let free: Vec<Cell> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| Cell::new(x, y)))
        .filter(|cell| !snake.contains(*cell))
        .collect();

    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}
