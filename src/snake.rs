use std::collections::VecDeque;

use crate::Cell;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake ate and grew this step.
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Crashed(Collision),
}

/// Body cells, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// A straight snake of `size` cells whose head is at `head`, trailing
    /// behind it opposite to `direction`.
    pub fn new(head: Cell, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();

        let body = (0..size as i16)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { body }
    }

    /// Builds a snake from explicit cells, head first.
    #[cfg(test)]
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one cell");
        Snake { body }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Moves one cell towards `direction`. A crash leaves the body untouched.
    /// Landing on `food` keeps the tail, so the snake grows by one.
    pub fn move_step(&mut self, direction: Direction, grid_size: i16, food: Cell) -> MoveResult {
        let new_head = self.head().offset(direction);

        if !new_head.in_bounds(grid_size) {
            return Crashed(Collision::Wall);
        }

        // The tail still counts: it has not moved out of the way yet.
        if self.contains(new_head) {
            return Crashed(Collision::Body);
        }

        self.body.push_front(new_head);

        if new_head == food {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }
}
