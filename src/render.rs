//! Draws a read-only view of the game into a character canvas. The terminal
//! layer only has to copy the canvas to the screen.

use crate::snake::Direction::{self, *};
use crate::ui::Ui;
use crate::{Cell, GameState, Phase, SpeedSetting};

/// Each grid cell takes two terminal columns, since terminal characters are
/// about twice as high as they are wide.
pub const CELL_WIDTH: u16 = 2;

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';
const FOOD_CHARS: [char; 2] = ['(', ')'];

const HUD_ROW: u16 = 0;
const BOARD_TOP: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Canvas { width, height, cells: vec![' '; width as usize * height as usize] }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[self.width as usize * y as usize + x as usize])
        } else {
            None
        }
    }

    /// Out of range writes are dropped.
    pub fn put(&mut self, x: u16, y: u16, ch: char) {
        if x < self.width && y < self.height {
            self.cells[self.width as usize * y as usize + x as usize] = ch;
        }
    }

    pub fn text(&mut self, x: u16, y: u16, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as u16, y, ch);
        }
    }

    pub fn row(&self, y: u16) -> String {
        (0..self.width).filter_map(|x| self.get(x, y)).collect()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row(y)).collect()
    }

    /// A box of centered lines with a blank margin, centered on `center`.
    pub fn message(&mut self, center: (u16, u16), lines: &[String]) {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2) as u16;
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.put(top_left.0 + x_diff, y, ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.text(top_left.0, top_left.1 + i as u16 + 1, &padded_line);
        }
    }
}

/// Everything besides the state that ends up on screen.
pub struct Hud<'a> {
    pub high_score: u32,
    pub speed: SpeedSetting,
    pub ui: &'a Ui,
}

pub fn canvas_size(grid_size: i16) -> (u16, u16) {
    let width = grid_size as u16 * CELL_WIDTH + 2;
    // HUD, borders, board, help line, toasts
    let height = BOARD_TOP + grid_size as u16 + 2 + 1 + 3;
    (width, height)
}

pub fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

pub fn draw(state: &GameState, hud: &Hud) -> Canvas {
    let grid = state.grid_size();
    let (width, height) = canvas_size(grid);
    let mut canvas = Canvas::new(width, height);

    canvas.text(
        0,
        HUD_ROW,
        &format!("Score: {}  High: {}  Speed: {}", state.score(), hud.high_score, hud.speed.label()),
    );

    draw_borders(&mut canvas, grid);

    put_cell(&mut canvas, state.food(), FOOD_CHARS);

    let dead = state.phase() == Phase::GameOver;
    for (i, pos) in state.snake().body().iter().enumerate() {
        let ch = if dead {
            DEAD_SNAKE_CHAR
        } else if i == 0 {
            head_char(state.direction())
        } else {
            SNAKE_BODY_CHAR
        };
        put_cell(&mut canvas, *pos, [ch, ch]);
    }

    let help_row = BOARD_TOP + grid as u16 + 2;
    canvas.text(0, help_row, "wasd/arrows move  esc pause  1-3 speed");

    for (i, toast) in hud.ui.toasts.iter().enumerate() {
        canvas.text(0, help_row + 1 + i as u16, &format!("» {}", toast.text));
    }

    if let Some(lines) = hud.ui.overlay(state.phase()) {
        let center = (width / 2, BOARD_TOP + (grid as u16 + 2) / 2);
        canvas.message(center, &lines);
    }

    canvas
}

fn draw_borders(canvas: &mut Canvas, grid: i16) {
    let width = grid as u16 * CELL_WIDTH + 2;
    let top = BOARD_TOP;
    let bottom = BOARD_TOP + grid as u16 + 1;

    for x in 0..width {
        let ch = if x == 0 || x == width - 1 { '+' } else { '-' };
        canvas.put(x, top, ch);
        canvas.put(x, bottom, ch);
    }

    for y in top + 1..bottom {
        canvas.put(0, y, '|');
        canvas.put(width - 1, y, '|');
    }
}

fn put_cell(canvas: &mut Canvas, cell: Cell, chars: [char; 2]) {
    let (x, y) = screen_pos(cell);
    canvas.put(x, y, chars[0]);
    canvas.put(x + 1, y, chars[1]);
}

/// Screen coordinates of the left column of `cell`.
pub fn screen_pos(cell: Cell) -> (u16, u16) {
    (1 + cell.x as u16 * CELL_WIDTH, BOARD_TOP + 1 + cell.y as u16)
}
