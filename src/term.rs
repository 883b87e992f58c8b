use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, DisableFocusChange, EnableFocusChange, Event};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::render::Canvas;

/// Owns the terminal. Keeps a copy of what is on screen so `present` only
/// writes the characters that changed.
pub struct TermManager<W: Write = Stdout> {
    width: u16,
    height: u16,
    out: W,
    screen: Option<Canvas>,
}

impl TermManager<Stdout> {
    pub fn stdout() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::new(io::stdout(), width, height))
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen, EnableFocusChange)?;
        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking)?;
        self.clear()
    }

    /// Undoes `setup`, also after a setup that failed halfway.
    pub fn restore(&mut self) -> io::Result<()> {
        let raw = terminal::disable_raw_mode();
        execute!(self.out, cursor::Show, cursor::EnableBlinking, DisableFocusChange, LeaveAlternateScreen)?;
        raw
    }
}

impl<W: Write> TermManager<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        TermManager { width, height, out, screen: None }
    }

    /// Drains every pending event, waiting at most `timeout` for the first.
    pub fn read_events(&self, timeout: Duration) -> io::Result<Vec<Event>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            events.push(read()?);
            wait = Duration::ZERO;
        }

        Ok(events)
    }

    pub fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.width = width;
        self.height = height;
        self.clear()
    }

    pub fn clear(&mut self) -> io::Result<()> {
        self.screen = None;
        execute!(self.out, terminal::Clear(ClearType::All))
    }

    /// Copies `canvas` to the screen, centered.
    pub fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        let origin = (
            self.width.saturating_sub(canvas.width()) / 2,
            self.height.saturating_sub(canvas.height()) / 2,
        );

        let previous = self.screen.take().filter(|s| s.width() == canvas.width() && s.height() == canvas.height());

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let ch = canvas.get(x, y).unwrap_or(' ');
                let unchanged = previous.as_ref().and_then(|p| p.get(x, y)) == Some(ch);
                if !unchanged {
                    self.print_at((origin.0 + x, origin.1 + y), ch)?;
                }
            }
        }

        self.screen = Some(canvas.clone());
        self.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_at(&mut self, pos: (u16, u16), ch: char) -> io::Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        queue!(self.out, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}
