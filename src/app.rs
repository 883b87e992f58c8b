use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::Event;
use rand::Rng;
use tracing::debug;

use crate::input::{self, Command};
use crate::render::{self, Canvas, Hud};
use crate::scheduler::FrameThrottle;
use crate::store::ScoreStore;
use crate::term::TermManager;
use crate::ui::{Ui, TOAST_DURATION_MS};
use crate::{GameController, Phase};

/// How long to wait for input each loop iteration.
const TICK_INTERVAL_MS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The host side: turns commands into controller calls and controller
/// events into UI feedback.
pub struct App<S, R> {
    controller: GameController<S, R>,
    ui: Ui,
    throttle: FrameThrottle,
    clock: Instant,
    /// Deadline for the second `r` press that confirms a high score reset.
    reset_confirm_until: Option<u64>,
}

impl<S: ScoreStore, R: Rng> App<S, R> {
    pub fn new(controller: GameController<S, R>) -> Self {
        App {
            controller,
            ui: Ui::default(),
            throttle: FrameThrottle::new(0),
            clock: Instant::now(),
            reset_confirm_until: None,
        }
    }

    pub fn controller(&self) -> &GameController<S, R> {
        &self.controller
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    pub fn handle(&mut self, command: Command, now_ms: u64) -> Flow {
        debug!(?command, "command");

        match command {
            Command::Turn(direction) => {
                if self.controller.state().is_running() {
                    self.controller.change_direction(direction);
                }
            }

            Command::Start => {
                if matches!(self.controller.phase(), Phase::Idle | Phase::GameOver) {
                    self.controller.start(now_ms);
                    self.ui.on_start();
                }
            }

            Command::TogglePause => match self.controller.phase() {
                Phase::Running => {
                    self.controller.pause();
                    self.ui.set_auto_paused(false);
                }
                Phase::Paused => {
                    self.controller.resume(now_ms);
                    self.ui.set_auto_paused(false);
                }
                Phase::Idle | Phase::GameOver => {}
            },

            Command::SetSpeed(speed) => {
                self.controller.set_speed(speed);
                self.ui.on_speed_changed(speed, now_ms);
            }

            Command::ResetHighScore => self.request_reset(now_ms),

            Command::FocusLost => {
                if self.controller.pause() {
                    self.ui.set_auto_paused(true);
                }
            }

            Command::FocusGained => {
                if self.ui.is_auto_paused() && self.controller.resume(now_ms) {
                    self.ui.set_auto_paused(false);
                }
            }

            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    /// Advances the game to `now_ms` and routes its events to the UI.
    pub fn tick(&mut self, now_ms: u64) {
        for event in self.controller.frame(now_ms) {
            self.ui.on_event(&event, now_ms);
        }
        self.ui.toasts.expire(now_ms);
    }

    pub fn draw(&self) -> Canvas {
        let hud = Hud {
            high_score: self.controller.high_score(),
            speed: self.controller.speed(),
            ui: &self.ui,
        };
        render::draw(self.controller.state(), &hud)
    }

    pub fn run<W: Write>(&mut self, term: &mut TermManager<W>) -> Result<()> {
        term.present(&self.draw()).context("drawing first frame")?;

        loop {
            let events = term
                .read_events(Duration::from_millis(TICK_INTERVAL_MS))
                .context("reading terminal events")?;

            for event in events {
                if let Event::Resize(width, height) = event {
                    term.resize(width, height)?;
                    continue;
                }

                if let Some(command) = input::translate(&event) {
                    let now = self.now_ms();
                    if self.handle(command, now) == Flow::Quit {
                        return Ok(());
                    }
                }
            }

            let now = self.now_ms();
            self.tick(now);

            if self.throttle.should_draw(now) {
                term.present(&self.draw()).context("drawing frame")?;
            }
        }
    }

    /// The first press asks for confirmation, a second one within the toast
    /// lifetime performs the reset.
    fn request_reset(&mut self, now_ms: u64) {
        let high_score = self.controller.high_score();
        if high_score == 0 {
            self.reset_confirm_until = None;
            self.ui.on_high_score_reset(false, now_ms);
            return;
        }

        match self.reset_confirm_until.take() {
            Some(deadline) if now_ms <= deadline => {
                let did_reset = self.controller.reset_high_score();
                self.ui.on_high_score_reset(did_reset, now_ms);
            }
            _ => {
                self.reset_confirm_until = Some(now_ms + TOAST_DURATION_MS);
                self.ui
                    .toasts
                    .push(format!("Press r again to reset high score of {}", high_score), now_ms);
            }
        }
    }
}
