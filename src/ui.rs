//! Transient UI state: toasts and the text of the overlays.

use std::collections::VecDeque;

use crate::{EndReason, GameEvent, Phase, SpeedSetting};

pub const TOAST_DURATION_MS: u64 = 3_000;
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    expires_at_ms: u64,
}

#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, text: impl Into<String>, now_ms: u64) {
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast { text: text.into(), expires_at_ms: now_ms + TOAST_DURATION_MS });
    }

    pub fn expire(&mut self, now_ms: u64) {
        self.queue.retain(|t| t.expires_at_ms > now_ms);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcome {
    final_score: u32,
    previous_best: u32,
    reason: EndReason,
}

#[derive(Debug, Default)]
pub struct Ui {
    pub toasts: Toasts,
    outcome: Option<Outcome>,
    /// Set when the pause came from losing focus rather than a key press.
    auto_paused: bool,
}

impl Ui {
    pub fn on_event(&mut self, event: &GameEvent, now_ms: u64) {
        match event {
            GameEvent::NewHighScore(score) => self.toasts.push(format!("New high score: {}!", score), now_ms),
            GameEvent::GameOver { final_score, previous_best, reason } => {
                self.outcome = Some(Outcome {
                    final_score: *final_score,
                    previous_best: *previous_best,
                    reason: *reason,
                });
            }
            GameEvent::ScoreChanged(_) => {}
        }
    }

    pub fn on_speed_changed(&mut self, speed: SpeedSetting, now_ms: u64) {
        self.toasts.push(format!("Speed: {}", speed.label()), now_ms);
    }

    pub fn on_high_score_reset(&mut self, did_reset: bool, now_ms: u64) {
        let text = if did_reset { "High score reset" } else { "No high score to reset!" };
        self.toasts.push(text, now_ms);
    }

    pub fn set_auto_paused(&mut self, auto: bool) {
        self.auto_paused = auto;
    }

    pub fn is_auto_paused(&self) -> bool {
        self.auto_paused
    }

    pub fn on_start(&mut self) {
        self.outcome = None;
        self.auto_paused = false;
    }

    /// Lines of the centered message box for `phase`, if any.
    pub fn overlay(&self, phase: Phase) -> Option<Vec<String>> {
        let lines = match phase {
            Phase::Idle => intro_lines(),
            Phase::Running => return None,
            Phase::Paused if self.auto_paused => vec![
                "Game paused".to_string(),
                "Game was interrupted".to_string(),
                String::new(),
                "Esc to resume".to_string(),
            ],
            Phase::Paused => vec![
                "Game paused".to_string(),
                "Esc to resume".to_string(),
                "or q to quit".to_string(),
            ],
            Phase::GameOver => match self.outcome {
                Some(outcome) => game_over_lines(outcome.final_score, outcome.previous_best, outcome.reason),
                None => game_over_lines(0, 0, EndReason::Wall),
            },
        };

        Some(lines)
    }
}

fn intro_lines() -> Vec<String> {
    [
        "Arrow keys or WASD to move",
        "Esc to pause, 1/2/3 to change speed",
        "r to reset the high score",
        "q or CTRL+C to quit",
        "",
        "Press space to begin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Game over text, comparing against the best score from before the session.
pub fn game_over_lines(score: u32, previous_best: u32, reason: EndReason) -> Vec<String> {
    let title = match reason {
        EndReason::BoardFilled => "You won!",
        EndReason::Wall | EndReason::Body => "Game over!",
    };

    let mut lines = vec![title.to_string(), format!("Score: {}", score)];

    if score > previous_best {
        lines.push(format!("New high score: {}", score));
        if previous_best > 0 {
            lines.push(format!("Previous best: {}", previous_best));
        }
    } else if score == previous_best && previous_best > 0 {
        lines.push(format!("Matched high score: {}", score));
    } else if previous_best > 0 {
        lines.push(format!("High score: {} ({} more needed)", previous_best, previous_best - score));
    }

    lines.push(String::new());
    lines.push("Press space to play again,".to_string());
    lines.push("or q to quit.".to_string());
    lines
}
