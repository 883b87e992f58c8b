//! Fixed-interval gates driven by a variable-rate frame clock.
//!
//! Both gates carry the sub-interval remainder over to the next interval
//! instead of resetting to the frame time, so the average rate stays stable
//! when frames arrive late or jittery.

/// Upper bound on steps issued for a single frame.
pub const MAX_CATCH_UP_STEPS: u32 = 4;

pub const FRAME_INTERVAL_MS: u64 = 1000 / 60;

#[derive(Debug, Clone)]
pub struct StepScheduler {
    interval_ms: u64,
    last_step_ms: u64,
}

impl StepScheduler {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        StepScheduler { interval_ms: interval_ms.max(1), last_step_ms: now_ms }
    }

    /// Takes effect from the next `advance`; does not force a step.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms.max(1);
    }

    /// Forget accumulated time, e.g. after a pause.
    pub fn rearm(&mut self, now_ms: u64) {
        self.last_step_ms = now_ms;
    }

    /// Number of steps due at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> u32 {
        let elapsed = now_ms.saturating_sub(self.last_step_ms);
        if elapsed <= self.interval_ms {
            return 0;
        }

        let due = (elapsed / self.interval_ms).min(MAX_CATCH_UP_STEPS as u64) as u32;
        self.last_step_ms = now_ms - elapsed % self.interval_ms;
        due
    }
}

/// Draw throttle, same gate as [`StepScheduler`] but answers yes/no.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    inner: StepScheduler,
}

impl FrameThrottle {
    pub fn new(now_ms: u64) -> Self {
        FrameThrottle { inner: StepScheduler::new(FRAME_INTERVAL_MS, now_ms) }
    }

    pub fn should_draw(&mut self, now_ms: u64) -> bool {
        self.inner.advance(now_ms) > 0
    }
}
