use rand::Rng;
use tracing::{debug, info};

use crate::events::{EndReason, GameEvent};
use crate::scheduler::StepScheduler;
use crate::snake::{Collision, Direction, MoveResult};
use crate::state::{place_food, GameState, Phase};
use crate::store::ScoreStore;
use crate::{SpeedSetting, FOOD_SCORE, GRID_SIZE};

/// Owns the simulation state and is the only thing allowed to change it.
///
/// Hosts feed it commands (`start`, `pause`, `resume`, `change_direction`,
/// `set_speed`) and a millisecond clock through [`frame`](Self::frame);
/// everything else gets a read-only [`GameState`].
pub struct GameController<S, R> {
    state: GameState,
    store: S,
    rng: R,
    scheduler: StepScheduler,
    speed: SpeedSetting,
    /// High score when the current session started.
    session_best: u32,
}

impl<S: ScoreStore, R: Rng> GameController<S, R> {
    pub fn new(store: S, mut rng: R) -> Self {
        let speed = store.speed().unwrap_or_default();
        let state = GameState::new(&mut rng);
        let session_best = store.high_score();

        GameController {
            state,
            store,
            rng,
            scheduler: StepScheduler::new(speed.interval_ms(), 0),
            speed,
            session_best,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn speed(&self) -> SpeedSetting {
        self.speed
    }

    pub fn high_score(&self) -> u32 {
        self.store.high_score()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a fresh session, throwing away whatever was there before.
    pub fn start(&mut self, now_ms: u64) {
        self.state = GameState::new(&mut self.rng);
        self.state.phase = Phase::Running;
        self.session_best = self.store.high_score();
        self.scheduler.rearm(now_ms);

        info!(speed = %self.speed, high_score = self.session_best, "session started");
    }

    /// Returns whether the session was actually paused by this call.
    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }

        self.state.phase = Phase::Paused;
        debug!("paused");
        true
    }

    /// Returns whether the session was actually resumed by this call.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.state.phase != Phase::Paused {
            return false;
        }

        self.state.phase = Phase::Running;
        self.scheduler.rearm(now_ms);
        debug!("resumed");
        true
    }

    /// Queues `direction` for the next step. An exact reversal of the
    /// direction last applied is dropped.
    pub fn change_direction(&mut self, direction: Direction) {
        if direction.is_opposite(self.state.direction) {
            debug!(?direction, "ignoring reversal");
            return;
        }

        self.state.pending_direction = direction;
    }

    pub fn set_speed(&mut self, speed: SpeedSetting) {
        self.speed = speed;
        self.scheduler.set_interval(speed.interval_ms());
        self.store.set_speed(speed);

        info!(%speed, interval_ms = speed.interval_ms(), "speed changed");
    }

    /// Clears the stored high score. Returns `false` if there was none.
    pub fn reset_high_score(&mut self) -> bool {
        if self.store.high_score() == 0 {
            return false;
        }

        self.store.clear_high_score();
        self.session_best = 0;
        info!("high score reset");
        true
    }

    /// Per-frame entry point: runs however many steps are due at `now_ms`.
    pub fn frame(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.is_running() {
            return events;
        }

        let due = self.scheduler.advance(now_ms);
        for _ in 0..due {
            if !self.state.is_running() {
                break;
            }
            events.extend(self.step());
        }

        events
    }

    /// Advances the simulation by exactly one cell. Does nothing unless the
    /// session is running.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.is_running() {
            return events;
        }

        self.state.direction = self.state.pending_direction;

        let result = self.state.snake.move_step(self.state.direction, GRID_SIZE, self.state.food);
        match result {
            MoveResult::Crashed(collision) => {
                let reason = match collision {
                    Collision::Wall => EndReason::Wall,
                    Collision::Body => EndReason::Body,
                };
                self.end_session(reason, &mut events);
            }

            MoveResult::Moved { new_head, old_tail: None } => {
                self.state.score += FOOD_SCORE;
                debug!(?new_head, score = self.state.score, "ate food");
                events.push(GameEvent::ScoreChanged(self.state.score));
                self.record_high_score(&mut events);

                match place_food(&self.state.snake, GRID_SIZE, &mut self.rng) {
                    Some(food) => self.state.food = food,
                    None => self.end_session(EndReason::BoardFilled, &mut events),
                }
            }

            MoveResult::Moved { .. } => {}
        }

        events
    }

    fn end_session(&mut self, reason: EndReason, events: &mut Vec<GameEvent>) {
        self.state.phase = Phase::GameOver;
        self.record_high_score(events);

        info!(score = self.state.score, ?reason, "game over");
        events.push(GameEvent::GameOver {
            final_score: self.state.score,
            previous_best: self.session_best,
            reason,
        });
    }

    /// Persists the score if it beats the stored one. Beating a non-zero
    /// record is announced.
    fn record_high_score(&mut self, events: &mut Vec<GameEvent>) {
        let score = self.state.score;
        let stored = self.store.high_score();
        if score <= stored {
            return;
        }

        self.store.set_high_score(score);

        if stored > 0 {
            events.push(GameEvent::NewHighScore(score));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Snake;
    use crate::store::MemoryStore;
    use crate::Cell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller(high_score: u32) -> GameController<MemoryStore, StdRng> {
        GameController::new(MemoryStore::with_high_score(high_score), StdRng::seed_from_u64(3))
    }

    fn feed_next(c: &mut GameController<MemoryStore, StdRng>) {
        c.state.food = c.state.snake.head().offset(c.state.pending_direction);
    }

    #[test]
    fn reversal_is_rejected_against_applied_direction() {
        let mut c = controller(0);
        c.start(0);
        assert_eq!(c.state().snake().body().iter().copied().collect::<Vec<_>>(), vec![
            Cell::new(10, 10),
            Cell::new(9, 10),
            Cell::new(8, 10)
        ]);

        c.change_direction(Direction::Left);
        assert_eq!(c.state().pending_direction(), Direction::Right);

        c.step();
        assert_eq!(c.state().direction(), Direction::Right);
        assert_eq!(c.state().snake().head(), Cell::new(11, 10));
    }

    #[test]
    fn two_quick_turns_cannot_reverse() {
        let mut c = controller(0);
        c.start(0);
        c.state.food = Cell::new(0, 19);

        // Moving right: Up is accepted, then Left is still a reversal of
        // the applied direction and is dropped.
        c.change_direction(Direction::Up);
        c.change_direction(Direction::Left);
        assert_eq!(c.state().pending_direction(), Direction::Up);

        c.step();
        assert_eq!(c.state().snake().head(), Cell::new(10, 9));

        // Last write wins between steps.
        c.change_direction(Direction::Left);
        c.change_direction(Direction::Right);
        c.step();
        assert_eq!(c.state().snake().head(), Cell::new(11, 9));
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut c = controller(0);
        c.start(0);
        c.state.food = Cell::new(11, 10);

        c.step();

        let body: Vec<Cell> = c.state().snake().body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]);
        assert_eq!(c.state().score(), 10);
        assert!(!c.state().snake().contains(c.state().food()));
    }

    #[test]
    fn wall_collision_commits_nothing() {
        let mut c = controller(0);
        c.start(0);
        c.state.snake = Snake::from_cells([Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)]);
        c.state.food = Cell::new(0, 0);
        c.state.score = 30;
        let before = c.state().snake().body().clone();

        let events = c.step();

        assert!(c.state().is_game_over());
        assert!(!c.state().is_running());
        assert_eq!(c.state().snake().body(), &before);
        assert_eq!(c.state().score(), 30);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { reason: EndReason::Wall, final_score: 30, .. })));
    }

    #[test]
    fn body_collision_commits_nothing() {
        let mut c = controller(0);
        c.start(0);
        // Heading down into (5,5); turning left runs into (4,5).
        c.state.snake = Snake::from_cells([
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(4, 4),
            Cell::new(4, 5),
            Cell::new(3, 5),
        ]);
        c.state.direction = Direction::Down;
        c.state.pending_direction = Direction::Down;
        c.state.food = Cell::new(0, 0);
        let before = c.state().snake().body().clone();

        c.change_direction(Direction::Left);
        let events = c.step();

        assert!(c.state().is_game_over());
        assert_eq!(c.state().snake().body(), &before);
        assert_eq!(c.state().score(), 0);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { reason: EndReason::Body, .. })));
    }

    #[test]
    fn finished_session_is_frozen() {
        let mut c = controller(0);
        c.start(0);
        c.state.snake = Snake::from_cells([Cell::new(19, 5)]);
        c.step();
        assert!(c.state().is_game_over());

        let body = c.state().snake().body().clone();
        let food = c.state().food();
        for now in [1_000, 2_000, 3_000] {
            c.change_direction(Direction::Up);
            assert!(c.step().is_empty());
            assert!(c.frame(now).is_empty());
        }
        assert_eq!(c.state().snake().body(), &body);
        assert_eq!(c.state().food(), food);
        assert_eq!(c.state().score(), 0);
        assert!(!c.resume(4_000));
    }

    #[test]
    fn filling_the_board_ends_the_session() {
        let mut c = controller(0);
        c.start(0);
        // Every cell but (19, 19) is snake; the head at (18, 19) eats there.
        let mut cells: Vec<Cell> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
            .filter(|cell| *cell != Cell::new(19, 19) && *cell != Cell::new(18, 19))
            .collect();
        cells.insert(0, Cell::new(18, 19));
        c.state.snake = Snake::from_cells(cells);
        c.state.food = Cell::new(19, 19);

        let events = c.step();

        assert_eq!(c.state().snake().len(), 400);
        assert!(c.state().is_game_over());
        assert!(matches!(events.last(), Some(GameEvent::GameOver { reason: EndReason::BoardFilled, final_score: 10, .. })));
    }

    #[test]
    fn faster_speed_applies_to_next_step() {
        let mut c = controller(0);
        c.start(0);
        c.state.food = Cell::new(0, 19);

        c.frame(120);
        assert_eq!(c.state().snake().head(), Cell::new(10, 10));

        c.set_speed(SpeedSetting::Fast);
        c.frame(150);
        assert_eq!(c.state().snake().head(), Cell::new(10, 10));

        c.frame(151);
        assert_eq!(c.state().snake().head(), Cell::new(11, 10));
    }

    #[test]
    fn idle_until_started() {
        let mut c = controller(0);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.step().is_empty());
        assert!(c.frame(10_000).is_empty());
        assert_eq!(c.state().snake().head(), Cell::new(10, 10));
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut c = controller(0);
        assert!(!c.pause());
        assert!(!c.resume(0));

        c.start(0);
        assert!(c.pause());
        assert!(!c.pause());
        assert_eq!(c.phase(), Phase::Paused);
        assert!(c.step().is_empty());

        assert!(c.resume(1_000));
        assert!(!c.resume(1_000));
        assert_eq!(c.phase(), Phase::Running);
    }

    #[test]
    fn resume_does_not_burst() {
        let mut c = controller(0);
        c.start(0);
        c.pause();

        c.resume(60_000);
        assert!(c.frame(60_100).is_empty());
        assert_eq!(c.state().snake().head(), Cell::new(10, 10));

        c.frame(60_201);
        assert_eq!(c.state().snake().head(), Cell::new(11, 10));
    }

    #[test]
    fn speed_comes_from_store() {
        let mut store = MemoryStore::new();
        store.set_speed(SpeedSetting::Slow);
        let c = GameController::new(store, StdRng::seed_from_u64(1));
        assert_eq!(c.speed(), SpeedSetting::Slow);

        assert_eq!(controller(0).speed(), SpeedSetting::Medium);
    }

    #[test]
    fn set_speed_persists() {
        let mut c = controller(0);
        c.set_speed(SpeedSetting::Fast);
        assert_eq!(c.store().speed(), Some(SpeedSetting::Fast));
        assert_eq!(c.speed(), SpeedSetting::Fast);
    }

    #[test]
    fn first_ever_record_is_not_announced() {
        let mut c = controller(0);
        c.start(0);
        feed_next(&mut c);

        let events = c.step();
        assert_eq!(events, vec![GameEvent::ScoreChanged(10)]);
        assert_eq!(c.high_score(), 10);
    }

    #[test]
    fn every_improvement_on_a_record_is_announced() {
        let mut c = controller(10);
        c.start(0);

        feed_next(&mut c);
        assert_eq!(c.step(), vec![GameEvent::ScoreChanged(10)]);

        feed_next(&mut c);
        assert_eq!(c.step(), vec![GameEvent::ScoreChanged(20), GameEvent::NewHighScore(20)]);

        feed_next(&mut c);
        assert_eq!(c.step(), vec![GameEvent::ScoreChanged(30), GameEvent::NewHighScore(30)]);
        assert_eq!(c.high_score(), 30);

        // A crash after the record adds no second announcement for 30.
        c.state.food = Cell::new(0, 19);
        c.change_direction(Direction::Up);
        let events = loop {
            let events = c.step();
            if c.state().is_game_over() {
                break events;
            }
            assert!(events.is_empty());
        };
        assert_eq!(
            events,
            vec![GameEvent::GameOver { final_score: 30, previous_best: 10, reason: EndReason::Wall }]
        );
    }

    #[test]
    fn first_ever_session_announces_once_a_record_exists() {
        let mut c = controller(0);
        c.start(0);

        feed_next(&mut c);
        assert_eq!(c.step(), vec![GameEvent::ScoreChanged(10)]);

        feed_next(&mut c);
        assert_eq!(c.step(), vec![GameEvent::ScoreChanged(20), GameEvent::NewHighScore(20)]);
    }

    #[test]
    fn game_over_reports_previous_best() {
        let mut c = controller(50);
        c.start(0);
        c.state.food = Cell::new(0, 19);
        c.change_direction(Direction::Up);
        for _ in 0..10 {
            c.step();
        }
        let events = c.step();

        assert_eq!(
            events,
            vec![GameEvent::GameOver { final_score: 0, previous_best: 50, reason: EndReason::Wall }]
        );
        assert!(c.state().is_game_over());
        assert!(!c.state().is_running());
        assert_eq!(c.high_score(), 50);
    }

    #[test]
    fn reset_high_score() {
        let mut c = controller(0);
        assert!(!c.reset_high_score());

        let mut c = controller(80);
        assert!(c.reset_high_score());
        assert_eq!(c.high_score(), 0);
    }

    #[test]
    fn start_replaces_finished_session() {
        let mut c = controller(0);
        c.start(0);
        feed_next(&mut c);
        c.step();
        c.change_direction(Direction::Up);
        while !c.state().is_game_over() {
            c.step();
        }

        c.start(5_000);
        assert_eq!(c.phase(), Phase::Running);
        assert_eq!(c.state().score(), 0);
        assert_eq!(c.state().snake().len(), 3);
        assert_eq!(c.state().direction(), Direction::Right);
    }
}
