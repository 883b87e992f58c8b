/// Why a session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Wall,
    Body,
    /// The snake covers every cell, there is nowhere left to put food.
    BoardFilled,
}

/// Notifications the engine hands back to the host after a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    NewHighScore(u32),
    GameOver {
        final_score: u32,
        /// High score as it was when the session started.
        previous_best: u32,
        reason: EndReason,
    },
}
