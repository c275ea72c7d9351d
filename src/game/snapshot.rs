use std::time::Duration;

use super::{
    action::Direction,
    board::Position,
    config::Difficulty,
    effects::PowerUpKind,
    session::SessionState,
    state::GameOverReason,
};

/// Read-only copy of everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub state: SessionState,
    pub difficulty: Difficulty,
    pub grid_size: usize,
    /// Head first; empty on the title screen
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Option<Position>,
    pub power_up: Option<(Position, PowerUpKind)>,
    pub invincible: bool,
    pub score: u32,
    pub high_score: u32,
    /// Running effect and the time it has left
    pub active_effect: Option<(PowerUpKind, Duration)>,
    pub game_over_reason: Option<GameOverReason>,
}

impl RenderSnapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
