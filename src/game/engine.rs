use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{
    action::Direction,
    board::{Board, Position},
    config::DifficultyProfile,
    effects::{EffectSlot, Modifiers, PowerUpKind},
    placement::{maybe_place_power_up, place_food},
    state::{GameOverReason, PowerUp, Snake},
};
use crate::error::GameResult;

/// Points for one food at multiplier 1
pub const FOOD_POINTS: u32 = 10;

/// Everything that belongs to one game and is thrown away on reset
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub power_up: Option<PowerUp>,
    /// Direction requested since the last tick; last write wins
    pub pending_direction: Option<Direction>,
    pub profile: DifficultyProfile,
    pub modifiers: Modifiers,
    pub effects: EffectSlot,
    pub score: u32,
    pub high_score: u32,
    pub ticks: u64,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, profile: DifficultyProfile, high_score: u32) -> Self {
        Self {
            snake,
            food,
            power_up: None,
            pending_direction: None,
            profile,
            modifiers: Modifiers::new(profile.initial_speed_ms, profile.min_speed_ms),
            effects: EffectSlot::new(),
            score: 0,
            high_score,
            ticks: 0,
        }
    }

    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.pending_direction = Some(direction);
    }

    /// Interval until the next tick, from the current speed
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.modifiers.current_speed_ms)
    }

    /// Revert the active effect if it has run out
    pub fn expire_effects(&mut self, now: Instant) -> Option<PowerUpKind> {
        let expired = self.effects.expire(now, &mut self.modifiers);
        if let Some(kind) = expired {
            debug!(
                "{} expired, speed back to {}ms",
                kind.name(),
                self.modifiers.current_speed_ms
            );
        }
        expired
    }
}

/// Whether the game goes on after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    GameOver(GameOverReason),
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub status: TickStatus,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Power-up picked up this tick
    pub power_up: Option<PowerUpKind>,
    /// Set when this tick raised the high score
    pub new_high_score: Option<u32>,
}

impl TickOutcome {
    fn new(status: TickStatus) -> Self {
        Self {
            status,
            ate_food: false,
            power_up: None,
            new_high_score: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, TickStatus::GameOver(_))
    }
}

/// The game engine that handles all game logic
#[derive(Debug)]
pub struct GameEngine {
    board: Board,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine
    pub fn new(board: Board, rng: StdRng) -> Self {
        Self { board, rng }
    }

    pub fn with_seed(board: Board, seed: u64) -> Self {
        Self::new(board, StdRng::seed_from_u64(seed))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Build a fresh game: one-segment snake in the centre heading right,
    /// food on a free cell.
    pub fn reset(&mut self, profile: DifficultyProfile, high_score: u32) -> GameResult<GameState> {
        let snake = Snake::new(self.board.center(), Direction::Right);
        let food = place_food(&self.board, &snake, None, &mut self.rng)?;
        Ok(GameState::new(snake, food, profile, high_score))
    }

    /// Execute one step of the game
    pub fn tick(&mut self, state: &mut GameState, now: Instant) -> TickOutcome {
        state.ticks += 1;

        // Reversal requests are dropped, not deferred
        if let Some(requested) = state.pending_direction.take()
            && !state.snake.direction.is_opposite(requested)
        {
            state.snake.direction = requested;
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if !self.board.in_bounds(new_head) {
            debug!("Wall collision at ({}, {})", new_head.x, new_head.y);
            return TickOutcome::new(TickStatus::GameOver(GameOverReason::Wall));
        }

        state.snake.push_head(new_head);

        let mut outcome = TickOutcome::new(TickStatus::Continue);

        if new_head == state.food {
            outcome.ate_food = true;
            state.score += FOOD_POINTS * state.modifiers.score_multiplier;
            if state.score > state.high_score {
                state.high_score = state.score;
                outcome.new_high_score = Some(state.score);
            }

            // The power-up gives way when its cell is the last free one
            let placed = place_food(
                &self.board,
                &state.snake,
                state.power_up.as_ref(),
                &mut self.rng,
            )
            .or_else(|err| match state.power_up {
                Some(_) => {
                    let food = place_food(&self.board, &state.snake, None, &mut self.rng)?;
                    if let Some(discarded) = state.power_up.take() {
                        debug!("{} cleared to make room for food", discarded.kind.name());
                    }
                    Ok(food)
                }
                None => Err(err),
            });

            match placed {
                Ok(food) => state.food = food,
                Err(err) => {
                    info!("Board is full after {} ticks: {}", state.ticks, err);
                    outcome.status = TickStatus::GameOver(GameOverReason::BoardFull);
                    return outcome;
                }
            }

            if let Some(spawned) = maybe_place_power_up(
                &self.board,
                &state.snake,
                state.food,
                state.profile.power_up_spawn_probability,
                &mut self.rng,
                now,
            ) {
                if let Some(discarded) = state.power_up.replace(spawned) {
                    debug!("{} replaced before pickup", discarded.kind.name());
                }
                debug!(
                    "{} spawned at ({}, {})",
                    spawned.kind.name(),
                    spawned.position.x,
                    spawned.position.y
                );
            }

            let modifiers = &mut state.modifiers;
            modifiers.base_speed_ms = modifiers
                .base_speed_ms
                .saturating_sub(state.profile.speed_increment_ms)
                .max(modifiers.min_speed_ms);
            if !state.effects.speed_effect_active() {
                modifiers.current_speed_ms = modifiers.base_speed_ms;
            }
        } else {
            state.snake.drop_tail();
        }

        if !state.modifiers.invincible && state.snake.collides_with_body(new_head) {
            debug!("Self collision at ({}, {})", new_head.x, new_head.y);
            outcome.status = TickStatus::GameOver(GameOverReason::SelfCollision);
            return outcome;
        }

        if let Some(power_up) = state.power_up.filter(|p| p.position == new_head) {
            state.power_up = None;
            state
                .effects
                .activate(power_up.kind, now, &mut state.modifiers);
            debug!("{} activated", power_up.kind.name());
            outcome.power_up = Some(power_up.kind);
        }

        outcome
    }
}
