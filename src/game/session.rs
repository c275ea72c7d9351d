//! Game session lifecycle: title screen, play, game over

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{
    action::{Command, Direction},
    board::Board,
    config::{Difficulty, GameConfig},
    effects::PowerUpKind,
    engine::{GameEngine, GameState, TickOutcome, TickStatus},
    snapshot::RenderSnapshot,
    state::GameOverReason,
};
use crate::error::GameResult;
use crate::persistence::HighScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Title screen; difficulty can be changed
    Idle,
    Playing,
    /// Score frozen until restart or menu
    GameOver,
}

/// Owns one player's games from start-up to exit
pub struct GameSession {
    state: SessionState,
    difficulty: Difficulty,
    engine: GameEngine,
    game: Option<GameState>,
    game_over_reason: Option<GameOverReason>,
    high_score: u32,
    store: Box<dyn HighScoreStore>,
}

impl GameSession {
    /// Validate the config and read the stored high score.
    ///
    /// A store that cannot be read leaves the high score at zero.
    pub fn new(config: GameConfig, mut store: Box<dyn HighScoreStore>) -> GameResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let high_score = match store.load_high_score() {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                warn!("Starting with an empty high score: {}", err);
                0
            }
        };
        info!("Session ready, high score {}", high_score);

        Ok(Self {
            state: SessionState::Idle,
            difficulty: config.difficulty,
            engine: GameEngine::new(Board::new(config.grid_size), rng),
            game: None,
            game_over_reason: None,
            high_score,
            store,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Current or most recent game, if any
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Mutable access for frontends and tests that stage a position
    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    /// Apply a lifecycle command; commands that make no sense in the current
    /// state are ignored.
    pub fn dispatch(&mut self, command: Command) -> SessionState {
        match (self.state, command) {
            (SessionState::Idle, Command::SelectDifficulty(difficulty)) => {
                debug!("Difficulty set to {}", difficulty.as_str());
                self.difficulty = difficulty;
            }
            (SessionState::Idle, Command::Start)
            | (SessionState::GameOver, Command::Start | Command::Restart) => self.start_game(),
            (SessionState::GameOver, Command::Menu) => {
                self.game = None;
                self.game_over_reason = None;
                self.state = SessionState::Idle;
            }
            (state, command) => debug!("Ignoring {:?} while {:?}", command, state),
        }
        self.state
    }

    /// Queue a turn for the next tick. Only the latest request counts.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.state != SessionState::Playing {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            game.set_pending_direction(direction);
        }
    }

    /// Advance the running game by one tick; `None` when not playing
    pub fn tick(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.state != SessionState::Playing {
            return None;
        }
        let game = self.game.as_mut()?;
        let outcome = self.engine.tick(game, now);

        if let Some(score) = outcome.new_high_score {
            self.high_score = score;
            if let Err(err) = self.store.save_high_score(score) {
                warn!("High score {} kept in memory only: {}", score, err);
            }
        }

        if let TickStatus::GameOver(reason) = outcome.status {
            info!("Game over ({:?}) with score {}", reason, game.score);
            self.end_game(reason);
        }

        Some(outcome)
    }

    /// Revert the active effect if its time is up
    pub fn expire_effects(&mut self, now: Instant) -> Option<PowerUpKind> {
        if self.state != SessionState::Playing {
            return None;
        }
        self.game.as_mut()?.expire_effects(now)
    }

    /// Delay before the next tick; `None` when not playing
    pub fn tick_interval(&self) -> Option<Duration> {
        match (self.state, &self.game) {
            (SessionState::Playing, Some(game)) => Some(game.tick_interval()),
            _ => None,
        }
    }

    /// When the active effect runs out; `None` when not playing
    pub fn effect_deadline(&self) -> Option<Instant> {
        match (self.state, &self.game) {
            (SessionState::Playing, Some(game)) => game.effects.deadline(),
            _ => None,
        }
    }

    pub fn snapshot(&self, now: Instant) -> RenderSnapshot {
        let board = self.engine.board();
        let mut snapshot = RenderSnapshot {
            state: self.state,
            difficulty: self.difficulty,
            grid_size: board.size(),
            snake: Vec::new(),
            direction: Direction::Right,
            food: None,
            power_up: None,
            invincible: false,
            score: 0,
            high_score: self.high_score,
            active_effect: None,
            game_over_reason: self.game_over_reason,
        };

        if let Some(game) = &self.game {
            snapshot.snake = game.snake.body.clone();
            snapshot.direction = game.snake.direction;
            snapshot.food = Some(game.food);
            snapshot.power_up = game.power_up.map(|p| (p.position, p.kind));
            snapshot.invincible = game.modifiers.invincible;
            snapshot.score = game.score;
            snapshot.active_effect = game
                .effects
                .active()
                .map(|effect| (effect.kind, effect.remaining(now)));
        }

        snapshot
    }

    fn start_game(&mut self) {
        let profile = self.difficulty.profile();
        match self.engine.reset(profile, self.high_score) {
            Ok(game) => {
                info!(
                    "Starting {} game at {}ms per tick",
                    self.difficulty.as_str(),
                    profile.initial_speed_ms
                );
                self.game = Some(game);
                self.game_over_reason = None;
                self.state = SessionState::Playing;
            }
            Err(err) => {
                warn!("Cannot start a game: {}", err);
                self.game = None;
                self.game_over_reason = Some(GameOverReason::BoardFull);
                self.state = SessionState::GameOver;
            }
        }
    }

    fn end_game(&mut self, reason: GameOverReason) {
        // No expiry may touch a finished game
        if let Some(game) = self.game.as_mut() {
            game.effects.clear();
            game.pending_direction = None;
        }
        self.game_over_reason = Some(reason);
        self.state = SessionState::GameOver;
    }
}
