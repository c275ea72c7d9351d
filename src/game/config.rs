use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Difficulty presets offered on the title screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Speed and spawn tuning for this preset
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                initial_speed_ms: 250,
                speed_increment_ms: 3,
                min_speed_ms: 100,
                power_up_spawn_probability: 0.25,
            },
            Difficulty::Medium => DifficultyProfile {
                initial_speed_ms: 180,
                speed_increment_ms: 5,
                min_speed_ms: 70,
                power_up_spawn_probability: 0.15,
            },
            Difficulty::Hard => DifficultyProfile {
                initial_speed_ms: 120,
                speed_increment_ms: 8,
                min_speed_ms: 40,
                power_up_spawn_probability: 0.08,
            },
        }
    }
}

/// Tick timing and power-up odds for one game. Fixed once a game starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Tick interval at the start of a game
    pub initial_speed_ms: u64,
    /// How much the base tick interval shrinks per food eaten
    pub speed_increment_ms: u64,
    /// Floor for the tick interval
    pub min_speed_ms: u64,
    /// Chance of a power-up spawning each time food is eaten
    pub power_up_spawn_probability: f64,
}

impl DifficultyProfile {
    pub fn validate(&self) -> GameResult<()> {
        if self.min_speed_ms == 0 || self.min_speed_ms > self.initial_speed_ms {
            return Err(GameError::InvalidConfig(format!(
                "min speed {}ms must be in 1..={}ms",
                self.min_speed_ms, self.initial_speed_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.power_up_spawn_probability) {
            return Err(GameError::InvalidConfig(format!(
                "power-up spawn probability {} is outside 0..=1",
                self.power_up_spawn_probability
            )));
        }
        Ok(())
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width and height of the square game grid
    pub grid_size: usize,
    /// Preset selected when the session starts
    pub difficulty: Difficulty,
    /// Seed for entity placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            difficulty: Difficulty::Medium,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> GameResult<()> {
        // The snake needs a cell and the food needs another one.
        if self.grid_size < 2 {
            return Err(GameError::InvalidConfig(format!(
                "grid size {} is too small",
                self.grid_size
            )));
        }
        if self.grid_size > i32::MAX as usize {
            return Err(GameError::InvalidConfig(format!(
                "grid size {} is too large",
                self.grid_size
            )));
        }
        self.difficulty.profile().validate()
    }
}
