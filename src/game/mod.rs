//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time comes in as an explicit `Instant` so every rule can be driven from tests.

pub mod action;
pub mod board;
pub mod config;
pub mod effects;
pub mod engine;
pub mod placement;
pub mod session;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use board::{Board, Position};
pub use config::{Difficulty, DifficultyProfile, GameConfig};
pub use effects::{ActiveEffect, EffectSlot, Modifiers, PowerUpKind};
pub use engine::{GameEngine, GameState, TickOutcome, TickStatus};
pub use session::{GameSession, SessionState};
pub use snapshot::RenderSnapshot;
pub use state::{GameOverReason, PowerUp, Snake};
