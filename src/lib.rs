//! Snake Arcade - a tick-driven snake game with power-ups
//!
//! This library provides:
//! - Core game rules, placement and power-up effects (game module)
//! - The async loop that ticks a session and expires effects (runtime module)
//! - High score storage (persistence module)
//! - Terminal input mapping and rendering (input, render modules)
//! - The interactive terminal front end (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod runtime;

pub use error::{GameError, GameResult};
