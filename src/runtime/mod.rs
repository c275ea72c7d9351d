//! Async driver for a game session
//!
//! Owns the tick scheduler, the effect-expiry timer and the input channel.

pub mod game_loop;
pub mod scheduler;

pub use game_loop::{GameLoop, InputEvent};
pub use scheduler::TickScheduler;
