//! Error types for the game core

use thiserror::Error;

/// Errors raised by the game core.
///
/// None of these are fatal to a running game: the session absorbs
/// persistence failures and turns placement exhaustion into a terminal
/// board-full state.
#[derive(Error, Debug)]
pub enum GameError {
    /// No free cell is left on the board for a new entity
    #[error("no free cell left on a board of {cells} cells")]
    PlacementExhausted { cells: usize },

    /// The high score store could not be read or written
    #[error("high score store unavailable during {operation}: {source}")]
    PersistenceUnavailable {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The configuration cannot host a game
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub fn persistence(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        GameError::PersistenceUnavailable {
            operation,
            source: source.into(),
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::PlacementExhausted { cells: 400 };
        assert_eq!(err.to_string(), "no free cell left on a board of 400 cells");

        let err = GameError::persistence("load", anyhow::anyhow!("disk on fire"));
        assert_eq!(
            err.to_string(),
            "high score store unavailable during load: disk on fire"
        );
    }
}
