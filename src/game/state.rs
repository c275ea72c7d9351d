use tokio::time::Instant;

use super::action::Direction;
use super::board::Position;
use super::effects::PowerUpKind;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    pub body: Vec<Position>,
    /// Direction applied on the most recent tick
    pub direction: Direction,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Create a snake from explicit segments, head first, heading right.
    ///
    /// Panics if `cells` is empty.
    pub fn from_cells(cells: Vec<Position>) -> Self {
        assert!(!cells.is_empty(), "snake needs at least one segment");
        Self {
            body: cells,
            direction: Direction::Right,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Prepend a new head
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment, keeping at least the head
    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the snake has no segments
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub position: Position,
    pub kind: PowerUpKind,
    pub spawned_at: Instant,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell left for new food
    BoardFull,
}
