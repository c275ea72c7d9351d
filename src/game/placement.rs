//! Random placement of food and power-ups on free cells

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::time::Instant;
use tracing::debug;

use super::board::{Board, Position};
use super::effects::PowerUpKind;
use super::state::{PowerUp, Snake};
use crate::error::{GameError, GameResult};

/// Random draws before falling back to scanning the board for free cells
const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Pick a uniformly random cell for which `blocked` is false.
///
/// Rejection sampling handles the common sparse board; a crowded board falls
/// back to choosing among the enumerated free cells, which keeps the same
/// distribution and always terminates.
fn pick_free_cell<R, F>(board: &Board, rng: &mut R, blocked: F) -> GameResult<Position>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    let size = board.size() as i32;
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !blocked(pos) {
            return Ok(pos);
        }
    }

    let free: Vec<Position> = board.cells().filter(|pos| !blocked(*pos)).collect();
    free.choose(rng).copied().ok_or(GameError::PlacementExhausted {
        cells: board.cell_count(),
    })
}

/// Choose a food cell that is clear of the snake and the power-up
pub fn place_food<R: Rng + ?Sized>(
    board: &Board,
    snake: &Snake,
    power_up: Option<&PowerUp>,
    rng: &mut R,
) -> GameResult<Position> {
    pick_free_cell(board, rng, |pos| {
        board.occupied_by_snake(snake, pos) || power_up.is_some_and(|p| p.position == pos)
    })
}

/// Roll for a power-up spawn; on success pick a random kind and a cell clear
/// of the snake and the food.
pub fn maybe_place_power_up<R: Rng + ?Sized>(
    board: &Board,
    snake: &Snake,
    food: Position,
    probability: f64,
    rng: &mut R,
    now: Instant,
) -> Option<PowerUp> {
    if !rng.gen_bool(probability) {
        return None;
    }

    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    match pick_free_cell(board, rng, |pos| {
        pos == food || board.occupied_by_snake(snake, pos)
    }) {
        Ok(position) => Some(PowerUp {
            position,
            kind,
            spawned_at: now,
        }),
        Err(err) => {
            debug!("Skipping {} spawn: {}", kind.name(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fill_board_except(board: &Board, keep: &[Position]) -> Snake {
        let cells: Vec<_> = board.cells().filter(|pos| !keep.contains(pos)).collect();
        Snake::from_cells(cells)
    }

    #[test]
    fn test_food_avoids_snake_and_power_up() {
        let board = Board::new(5);
        let mut rng = StdRng::seed_from_u64(1);
        let snake = Snake::new(Position::new(2, 2), Direction::Right);
        let power_up = PowerUp {
            position: Position::new(0, 0),
            kind: PowerUpKind::SlowDown,
            spawned_at: Instant::now(),
        };

        for _ in 0..200 {
            let food = place_food(&board, &snake, Some(&power_up), &mut rng).unwrap();
            assert!(board.in_bounds(food));
            assert_ne!(food, Position::new(2, 2));
            assert_ne!(food, Position::new(0, 0));
        }
    }

    #[test]
    fn test_food_finds_last_free_cell() {
        let board = Board::new(6);
        let last = Position::new(4, 1);
        let snake = fill_board_except(&board, &[last]);
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(place_food(&board, &snake, None, &mut rng).unwrap(), last);
    }

    #[test]
    fn test_full_board_is_exhausted() {
        let board = Board::new(3);
        let snake = fill_board_except(&board, &[]);
        let mut rng = StdRng::seed_from_u64(3);

        let result = place_food(&board, &snake, None, &mut rng);
        assert!(matches!(
            result,
            Err(GameError::PlacementExhausted { cells: 9 })
        ));
    }

    #[test]
    fn test_power_up_probability_bounds() {
        let board = Board::new(10);
        let snake = Snake::new(Position::new(5, 5), Direction::Right);
        let food = Position::new(1, 1);
        let mut rng = StdRng::seed_from_u64(5);
        let now = Instant::now();

        for _ in 0..50 {
            assert!(maybe_place_power_up(&board, &snake, food, 0.0, &mut rng, now).is_none());
        }

        for _ in 0..50 {
            let power_up = maybe_place_power_up(&board, &snake, food, 1.0, &mut rng, now)
                .expect("certain spawn");
            assert_ne!(power_up.position, food);
            assert_ne!(power_up.position, Position::new(5, 5));
            assert_eq!(power_up.spawned_at, now);
        }
    }

    #[test]
    fn test_power_up_skipped_on_crowded_board() {
        let board = Board::new(3);
        let food = Position::new(0, 0);
        let snake = fill_board_except(&board, &[food]);
        let mut rng = StdRng::seed_from_u64(11);

        let spawned = maybe_place_power_up(&board, &snake, food, 1.0, &mut rng, Instant::now());
        assert!(spawned.is_none());
    }
}
