use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Difficulty, Direction};
use crate::runtime::InputEvent;

/// Maps terminal key presses to game input
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> Option<InputEvent> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(InputEvent::Quit);
        }

        let event = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => InputEvent::Turn(Direction::Up),
            KeyCode::Down => InputEvent::Turn(Direction::Down),
            KeyCode::Left => InputEvent::Turn(Direction::Left),
            KeyCode::Right => InputEvent::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => InputEvent::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => InputEvent::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => InputEvent::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => InputEvent::Turn(Direction::Right),

            // Lifecycle
            KeyCode::Char(' ') | KeyCode::Enter => InputEvent::Command(Command::Start),
            KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::Command(Command::Restart),
            KeyCode::Char('m') | KeyCode::Char('M') => InputEvent::Command(Command::Menu),
            KeyCode::Char('1') => InputEvent::Command(Command::SelectDifficulty(Difficulty::Easy)),
            KeyCode::Char('2') => {
                InputEvent::Command(Command::SelectDifficulty(Difficulty::Medium))
            }
            KeyCode::Char('3') => InputEvent::Command(Command::SelectDifficulty(Difficulty::Hard)),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,

            _ => return None,
        };

        Some(event)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            Some(InputEvent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            Some(InputEvent::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            Some(InputEvent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            Some(InputEvent::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            Some(InputEvent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            Some(InputEvent::Turn(Direction::Left))
        );

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            Some(InputEvent::Turn(Direction::Up))
        );
    }

    #[test]
    fn test_lifecycle_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter)),
            Some(InputEvent::Command(Command::Start))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char(' '))),
            Some(InputEvent::Command(Command::Start))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('r'))),
            Some(InputEvent::Command(Command::Restart))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('m'))),
            Some(InputEvent::Command(Command::Menu))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('3'))),
            Some(InputEvent::Command(Command::SelectDifficulty(Difficulty::Hard)))
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q'))),
            Some(InputEvent::Quit)
        );
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), Some(InputEvent::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), Some(InputEvent::Quit));
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), None);
    }
}
