//! Interactive play in the terminal
//!
//! The session runs on its own task inside [`GameLoop`]; this mode only
//! forwards key presses into it and draws the latest published frame.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{debug, info};

use crate::game::{GameConfig, GameSession, RenderSnapshot};
use crate::input::InputHandler;
use crate::persistence::JsonFileStore;
use crate::render::Renderer;
use crate::runtime::{GameLoop, InputEvent};

const INPUT_BUFFER: usize = 64;

pub struct HumanMode {
    session: GameSession,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, high_score_file: impl Into<PathBuf>) -> Result<Self> {
        let store = JsonFileStore::new(high_score_file);
        info!("High score file: {}", store.path().display());
        let session = GameSession::new(config, Box::new(store))
            .context("Failed to create game session")?;

        Ok(Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let Self {
            session,
            renderer,
            input_handler,
            should_quit,
        } = self;
        let (game_loop, frames) = GameLoop::new(session);
        let (events, receiver) = mpsc::channel(INPUT_BUFFER);
        let game_task = tokio::spawn(game_loop.run(receiver));

        let mut frontend = Frontend {
            renderer,
            input_handler,
            should_quit,
            events,
            frames,
        };

        // Run frontend loop with cleanup
        let result = frontend.run(&mut terminal).await;

        // Dropping the sender stops the game loop if it is still running
        drop(frontend);
        let joined = game_task.await.context("Game loop task failed");

        // Cleanup terminal
        cleanup_terminal(&mut terminal)?;

        result?;
        let session = joined?;
        info!(
            "Exiting in {:?} state, high score {}",
            session.state(),
            session.high_score()
        );
        Ok(())
    }
}

/// Terminal side of a running game: input in, frames out
struct Frontend {
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    events: mpsc::Sender<InputEvent>,
    frames: watch::Receiver<RenderSnapshot>,
}

impl Frontend {
    async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    let snapshot = self.frames.borrow_and_update().clone();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.quit().await;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                Some(InputEvent::Quit) => self.quit().await,
                Some(input) => self.forward(input).await,
                None => {}
            }
        }

        Ok(())
    }

    async fn forward(&mut self, input: InputEvent) {
        if self.events.send(input).await.is_err() {
            debug!("Game loop gone, quitting");
            self.should_quit = true;
        }
    }

    async fn quit(&mut self) {
        // The loop may already be gone; quitting anyway
        let _ = self.events.send(InputEvent::Quit).await;
        self.should_quit = true;
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Command, Direction, SessionState};
    use crate::persistence::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn frontend(session: GameSession) -> (Frontend, tokio::task::JoinHandle<GameSession>) {
        let (game_loop, frames) = GameLoop::new(session);
        let (events, receiver) = mpsc::channel(INPUT_BUFFER);
        let task = tokio::spawn(game_loop.run(receiver));
        let frontend = Frontend {
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            events,
            frames,
        };
        (frontend, task)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let dir = TempDir::new().unwrap();
        let config = GameConfig::default().with_seed(1);
        let mode = HumanMode::new(config, dir.path().join("high_score.json")).unwrap();
        assert_eq!(mode.session.state(), SessionState::Idle);
        assert_eq!(mode.session.high_score(), 0);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let result = HumanMode::new(GameConfig::new(1), dir.path().join("high_score.json"));
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_reach_session() {
        let session = GameSession::new(
            GameConfig::default().with_seed(2),
            Box::new(MemoryStore::new()),
        )
        .unwrap();
        let (mut frontend, task) = frontend(session);

        frontend.handle_event(key(KeyCode::Enter)).await.unwrap();
        frontend.handle_event(key(KeyCode::Down)).await.unwrap();
        frontend.frames.changed().await.unwrap();
        assert_eq!(frontend.frames.borrow().state, SessionState::Playing);

        frontend.handle_event(key(KeyCode::Char('q'))).await.unwrap();
        assert!(frontend.should_quit);

        let session = task.await.unwrap();
        assert_eq!(session.state(), SessionState::Playing);
        let game = session.game().unwrap();
        let heading = game.pending_direction.unwrap_or(game.snake.direction);
        assert_eq!(heading, Direction::Down);
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_events_ignored() {
        let session = GameSession::new(
            GameConfig::default().with_seed(2),
            Box::new(MemoryStore::new()),
        )
        .unwrap();
        let (mut frontend, task) = frontend(session);

        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        frontend.handle_event(Event::Key(release)).await.unwrap();
        assert!(!frontend.should_quit);

        frontend
            .forward(InputEvent::Command(Command::Start))
            .await;
        frontend.quit().await;
        let session = task.await.unwrap();
        assert_eq!(session.state(), SessionState::Playing);
    }
}
