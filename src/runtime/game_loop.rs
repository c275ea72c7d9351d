//! The single task that owns a session and drives it
//!
//! Ticks, effect expiry and input all run on this one task, so the session
//! is never touched concurrently and a tick never overlaps another.

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::debug;

use super::scheduler::{TickScheduler, until};
use crate::game::{Command, Direction, GameSession, RenderSnapshot, SessionState};

/// Messages from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    Command(Command),
    Quit,
}

pub struct GameLoop {
    session: GameSession,
    scheduler: TickScheduler,
    frames: watch::Sender<RenderSnapshot>,
}

impl GameLoop {
    /// Wrap a session. Frames are published on the returned receiver after
    /// every state change; the latest one always wins.
    pub fn new(session: GameSession) -> (Self, watch::Receiver<RenderSnapshot>) {
        let now = Instant::now();
        let (frames, receiver) = watch::channel(session.snapshot(now));

        let mut scheduler = TickScheduler::new();
        if let Some(interval) = session.tick_interval() {
            scheduler.arm(now, interval);
        }

        (
            Self {
                session,
                scheduler,
                frames,
            },
            receiver,
        )
    }

    /// Run until `Quit` arrives or every sender is dropped; hands the session
    /// back afterwards.
    pub async fn run(mut self, mut events: mpsc::Receiver<InputEvent>) -> GameSession {
        loop {
            let tick_at = self.scheduler.deadline();
            let expire_at = self.session.effect_deadline();

            tokio::select! {
                event = events.recv() => match event {
                    Some(InputEvent::Turn(direction)) => {
                        self.session.set_pending_direction(direction);
                    }
                    Some(InputEvent::Command(command)) => self.on_command(command),
                    Some(InputEvent::Quit) | None => break,
                },
                _ = until(tick_at) => self.on_tick(),
                _ = until(expire_at) => self.on_expiry(),
            }
        }

        debug!("Game loop stopped");
        self.session
    }

    fn on_command(&mut self, command: Command) {
        let now = Instant::now();
        let before = self.session.state();
        let after = self.session.dispatch(command);

        match (before, after) {
            (SessionState::Playing, SessionState::Playing) => {}
            (_, SessionState::Playing) => self.rearm(now),
            _ => self.scheduler.cancel(),
        }
        self.publish(now);
    }

    fn on_tick(&mut self) {
        let now = Instant::now();
        self.session.tick(now);
        self.rearm(now);
        self.publish(now);
    }

    fn on_expiry(&mut self) {
        let now = Instant::now();
        if self.session.expire_effects(now).is_some() {
            self.publish(now);
        }
    }

    /// Read the speed fresh for the coming interval; stop when not playing
    fn rearm(&mut self, now: Instant) {
        match self.session.tick_interval() {
            Some(interval) => self.scheduler.arm(now, interval),
            None => self.scheduler.cancel(),
        }
    }

    fn publish(&self, now: Instant) {
        self.frames.send_replace(self.session.snapshot(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        Difficulty, DifficultyProfile, GameConfig, GameOverReason, Position, PowerUp,
        PowerUpKind,
    };
    use crate::persistence::MemoryStore;
    use std::time::Duration;

    fn quiet_profile() -> DifficultyProfile {
        DifficultyProfile {
            power_up_spawn_probability: 0.0,
            ..Difficulty::Medium.profile()
        }
    }

    fn session(grid_size: usize) -> GameSession {
        let config = GameConfig::new(grid_size).with_seed(3);
        GameSession::new(config, Box::new(MemoryStore::new())).unwrap()
    }

    async fn wait_for(
        frames: &mut watch::Receiver<RenderSnapshot>,
        pred: impl Fn(&RenderSnapshot) -> bool,
    ) -> RenderSnapshot {
        loop {
            let snapshot = frames.borrow_and_update().clone();
            if pred(&snapshot) {
                return snapshot;
            }
            frames.changed().await.expect("game loop stopped");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_ticks_and_turns() {
        let (game_loop, mut frames) = GameLoop::new(session(20));
        let (events, receiver) = mpsc::channel(16);
        let task = tokio::spawn(game_loop.run(receiver));
        let start = Instant::now();

        events.send(InputEvent::Command(Command::Start)).await.unwrap();
        wait_for(&mut frames, |s| s.state == SessionState::Playing).await;

        let moved = wait_for(&mut frames, |s| s.head() != Some(Position::new(10, 10))).await;
        assert_eq!(moved.head(), Some(Position::new(11, 10)));
        assert!(start.elapsed() >= Duration::from_millis(180));

        events.send(InputEvent::Turn(Direction::Down)).await.unwrap();
        let turned = wait_for(&mut frames, |s| s.direction == Direction::Down).await;
        assert_eq!(turned.head().map(|p| p.x), Some(11));

        events.send(InputEvent::Quit).await.unwrap();
        let session = task.await.unwrap();
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_stops_ticking() {
        let mut session = session(20);
        session.dispatch(Command::Start);
        session.game_mut().unwrap().food = Position::new(0, 0);
        session.game_mut().unwrap().profile = quiet_profile();

        let (game_loop, mut frames) = GameLoop::new(session);
        let (events, receiver) = mpsc::channel(16);
        let task = tokio::spawn(game_loop.run(receiver));

        let over = wait_for(&mut frames, |s| s.state == SessionState::GameOver).await;
        assert_eq!(over.game_over_reason, Some(GameOverReason::Wall));
        assert_eq!(over.head(), Some(Position::new(19, 10)));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!frames.has_changed().unwrap());

        events.send(InputEvent::Command(Command::Restart)).await.unwrap();
        let restarted = wait_for(&mut frames, |s| s.state == SessionState::Playing).await;
        assert_eq!(restarted.score, 0);
        assert_eq!(restarted.head(), Some(Position::new(10, 10)));

        drop(events);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_follows_speed_changes() {
        let mut session = session(20);
        session.dispatch(Command::Start);
        let game = session.game_mut().unwrap();
        game.food = Position::new(11, 10);
        game.profile = quiet_profile();

        let (game_loop, mut frames) = GameLoop::new(session);
        let (_events, receiver) = mpsc::channel(16);
        tokio::spawn(game_loop.run(receiver));

        wait_for(&mut frames, |s| s.score == 10).await;
        let ate_at = Instant::now();

        wait_for(&mut frames, |s| s.head() == Some(Position::new(12, 10))).await;
        let gap = ate_at.elapsed();
        assert!(gap >= Duration::from_millis(175), "gap was {:?}", gap);
        assert!(gap < Duration::from_millis(180), "gap was {:?}", gap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_expires_between_ticks() {
        let mut session = session(100);
        let now = Instant::now();
        session.dispatch(Command::Start);
        let game = session.game_mut().unwrap();
        game.food = Position::new(0, 0);
        game.profile = quiet_profile();
        game.power_up = Some(PowerUp {
            position: Position::new(51, 50),
            kind: PowerUpKind::Invincibility,
            spawned_at: now,
        });

        let (game_loop, mut frames) = GameLoop::new(session);
        let (events, receiver) = mpsc::channel(16);
        let task = tokio::spawn(game_loop.run(receiver));

        wait_for(&mut frames, |s| s.invincible).await;
        let activated_at = Instant::now();

        let expired = wait_for(&mut frames, |s| !s.invincible).await;
        assert!(expired.active_effect.is_none());
        assert_eq!(expired.state, SessionState::Playing);
        assert!(activated_at.elapsed() >= Duration::from_millis(5000));

        events.send(InputEvent::Quit).await.unwrap();
        let session = task.await.unwrap();
        assert!(session.effect_deadline().is_none());
        assert_eq!(session.tick_interval(), Some(Duration::from_millis(180)));
    }
}
