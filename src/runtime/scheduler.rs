use std::future::pending;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// One-shot tick deadline, re-armed by the owner after every tick so the
/// interval always reflects the speed at the start of that interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickScheduler {
    next_tick: Option<Instant>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self { next_tick: None }
    }

    /// Schedule the next tick `interval` after `now`, replacing any pending one
    pub fn arm(&mut self, now: Instant, interval: Duration) {
        self.next_tick = Some(now + interval);
    }

    pub fn cancel(&mut self) {
        self.next_tick = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_tick
    }
}

/// Resolve at `deadline`, or never if there is none
pub async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_cancel() {
        let now = Instant::now();
        let mut scheduler = TickScheduler::new();
        assert!(scheduler.deadline().is_none());

        scheduler.arm(now, Duration::from_millis(180));
        assert_eq!(scheduler.deadline(), Some(now + Duration::from_millis(180)));

        // Re-arming replaces, never stacks
        scheduler.arm(now, Duration::from_millis(90));
        assert_eq!(scheduler.deadline(), Some(now + Duration::from_millis(90)));

        scheduler.cancel();
        assert!(scheduler.deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_until_deadline() {
        let start = Instant::now();
        until(Some(start + Duration::from_millis(250))).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_until_none_never_fires() {
        let result = tokio::time::timeout(Duration::from_secs(60), until(None)).await;
        assert!(result.is_err());
    }
}
