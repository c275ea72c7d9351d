//! Timed power-up effects
//!
//! At most one effect runs at a time. Picking up a power-up while another
//! effect is running reverts the running one and starts the new one with a
//! fresh timer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Kinds of power-up that can appear on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    SlowDown,
    Invincibility,
    ScoreMultiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::SlowDown,
        PowerUpKind::Invincibility,
        PowerUpKind::ScoreMultiplier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::SlowDown => "Slow Down",
            PowerUpKind::Invincibility => "Invincibility",
            PowerUpKind::ScoreMultiplier => "Score x2",
        }
    }

    /// How long the effect lasts after pickup
    pub fn duration(&self) -> Duration {
        match self {
            PowerUpKind::SpeedBoost | PowerUpKind::SlowDown | PowerUpKind::Invincibility => {
                Duration::from_millis(5000)
            }
            PowerUpKind::ScoreMultiplier => Duration::from_millis(8000),
        }
    }

    /// Whether this effect overrides the tick interval while active
    pub fn affects_speed(&self) -> bool {
        matches!(self, PowerUpKind::SpeedBoost | PowerUpKind::SlowDown)
    }

    pub fn apply(&self, modifiers: &mut Modifiers) {
        match self {
            PowerUpKind::SpeedBoost => {
                modifiers.current_speed_ms =
                    (modifiers.current_speed_ms / 2).max(modifiers.min_speed_ms);
            }
            PowerUpKind::SlowDown => {
                modifiers.current_speed_ms = modifiers.current_speed_ms * 3 / 2;
            }
            PowerUpKind::Invincibility => modifiers.invincible = true,
            PowerUpKind::ScoreMultiplier => modifiers.score_multiplier = 2,
        }
    }

    /// Undo this kind's fields. Speed effects fall back to the base speed as
    /// it is now, not as it was at activation.
    pub fn revert(&self, modifiers: &mut Modifiers) {
        match self {
            PowerUpKind::SpeedBoost | PowerUpKind::SlowDown => {
                modifiers.current_speed_ms = modifiers.base_speed_ms;
            }
            PowerUpKind::Invincibility => modifiers.invincible = false,
            PowerUpKind::ScoreMultiplier => modifiers.score_multiplier = 1,
        }
    }
}

/// Simulation parameters that power-ups and food modify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    /// Tick interval in effect right now
    pub current_speed_ms: u64,
    /// Tick interval from food-driven acceleration only
    pub base_speed_ms: u64,
    pub min_speed_ms: u64,
    pub score_multiplier: u32,
    pub invincible: bool,
}

impl Modifiers {
    pub fn new(initial_speed_ms: u64, min_speed_ms: u64) -> Self {
        Self {
            current_speed_ms: initial_speed_ms,
            base_speed_ms: initial_speed_ms,
            min_speed_ms,
            score_multiplier: 1,
            invincible: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub expires_at: Instant,
}

impl ActiveEffect {
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

/// The single effect slot
#[derive(Debug, Clone, Default)]
pub struct EffectSlot {
    active: Option<ActiveEffect>,
}

impl EffectSlot {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<&ActiveEffect> {
        self.active.as_ref()
    }

    /// When the running effect should be expired, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.active.map(|effect| effect.expires_at)
    }

    pub fn speed_effect_active(&self) -> bool {
        self.active.is_some_and(|effect| effect.kind.affects_speed())
    }

    /// Start `kind`, reverting and returning whatever effect it replaces
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        now: Instant,
        modifiers: &mut Modifiers,
    ) -> Option<ActiveEffect> {
        let superseded = self.active.take();
        if let Some(previous) = superseded {
            previous.kind.revert(modifiers);
        }

        kind.apply(modifiers);
        self.active = Some(ActiveEffect {
            kind,
            expires_at: now + kind.duration(),
        });

        superseded
    }

    /// Revert the running effect if its deadline has passed.
    ///
    /// A timer armed for an effect that has since been replaced finds the
    /// newer deadline still in the future and does nothing.
    pub fn expire(&mut self, now: Instant, modifiers: &mut Modifiers) -> Option<PowerUpKind> {
        match self.active {
            Some(effect) if now >= effect.expires_at => {
                effect.kind.revert(modifiers);
                self.active = None;
                Some(effect.kind)
            }
            _ => None,
        }
    }

    /// Drop the running effect without reverting it
    pub fn clear(&mut self) {
        self.active = None;
    }
}
