//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (grid order for enemies, barriers left to right)
//! - No audio, storage or platform dependencies; side effects leave as `GameEvent`s

pub mod barrier;
pub mod bonus;
pub mod cannon;
pub mod collision;
pub mod formation;
pub mod projectile;
pub mod rect;
pub mod rng;
pub mod state;
pub mod tick;

pub use barrier::{Barrier, BarrierField};
pub use bonus::{BonusPhase, BonusUnit};
pub use cannon::{Cannon, CannonPhase};
pub use collision::{CollisionReport, PlayerShotHit, resolve_collisions};
pub use formation::{Enemy, EnemyKind, EnemyState, Formation, Tempo};
pub use projectile::{EnemyShotKind, Projectile, Projectiles, ShotOwner, ShotSink};
pub use rect::Rect;
pub use rng::{RandomSource, ScriptedRng, SimRng};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};

/// Whether a timer that has run for `elapsed` seconds has reached `duration`
#[inline]
pub fn timer_expired(elapsed: f32, duration: f32) -> bool {
    elapsed >= duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_expired_inclusive() {
        assert!(!timer_expired(0.99, 1.0));
        assert!(timer_expired(1.0, 1.0));
        assert!(timer_expired(1.5, 1.0));
    }
}
