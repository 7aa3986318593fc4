//! The player's cannon

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::timer_expired;
use crate::consts::*;

/// Cannon life cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CannonPhase {
    Alive,
    /// Hit; the explosion plays out before a life is taken
    Exploding { elapsed: f32 },
    /// Off the field, waiting to come back
    Respawning { elapsed: f32 },
}

/// Result of one cannon update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannonStatus {
    Alive,
    Exploding,
    /// The explosion finished this tick; the owner decides what comes next
    Exploded,
    Respawning,
    /// Back on the field this tick
    Respawned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannon {
    /// Top-left corner
    pub pos: Vec2,
    pub phase: CannonPhase,
}

impl Default for Cannon {
    fn default() -> Self {
        Self::new()
    }
}

impl Cannon {
    pub fn new() -> Self {
        Self {
            pos: Self::start_pos(),
            phase: CannonPhase::Alive,
        }
    }

    fn start_pos() -> Vec2 {
        Vec2::new(CANNON_START_X - CANNON_WIDTH / 2.0, CANNON_Y)
    }

    /// Alive at the start position
    pub fn reset(&mut self) {
        self.pos = Self::start_pos();
        self.phase = CannonPhase::Alive;
    }

    pub fn is_alive(&self) -> bool {
        self.phase == CannonPhase::Alive
    }

    pub fn can_fire(&self) -> bool {
        self.is_alive()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, CANNON_WIDTH, CANNON_HEIGHT)
    }

    /// Top-centre point the player's shot leaves from
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + CANNON_WIDTH / 2.0, self.pos.y)
    }

    /// Start exploding. Returns false if the cannon was not alive.
    pub fn die(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.phase = CannonPhase::Exploding { elapsed: 0.0 };
        true
    }

    /// Begin the respawn countdown (after a life has been taken)
    pub fn start_respawn(&mut self) {
        self.phase = CannonPhase::Respawning { elapsed: 0.0 };
    }

    /// Move while alive and advance the explosion/respawn timers
    pub fn update(&mut self, dt: f32, left: bool, right: bool) -> CannonStatus {
        match self.phase {
            CannonPhase::Alive => {
                let mut dx = 0.0;
                if left {
                    dx -= CANNON_SPEED;
                }
                if right {
                    dx += CANNON_SPEED;
                }
                self.pos.x = (self.pos.x + dx).clamp(
                    CANNON_MARGIN,
                    FIELD_WIDTH - CANNON_WIDTH - CANNON_MARGIN,
                );
                CannonStatus::Alive
            }
            CannonPhase::Exploding { elapsed } => {
                let elapsed = elapsed + dt;
                if timer_expired(elapsed, CANNON_EXPLOSION_TIME) {
                    CannonStatus::Exploded
                } else {
                    self.phase = CannonPhase::Exploding { elapsed };
                    CannonStatus::Exploding
                }
            }
            CannonPhase::Respawning { elapsed } => {
                let elapsed = elapsed + dt;
                if timer_expired(elapsed, CANNON_RESPAWN_TIME) {
                    self.reset();
                    CannonStatus::Respawned
                } else {
                    self.phase = CannonPhase::Respawning { elapsed };
                    CannonStatus::Respawning
                }
            }
        }
    }
}
