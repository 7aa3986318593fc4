//! Player and enemy shots
//!
//! The player has a single shot slot; enemies share a small pool. Shots move a
//! fixed distance per tick and are deactivated once they leave the field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::rng::RandomSource;
use crate::consts::*;

/// Who fired a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOwner {
    Player,
    Enemy,
}

/// How a shot moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotMotion {
    Straight,
    /// Wobbles sideways; the hitbox follows the wobble
    Squiggly { phase: f32 },
}

/// Enemy shot profile, chosen at random when an enemy fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyShotKind {
    StraightSlow,
    StraightFast,
    Squiggly,
}

impl EnemyShotKind {
    pub const ALL: [EnemyShotKind; 3] = [
        EnemyShotKind::StraightSlow,
        EnemyShotKind::StraightFast,
        EnemyShotKind::Squiggly,
    ];

    pub fn speed(self) -> f32 {
        match self {
            EnemyShotKind::StraightSlow => 3.0,
            EnemyShotKind::StraightFast => 6.0,
            EnemyShotKind::Squiggly => 4.0,
        }
    }

    pub fn size(self) -> Vec2 {
        match self {
            EnemyShotKind::StraightSlow | EnemyShotKind::StraightFast => Vec2::new(3.0, 12.0),
            EnemyShotKind::Squiggly => Vec2::new(9.0, 21.0),
        }
    }

    fn motion(self) -> ShotMotion {
        match self {
            EnemyShotKind::Squiggly => ShotMotion::Squiggly { phase: 0.0 },
            _ => ShotMotion::Straight,
        }
    }
}

/// A single shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner before any lateral wobble
    pub pos: Vec2,
    pub size: Vec2,
    /// Distance travelled per tick
    pub speed: f32,
    pub owner: ShotOwner,
    pub motion: ShotMotion,
    pub active: bool,
}

impl Projectile {
    /// Player shot centred on `origin.x`, top edge at `origin.y`
    pub fn player(origin: Vec2) -> Self {
        Self {
            pos: Vec2::new(origin.x - PLAYER_SHOT_WIDTH / 2.0, origin.y),
            size: Vec2::new(PLAYER_SHOT_WIDTH, PLAYER_SHOT_HEIGHT),
            speed: PLAYER_SHOT_SPEED,
            owner: ShotOwner::Player,
            motion: ShotMotion::Straight,
            active: true,
        }
    }

    /// Enemy shot of the given profile centred on `origin.x`
    pub fn enemy(origin: Vec2, kind: EnemyShotKind) -> Self {
        let size = kind.size();
        Self {
            pos: Vec2::new(origin.x - size.x / 2.0, origin.y),
            size,
            speed: kind.speed(),
            owner: ShotOwner::Enemy,
            motion: kind.motion(),
            active: true,
        }
    }

    /// Current sideways wobble
    pub fn lateral_offset(&self) -> f32 {
        match self.motion {
            ShotMotion::Straight => 0.0,
            ShotMotion::Squiggly { phase } => phase.sin() * SQUIGGLE_AMPLITUDE,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x + self.lateral_offset(),
            self.pos.y,
            self.size.x,
            self.size.y,
        )
    }

    /// Move one tick; deactivates once outside the field vertically
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        match self.owner {
            ShotOwner::Player => self.pos.y -= self.speed,
            ShotOwner::Enemy => {
                self.pos.y += self.speed;
                if let ShotMotion::Squiggly { ref mut phase } = self.motion {
                    *phase += SQUIGGLE_PHASE_STEP;
                }
            }
        }
        if self.pos.y < 0.0 || self.pos.y > FIELD_HEIGHT {
            self.active = false;
        }
    }

    pub fn destroy(&mut self) {
        self.active = false;
    }
}

/// Anything the formation can fire into
pub trait ShotSink {
    /// Try to spawn an enemy shot at `origin`; false when at capacity
    fn fire_enemy(&mut self, origin: Vec2, rng: &mut dyn RandomSource) -> bool;
}

/// All live shots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectiles {
    pub player_shot: Option<Projectile>,
    pub enemy_shots: Vec<Projectile>,
}

impl Projectiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.player_shot = None;
        self.enemy_shots.clear();
    }

    pub fn can_fire_player(&self) -> bool {
        !self.player_shot.as_ref().is_some_and(|p| p.active)
    }

    /// Fire the player's shot; fails while a previous shot is still live
    pub fn fire_player(&mut self, origin: Vec2) -> bool {
        if !self.can_fire_player() {
            return false;
        }
        self.player_shot = Some(Projectile::player(origin));
        true
    }

    /// The player's shot, if one is live
    pub fn player_shot(&self) -> Option<&Projectile> {
        self.player_shot.as_ref().filter(|p| p.active)
    }

    pub fn destroy_player(&mut self) {
        self.player_shot = None;
    }

    /// Drop inactive enemy shots
    pub fn prune(&mut self) {
        self.enemy_shots.retain(|p| p.active);
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemy_shots.iter().filter(|p| p.active).count()
    }

    /// Move every live shot one tick
    pub fn advance(&mut self) {
        match self.player_shot.as_mut() {
            Some(shot) if shot.active => shot.advance(),
            _ => self.player_shot = None,
        }
        for shot in &mut self.enemy_shots {
            shot.advance();
        }
        self.prune();
    }
}

impl ShotSink for Projectiles {
    fn fire_enemy(&mut self, origin: Vec2, rng: &mut dyn RandomSource) -> bool {
        self.prune();
        if self.enemy_shots.len() >= MAX_ENEMY_SHOTS {
            return false;
        }
        let kind = EnemyShotKind::ALL[rng.pick_index(EnemyShotKind::ALL.len())];
        self.enemy_shots.push(Projectile::enemy(origin, kind));
        true
    }
}
