//! Bonus unit: the occasional high-value target crossing the top of the field

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::rng::RandomSource;
use super::timer_expired;
use crate::consts::*;

/// Where the bonus unit is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BonusPhase {
    /// Off screen, counting down to the next appearance
    Dormant { elapsed: f32, delay: f32 },
    /// Crossing the field
    Active,
    /// Hit, playing the explosion
    Exploding { elapsed: f32 },
}

/// Score popup left behind after a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusLabel {
    pub score: u32,
    /// Centre of the unit at the moment it was hit
    pub pos: Vec2,
    pub elapsed: f32,
}

/// What happened during one bonus advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BonusTick {
    pub appeared: bool,
    pub departed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusUnit {
    /// Top-left corner
    pub pos: Vec2,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub phase: BonusPhase,
    pub label: Option<BonusLabel>,
    /// Successful player shots this game; drives the 300-point pattern
    pub shot_count: u32,
}

impl Default for BonusUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl BonusUnit {
    /// Dormant with the longest possible delay; `reset` draws a real one
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(0.0, BONUS_Y),
            direction: 1.0,
            phase: BonusPhase::Dormant {
                elapsed: 0.0,
                delay: BONUS_MAX_DELAY,
            },
            label: None,
            shot_count: 0,
        }
    }

    fn random_delay(rng: &mut dyn RandomSource) -> f32 {
        rng.uniform_range(BONUS_MIN_DELAY, BONUS_MAX_DELAY)
    }

    /// Back to dormant with a fresh delay. The shot counter survives.
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.pos = Vec2::new(0.0, BONUS_Y);
        self.direction = 1.0;
        self.phase = BonusPhase::Dormant {
            elapsed: 0.0,
            delay: Self::random_delay(rng),
        };
        self.label = None;
    }

    /// Start of a new game
    pub fn reset_shot_count(&mut self) {
        self.shot_count = 0;
    }

    pub fn record_shot(&mut self) {
        self.shot_count += 1;
    }

    pub fn is_active(&self) -> bool {
        self.phase == BonusPhase::Active
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.phase, BonusPhase::Exploding { .. })
    }

    /// Hitbox, only while crossing the field
    pub fn bounds(&self) -> Option<Rect> {
        self.is_active()
            .then(|| Rect::new(self.pos.x, self.pos.y, BONUS_WIDTH, BONUS_HEIGHT))
    }

    /// Points for a hit at the current shot count: 300 on the 23rd shot and
    /// every 15th after it, otherwise a random low tier
    pub fn score(&self, rng: &mut dyn RandomSource) -> u32 {
        let n = self.shot_count;
        let max_shot = n == BONUS_FIRST_MAX_SHOT
            || (n > BONUS_FIRST_MAX_SHOT && (n - BONUS_FIRST_MAX_SHOT) % BONUS_MAX_SHOT_PERIOD == 0);
        if max_shot {
            BONUS_MAX_SCORE
        } else {
            BONUS_SCORES[rng.pick_index(BONUS_SCORES.len())]
        }
    }

    /// Register a hit; returns the points scored, 0 if not hittable
    pub fn hit(&mut self, rng: &mut dyn RandomSource) -> u32 {
        if !self.is_active() {
            return 0;
        }
        let score = self.score(rng);
        self.label = Some(BonusLabel {
            score,
            pos: self.pos + Vec2::new(BONUS_WIDTH / 2.0, BONUS_HEIGHT / 2.0),
            elapsed: 0.0,
        });
        self.phase = BonusPhase::Exploding { elapsed: 0.0 };
        log::debug!("Bonus unit hit for {score} (shot {})", self.shot_count);
        score
    }

    fn spawn(&mut self, rng: &mut dyn RandomSource) {
        self.direction = if rng.uniform_float() < 0.5 { 1.0 } else { -1.0 };
        self.pos.x = if self.direction > 0.0 {
            -BONUS_WIDTH
        } else {
            FIELD_WIDTH
        };
        self.phase = BonusPhase::Active;
    }

    fn go_dormant(&mut self, rng: &mut dyn RandomSource) {
        self.phase = BonusPhase::Dormant {
            elapsed: 0.0,
            delay: Self::random_delay(rng),
        };
    }

    /// One tick: label timer, then the phase timer or movement
    pub fn advance(&mut self, dt: f32, rng: &mut dyn RandomSource) -> BonusTick {
        let mut result = BonusTick::default();

        if let Some(label) = self.label.as_mut() {
            label.elapsed += dt;
            if timer_expired(label.elapsed, BONUS_LABEL_TIME) {
                self.label = None;
            }
        }

        match self.phase {
            BonusPhase::Dormant { elapsed, delay } => {
                let elapsed = elapsed + dt;
                if timer_expired(elapsed, delay) {
                    self.spawn(rng);
                    result.appeared = true;
                } else {
                    self.phase = BonusPhase::Dormant { elapsed, delay };
                }
            }
            BonusPhase::Exploding { elapsed } => {
                let elapsed = elapsed + dt;
                if timer_expired(elapsed, BONUS_EXPLOSION_TIME) {
                    self.go_dormant(rng);
                } else {
                    self.phase = BonusPhase::Exploding { elapsed };
                }
            }
            BonusPhase::Active => {
                self.pos.x += BONUS_SPEED * self.direction;
                let gone = if self.direction > 0.0 {
                    self.pos.x > FIELD_WIDTH
                } else {
                    self.pos.x + BONUS_WIDTH < 0.0
                };
                if gone {
                    self.go_dormant(rng);
                    result.departed = true;
                }
            }
        }

        result
    }
}
