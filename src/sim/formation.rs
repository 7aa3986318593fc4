//! Enemy formation: grid layout, marching, acceleration and return fire
//!
//! The formation moves as one block on a timer. Each march step either
//! translates every present unit sideways or, if a unit touched a side margin
//! on the previous step, drops the whole block and reverses direction. Speed
//! and fire rate scale with the fraction of units destroyed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::ShotSink;
use super::rect::Rect;
use super::rng::RandomSource;
use super::timer_expired;
use crate::consts::*;

/// Enemy tier, fixed per formation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Top row, smallest and most valuable
    Squid,
    /// Rows 1-2
    Crab,
    /// Rows 3-4, nearest the player
    Octopus,
}

impl EnemyKind {
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => EnemyKind::Squid,
            1 | 2 => EnemyKind::Crab,
            _ => EnemyKind::Octopus,
        }
    }

    pub fn width(self) -> f32 {
        match self {
            EnemyKind::Squid => 24.0,
            EnemyKind::Crab => 33.0,
            EnemyKind::Octopus => 36.0,
        }
    }

    pub fn height(self) -> f32 {
        ENEMY_HEIGHT
    }

    pub fn points(self) -> u32 {
        match self {
            EnemyKind::Squid => 30,
            EnemyKind::Crab => 20,
            EnemyKind::Octopus => 10,
        }
    }

    /// Number of sprite frames the presentation cycles through
    pub fn frame_count(self) -> u8 {
        2
    }
}

/// Lifecycle of a single enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyState {
    Alive,
    /// Hit, playing the explosion; still marches but cannot be hit or fire
    Exploding { elapsed: f32 },
    /// Removed for the rest of the round
    Gone,
}

/// A single enemy unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub row: usize,
    pub col: usize,
    /// Top-left corner in world units
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub state: EnemyState,
    /// Current animation frame (toggles every march step)
    pub frame: u8,
}

impl Enemy {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            pos: Vec2::new(
                FORMATION_START_X + col as f32 * COLUMN_PITCH,
                FORMATION_START_Y + row as f32 * ROW_PITCH,
            ),
            kind: EnemyKind::for_row(row),
            state: EnemyState::Alive,
            frame: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.kind.width(), self.kind.height())
    }

    /// Alive and not mid-explosion: can be shot, can fire
    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, EnemyState::Exploding { .. })
    }

    /// Still part of the formation (alive or exploding)
    pub fn is_present(&self) -> bool {
        self.state != EnemyState::Gone
    }

    /// Lower-centre point shots are fired from
    pub fn muzzle(&self) -> Vec2 {
        let b = self.bounds();
        Vec2::new(b.x + b.width / 2.0, b.bottom())
    }

    fn update(&mut self, dt: f32) {
        if let EnemyState::Exploding { elapsed } = self.state {
            let elapsed = elapsed + dt;
            self.state = if timer_expired(elapsed, ENEMY_EXPLOSION_TIME) {
                EnemyState::Gone
            } else {
                EnemyState::Exploding { elapsed }
            };
        }
    }

    fn toggle_frame(&mut self) {
        self.frame = (self.frame + 1) % self.kind.frame_count();
    }
}

/// Speed and timing derived from how much of the formation survives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    /// Horizontal speed (multiplied by STEP_SCALE per march step)
    pub speed: f32,
    /// Seconds between march steps
    pub move_interval: f32,
    /// Seconds between formation shots
    pub shoot_interval: f32,
}

impl Tempo {
    pub fn initial() -> Self {
        Self {
            speed: BASE_SPEED,
            move_interval: BASE_MOVE_INTERVAL,
            shoot_interval: BASE_SHOOT_INTERVAL,
        }
    }

    /// Tempo for `present` survivors out of `initial`; `None` when nobody is left
    pub fn for_counts(initial: usize, present: usize) -> Option<Self> {
        if present == 0 {
            return None;
        }
        let ratio = initial as f32 / present as f32;
        Some(Self {
            speed: (BASE_SPEED * ratio).min(MAX_SPEED),
            move_interval: (BASE_MOVE_INTERVAL / ratio).max(MIN_MOVE_INTERVAL),
            // Fire rate ramps twice as fast as the march
            shoot_interval: (BASE_SHOOT_INTERVAL / (ratio * 0.5)).max(MIN_SHOOT_INTERVAL),
        })
    }
}

/// What happened during one formation advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormationTick {
    pub marched: bool,
    pub descended: bool,
    pub fired: bool,
}

/// The enemy grid and its collective movement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    /// Units in row-major order (row 0 first)
    pub enemies: Vec<Enemy>,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub tempo: Tempo,
    pub move_timer: f32,
    pub shoot_timer: f32,
    /// A unit touched a margin; descend on the next march step
    pub pending_descent: bool,
    pub initial_count: usize,
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

impl Formation {
    /// A freshly laid out formation
    pub fn new() -> Self {
        let mut formation = Self {
            enemies: Vec::with_capacity(FORMATION_ROWS * FORMATION_COLUMNS),
            direction: 1.0,
            tempo: Tempo::initial(),
            move_timer: 0.0,
            shoot_timer: 0.0,
            pending_descent: false,
            initial_count: 0,
        };
        formation.initialize();
        formation
    }

    /// Lay out the full grid and reset movement state
    pub fn initialize(&mut self) {
        self.enemies.clear();
        for row in 0..FORMATION_ROWS {
            for col in 0..FORMATION_COLUMNS {
                self.enemies.push(Enemy::new(row, col));
            }
        }
        self.direction = 1.0;
        self.tempo = Tempo::initial();
        self.move_timer = 0.0;
        self.shoot_timer = 0.0;
        self.pending_descent = false;
        self.initial_count = self.enemies.len();
    }

    /// Advance timers; march and fire when their intervals elapse
    pub fn advance(
        &mut self,
        dt: f32,
        shots: &mut dyn ShotSink,
        rng: &mut dyn RandomSource,
    ) -> FormationTick {
        let mut result = FormationTick::default();

        for enemy in &mut self.enemies {
            enemy.update(dt);
        }

        if let Some(tempo) = Tempo::for_counts(self.initial_count, self.present_count()) {
            self.tempo = tempo;
        }

        self.move_timer += dt;
        if timer_expired(self.move_timer, self.tempo.move_interval) {
            self.move_timer = 0.0;
            result.descended = self.pending_descent;
            result.marched = self.march();
            if !result.marched {
                result.descended = false;
            }
        }

        self.shoot_timer += dt;
        if timer_expired(self.shoot_timer, self.tempo.shoot_interval) {
            self.shoot_timer = 0.0;
            result.fired = self.fire(shots, rng);
        }

        result
    }

    /// One march step. Returns false when there is nothing left to move.
    fn march(&mut self) -> bool {
        if self.present_count() == 0 {
            return false;
        }

        if self.pending_descent {
            for enemy in self.enemies.iter_mut().filter(|e| e.is_present()) {
                enemy.pos.y += DESCENT_AMOUNT;
            }
            self.direction = -self.direction;
            self.pending_descent = false;
        } else {
            let dx = self.tempo.speed * self.direction * STEP_SCALE;
            let mut hit_edge = false;
            for enemy in self.enemies.iter_mut().filter(|e| e.is_present()) {
                enemy.pos.x += dx;
                let b = enemy.bounds();
                if b.x <= SIDE_MARGIN || b.right() >= FIELD_WIDTH - SIDE_MARGIN {
                    hit_edge = true;
                }
            }
            if hit_edge {
                self.pending_descent = true;
            }
        }

        for enemy in self.enemies.iter_mut().filter(|e| e.is_present()) {
            enemy.toggle_frame();
        }
        true
    }

    /// Fire from a random column front unit
    fn fire(&mut self, shots: &mut dyn ShotSink, rng: &mut dyn RandomSource) -> bool {
        let front = self.column_front();
        if front.is_empty() {
            return false;
        }
        let shooter = front[rng.pick_index(front.len())];
        let muzzle = self.enemies[shooter].muzzle();
        log::debug!(
            "Enemy at row {} col {} fires",
            self.enemies[shooter].row,
            self.enemies[shooter].col
        );
        shots.fire_enemy(muzzle, rng)
    }

    /// Indices of the living unit nearest the player in each occupied column,
    /// ordered by column
    pub fn column_front(&self) -> Vec<usize> {
        let mut fronts: [Option<usize>; FORMATION_COLUMNS] = [None; FORMATION_COLUMNS];
        for (i, enemy) in self.enemies.iter().enumerate() {
            if !enemy.is_alive() {
                continue;
            }
            let Some(slot) = fronts.get_mut(enemy.col) else {
                continue;
            };
            match slot {
                Some(j) if self.enemies[*j].row >= enemy.row => {}
                _ => *slot = Some(i),
            }
        }
        fronts.into_iter().flatten().collect()
    }

    /// Kill the unit at `index`, returning its points (0 if it was not alive)
    pub fn kill(&mut self, index: usize) -> u32 {
        match self.enemies.get_mut(index) {
            Some(enemy) if enemy.is_alive() => {
                enemy.state = EnemyState::Exploding { elapsed: 0.0 };
                enemy.kind.points()
            }
            _ => 0,
        }
    }

    /// Units that can still be shot
    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Units still marching (alive or exploding)
    pub fn present_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_present()).count()
    }

    pub fn is_defeated(&self) -> bool {
        self.alive_count() == 0
    }

    /// Any present unit's lower edge has reached the barrier line
    pub fn reached_barrier_line(&self) -> bool {
        self.enemies
            .iter()
            .filter(|e| e.is_present())
            .any(|e| e.bounds().bottom() >= BARRIER_LINE_Y)
    }

    /// Current march interval, used to drive the march tempo sound
    pub fn move_interval(&self) -> f32 {
        self.tempo.move_interval
    }
}
