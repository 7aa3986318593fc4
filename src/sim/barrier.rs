//! Destructible barriers
//!
//! Each barrier is a small grid of solid/cleared cells anchored in the world.
//! Shots erode a ragged patch around the impact point, biased away from the
//! side the shot came from; enemy bodies marching through a barrier wipe out
//! every cell they cover. Cleared cells stay cleared until the field is reset
//! for a new round.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::rng::RandomSource;
use crate::consts::*;

/// Barrier outline: arch top with a notch cut into the bottom
const BARRIER_SHAPE: [&str; BARRIER_ROWS] = [
    "....##############....",
    "...################...",
    "..##################..",
    ".####################.",
    "######################",
    "######################",
    "######################",
    "######################",
    "######################",
    "######################",
    "######################",
    "######################",
    "#######........#######",
    "######..........######",
    "#####............#####",
    "#####............#####",
];

fn shape_mask() -> Vec<bool> {
    BARRIER_SHAPE
        .iter()
        .flat_map(|row| row.bytes().map(|b| b == b'#'))
        .collect()
}

/// Cell-space footprint of a world rectangle (may extend out of range)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Footprint {
    col: i32,
    row: i32,
    cols: i32,
    rows: i32,
}

/// A single destructible barrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    /// Top-left corner in world units
    pub pos: Vec2,
    /// Row-major, `true` = solid
    cells: Vec<bool>,
}

impl Barrier {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            cells: shape_mask(),
        }
    }

    /// Restore the full shape
    pub fn reset(&mut self) {
        self.cells = shape_mask();
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            BARRIER_COLS as f32 * BARRIER_CELL,
            BARRIER_ROWS as f32 * BARRIER_CELL,
        )
    }

    /// Whether a cell is solid; anything out of range is empty
    pub fn cell(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some_and(|i| self.cells[i])
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_fully_cleared(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= BARRIER_COLS as i32 || row >= BARRIER_ROWS as i32 {
            return None;
        }
        Some(row as usize * BARRIER_COLS + col as usize)
    }

    fn clear(&mut self, col: i32, row: i32) -> bool {
        match self.index(col, row) {
            Some(i) if self.cells[i] => {
                self.cells[i] = false;
                true
            }
            _ => false,
        }
    }

    fn footprint(&self, rect: &Rect) -> Footprint {
        Footprint {
            col: ((rect.x - self.pos.x) / BARRIER_CELL).floor() as i32,
            row: ((rect.y - self.pos.y) / BARRIER_CELL).floor() as i32,
            cols: (rect.width / BARRIER_CELL).ceil() as i32,
            rows: (rect.height / BARRIER_CELL).ceil() as i32,
        }
    }

    /// Test a shot against the solid cells it covers. A hit erodes the
    /// barrier around the shot's top-left cell before returning true.
    pub fn hit_test(&mut self, rect: &Rect, from_below: bool, rng: &mut dyn RandomSource) -> bool {
        let fp = self.footprint(rect);
        let hit = (fp.row..fp.row + fp.rows)
            .any(|row| (fp.col..fp.col + fp.cols).any(|col| self.cell(col, row)));
        if hit {
            self.apply_damage(fp.col, fp.row, from_below, rng);
        }
        hit
    }

    /// Erode a patch around (`col`, `row`). Shots from below eat upward into
    /// the barrier, shots from above eat downward. Each cell in the window
    /// goes with probability DAMAGE_PROBABILITY.
    pub fn apply_damage(&mut self, col: i32, row: i32, from_below: bool, rng: &mut dyn RandomSource) {
        let rows = if from_below {
            row - DAMAGE_RADIUS..=row
        } else {
            row..=row + DAMAGE_RADIUS
        };
        for r in rows {
            for c in col - DAMAGE_RADIUS..=col + DAMAGE_RADIUS {
                if self.index(c, r).is_none() {
                    continue;
                }
                if rng.uniform_float() < DAMAGE_PROBABILITY {
                    self.clear(c, r);
                }
            }
        }
    }

    /// Clear every solid cell under `rect`; true if anything was cleared
    pub fn apply_body_overlap(&mut self, rect: &Rect) -> bool {
        let fp = self.footprint(rect);
        let mut cleared = false;
        for row in fp.row..fp.row + fp.rows {
            for col in fp.col..fp.col + fp.cols {
                cleared |= self.clear(col, row);
            }
        }
        cleared
    }
}

/// The row of barriers shielding the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierField {
    pub barriers: Vec<Barrier>,
}

impl Default for BarrierField {
    fn default() -> Self {
        Self::new()
    }
}

impl BarrierField {
    pub fn new() -> Self {
        let mut field = Self {
            barriers: Vec::with_capacity(BARRIER_COUNT),
        };
        field.initialize();
        field
    }

    /// Lay out the barriers evenly across the field
    pub fn initialize(&mut self) {
        let width = BARRIER_COLS as f32 * BARRIER_CELL;
        let gap = (FIELD_WIDTH - BARRIER_COUNT as f32 * width) / (BARRIER_COUNT as f32 + 1.0);
        self.barriers = (0..BARRIER_COUNT)
            .map(|i| Barrier::new(Vec2::new(gap + i as f32 * (width + gap), BARRIER_Y)))
            .collect();
    }

    /// Restore every barrier to full strength
    pub fn reset(&mut self) {
        for barrier in &mut self.barriers {
            barrier.reset();
        }
    }

    /// Coarse box check, then the per-cell test. Stops at the first barrier hit.
    pub fn hit_test(&mut self, rect: &Rect, from_below: bool, rng: &mut dyn RandomSource) -> bool {
        self.barriers
            .iter_mut()
            .filter(|b| b.bounds().overlaps(rect))
            .any(|b| b.hit_test(rect, from_below, rng))
    }

    /// Body overlap against every barrier the rect touches
    pub fn apply_body_overlap(&mut self, rect: &Rect) -> bool {
        let mut cleared = false;
        for barrier in self.barriers.iter_mut().filter(|b| b.bounds().overlaps(rect)) {
            cleared |= barrier.apply_body_overlap(rect);
        }
        cleared
    }

    pub fn solid_count(&self) -> usize {
        self.barriers.iter().map(Barrier::solid_count).sum()
    }
}
