//! Pixel Invaders - A fixed-formation arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation core (formation, projectiles, barriers, collisions, round state)
//! - `session`: Fixed-timestep driver wiring the core to its collaborators
//! - `audio`: Audio cue sinks (silent, logging, Web Audio)
//! - `persistence`: High-score storage backends
//! - `platform`: Logging bootstrap for native and browser builds
//! - `settings`: User preferences
//! - `web`: Browser entry point and `WebGame` bindings (wasm32)

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per host frame (covers MAX_FRAME_DT)
    pub const MAX_SUBSTEPS: u32 = 6;
    /// Largest delta a single step may consume, in seconds
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 672.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Player cannon
    pub const CANNON_WIDTH: f32 = 39.0;
    pub const CANNON_HEIGHT: f32 = 24.0;
    pub const CANNON_SPEED: f32 = 4.0;
    pub const CANNON_Y: f32 = 700.0;
    pub const CANNON_START_X: f32 = 336.0;
    pub const CANNON_MARGIN: f32 = 10.0;
    pub const CANNON_EXPLOSION_TIME: f32 = 1.0;
    pub const CANNON_RESPAWN_TIME: f32 = 2.0;

    /// Player shot
    pub const PLAYER_SHOT_SPEED: f32 = 10.0;
    pub const PLAYER_SHOT_WIDTH: f32 = 3.0;
    pub const PLAYER_SHOT_HEIGHT: f32 = 12.0;

    /// Enemy shots
    pub const MAX_ENEMY_SHOTS: usize = 3;
    pub const SQUIGGLE_PHASE_STEP: f32 = 0.3;
    pub const SQUIGGLE_AMPLITUDE: f32 = 3.0;

    /// Formation layout
    pub const FORMATION_ROWS: usize = 5;
    pub const FORMATION_COLUMNS: usize = 11;
    pub const FORMATION_START_X: f32 = 60.0;
    pub const FORMATION_START_Y: f32 = 150.0;
    pub const COLUMN_PITCH: f32 = 48.0;
    pub const ROW_PITCH: f32 = 42.0;
    pub const ENEMY_HEIGHT: f32 = 24.0;
    pub const ENEMY_EXPLOSION_TIME: f32 = 0.2;

    /// Formation movement
    pub const DESCENT_AMOUNT: f32 = 24.0;
    pub const BASE_SPEED: f32 = 0.5;
    pub const MAX_SPEED: f32 = 8.0;
    pub const STEP_SCALE: f32 = 10.0;
    pub const SIDE_MARGIN: f32 = 10.0;
    pub const BASE_MOVE_INTERVAL: f32 = 1.0;
    pub const MIN_MOVE_INTERVAL: f32 = 0.1;
    pub const BASE_SHOOT_INTERVAL: f32 = 1.0;
    pub const MIN_SHOOT_INTERVAL: f32 = 0.3;
    /// Any living enemy whose lower edge reaches this line ends the game
    pub const BARRIER_LINE_Y: f32 = 620.0;

    /// Bonus unit
    pub const BONUS_WIDTH: f32 = 48.0;
    pub const BONUS_HEIGHT: f32 = 21.0;
    pub const BONUS_SPEED: f32 = 2.0;
    pub const BONUS_Y: f32 = 90.0;
    pub const BONUS_MIN_DELAY: f32 = 15.0;
    pub const BONUS_MAX_DELAY: f32 = 30.0;
    pub const BONUS_EXPLOSION_TIME: f32 = 0.5;
    pub const BONUS_LABEL_TIME: f32 = 1.0;
    pub const BONUS_SCORES: [u32; 3] = [50, 100, 150];
    pub const BONUS_MAX_SCORE: u32 = 300;
    pub const BONUS_FIRST_MAX_SHOT: u32 = 23;
    pub const BONUS_MAX_SHOT_PERIOD: u32 = 15;

    /// Barriers
    pub const BARRIER_COUNT: usize = 4;
    pub const BARRIER_COLS: usize = 22;
    pub const BARRIER_ROWS: usize = 16;
    pub const BARRIER_CELL: f32 = 3.0;
    pub const BARRIER_Y: f32 = 620.0;
    pub const DAMAGE_RADIUS: i32 = 2;
    pub const DAMAGE_PROBABILITY: f32 = 0.7;

    /// Session
    pub const INITIAL_LIVES: u32 = 3;
    pub const EXTRA_LIFE_SCORE: u32 = 1500;
    pub const LEVEL_COMPLETE_DWELL: f32 = 2.0;
    pub const GAME_OVER_MIN_DWELL: f32 = 1.0;
}
