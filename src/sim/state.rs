//! Game state and round lifecycle
//!
//! Everything a host needs to draw a frame lives in `GameState`. The
//! lifecycle methods here only change state and record `GameEvent`s; the
//! session forwards those events to audio and storage.

use serde::{Deserialize, Serialize};

use super::barrier::BarrierField;
use super::bonus::BonusUnit;
use super::cannon::Cannon;
use super::formation::Formation;
use super::projectile::Projectiles;
use super::rng::RandomSource;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen; no timers advance
    Paused,
    /// Formation cleared, short pause before the next wave
    LevelComplete,
    /// Run ended; restart is accepted after a short dwell
    GameOver,
}

/// Things that happened during a tick, for audio and persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    ShotFired,
    EnemyKilled { row: usize, col: usize, points: u32 },
    BonusAppeared,
    BonusHit { points: u32 },
    CannonHit,
    LifeLost { lives_left: u32 },
    ExtraLife,
    /// The high score was just raised to `score`
    HighScore { score: u32 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    Paused,
    Resumed,
    GameOver { score: u32, high_score: u32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Seconds spent in the current phase (LevelComplete / GameOver dwell)
    pub phase_elapsed: f32,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    /// 1-based wave number
    pub level: u32,
    /// The high score was beaten during this game
    pub new_high_score: bool,
    pub extra_life_awarded: bool,
    /// Playing ticks since the game started
    pub time_ticks: u64,

    pub cannon: Cannon,
    pub formation: Formation,
    pub bonus: BonusUnit,
    pub barriers: BarrierField,
    pub projectiles: Projectiles,

    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// A fresh session sitting in the menu
    pub fn new(high_score: u32) -> Self {
        Self {
            phase: GamePhase::Menu,
            phase_elapsed: 0.0,
            score: 0,
            high_score,
            lives: INITIAL_LIVES,
            level: 1,
            new_high_score: false,
            extra_life_awarded: false,
            time_ticks: 0,
            cannon: Cannon::new(),
            formation: Formation::new(),
            bonus: BonusUnit::new(),
            barriers: BarrierField::new(),
            projectiles: Projectiles::new(),
            events: Vec::new(),
        }
    }

    /// Reset everything except the high score and start playing level 1
    pub fn start_game(&mut self, rng: &mut dyn RandomSource) {
        self.score = 0;
        self.lives = INITIAL_LIVES;
        self.level = 1;
        self.new_high_score = false;
        self.extra_life_awarded = false;
        self.time_ticks = 0;

        self.cannon.reset();
        self.formation.initialize();
        self.bonus.reset(rng);
        self.bonus.reset_shot_count();
        self.barriers.initialize();
        self.projectiles.reset();

        self.enter(GamePhase::Playing);
        self.events.push(GameEvent::GameStarted);
        log::info!("Game started (high score {})", self.high_score);
    }

    /// Advance to the next wave. Barriers are repaired, the bonus shot
    /// counter carries over.
    pub fn next_level(&mut self, rng: &mut dyn RandomSource) {
        self.level += 1;
        self.formation.initialize();
        self.barriers.reset();
        self.projectiles.reset();
        self.cannon.reset();
        self.bonus.reset(rng);

        self.enter(GamePhase::Playing);
        self.events.push(GameEvent::LevelStarted { level: self.level });
        log::info!("Level {} started", self.level);
    }

    pub fn complete_level(&mut self) {
        self.enter(GamePhase::LevelComplete);
        self.events.push(GameEvent::LevelComplete { level: self.level });
        log::info!("Level {} complete (score {})", self.level, self.score);
    }

    pub fn game_over(&mut self) {
        self.enter(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
        });
        log::info!(
            "Game over at level {} (score {}, high score {})",
            self.level,
            self.score,
            self.high_score
        );
    }

    /// Playing <-> Paused; ignored in other phases
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    /// Whether a start/restart request would be honoured now
    pub fn can_start(&self) -> bool {
        match self.phase {
            GamePhase::Menu => true,
            GamePhase::GameOver => self.phase_elapsed >= GAME_OVER_MIN_DWELL,
            _ => false,
        }
    }

    /// Add points, raising the high score the moment it is beaten
    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            self.events.push(GameEvent::HighScore { score: self.score });
        }
    }

    /// One extra life per game once the threshold is crossed
    pub fn check_extra_life(&mut self) {
        if !self.extra_life_awarded && self.score >= EXTRA_LIFE_SCORE {
            self.extra_life_awarded = true;
            self.lives += 1;
            self.events.push(GameEvent::ExtraLife);
            log::info!("Extra life awarded at {}", self.score);
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn enter(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;

    #[test]
    fn test_new_state_in_menu() {
        let state = GameState::new(1200);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.high_score, 1200);
        assert_eq!(state.lives, 3);
        assert!(state.can_start());
    }

    #[test]
    fn test_high_score_raised_immediately() {
        let mut state = GameState::new(25);
        state.add_score(20);
        assert!(!state.new_high_score);
        assert_eq!(state.high_score, 25);

        state.add_score(10);
        assert!(state.new_high_score);
        assert_eq!(state.high_score, 30);
        assert_eq!(state.drain_events(), vec![GameEvent::HighScore { score: 30 }]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_extra_life_once() {
        let mut state = GameState::new(0);
        state.add_score(1490);
        state.check_extra_life();
        assert_eq!(state.lives, 3);

        state.add_score(10);
        state.check_extra_life();
        assert_eq!(state.lives, 4);
        state.add_score(5000);
        state.check_extra_life();
        assert_eq!(state.lives, 4);
    }

    #[test]
    fn test_start_game_resets_run() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        state.score = 900;
        state.lives = 0;
        state.level = 4;
        state.bonus.shot_count = 12;
        state.formation.kill(0);

        state.start_game(&mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 0);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.bonus.shot_count, 0);
        assert_eq!(state.formation.alive_count(), 55);
        assert_eq!(state.events, vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_next_level_keeps_score_and_shot_count() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        state.start_game(&mut rng);
        state.add_score(300);
        state.bonus.shot_count = 7;
        state.complete_level();
        state.next_level(&mut rng);

        assert_eq!(state.level, 2);
        assert_eq!(state.score, 300);
        assert_eq!(state.bonus.shot_count, 7);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut state = GameState::new(0);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Menu);

        state.start_game(&mut ScriptedRng::new());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.can_start());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_state_serializes_without_events() {
        let mut state = GameState::new(0);
        state.events.push(GameEvent::ShotFired);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert!(back.events.is_empty());
        assert_eq!(back.formation.enemies.len(), 55);
    }
}
