//! Session driver
//!
//! Owns the game state and its collaborators (randomness, audio, high-score
//! storage) and runs the fixed-timestep loop: host frame deltas are clamped,
//! accumulated and consumed in `SIM_DT` ticks. After every tick the events the
//! simulation produced are forwarded to audio and storage.

use crate::audio::{AudioCue, AudioSink};
use crate::consts::*;
use crate::persistence::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, RandomSource, TickInput, tick};

pub struct Session<R, A, S> {
    pub state: GameState,
    rng: R,
    audio: A,
    store: S,
    accumulator: f32,
    /// Input carried into the next tick; one-shot flags stay set until a tick runs
    input: TickInput,
    march_tempo: Option<f32>,
}

impl<R: RandomSource, A: AudioSink, S: HighScoreStore> Session<R, A, S> {
    /// New session in the menu, high score loaded from `store`
    pub fn new(rng: R, audio: A, mut store: S) -> Self {
        let high_score = store.load_high_score();
        log::info!("Session ready (high score {high_score})");
        Self {
            state: GameState::new(high_score),
            rng,
            audio,
            store,
            accumulator: 0.0,
            input: TickInput::default(),
            march_tempo: None,
        }
    }

    /// Feed one host frame. Returns the number of ticks run.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        self.input.move_left = input.move_left;
        self.input.move_right = input.move_right;
        self.input.autopilot = input.autopilot;
        self.input.fire |= input.fire;
        self.input.toggle_pause |= input.toggle_pause;
        self.input.start_or_restart |= input.start_or_restart;

        // A bad host delta (NaN, infinite) counts as no time passing
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            self.step(&input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.fire = false;
            self.input.toggle_pause = false;
            self.input.start_or_restart = false;
        }

        self.audio.advance(dt);
        substeps
    }

    /// Run exactly one tick with `input`
    pub fn step(&mut self, input: &TickInput) {
        tick(&mut self.state, input, SIM_DT, &mut self.rng);
        for event in self.state.drain_events() {
            self.dispatch(event);
        }
        self.sync_march();
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::ShotFired => self.audio.play(AudioCue::Shoot),
            GameEvent::EnemyKilled { .. } => self.audio.play(AudioCue::EnemyExplosion),
            GameEvent::BonusAppeared => self.audio.play(AudioCue::BonusAppear),
            GameEvent::BonusHit { .. } => self.audio.play(AudioCue::BonusHit),
            GameEvent::CannonHit => self.audio.play(AudioCue::PlayerExplosion),
            GameEvent::ExtraLife => self.audio.play(AudioCue::ExtraLife),
            GameEvent::LevelComplete { .. } => self.audio.play(AudioCue::LevelComplete),
            GameEvent::HighScore { score } => self.store.save_high_score(score),
            GameEvent::GameOver { high_score, .. } => {
                self.audio.play(AudioCue::GameOver);
                self.store.save_high_score(high_score);
            }
            GameEvent::GameStarted
            | GameEvent::LifeLost { .. }
            | GameEvent::LevelStarted { .. }
            | GameEvent::Paused
            | GameEvent::Resumed => {}
        }
    }

    /// March plays only while a formation is on the move
    fn sync_march(&mut self) {
        let formation = &self.state.formation;
        let tempo = (self.state.phase == GamePhase::Playing && formation.present_count() > 0)
            .then(|| formation.move_interval());
        if tempo != self.march_tempo {
            self.march_tempo = tempo;
            self.audio.set_march_tempo(tempo);
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.audio.apply_settings(settings);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Current march interval forwarded to the audio sink
    pub fn march_tempo(&self) -> Option<f32> {
        self.march_tempo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::ScriptedRng;

    #[derive(Debug, Default)]
    struct RecordingAudio {
        cues: Vec<AudioCue>,
        tempos: Vec<Option<f32>>,
        advanced: f32,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.cues.push(cue);
        }

        fn set_march_tempo(&mut self, interval: Option<f32>) {
            self.tempos.push(interval);
        }

        fn advance(&mut self, dt: f32) {
            self.advanced += dt;
        }
    }

    type TestSession = Session<ScriptedRng, RecordingAudio, MemoryStore>;

    fn session(high_score: u32) -> TestSession {
        Session::new(
            ScriptedRng::new(),
            RecordingAudio::default(),
            MemoryStore::with_high_score(high_score),
        )
    }

    fn started(high_score: u32) -> TestSession {
        let mut s = session(high_score);
        s.step(&TickInput {
            start_or_restart: true,
            ..Default::default()
        });
        s
    }

    #[test]
    fn test_loads_high_score() {
        let s = session(2500);
        assert_eq!(s.state().high_score, 2500);
        assert_eq!(s.state().phase, GamePhase::Menu);
    }

    #[test]
    fn test_accumulator_and_substep_cap() {
        let mut s = session(0);
        assert_eq!(s.update(SIM_DT * 0.5, &TickInput::default()), 0);
        assert_eq!(s.update(SIM_DT * 0.6, &TickInput::default()), 1);
        // Long frames are clamped to MAX_FRAME_DT
        let steps = s.update(5.0, &TickInput::default());
        assert!(steps <= MAX_SUBSTEPS);
        assert!(steps >= 5);
        assert!((s.audio().advanced - (SIM_DT * 1.1 + MAX_FRAME_DT)).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let mut s = session(0);
        assert_eq!(s.update(f32::NAN, &TickInput::default()), 0);
        assert_eq!(s.update(f32::INFINITY, &TickInput::default()), 0);
        assert_eq!(s.update(f32::NEG_INFINITY, &TickInput::default()), 0);
        // The accumulator is still usable afterwards
        assert_eq!(s.update(SIM_DT, &TickInput::default()), 1);
        assert!(s.audio().advanced.is_finite());
    }

    #[test]
    fn test_one_shot_input_survives_short_frame() {
        let mut s = session(0);
        let start = TickInput {
            start_or_restart: true,
            ..Default::default()
        };
        assert_eq!(s.update(0.001, &start), 0);
        s.update(SIM_DT, &TickInput::default());
        assert_eq!(s.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_fire_applies_to_first_substep_only() {
        let mut s = started(0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let steps = s.update(MAX_FRAME_DT, &fire);
        assert!(steps > 1);
        assert_eq!(s.state().bonus.shot_count, 1);
        assert_eq!(
            s.audio().cues.iter().filter(|c| **c == AudioCue::Shoot).count(),
            1
        );
    }

    #[test]
    fn test_high_score_saved_on_increase() {
        let mut s = started(100);
        s.state.add_score(90);
        s.step(&TickInput::default());
        assert_eq!(s.store().writes, 0);

        s.state.add_score(20);
        s.step(&TickInput::default());
        assert_eq!(s.store().writes, 1);
        assert_eq!(s.store_mut().load_high_score(), 110);
    }

    #[test]
    fn test_game_over_saves_and_plays_cue() {
        let mut s = started(0);
        s.state.game_over();
        s.step(&TickInput::default());
        assert_eq!(s.store().writes, 1);
        assert_eq!(s.audio().cues.last(), Some(&AudioCue::GameOver));
        assert_eq!(s.march_tempo(), None);
    }

    #[test]
    fn test_march_follows_phase() {
        let mut s = started(0);
        assert_eq!(s.march_tempo(), Some(BASE_MOVE_INTERVAL));

        s.step(&TickInput {
            toggle_pause: true,
            ..Default::default()
        });
        assert_eq!(s.march_tempo(), None);
        s.step(&TickInput {
            toggle_pause: true,
            ..Default::default()
        });
        assert_eq!(s.march_tempo(), Some(BASE_MOVE_INTERVAL));
        assert_eq!(
            s.audio().tempos,
            vec![Some(BASE_MOVE_INTERVAL), None, Some(BASE_MOVE_INTERVAL)]
        );
    }

    #[test]
    fn test_enemy_kill_plays_explosion() {
        let mut s = started(0);
        let target = s.state.formation.enemies[0].bounds();
        s.state
            .projectiles
            .fire_player(glam::Vec2::new(target.center().x, target.bottom() + 4.0));
        s.step(&TickInput::default());
        assert!(s.audio().cues.contains(&AudioCue::EnemyExplosion));
        assert_eq!(s.state().score, 30);
        // Beating a zero high score persists it straight away
        assert_eq!(s.store().writes, 1);
    }
}
