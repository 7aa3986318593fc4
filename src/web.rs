//! Browser bindings
//!
//! `WebGame` wraps a session with Web Audio output and LocalStorage
//! persistence. The host page owns the frame loop and the drawing: it calls
//! `update` once per animation frame and reads the state back as JSON.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::persistence::LocalStorageStore;
use crate::platform;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{SimRng, TickInput};

#[wasm_bindgen(start)]
pub fn start() {
    platform::init_logging();
    log::info!("Pixel Invaders (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<SimRng, WebAudio, LocalStorageStore>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// New session in the menu. Without a seed one is drawn from the browser.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> WebGame {
        let rng = match seed {
            Some(seed) => SimRng::new(u64::from(seed)),
            None => SimRng::from_entropy(),
        };
        let store = LocalStorageStore::new();
        let settings = Settings::load(&store);
        let audio = WebAudio::new(&settings);
        Self {
            session: Session::new(rng, audio, store),
            settings,
        }
    }

    /// Feed one animation frame; returns the number of ticks run
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        move_left: bool,
        move_right: bool,
        fire: bool,
        toggle_pause: bool,
        start_or_restart: bool,
        autopilot: bool,
    ) -> u32 {
        let input = TickInput {
            move_left,
            move_right,
            fire,
            toggle_pause,
            start_or_restart,
            autopilot,
        };
        self.session.update(dt, &input)
    }

    /// Full game state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.state().phase)
    }

    pub fn score(&self) -> u32 {
        self.session.state().score
    }

    pub fn high_score(&self) -> u32 {
        self.session.state().high_score
    }

    pub fn lives(&self) -> u32 {
        self.session.state().lives
    }

    pub fn level(&self) -> u32 {
        self.session.state().level
    }

    /// Browsers keep audio suspended until a user gesture
    pub fn resume_audio(&self) {
        self.session.audio().resume();
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.store_settings();
        muted
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.set_master_volume(vol);
        self.store_settings();
    }

    pub fn set_march_enabled(&mut self, enabled: bool) {
        self.settings.march_enabled = enabled;
        self.store_settings();
    }
}

impl WebGame {
    fn store_settings(&mut self) {
        self.session.apply_settings(&self.settings);
        self.settings.save(self.session.store_mut());
    }
}
