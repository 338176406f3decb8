//! Browser binding
//!
//! The page owns the text box and the canvas. It calls `advance` from its
//! frame loop with the elapsed time and renders the returned snapshot JSON.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, SoundEffect};
use crate::settings::Settings;
use crate::sim::{MatchDriver, WordBuffer};

#[wasm_bindgen]
pub struct WebMatch {
    driver: MatchDriver,
    word: WordBuffer,
    audio: AudioManager,
    settings: Settings,
}

fn new_seed(settings: &Settings) -> u64 {
    settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64)
}

#[wasm_bindgen]
impl WebMatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebMatch, JsValue> {
        console_error_panic_hook::set_once();
        // A second match on the same page finds the logger already installed
        let _ = console_log::init_with_level(log::Level::Info);

        let settings = Settings::load();
        let seed = new_seed(&settings);
        let driver =
            MatchDriver::new(&settings, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Laser Lanes started with seed: {}", seed);

        Ok(WebMatch {
            driver,
            word: WordBuffer::default(),
            audio: AudioManager::new(&settings),
            settings,
        })
    }

    /// Latest contents of the text box
    pub fn set_word(&mut self, word: &str) {
        self.word.set(word);
    }

    /// Advance by `elapsed_ms` and return the snapshot as JSON
    pub fn advance(&mut self, elapsed_ms: f64) -> Result<String, JsValue> {
        self.driver.advance(elapsed_ms.max(0.0) as u64, &self.word);
        for event in self.driver.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
        }
        serde_json::to_string(&self.driver.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.settings.save();
        self.audio.apply_settings(&self.settings);
    }

    pub fn restart(&mut self) {
        let seed = new_seed(&self.settings);
        self.driver.restart(seed);
        log::info!("Match restarted with seed: {}", seed);
    }

    pub fn teardown(&mut self) {
        self.driver.teardown();
    }
}
