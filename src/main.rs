//! Laser Lanes entry point
//!
//! The web build is driven from the page through `laser_lanes::web::WebMatch`.
//! Natively this runs a headless demo match with scripted typing.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Laser Lanes (native) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebMatch, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use laser_lanes::Settings;
    use laser_lanes::audio::SoundEffect;
    use laser_lanes::sim::{GameEvent, MatchDriver, WordBuffer};

    /// Frame length for the headless loop
    const FRAME_MS: u64 = 250;
    /// Give up on matches that never resolve
    const MAX_MATCH_MS: u64 = 10 * 60 * 1000;

    /// What the "player" has typed, keyed by time
    const SCRIPT: &[(u64, &str)] = &[
        (0, ""),
        (2_000, "t"),
        (2_400, "te"),
        (2_800, "tes"),
        (3_200, "test"),
        (9_000, "a"),
        (9_500, "ai"),
        (10_000, "aio"),
        (15_000, "brisk"),
        (21_000, "eau"),
        (27_000, "queue"),
        (40_000, ""),
    ];

    fn word_at(now_ms: u64) -> &'static str {
        SCRIPT
            .iter()
            .rev()
            .find(|(at, _)| *at <= now_ms)
            .map(|(_, word)| *word)
            .unwrap_or("")
    }

    fn load_settings() -> laser_lanes::Result<Settings> {
        match std::env::args().nth(1) {
            Some(path) => {
                let json = std::fs::read_to_string(&path).map_err(|e| {
                    laser_lanes::EngineError::InvalidSettings(format!("{}: {}", path, e))
                })?;
                log::info!("Loaded settings from {}", path);
                Settings::from_json(&json)
            }
            None => Ok(Settings::load()),
        }
    }

    fn log_event(event: &GameEvent) {
        match SoundEffect::for_event(event) {
            Some(effect) => log::info!("{:?} [{:?}]", event, effect),
            None => log::debug!("{:?}", event),
        }
    }

    pub fn run() -> laser_lanes::Result<()> {
        let settings = load_settings()?;
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let mut driver = MatchDriver::new(&settings, seed)?;
        log::info!("Game initialized with seed: {}", seed);

        let mut word = WordBuffer::default();
        let mut typed = "";
        while !driver.outcome().is_over() && driver.state().now_ms() < MAX_MATCH_MS {
            let next = word_at(driver.state().now_ms());
            if next != typed {
                word.set(next);
                typed = next;
            }
            driver.advance(FRAME_MS, &word);
            for event in driver.drain_events() {
                log_event(&event);
            }
        }

        // Let the last beams finish before tearing down
        while !driver.state().timers().is_empty() {
            driver.advance(FRAME_MS, &word);
            for event in driver.drain_events() {
                log_event(&event);
            }
        }
        driver.teardown();

        log::info!(
            "Finished after {} ticks: {:?}",
            driver.state().tick_count(),
            driver.outcome()
        );
        println!("{}", serde_json::to_string_pretty(&driver.snapshot())?);
        Ok(())
    }
}
