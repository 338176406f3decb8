//! Sound cues for engine events
//!
//! The engine only queues `GameEvent`s; this module decides which ones make a
//! sound. On the web, `AudioManager` plays them with procedurally generated
//! Web Audio tones - no external files needed!

use crate::sim::{GameEvent, Outcome, Target};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Weapon starts charging
    Charge,
    /// Beam fired with nothing in the way
    Fire,
    /// Beam stopped by a consonant
    Blocked,
    /// Two beams met head-on
    BeamClash,
    /// Combatant destroyed
    Explosion,
    /// Match won
    Victory,
    /// Match lost
    Defeat,
    /// Match tied
    Draw,
}

impl SoundEffect {
    /// Cue for an engine event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BeamCharged { .. } => Some(SoundEffect::Charge),
            GameEvent::BeamFired { target, .. } => Some(match target {
                Target::Consonant => SoundEffect::Blocked,
                Target::OtherBeam => SoundEffect::BeamClash,
                Target::OtherCombatant | Target::Empty => SoundEffect::Fire,
            }),
            GameEvent::CombatantDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::BeamReset { .. } | GameEvent::BeamRetired { .. } => None,
            GameEvent::MatchEnded { outcome } => match outcome {
                Outcome::Win => Some(SoundEffect::Victory),
                Outcome::Lose => Some(SoundEffect::Defeat),
                Outcome::Tie => Some(SoundEffect::Draw),
                Outcome::InProgress => None,
            },
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Charge => self.play_charge(ctx, vol),
                SoundEffect::Fire => self.play_fire(ctx, vol),
                SoundEffect::Blocked => self.play_blocked(ctx, vol),
                SoundEffect::BeamClash => self.play_clash(ctx, vol),
                SoundEffect::Explosion => self.play_explosion(ctx, vol),
                SoundEffect::Victory => self.play_sequence(ctx, vol, &[500.0, 600.0, 800.0, 1000.0], 0.1),
                SoundEffect::Defeat => self.play_sequence(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2),
                SoundEffect::Draw => self.play_sequence(ctx, vol, &[400.0, 400.0], 0.25),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Charge - slow rising hum
        fn play_charge(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(0.01, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.2, t + 0.4)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(480.0, t + 0.6)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.65).ok();
        }

        /// Fire - sharp falling zap
        fn play_fire(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(1800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Blocked - short dull thud
        fn play_blocked(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Clash - two detuned zaps
        fn play_clash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for freq in [900.0, 950.0] {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sawtooth) {
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start().ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }

        /// Explosion - noisy crackle over a bass thump
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.35, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.frequency().set_value_at_time(100.0, t).ok();
                osc.frequency().set_value_at_time(2500.0, t + 0.02).ok();
                osc.frequency().set_value_at_time(150.0, t + 0.05).ok();
                osc.frequency().set_value_at_time(1800.0, t + 0.08).ok();
                osc.frequency().set_value_at_time(60.0, t + 0.12).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.35).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.45).ok();
            }
        }

        /// Match end jingles
        fn play_sequence(&self, ctx: &AudioContext, vol: f32, freqs: &[f32], step: f64) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CombatantId, Side};

    #[test]
    fn test_fire_cues_follow_target() {
        let id = CombatantId::new(Side::Ally, 0);
        let cue = |target| SoundEffect::for_event(&GameEvent::BeamFired { id, target });
        assert_eq!(cue(Target::Consonant), Some(SoundEffect::Blocked));
        assert_eq!(cue(Target::OtherBeam), Some(SoundEffect::BeamClash));
        assert_eq!(cue(Target::OtherCombatant), Some(SoundEffect::Fire));
        assert_eq!(cue(Target::Empty), Some(SoundEffect::Fire));
    }

    #[test]
    fn test_silent_events() {
        let id = CombatantId::new(Side::Enemy, 2);
        assert_eq!(SoundEffect::for_event(&GameEvent::BeamReset { id }), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::BeamRetired { id }), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::MatchEnded {
                outcome: Outcome::Lose
            }),
            Some(SoundEffect::Defeat)
        );
    }
}
