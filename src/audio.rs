//! Audio system
//!
//! Cues are procedurally generated with the Web Audio API; the background loop is a
//! plain looping `<audio>` element. Touch devices share one global gate across all
//! cues so overlapping sounds don't stutter.

/// Global last-played gate shared by every cue
///
/// Times are simulated seconds, so the gate behaves the same at any frame rate.
#[derive(Debug, Clone, Default)]
pub struct CueThrottle {
    min_gap: Option<f32>,
    last_played: Option<f32>,
}

impl CueThrottle {
    pub fn new(min_gap: Option<f32>) -> Self {
        Self {
            min_gap,
            last_played: None,
        }
    }

    /// Whether a cue at `now` may play; records it if so
    pub fn allow(&mut self, now: f32) -> bool {
        if let (Some(gap), Some(last)) = (self.min_gap, self.last_played) {
            if now - last < gap {
                return false;
            }
        }
        self.last_played = Some(now);
        true
    }

    /// Forget the last cue (new round, clock restarted)
    pub fn reset(&mut self) {
        self.last_played = None;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use crate::platform::AudioSink;
    use crate::settings::Settings;
    use crate::sim::CueKind;

    const BGM_SRC: &str = "./assets/bgm.mp3";

    /// Web Audio cue synth plus the looping background track
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        bgm: Option<HtmlAudioElement>,
        sfx_volume: f32,
        music_volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - cues disabled");
            }
            let bgm = HtmlAudioElement::new_with_src(BGM_SRC).ok();
            if let Some(bgm) = &bgm {
                bgm.set_loop(true);
                bgm.set_preload("auto");
            } else {
                log::warn!("Failed to create background audio element");
            }
            Self {
                ctx,
                bgm,
                sfx_volume: settings.sfx_gain(),
                music_volume: settings.music_gain(),
            }
        }

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

        /// Plain hit - short bright pop
        fn play_normal(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(660.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(330.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Bonus / fever - rising arpeggio
        fn play_bonus(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [660.0, 880.0, 1100.0, 1320.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.18, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.22).ok();
                }
            }
        }

        /// "3, 2, 1, GO" - three beeps a second apart, then a higher one
        fn play_countdown(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [520.0, 520.0, 520.0, 1040.0].iter().enumerate() {
                let long = i == 3;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + i as f64;
                    let len = if long { 0.45 } else { 0.15 };
                    gain.gain().set_value_at_time(vol * 0.4, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + len)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + len + 0.05).ok();
                }
            }
        }
    }

    impl AudioSink for WebAudio {
        /// Resume audio context (required after user gesture)
        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn play_cue(&mut self, cue: CueKind) {
            let vol = self.sfx_volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                CueKind::Normal => self.play_normal(ctx, vol),
                CueKind::Bonus => self.play_bonus(ctx, vol),
                CueKind::Countdown => self.play_countdown(ctx, vol),
            }
        }

        fn start_background_loop(&mut self) {
            let Some(bgm) = &self.bgm else { return };
            if self.music_volume <= 0.0 {
                return;
            }
            bgm.set_volume(self.music_volume as f64);
            if !bgm.paused() {
                return;
            }
            // Autoplay rejections are fine, the next start retries
            if bgm.play().is_err() {
                log::warn!("Background loop refused to start");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungated_always_plays() {
        let mut throttle = CueThrottle::new(None);
        assert!(throttle.allow(0.0));
        assert!(throttle.allow(0.0));
        assert!(throttle.allow(0.01));
    }

    #[test]
    fn test_gate_blocks_within_gap() {
        let mut throttle = CueThrottle::new(Some(0.080));
        assert!(throttle.allow(1.0));
        assert!(!throttle.allow(1.05));
        assert!(!throttle.allow(1.079));
        assert!(throttle.allow(1.09));
    }

    #[test]
    fn test_dropped_cue_does_not_extend_gate() {
        let mut throttle = CueThrottle::new(Some(0.1));
        assert!(throttle.allow(0.0));
        assert!(!throttle.allow(0.05));
        assert!(throttle.allow(0.1));
    }

    #[test]
    fn test_reset() {
        let mut throttle = CueThrottle::new(Some(1.0));
        assert!(throttle.allow(5.0));
        throttle.reset();
        assert!(throttle.allow(0.0));
    }
}
