//! Platform abstraction layer
//!
//! The session talks to the outside world only through these traits:
//! - Viewport size (re-read every frame)
//! - Sound cues and the background loop (fire-and-forget)
//! - Best score storage
//!
//! Browser implementations live next to their concern (`audio::WebAudio`,
//! `persistence::LocalStorageBestScore`, `WebViewport` below); the headless ones here
//! back the native binary and the tests.

use glam::Vec2;

use crate::settings::DeviceClass;
use crate::sim::CueKind;

/// Canvas size provider
pub trait Viewport {
    /// Current drawable size in CSS pixels
    fn size(&self) -> Vec2;
}

/// Sound output; every call is fire-and-forget and must never fail the caller
pub trait AudioSink {
    /// Unlock/resume output (browsers need a user gesture first)
    fn resume(&mut self) {}
    fn play_cue(&mut self, cue: CueKind);
    fn start_background_loop(&mut self);
}

/// Durable best score
pub trait BestScoreStore {
    fn load(&self) -> u64;
    fn save(&mut self, best: u64);
}

/// Fixed-size viewport
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub Vec2);

impl Viewport for FixedViewport {
    fn size(&self) -> Vec2 {
        self.0
    }
}

/// Audio sink that drops everything
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_cue(&mut self, _cue: CueKind) {}
    fn start_background_loop(&mut self) {}
}

/// Audio sink that logs cues (native demo)
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u32,
}

impl AudioSink for LogAudio {
    fn play_cue(&mut self, cue: CueKind) {
        self.played += 1;
        log::debug!("cue {:?}", cue);
    }

    fn start_background_loop(&mut self) {
        log::debug!("background loop started");
    }
}

/// Best score held in memory only
#[derive(Debug, Default, Clone)]
pub struct MemoryBestScore(pub u64);

impl BestScoreStore for MemoryBestScore {
    fn load(&self) -> u64 {
        self.0
    }

    fn save(&mut self, best: u64) {
        self.0 = best;
    }
}

/// Browser window viewport (visual viewport when available, so iOS bars are excluded)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WebViewport;

#[cfg(target_arch = "wasm32")]
impl Viewport for WebViewport {
    fn size(&self) -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::ZERO;
        };
        if let Some(vv) = window.visual_viewport() {
            return Vec2::new(vv.width() as f32, vv.height() as f32);
        }
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }
}

/// Touch-primary devices report a coarse pointer
#[cfg(target_arch = "wasm32")]
pub fn detect_device() -> DeviceClass {
    let coarse = web_sys::window()
        .and_then(|w| w.match_media("(pointer: coarse)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false);
    if coarse {
        DeviceClass::Touch
    } else {
        DeviceClass::Pointer
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn detect_device() -> DeviceClass {
    DeviceClass::Pointer
}
