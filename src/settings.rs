//! Device tuning and player preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::Deserialize;

/// Primary input device class
///
/// Touch screens get a bigger hitbox and lighter effects; precise pointers get the
/// full particle budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum DeviceClass {
    Touch,
    #[default]
    Pointer,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Touch => "Touch",
            DeviceClass::Pointer => "Pointer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "touch" | "mobile" | "coarse" => Some(DeviceClass::Touch),
            "pointer" | "desktop" | "fine" => Some(DeviceClass::Pointer),
            _ => None,
        }
    }

    /// Hit radius multiplier applied to the face radius
    pub fn hit_pad(&self) -> f32 {
        match self {
            DeviceClass::Touch => 1.45,
            DeviceClass::Pointer => 1.15,
        }
    }

    /// Particle pool capacity
    pub fn max_particles(&self) -> usize {
        match self {
            DeviceClass::Touch => 48,
            DeviceClass::Pointer => 180,
        }
    }

    /// Floater pool capacity
    pub fn max_floaters(&self) -> usize {
        match self {
            DeviceClass::Touch => 18,
            DeviceClass::Pointer => 60,
        }
    }

    /// Particles spawned for a burst of nominal size `n`
    pub fn burst_size(&self, n: usize, rapid: bool) -> usize {
        if rapid {
            return (n / 5).max(3);
        }
        match self {
            DeviceClass::Touch => (n * 3 / 10).max(4),
            DeviceClass::Pointer => n,
        }
    }

    /// Minimum seconds between any two sound cues (None = ungated)
    pub fn cue_min_gap(&self) -> Option<f32> {
        match self {
            DeviceClass::Touch => Some(0.080),
            DeviceClass::Pointer => None,
        }
    }

    /// Screen shake levels for this device
    pub fn shake(&self) -> ShakeLevels {
        match self {
            DeviceClass::Touch => ShakeLevels {
                go: 0.16,
                hit: 0.13,
                fever_hit: 0.16,
                bonus: 0.26,
                fever_start: 0.20,
            },
            DeviceClass::Pointer => ShakeLevels {
                go: 0.20,
                hit: 0.16,
                fever_hit: 0.20,
                bonus: 0.33,
                fever_start: 0.26,
            },
        }
    }

    /// Floater defaults: (life, rise, wobble)
    pub fn floater_defaults(&self) -> (f32, f32, f32) {
        match self {
            DeviceClass::Touch => (0.50, 90.0, 6.0),
            DeviceClass::Pointer => (0.70, 130.0, 10.0),
        }
    }

    /// Whether text gets a light outline stroke (skipped on touch for fill rate)
    pub fn text_stroke(&self) -> bool {
        *self == DeviceClass::Pointer
    }

    /// Base particle sprite radius
    pub fn particle_radius(&self) -> f32 {
        match self {
            DeviceClass::Touch => 7.0,
            DeviceClass::Pointer => 9.0,
        }
    }

    /// Pick the larger size on precise pointers
    pub fn pick(&self, touch: f32, pointer: f32) -> f32 {
        match self {
            DeviceClass::Touch => touch,
            DeviceClass::Pointer => pointer,
        }
    }
}

/// Shake magnitudes raised by gameplay moments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeLevels {
    pub go: f32,
    pub hit: f32,
    pub fever_hit: f32,
    pub bonus: f32,
    pub fever_start: f32,
}

/// Game settings/preferences
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Force a device class instead of detecting it
    pub device_override: Option<DeviceClass>,

    // === Visual Effects ===
    /// Camera shake on hits, bonus and fever
    pub screen_shake: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_override: None,

            screen_shake: true,
            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 0.9,
            music_volume: 0.25,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Device class to play with, given what the platform detected
    pub fn device(&self, detected: DeviceClass) -> DeviceClass {
        self.device_override.unwrap_or(detected)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective cue volume
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective background loop volume
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "facebop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
