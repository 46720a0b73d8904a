//! Face Bop - tap the bouncing face before the clock runs out
//!
//! Core modules:
//! - `sim`: Deterministic simulation (phases, face physics, scoring, effect pools)
//! - `session`: Round controller tying the simulation to its collaborators
//! - `renderer`: Frame view model and the browser canvas painter
//! - `platform`: Viewport / audio / storage seams
//! - `persistence`: Durable best score
//! - `audio`: Cue throttle and the Web Audio backend
//! - `results`: Result screen bands
//! - `settings`: Device class tuning and player preferences

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod results;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{GameSession, RoundSummary};
pub use settings::{DeviceClass, Settings};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (45 Hz, independent of display refresh)
    pub const SIM_DT: f32 = 1.0 / 45.0;
    /// Largest wall-clock gap fed into the accumulator in one frame
    pub const MAX_FRAME_BACKLOG: f32 = 0.25;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 12;

    /// Round length
    pub const GAME_SECONDS: f32 = 30.0;
    pub const INTRO_FIRST_SECONDS: f32 = 7.0;
    pub const INTRO_RETRY_SECONDS: f32 = 3.0;
    pub const GO_HOLD_SECONDS: f32 = 1.0;
    /// Countdown cue fires once the intro drops to this
    pub const COUNTDOWN_CUE_AT: f32 = 3.0;
    /// Countdown digits stay hidden above this
    pub const COUNTDOWN_WAIT_ABOVE: f32 = 5.0;
    pub const COUNTDOWN_MAX_DIGIT: u32 = 5;

    /// Scoring
    pub const COMBO_WINDOW: f32 = 1.0;
    pub const COMBO_BONUS_AT: u32 = 5;
    pub const COMBO_BONUS_POINTS: u64 = 10;
    pub const FEVER_AT: u32 = 10;
    pub const FEVER_SECONDS: f32 = 3.0;
    pub const FEVER_MULTIPLIER: u64 = 2;
    /// Seconds taken off the clock by a whiff
    pub const MISS_PENALTY: f32 = 0.25;
    /// Hits closer together than this are "rapid" (cosmetic throttle only)
    pub const RAPID_HIT_SECONDS: f32 = 0.080;

    /// Face defaults
    pub const FACE_RADIUS_FRACTION: f32 = 0.10;
    /// Spawn keeps the face below the HUD strip
    pub const SPAWN_TOP_MARGIN: f32 = 90.0;
    /// The face bounces off this line instead of the canvas top
    pub const BOUNCE_TOP_MARGIN: f32 = 56.0;
    pub const BASE_VX_RANGE: (f32, f32) = (220.0, 340.0);
    pub const BASE_VY_RANGE: (f32, f32) = (180.0, 300.0);
    pub const SPEED_LIMIT_FRACTION: f32 = 0.85;
    pub const SPEED_LIMIT_MIN: f32 = 520.0;
    pub const SPEED_LIMIT_MAX: f32 = 900.0;
    pub const NUDGE_RAPID: (f32, f32) = (0.995, 1.02);
    pub const NUDGE_NORMAL: (f32, f32) = (0.97, 1.05);
    pub const HIT_FLASH_SECONDS: f32 = 0.18;
    pub const SCALE_POP_SECONDS: f32 = 0.20;

    /// Particle velocity keeps this fraction per second
    pub const PARTICLE_DAMPING: f32 = 0.06;
    /// Particles per hit before device/rapid scaling
    pub const HIT_BURST: usize = 24;
}

/// Whether a countdown timer has run out this step
///
/// Anything under half a step counts as zero, so a whole number of fixed steps
/// lands on the transition tick despite float drift.
#[inline]
pub fn expired(left: f32, dt: f32) -> bool {
    left <= dt * 0.5
}

/// Uniform draw in `[lo, hi)`, collapsing to `lo` when the range is empty
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Random sign, +1 or -1
#[inline]
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Unit vector at `angle` radians
#[inline]
pub fn unit_at(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_expired_half_step() {
        use consts::SIM_DT;
        assert!(expired(0.0, SIM_DT));
        assert!(expired(-0.3, SIM_DT));
        assert!(expired(SIM_DT * 0.4, SIM_DT));
        assert!(!expired(SIM_DT, SIM_DT));
    }

    #[test]
    fn test_uniform_empty_range_collapses() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(uniform(&mut rng, 5.0, 2.0), 5.0);
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 220.0, 340.0);
            assert!((220.0..340.0).contains(&v));
        }
    }
}
