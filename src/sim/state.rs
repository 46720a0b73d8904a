//! Round state and core simulation types
//!
//! One `RoundState` per round; `GameSession::start_game` builds a fresh one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body;
use super::pool::{FloaterPool, FloaterStyle, ParticlePool};
use crate::consts::*;
use crate::settings::DeviceClass;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Countdown before the round, face parked
    Intro,
    /// "GO" banner held before the clock starts
    GoHold,
    /// Active play
    Play,
    /// Round over, waiting for a restart
    Ended,
}

/// Sound cues requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    Normal,
    Bonus,
    Countdown,
}

/// Side effects produced by a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Cue(CueKind),
    /// Clock hit zero; the round is frozen
    RoundOver,
}

/// The bouncing target
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    /// Velocity applied once play begins
    pub base_vel: Vec2,
    /// Seconds left showing the "hit" sprite
    pub hit_flash: f32,
    /// Seconds left on the scale pop
    pub scale_pop: f32,
}

impl Face {
    /// Place a parked face at random inside `viewport` and roll its base velocity
    pub fn spawn(viewport: Vec2, rng: &mut Pcg32) -> Self {
        let radius = viewport.x.min(viewport.y) * FACE_RADIUS_FRACTION;
        Self {
            pos: body::spawn_position(viewport, radius, rng),
            radius,
            vel: Vec2::ZERO,
            base_vel: body::roll_base_velocity(rng),
            hit_flash: 0.0,
            scale_pop: 0.0,
        }
    }

    /// Cosmetic timers count down toward zero
    pub fn decay_timers(&mut self, dt: f32) {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.scale_pop = (self.scale_pop - dt).max(0.0);
    }

    /// Point floaters spawn from, just above the face
    pub fn crown(&self, gap: f32) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.radius - gap)
    }
}

/// Complete per-round state
#[derive(Debug, Clone)]
pub struct RoundState {
    pub device: DeviceClass,
    /// Seed the round's RNG started from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,

    pub intro_left: f32,
    pub intro_total: f32,
    pub go_hold_left: f32,
    pub countdown_announced: bool,

    pub score: u64,
    pub time_left: f32,

    pub combo: u32,
    pub combo_timer: f32,
    pub fever: bool,
    pub fever_timer: f32,
    pub score_multiplier: u64,

    /// Camera shake, visual only
    pub shake: f32,
    /// Simulated seconds since the round was created
    pub elapsed: f32,
    /// Simulated time of the last successful hit
    pub last_hit_at: Option<f32>,

    pub face: Face,
    pub particles: ParticlePool,
    pub floaters: FloaterPool,

    /// Events raised since the session last drained them
    pub events: Vec<GameEvent>,
}

impl RoundState {
    /// Fresh round parked in the intro
    pub fn new(seed: u64, device: DeviceClass, viewport: Vec2, intro_seconds: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let face = Face::spawn(viewport, &mut rng);
        Self {
            device,
            seed,
            rng,
            phase: GamePhase::Intro,
            intro_left: intro_seconds,
            intro_total: intro_seconds,
            go_hold_left: 0.0,
            countdown_announced: false,
            score: 0,
            time_left: GAME_SECONDS,
            combo: 0,
            combo_timer: 0.0,
            fever: false,
            fever_timer: 0.0,
            score_multiplier: 1,
            shake: 0.0,
            elapsed: 0.0,
            last_hit_at: None,
            face,
            particles: ParticlePool::new(device.max_particles()),
            floaters: FloaterPool::new(device.max_floaters()),
            events: Vec::with_capacity(8),
        }
    }

    /// Raise shake to at least `level`
    pub fn bump_shake(&mut self, level: f32) {
        self.shake = self.shake.max(level);
    }

    /// Spawn a floater; dropped when the pool is full
    pub fn add_floater(&mut self, text: std::fmt::Arguments<'_>, at: Vec2, style: FloaterStyle) {
        if let Some(f) = self.floaters.spawn() {
            f.reset(text, at, style);
        }
    }

    /// Floater style with device defaults and the given size/weight
    pub fn floater_style(&self, size: f32, weight: u16) -> FloaterStyle {
        let (life, rise, wobble) = self.device.floater_defaults();
        FloaterStyle {
            size,
            life,
            rise,
            wobble,
            weight,
        }
    }

    pub fn start_fever(&mut self, seconds: f32) {
        self.fever = true;
        self.fever_timer = seconds;
        self.score_multiplier = FEVER_MULTIPLIER;
        self.events.push(GameEvent::Cue(CueKind::Bonus));

        let style = FloaterStyle {
            size: self.device.pick(34.0, 40.0),
            life: 1.0,
            rise: self.device.pick(60.0, 80.0),
            wobble: 16.0,
            weight: 1000,
        };
        let at = self.face.crown(12.0);
        self.add_floater(format_args!("FEVER x2!!"), at, style);
        self.bump_shake(self.device.shake().fever_start);
    }

    pub fn stop_fever(&mut self) {
        self.fever = false;
        self.fever_timer = 0.0;
        self.score_multiplier = 1;
    }

    /// Whether taps are accepted right now
    pub fn accepts_taps(&self) -> bool {
        self.phase == GamePhase::Play
    }
}
