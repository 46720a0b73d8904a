//! Frame view model
//!
//! Everything the painter needs, computed from the round without touching the
//! platform. Effects are exposed as iterators over the live pool entries so
//! building a frame doesn't allocate.

use glam::Vec2;

use crate::consts::{GAME_SECONDS, SCALE_POP_SECONDS};
use crate::settings::{DeviceClass, Settings};
use crate::sim::{Countdown, Face, Floater, GamePhase, Particle, RoundState};

/// Intro overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownView {
    pub label: Countdown,
    /// Font scale for the digit
    pub pulse: f32,
}

impl CountdownView {
    pub const HEADING: &'static str = "GET READY";

    /// Big centre text, if any
    pub fn text(&self) -> Option<String> {
        match self.label {
            Countdown::Waiting => None,
            Countdown::Digit(n) => Some(n.to_string()),
            Countdown::Go => Some("GO!".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceView {
    pub center: Vec2,
    /// Radius including the scale pop
    pub radius: f32,
    /// Draw the "hit" sprite
    pub hit: bool,
}

impl FaceView {
    pub fn from_face(face: &Face) -> Self {
        let pop = if face.scale_pop > 0.0 {
            1.0 + 0.18 * (face.scale_pop / SCALE_POP_SECONDS)
        } else {
            1.0
        };
        Self {
            center: face.pos,
            radius: face.radius * pop,
            hit: face.hit_flash > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

impl ParticleView {
    pub fn new(p: &Particle, device: DeviceClass) -> Self {
        let alpha = p.fade();
        Self {
            pos: p.pos,
            radius: device.particle_radius() * alpha + 2.0,
            alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloaterView<'a> {
    pub text: &'a str,
    pub pos: Vec2,
    pub alpha: f32,
    pub size: f32,
    pub weight: u16,
}

impl<'a> FloaterView<'a> {
    pub fn new(f: &'a Floater) -> Self {
        Self {
            text: &f.text,
            pos: f.draw_pos(),
            alpha: 1.0 - f.progress(),
            size: f.size,
            weight: f.weight,
        }
    }
}

/// One frame's worth of drawing data
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    round: &'a RoundState,
    /// Camera offset applied to the playfield (not the HUD)
    pub shake_offset: Vec2,
    pub countdown: Option<CountdownView>,
    pub face: FaceView,
    /// Outline text (pointer devices only)
    pub stroke_text: bool,
}

impl<'a> FrameView<'a> {
    /// `shake_jitter` is a random point in [-1, 1]² supplied by the caller
    pub fn build(round: &'a RoundState, settings: &Settings, shake_jitter: Vec2) -> Self {
        let shake_offset = if settings.effective_screen_shake() && round.shake > 0.0 {
            let base = if round.fever { 12.0 } else { 9.0 };
            shake_jitter.clamp(Vec2::NEG_ONE, Vec2::ONE) * round.shake * base
        } else {
            Vec2::ZERO
        };

        let countdown = match round.phase {
            GamePhase::Intro | GamePhase::GoHold => {
                let p = if round.intro_total > 0.0 {
                    round.intro_left / round.intro_total
                } else {
                    0.0
                };
                Some(CountdownView {
                    label: Countdown::at(round.intro_left),
                    pulse: 1.0 + 0.08 * ((1.0 - p) * std::f32::consts::PI * 6.0).sin(),
                })
            }
            _ => None,
        };

        Self {
            round,
            shake_offset,
            countdown,
            face: FaceView::from_face(&round.face),
            stroke_text: round.device.text_stroke(),
        }
    }

    pub fn particles(&self) -> impl Iterator<Item = ParticleView> + '_ {
        let device = self.round.device;
        self.round
            .particles
            .iter()
            .map(move |p| ParticleView::new(p, device))
    }

    pub fn floaters(&self) -> impl Iterator<Item = FloaterView<'a>> + 'a {
        let round = self.round;
        round.floaters.iter().map(FloaterView::new)
    }

    pub fn score(&self) -> u64 {
        self.round.score
    }

    pub fn device(&self) -> DeviceClass {
        self.round.device
    }

    /// Clock readout, one decimal
    pub fn time_text(&self) -> String {
        let t = match self.round.phase {
            GamePhase::Intro | GamePhase::GoHold => GAME_SECONDS,
            GamePhase::Play | GamePhase::Ended => self.round.time_left,
        };
        format!("{:.1}", t.max(0.0))
    }

    /// "COMBO: n" once a streak is going
    pub fn combo_text(&self) -> Option<String> {
        (self.round.phase == GamePhase::Play && self.round.combo >= 2)
            .then(|| format!("COMBO: {}", self.round.combo))
    }

    pub fn fever_text(&self) -> Option<String> {
        (self.round.phase == GamePhase::Play && self.round.fever)
            .then(|| format!("FEVER x2  {:.1}s", self.round.fever_timer.max(0.0)))
    }
}
