//! Face physics
//!
//! Axis-aligned elastic bounces inside the viewport, with the top edge pushed down
//! to keep the face clear of the HUD. Speed is only clamped after a hit nudge, never
//! during free flight.

use glam::Vec2;
use rand::Rng;

use super::state::Face;
use crate::consts::*;
use crate::{random_sign, uniform};

/// Random center for a face of `radius`, below the spawn margin
pub fn spawn_position<R: Rng + ?Sized>(viewport: Vec2, radius: f32, rng: &mut R) -> Vec2 {
    Vec2::new(
        uniform(rng, radius, viewport.x - radius),
        uniform(rng, radius + SPAWN_TOP_MARGIN, viewport.y - radius),
    )
}

/// Per-axis random magnitude with a random sign
pub fn roll_base_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let vx = uniform(rng, BASE_VX_RANGE.0, BASE_VX_RANGE.1) * random_sign(rng);
    let vy = uniform(rng, BASE_VY_RANGE.0, BASE_VY_RANGE.1) * random_sign(rng);
    Vec2::new(vx, vy)
}

/// Per-axis velocity cap for the current viewport
pub fn speed_limit(viewport: Vec2) -> f32 {
    (viewport.x.min(viewport.y) * SPEED_LIMIT_FRACTION).clamp(SPEED_LIMIT_MIN, SPEED_LIMIT_MAX)
}

/// Integrate one step and bounce off the walls
pub fn integrate(face: &mut Face, viewport: Vec2, dt: f32) {
    face.pos += face.vel * dt;
    reflect(face, viewport);
}

/// Clamp the face inside the play area, flipping the velocity of each axis it crossed
///
/// Axes are handled independently; a corner hit flips both.
pub fn reflect(face: &mut Face, viewport: Vec2) {
    let r = face.radius;
    if face.pos.x - r < 0.0 {
        face.pos.x = r;
        face.vel.x = -face.vel.x;
    }
    if face.pos.x + r > viewport.x {
        face.pos.x = viewport.x - r;
        face.vel.x = -face.vel.x;
    }
    if face.pos.y - r < BOUNCE_TOP_MARGIN {
        face.pos.y = BOUNCE_TOP_MARGIN + r;
        face.vel.y = -face.vel.y;
    }
    if face.pos.y + r > viewport.y {
        face.pos.y = viewport.y - r;
        face.vel.y = -face.vel.y;
    }
}

/// Scale velocity after a hit, then clamp each axis to the speed limit
///
/// Rapid hits get a tighter range so tap spam cannot run the speed away.
pub fn nudge<R: Rng + ?Sized>(face: &mut Face, rapid: bool, viewport: Vec2, rng: &mut R) {
    let (lo, hi) = if rapid { NUDGE_RAPID } else { NUDGE_NORMAL };
    face.vel *= uniform(rng, lo, hi);
    let vmax = speed_limit(viewport);
    face.vel = face.vel.clamp(Vec2::splat(-vmax), Vec2::splat(vmax));
}

/// Whether `point` lands inside the padded hit circle
pub fn contains(face: &Face, point: Vec2, pad: f32) -> bool {
    let rr = face.radius * pad;
    face.pos.distance_squared(point) <= rr * rr
}
