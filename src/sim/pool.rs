//! Fixed-capacity effect pools
//!
//! Every slot is allocated when the pool is built. Spawning claims a dead slot and
//! is silently dropped when none is free; aging flips the slot's liveness flag in
//! place, so a tick never allocates.

use std::fmt::Write as _;

use glam::Vec2;

use crate::consts::PARTICLE_DAMPING;

/// An effect entity that ages each tick
pub trait Effect: Default {
    /// Advance by `dt`. Returns false once expired.
    fn age(&mut self, dt: f32) -> bool;
}

/// Arena of pre-allocated effects with a liveness flag per slot
#[derive(Debug, Clone)]
pub struct EffectPool<T> {
    slots: Box<[T]>,
    alive: Box<[bool]>,
    live: usize,
}

impl<T: Effect> EffectPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
            alive: vec![false; capacity].into_boxed_slice(),
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_full(&self) -> bool {
        self.live >= self.slots.len()
    }

    /// Claim a dead slot for initialization, or None when every slot is live
    pub fn spawn(&mut self) -> Option<&mut T> {
        let idx = self.alive.iter().position(|a| !a)?;
        self.alive[idx] = true;
        self.live += 1;
        Some(&mut self.slots[idx])
    }

    /// Age every live entry, reaping the expired ones
    pub fn update(&mut self, dt: f32) {
        for (slot, alive) in self.slots.iter_mut().zip(self.alive.iter_mut()) {
            if *alive && !slot.age(dt) {
                *alive = false;
                self.live -= 1;
            }
        }
    }

    /// Kill everything (slots stay allocated)
    pub fn clear(&mut self) {
        self.alive.fill(false);
        self.live = 0;
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots
            .iter()
            .zip(self.alive.iter())
            .filter_map(|(slot, &alive)| alive.then_some(slot))
    }
}

/// A burst dot
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds since spawn
    pub t: f32,
    /// Total lifetime in seconds
    pub life: f32,
}

impl Particle {
    /// Remaining opacity, 1 at spawn down to 0 at expiry
    pub fn fade(&self) -> f32 {
        if self.life <= 0.0 {
            0.0
        } else {
            (1.0 - self.t / self.life).clamp(0.0, 1.0)
        }
    }
}

impl Effect for Particle {
    fn age(&mut self, dt: f32) -> bool {
        self.t += dt;
        if self.t >= self.life {
            return false;
        }
        self.pos += self.vel * dt;
        self.vel *= PARTICLE_DAMPING.powf(dt);
        true
    }
}

/// Text look for a floater
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloaterStyle {
    pub size: f32,
    pub life: f32,
    pub rise: f32,
    pub wobble: f32,
    pub weight: u16,
}

/// Rising score/status text
#[derive(Debug, Clone, Default)]
pub struct Floater {
    pub text: String,
    pub origin: Vec2,
    pub t: f32,
    pub life: f32,
    pub rise: f32,
    pub wobble: f32,
    pub size: f32,
    pub weight: u16,
}

impl Floater {
    /// Reinitialize this slot, reusing its text buffer
    pub fn reset(&mut self, text: std::fmt::Arguments<'_>, origin: Vec2, style: FloaterStyle) {
        self.text.clear();
        // Writing into a String cannot fail
        self.text.write_fmt(text).ok();
        self.origin = origin;
        self.t = 0.0;
        self.life = style.life;
        self.rise = style.rise;
        self.wobble = style.wobble;
        self.size = style.size;
        self.weight = style.weight;
    }

    /// Normalized age in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.life <= 0.0 {
            1.0
        } else {
            (self.t / self.life).clamp(0.0, 1.0)
        }
    }

    /// Eased draw position: cubic ease-out rise plus one sine wobble over the life
    pub fn draw_pos(&self) -> Vec2 {
        let p = self.progress();
        let ease = 1.0 - (1.0 - p).powi(3);
        Vec2::new(
            self.origin.x + (p * std::f32::consts::TAU).sin() * self.wobble,
            self.origin.y - self.rise * ease,
        )
    }
}

impl Effect for Floater {
    fn age(&mut self, dt: f32) -> bool {
        self.t += dt;
        self.t < self.life
    }
}

pub type ParticlePool = EffectPool<Particle>;
pub type FloaterPool = EffectPool<Floater>;
