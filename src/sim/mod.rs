//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Bounded effect pools, no per-tick allocation
//! - No rendering or platform dependencies

pub mod body;
pub mod clock;
pub mod hit;
pub mod pool;
pub mod state;
pub mod tick;

pub use clock::FixedClock;
pub use hit::{TapOutcome, resolve_tap};
pub use pool::{EffectPool, Floater, FloaterPool, FloaterStyle, Particle, ParticlePool};
pub use state::{CueKind, Face, GameEvent, GamePhase, RoundState};
pub use tick::{Countdown, TickInput, tick};
