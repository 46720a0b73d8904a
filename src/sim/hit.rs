//! Tap resolution and scoring
//!
//! A tap either lands inside the padded face circle (hit: combo, score, bonus,
//! fever, effects, speed nudge) or whiffs (combo reset, time penalty).

use glam::Vec2;

use super::body;
use super::pool::{FloaterStyle, Particle};
use super::state::{CueKind, GameEvent, RoundState};
use crate::consts::*;
use crate::{expired, uniform, unit_at};

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Hit {
        /// Points added, bonus included
        gained: u64,
        /// Landed within the rapid window of the previous hit
        rapid: bool,
    },
    Miss,
}

/// Resolve one tap against the face
pub fn resolve_tap(state: &mut RoundState, tap: Vec2, viewport: Vec2) -> TapOutcome {
    if body::contains(&state.face, tap, state.device.hit_pad()) {
        register_hit(state, viewport)
    } else {
        register_miss(state);
        TapOutcome::Miss
    }
}

/// Classify against the previous hit and remember this one
fn classify_rapid(state: &mut RoundState) -> bool {
    let now = state.elapsed;
    let rapid = state
        .last_hit_at
        .is_some_and(|prev| now - prev < RAPID_HIT_SECONDS);
    state.last_hit_at = Some(now);
    rapid
}

fn register_hit(state: &mut RoundState, viewport: Vec2) -> TapOutcome {
    let rapid = classify_rapid(state);

    state.combo = if state.combo_timer > 0.0 {
        state.combo + 1
    } else {
        1
    };
    state.combo_timer = COMBO_WINDOW;

    let add = state.score_multiplier;
    state.score += add;
    let mut gained = add;

    // Rapid hits only show every other score floater
    if !rapid || state.combo % 2 == 0 {
        let style = FloaterStyle {
            size: if rapid {
                state.device.pick(22.0, 26.0)
            } else {
                state.device.pick(26.0, 30.0)
            },
            life: if rapid { 0.40 } else { 0.65 },
            rise: if rapid { 80.0 } else { 120.0 },
            wobble: if rapid { 6.0 } else { 10.0 },
            weight: 1000,
        };
        let at = state.face.pos - Vec2::new(0.0, state.face.radius * 0.15);
        state.add_floater(format_args!("+{add}"), at, style);
    }

    state.events.push(GameEvent::Cue(CueKind::Normal));

    if state.combo == COMBO_BONUS_AT {
        let bonus = COMBO_BONUS_POINTS * state.score_multiplier;
        state.score += bonus;
        gained += bonus;

        if !rapid {
            let style = FloaterStyle {
                size: state.device.pick(34.0, 44.0),
                life: 1.0,
                rise: 150.0,
                wobble: 18.0,
                weight: 1100,
            };
            let at = state.face.pos;
            state.add_floater(format_args!("+{bonus} BONUS!!"), at, style);
        }

        state.events.push(GameEvent::Cue(CueKind::Bonus));
        state.bump_shake(state.device.shake().bonus);
    }

    if state.combo == FEVER_AT && !state.fever {
        log::debug!("Fever on at score {}", state.score);
        state.start_fever(FEVER_SECONDS);
    }

    state.face.hit_flash = HIT_FLASH_SECONDS;
    state.face.scale_pop = SCALE_POP_SECONDS;

    let shake = state.device.shake();
    let base = if state.fever { shake.fever_hit } else { shake.hit };
    state.bump_shake(base + (state.combo as f32 * 0.010).min(0.20));

    let center = state.face.pos;
    spawn_burst(state, center, HIT_BURST, rapid);

    body::nudge(&mut state.face, rapid, viewport, &mut state.rng);

    TapOutcome::Hit { gained, rapid }
}

fn register_miss(state: &mut RoundState) {
    state.combo = 0;
    state.combo_timer = 0.0;
    state.time_left = (state.time_left - MISS_PENALTY).max(0.0);
}

/// Radial particle burst; skipped outright if the pool is already full
pub fn spawn_burst(state: &mut RoundState, at: Vec2, n: usize, rapid: bool) {
    if state.particles.is_full() {
        return;
    }
    let count = state.device.burst_size(n, rapid);
    for _ in 0..count {
        let angle = uniform(&mut state.rng, 0.0, std::f32::consts::TAU);
        let speed = if rapid {
            uniform(&mut state.rng, 120.0, 360.0)
        } else {
            uniform(&mut state.rng, 140.0, 620.0)
        };
        let life = if rapid {
            uniform(&mut state.rng, 0.12, 0.24)
        } else {
            uniform(&mut state.rng, 0.18, 0.42)
        };
        let Some(p) = state.particles.spawn() else {
            break;
        };
        *p = Particle {
            pos: at,
            vel: unit_at(angle) * speed,
            t: 0.0,
            life,
        };
    }
}

/// Per-tick combo and fever countdowns
///
/// The combo window starts counting on the tick after the hit that opened it,
/// so a hit exactly one window later still extends the streak.
pub fn decay_streaks(state: &mut RoundState, dt: f32, hit_this_tick: bool) {
    if state.combo_timer > 0.0 && !hit_this_tick {
        state.combo_timer = (state.combo_timer - dt).max(0.0);
        if expired(state.combo_timer, dt) {
            state.combo_timer = 0.0;
            state.combo = 0;
        }
    }

    if state.fever {
        state.fever_timer -= dt;
        if expired(state.fever_timer, dt) {
            log::debug!("Fever off");
            state.stop_fever();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DeviceClass;
    use crate::sim::state::GamePhase;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn playing(device: DeviceClass) -> RoundState {
        let mut state = RoundState::new(77, device, VIEW, 3.0);
        state.phase = GamePhase::Play;
        state.face.vel = state.face.base_vel;
        state
    }

    /// Hit, then let `gap` seconds of streak decay pass
    fn hit_then_wait(state: &mut RoundState, gap: f32) -> TapOutcome {
        let at = state.face.pos;
        let out = resolve_tap(state, at, VIEW);
        let hit = matches!(out, TapOutcome::Hit { .. });
        let steps = (gap / SIM_DT).round() as usize;
        for i in 0..steps {
            state.elapsed += SIM_DT;
            decay_streaks(state, SIM_DT, hit && i == 0);
        }
        out
    }

    #[test]
    fn test_first_hit_scores_one() {
        let mut state = playing(DeviceClass::Pointer);
        let at = state.face.pos;
        let out = resolve_tap(&mut state, at, VIEW);
        assert_eq!(
            out,
            TapOutcome::Hit {
                gained: 1,
                rapid: false
            }
        );
        assert_eq!(state.score, 1);
        assert_eq!(state.combo, 1);
        assert_eq!(state.combo_timer, COMBO_WINDOW);
        assert_eq!(state.face.hit_flash, HIT_FLASH_SECONDS);
        assert_eq!(state.events, vec![GameEvent::Cue(CueKind::Normal)]);
        assert_eq!(state.particles.len(), HIT_BURST);
        assert_eq!(state.floaters.len(), 1);
    }

    #[test]
    fn test_combo_extends_within_window() {
        let mut state = playing(DeviceClass::Pointer);
        hit_then_wait(&mut state, 0.9);
        hit_then_wait(&mut state, 0.0);
        assert_eq!(state.combo, 2);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut state = playing(DeviceClass::Pointer);
        hit_then_wait(&mut state, 0.5);
        hit_then_wait(&mut state, 1.2);
        assert_eq!(state.combo, 0);
        hit_then_wait(&mut state, 0.0);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_fever_decays_on_hit_tick() {
        let mut state = playing(DeviceClass::Pointer);
        state.start_fever(FEVER_SECONDS);
        state.combo_timer = COMBO_WINDOW;
        decay_streaks(&mut state, SIM_DT, true);
        assert_eq!(state.combo_timer, COMBO_WINDOW);
        assert!((state.fever_timer - (FEVER_SECONDS - SIM_DT)).abs() < 1e-6);
    }

    #[test]
    fn test_miss_penalty() {
        let mut state = playing(DeviceClass::Pointer);
        hit_then_wait(&mut state, 0.1);
        assert_eq!(state.time_left, 30.0);
        let out = resolve_tap(&mut state, Vec2::new(-1000.0, -1000.0), VIEW);
        assert_eq!(out, TapOutcome::Miss);
        assert_eq!(state.time_left, 29.75);
        assert_eq!(state.combo, 0);
        assert_eq!(state.combo_timer, 0.0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_miss_penalty_floors_at_zero() {
        let mut state = playing(DeviceClass::Pointer);
        state.time_left = 0.1;
        resolve_tap(&mut state, Vec2::new(-1000.0, 0.0), VIEW);
        assert_eq!(state.time_left, 0.0);
    }

    #[test]
    fn test_bonus_fires_once_per_streak() {
        let mut state = playing(DeviceClass::Pointer);
        let mut bonuses = 0;
        for _ in 0..8 {
            state.events.clear();
            hit_then_wait(&mut state, 0.3);
            bonuses += state
                .events
                .iter()
                .filter(|e| **e == GameEvent::Cue(CueKind::Bonus))
                .count();
        }
        assert_eq!(bonuses, 1);
        // 8 hits + 10 bonus
        assert_eq!(state.score, 18);

        // Break the streak and build it again
        hit_then_wait(&mut state, 1.5);
        assert_eq!(state.combo, 0);
        let before = state.score;
        for _ in 0..5 {
            hit_then_wait(&mut state, 0.3);
        }
        assert_eq!(state.score - before, 5 + 10);
    }

    #[test]
    fn test_fever_at_ten_doubles_score() {
        let mut state = playing(DeviceClass::Pointer);
        for _ in 0..10 {
            hit_then_wait(&mut state, 0.2);
        }
        // 10 hits + 10 bonus; fever started on the 10th hit but that hit scored x1
        assert_eq!(state.score, 20);
        assert!(state.fever);
        assert_eq!(state.score_multiplier, 2);

        hit_then_wait(&mut state, 0.0);
        assert_eq!(state.score, 22);
    }

    #[test]
    fn test_fever_not_restarted_while_active() {
        let mut state = playing(DeviceClass::Pointer);
        state.start_fever(FEVER_SECONDS);
        state.fever_timer = 0.5;
        state.combo = 9;
        state.combo_timer = 0.5;
        let at = state.face.pos;
        resolve_tap(&mut state, at, VIEW);
        assert_eq!(state.combo, 10);
        assert!(state.fever_timer < 0.6);
    }

    #[test]
    fn test_fever_ends_on_time() {
        let mut state = playing(DeviceClass::Pointer);
        state.start_fever(FEVER_SECONDS);
        let steps = (FEVER_SECONDS / SIM_DT).round() as usize;
        for _ in 0..steps - 1 {
            decay_streaks(&mut state, SIM_DT, false);
        }
        assert!(state.fever);
        decay_streaks(&mut state, SIM_DT, false);
        assert!(!state.fever);
        assert_eq!(state.score_multiplier, 1);
    }

    #[test]
    fn test_rapid_hits_are_classified() {
        let mut state = playing(DeviceClass::Pointer);
        let at = state.face.pos;
        resolve_tap(&mut state, at, VIEW);
        state.elapsed += SIM_DT;
        let at = state.face.pos;
        let out = resolve_tap(&mut state, at, VIEW);
        assert_eq!(
            out,
            TapOutcome::Hit {
                gained: 1,
                rapid: true
            }
        );
        state.elapsed += 0.5;
        let at = state.face.pos;
        assert_eq!(
            resolve_tap(&mut state, at, VIEW),
            TapOutcome::Hit {
                gained: 1,
                rapid: false
            }
        );
    }

    #[test]
    fn test_touch_pad_is_larger() {
        let mut state = playing(DeviceClass::Touch);
        let at = state.face.pos + Vec2::new(state.face.radius * 1.4, 0.0);
        assert!(matches!(resolve_tap(&mut state, at, VIEW), TapOutcome::Hit { .. }));

        let mut state = playing(DeviceClass::Pointer);
        let at = state.face.pos + Vec2::new(state.face.radius * 1.4, 0.0);
        assert_eq!(resolve_tap(&mut state, at, VIEW), TapOutcome::Miss);
    }

    #[test]
    fn test_burst_skipped_when_pool_full() {
        let mut state = playing(DeviceClass::Touch);
        while let Some(p) = state.particles.spawn() {
            p.life = 10.0;
        }
        let at = state.face.pos;
        spawn_burst(&mut state, at, HIT_BURST, false);
        assert_eq!(state.particles.len(), state.particles.capacity());
    }

    #[test]
    fn test_burst_fills_up_to_capacity() {
        let mut state = playing(DeviceClass::Touch);
        for _ in 0..45 {
            state.particles.spawn().unwrap().life = 10.0;
        }
        let at = state.face.pos;
        spawn_burst(&mut state, at, HIT_BURST, false);
        assert_eq!(state.particles.len(), 48);
    }
}
