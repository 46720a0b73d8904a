//! Fixed timestep simulation tick
//!
//! Advances one round by one step: intro countdown, GO hold, play, end.

use glam::Vec2;

use super::body;
use super::hit::{self, TapOutcome};
use super::state::{CueKind, GameEvent, GamePhase, RoundState};
use crate::consts::*;
use crate::expired;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Buffered tap in canvas space, consumed by this tick
    pub tap: Option<Vec2>,
    /// Current canvas size (re-read every frame, the window may resize)
    pub viewport: Vec2,
}

/// What the intro overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// "GET READY" only, no digit yet
    Waiting,
    Digit(u32),
    Go,
}

impl Countdown {
    /// Overlay for `intro_left` seconds remaining
    pub fn at(intro_left: f32) -> Self {
        if intro_left <= 0.0 {
            Countdown::Go
        } else if intro_left > COUNTDOWN_WAIT_ABOVE {
            Countdown::Waiting
        } else {
            Countdown::Digit((intro_left.ceil() as u32).min(COUNTDOWN_MAX_DIGIT))
        }
    }
}

/// Advance the round by one fixed timestep
///
/// Returns the tap outcome when a tap was consumed.
pub fn tick(state: &mut RoundState, input: &TickInput, dt: f32) -> Option<TapOutcome> {
    if state.phase == GamePhase::Ended {
        return None;
    }
    state.elapsed += dt;

    let mut outcome = None;
    match state.phase {
        GamePhase::Intro => tick_intro(state, dt),
        GamePhase::GoHold => tick_go_hold(state, dt),
        GamePhase::Play => {
            state.time_left -= dt;
            if expired(state.time_left, dt) {
                state.time_left = 0.0;
                state.phase = GamePhase::Ended;
                state.events.push(GameEvent::RoundOver);
                log::debug!("Clock out with score {}", state.score);
                return None;
            }

            // At most one tap per tick
            if let Some(tap) = input.tap {
                outcome = Some(hit::resolve_tap(state, tap, input.viewport));
            }

            body::integrate(&mut state.face, input.viewport, dt);
            let hit_this_tick = matches!(outcome, Some(TapOutcome::Hit { .. }));
            hit::decay_streaks(state, dt, hit_this_tick);
        }
        GamePhase::Ended => {}
    }

    // Effects age in every phase
    state.face.decay_timers(dt);
    state.shake = (state.shake - dt).max(0.0);
    state.particles.update(dt);
    state.floaters.update(dt);

    outcome
}

fn tick_intro(state: &mut RoundState, dt: f32) {
    state.intro_left = (state.intro_left - dt).max(0.0);

    if !state.countdown_announced && state.intro_left <= COUNTDOWN_CUE_AT {
        state.countdown_announced = true;
        state.events.push(GameEvent::Cue(CueKind::Countdown));
    }

    if expired(state.intro_left, dt) {
        state.intro_left = 0.0;
        state.phase = GamePhase::GoHold;
        state.go_hold_left = GO_HOLD_SECONDS;
        log::debug!("Intro done, holding GO");

        let mut style = state.floater_style(state.device.pick(46.0, 52.0), 1100);
        style.life = GO_HOLD_SECONDS;
        style.rise = 120.0;
        style.wobble = 12.0;
        let at = state.face.crown(10.0);
        state.add_floater(format_args!("GO!!"), at, style);
        state.bump_shake(state.device.shake().go);
    }
}

fn tick_go_hold(state: &mut RoundState, dt: f32) {
    state.go_hold_left = (state.go_hold_left - dt).max(0.0);
    if expired(state.go_hold_left, dt) {
        state.go_hold_left = 0.0;
        state.phase = GamePhase::Play;
        state.time_left = GAME_SECONDS;
        state.face.vel = state.face.base_vel;
        log::debug!("Play started, face velocity {:?}", state.face.vel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DeviceClass;
    use proptest::prelude::*;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn input() -> TickInput {
        TickInput {
            tap: None,
            viewport: VIEW,
        }
    }

    fn advance(state: &mut RoundState, seconds: f32) {
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            tick(state, &input(), SIM_DT);
        }
    }

    fn count_cues(state: &RoundState, kind: CueKind) -> usize {
        state
            .events
            .iter()
            .filter(|e| **e == GameEvent::Cue(kind))
            .count()
    }

    #[test]
    fn test_round_lifecycle() {
        let mut state = RoundState::new(12345, DeviceClass::Pointer, VIEW, INTRO_FIRST_SECONDS);
        let base = state.face.base_vel;
        let start = state.face.pos;

        advance(&mut state, 7.0);
        assert_eq!(state.phase, GamePhase::GoHold);
        assert_eq!(state.face.vel, Vec2::ZERO);
        assert_eq!(state.face.pos, start);

        advance(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.time_left, GAME_SECONDS);
        assert_eq!(state.face.vel, base);

        advance(&mut state, GAME_SECONDS);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.time_left, 0.0);
        assert_eq!(
            state.events.iter().filter(|e| **e == GameEvent::RoundOver).count(),
            1
        );
    }

    #[test]
    fn test_countdown_cue_fires_once() {
        let mut state = RoundState::new(1, DeviceClass::Pointer, VIEW, INTRO_FIRST_SECONDS);
        advance(&mut state, 3.9);
        assert_eq!(count_cues(&state, CueKind::Countdown), 0);
        advance(&mut state, 0.2);
        assert_eq!(count_cues(&state, CueKind::Countdown), 1);
        advance(&mut state, 3.0);
        assert_eq!(count_cues(&state, CueKind::Countdown), 1);
    }

    #[test]
    fn test_retry_intro_announces_immediately() {
        let mut state = RoundState::new(1, DeviceClass::Touch, VIEW, INTRO_RETRY_SECONDS);
        tick(&mut state, &input(), SIM_DT);
        assert_eq!(count_cues(&state, CueKind::Countdown), 1);
        advance(&mut state, 3.0);
        assert_eq!(state.phase, GamePhase::GoHold);
    }

    #[test]
    fn test_go_floater_and_shake() {
        let mut state = RoundState::new(1, DeviceClass::Pointer, VIEW, INTRO_RETRY_SECONDS);
        advance(&mut state, 3.0);
        assert_eq!(state.phase, GamePhase::GoHold);
        assert!(state.floaters.iter().any(|f| f.text == "GO!!"));
        assert!(state.shake > 0.0);
    }

    #[test]
    fn test_taps_ignored_outside_play() {
        let mut state = RoundState::new(1, DeviceClass::Pointer, VIEW, INTRO_RETRY_SECONDS);
        let tap = TickInput {
            tap: Some(state.face.pos),
            viewport: VIEW,
        };
        assert_eq!(tick(&mut state, &tap, SIM_DT), None);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_effects_age_during_intro() {
        let mut state = RoundState::new(1, DeviceClass::Pointer, VIEW, INTRO_FIRST_SECONDS);
        let style = state.floater_style(30.0, 900);
        state.add_floater(format_args!("GET READY..."), Vec2::new(1.0, 1.0), style);
        assert_eq!(state.floaters.len(), 1);
        advance(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::Intro);
        assert!(state.floaters.is_empty());
    }

    #[test]
    fn test_tap_consumed_in_play() {
        let mut state = RoundState::new(8, DeviceClass::Pointer, VIEW, INTRO_RETRY_SECONDS);
        advance(&mut state, 4.0);
        assert_eq!(state.phase, GamePhase::Play);

        let tap = TickInput {
            tap: Some(state.face.pos),
            viewport: VIEW,
        };
        let out = tick(&mut state, &tap, SIM_DT);
        assert!(matches!(out, Some(TapOutcome::Hit { .. })));
        assert_eq!(state.score, 1);

        let miss = TickInput {
            tap: Some(Vec2::new(-500.0, -500.0)),
            viewport: VIEW,
        };
        let before = state.time_left;
        assert_eq!(tick(&mut state, &miss, SIM_DT), Some(TapOutcome::Miss));
        assert!((before - SIM_DT - MISS_PENALTY - state.time_left).abs() < 1e-4);
    }

    /// Hit, idle `gap - 1` ticks, hit again; combo after the second hit
    fn combo_after_gap(gap: usize) -> u32 {
        let mut state = RoundState::new(21, DeviceClass::Pointer, VIEW, INTRO_RETRY_SECONDS);
        advance(&mut state, 4.0);
        assert_eq!(state.phase, GamePhase::Play);

        let tap = |state: &RoundState| TickInput {
            tap: Some(state.face.pos),
            viewport: VIEW,
        };
        let first = tap(&state);
        assert!(matches!(tick(&mut state, &first, SIM_DT), Some(TapOutcome::Hit { .. })));
        for _ in 1..gap {
            tick(&mut state, &input(), SIM_DT);
        }
        let second = tap(&state);
        assert!(matches!(tick(&mut state, &second, SIM_DT), Some(TapOutcome::Hit { .. })));
        state.combo
    }

    #[test]
    fn test_combo_window_edges() {
        // 45 ticks is exactly one combo window
        assert_eq!(combo_after_gap(44), 2);
        assert_eq!(combo_after_gap(45), 2);
        assert_eq!(combo_after_gap(46), 1);
    }

    #[test]
    fn test_ended_round_is_frozen() {
        let mut state = RoundState::new(8, DeviceClass::Pointer, VIEW, INTRO_RETRY_SECONDS);
        advance(&mut state, 4.0 + GAME_SECONDS);
        assert_eq!(state.phase, GamePhase::Ended);
        let face = state.face.clone();
        let elapsed = state.elapsed;
        advance(&mut state, 1.0);
        assert_eq!(state.face, face);
        assert_eq!(state.elapsed, elapsed);
    }

    #[test]
    fn test_countdown_display() {
        assert_eq!(Countdown::at(7.0), Countdown::Waiting);
        assert_eq!(Countdown::at(5.01), Countdown::Waiting);
        assert_eq!(Countdown::at(5.0), Countdown::Digit(5));
        assert_eq!(Countdown::at(3.0), Countdown::Digit(3));
        assert_eq!(Countdown::at(2.2), Countdown::Digit(3));
        assert_eq!(Countdown::at(0.01), Countdown::Digit(1));
        assert_eq!(Countdown::at(0.0), Countdown::Go);
    }

    #[test]
    fn test_face_stays_inside_viewport() {
        let mut state = RoundState::new(31, DeviceClass::Pointer, VIEW, INTRO_RETRY_SECONDS);
        advance(&mut state, 4.0);
        for _ in 0..2000 {
            tick(&mut state, &input(), SIM_DT);
            if state.phase != GamePhase::Play {
                break;
            }
            let r = state.face.radius;
            assert!(state.face.pos.x >= r && state.face.pos.x <= VIEW.x - r);
            assert!(state.face.pos.y >= BOUNCE_TOP_MARGIN + r && state.face.pos.y <= VIEW.y - r);
        }
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_clock_bounded(
            seed in any::<u64>(),
            taps in prop::collection::vec(prop::option::of((0.0f32..800.0, 0.0f32..600.0)), 0..400),
        ) {
            let mut state = RoundState::new(seed, DeviceClass::Touch, VIEW, INTRO_RETRY_SECONDS);
            advance(&mut state, 4.0);
            let mut last_score = state.score;
            for tap in taps {
                let input = TickInput {
                    tap: tap.map(|(x, y)| Vec2::new(x, y)),
                    viewport: VIEW,
                };
                let out = tick(&mut state, &input, SIM_DT);
                prop_assert!(state.score >= last_score);
                if out == Some(TapOutcome::Miss) {
                    prop_assert_eq!(state.score, last_score);
                }
                prop_assert!(state.time_left >= 0.0 && state.time_left <= GAME_SECONDS);
                prop_assert!(state.particles.len() <= state.particles.capacity());
                prop_assert!(state.floaters.len() <= state.floaters.capacity());
                last_score = state.score;
            }
        }
    }
}
