//! Round controller
//!
//! Owns the current round, the fixed-step clock and the platform collaborators.
//! Input handlers call `queue_tap`, the animation loop calls `frame`, and the
//! start button calls `start_game`.

use std::fmt;

use glam::Vec2;

use crate::audio::CueThrottle;
use crate::consts::{INTRO_FIRST_SECONDS, INTRO_RETRY_SECONDS};
use crate::platform::{AudioSink, BestScoreStore, Viewport};
use crate::results::{self, ResultPack};
use crate::settings::{DeviceClass, Settings};
use crate::sim::{FixedClock, GameEvent, GamePhase, RoundState, TickInput, tick};

/// Outcome of a finished round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub score: u64,
    /// Best score after this round was counted
    pub best: u64,
    pub new_best: bool,
    pub result: Option<&'static ResultPack>,
    pub comment: &'static str,
}

impl RoundSummary {
    /// Overlay heading
    pub fn title(&self) -> &'static str {
        if self.new_best { "NEW BEST!" } else { "RESULT" }
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {} / Best: {}", self.score, self.best)
    }
}

/// One player's game: rounds, best score and the collaborators they talk to
pub struct GameSession {
    settings: Settings,
    device: DeviceClass,
    viewport: Box<dyn Viewport>,
    audio: Box<dyn AudioSink>,
    store: Box<dyn BestScoreStore>,

    round: Option<RoundState>,
    clock: FixedClock,
    pending_tap: Option<Vec2>,
    throttle: CueThrottle,

    has_started_once: bool,
    running: bool,
    best: u64,
    summary: Option<RoundSummary>,
}

impl GameSession {
    /// Build a session; the best score is read from `store` here and nowhere else
    pub fn new(
        settings: Settings,
        detected: DeviceClass,
        viewport: Box<dyn Viewport>,
        audio: Box<dyn AudioSink>,
        store: Box<dyn BestScoreStore>,
    ) -> Self {
        let device = settings.device(detected);
        let best = store.load();
        log::info!("Session ready: device {}, best {}", device.as_str(), best);
        Self {
            settings,
            device,
            viewport,
            audio,
            store,
            round: None,
            clock: FixedClock::default(),
            pending_tap: None,
            throttle: CueThrottle::new(device.cue_min_gap()),
            has_started_once: false,
            running: false,
            best,
            summary: None,
        }
    }

    /// Begin a new round in the intro countdown
    ///
    /// The first round of a session gets the long intro, retries the short one.
    pub fn start_game(&mut self, seed: u64) {
        self.audio.resume();
        self.audio.start_background_loop();

        let intro = if self.has_started_once {
            INTRO_RETRY_SECONDS
        } else {
            INTRO_FIRST_SECONDS
        };
        self.has_started_once = true;

        let mut state = RoundState::new(seed, self.device, self.viewport.size(), intro);
        let mut style = state.floater_style(self.device.pick(28.0, 34.0), 1000);
        style.life = 1.0;
        style.rise = 40.0;
        style.wobble = 6.0;
        let at = state.face.crown(10.0);
        state.add_floater(format_args!("GET READY..."), at, style);

        self.round = Some(state);
        self.clock.reset();
        self.throttle.reset();
        self.pending_tap = None;
        self.summary = None;
        self.running = true;

        log::info!("Round started (seed {}, intro {:.0}s)", seed, intro);
    }

    /// Buffer a tap in canvas space for the next tick
    ///
    /// Ignored unless a round is in play. Later taps replace earlier unconsumed ones.
    pub fn queue_tap(&mut self, pos: Vec2) {
        if !self.running {
            return;
        }
        if self.round.as_ref().is_some_and(RoundState::accepts_taps) {
            self.pending_tap = Some(pos);
        }
    }

    /// Advance by one animation frame; returns the number of fixed steps run
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        if !self.running {
            return 0;
        }
        let Some(state) = self.round.as_mut() else {
            return 0;
        };

        self.clock.begin_frame(now_ms);
        let viewport = self.viewport.size();
        let dt = self.clock.step();

        let mut steps = 0;
        let mut round_over = false;
        while self.clock.should_step() {
            let input = TickInput {
                tap: self.pending_tap.take(),
                viewport,
            };
            tick(state, &input, dt);
            steps += 1;

            round_over = dispatch_events(state, &mut self.throttle, &mut *self.audio);
            if round_over {
                break;
            }
        }

        if round_over {
            self.end_game();
        }
        steps
    }

    /// Freeze the round and settle the best score
    fn end_game(&mut self) {
        self.running = false;
        self.pending_tap = None;
        let Some(state) = self.round.as_mut() else {
            return;
        };

        let score = state.score;
        let new_best = score > self.best;
        if new_best {
            self.best = score;
            self.store.save(score);
            log::info!("New best score: {}", score);
        }

        let result = results::lookup(score);
        let comment = result.map_or("", |pack| pack.pick_comment(&mut state.rng));
        let summary = RoundSummary {
            score,
            best: self.best,
            new_best,
            result,
            comment,
        };
        log::info!("Round over. {}", summary);
        self.summary = Some(summary);
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.round.as_ref().map(|r| r.phase)
    }

    /// Summary of the last finished round
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn best_score(&self) -> u64 {
        self.best
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_started_once(&self) -> bool {
        self.has_started_once
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Forward this step's events; true once the round is over
fn dispatch_events(
    state: &mut RoundState,
    throttle: &mut CueThrottle,
    audio: &mut dyn AudioSink,
) -> bool {
    let now = state.elapsed;
    let mut round_over = false;
    for event in state.events.drain(..) {
        match event {
            GameEvent::Cue(cue) => {
                if throttle.allow(now) {
                    audio.play_cue(cue);
                }
            }
            GameEvent::RoundOver => round_over = true,
        }
    }
    round_over
}
