//! Fixed-timestep clock
//!
//! Animation frame timestamps go in, whole `SIM_DT` steps come out. The gap fed in
//! per frame is capped so a backgrounded tab cannot queue a burst of catch-up steps,
//! and a frame never runs more than `MAX_SUBSTEPS`.

use crate::consts::{MAX_FRAME_BACKLOG, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f32,
    max_backlog: f32,
    max_substeps: u32,
    accumulator: f32,
    last_time_ms: Option<f64>,
    steps_this_frame: u32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_FRAME_BACKLOG, MAX_SUBSTEPS)
    }
}

impl FixedClock {
    pub fn new(step: f32, max_backlog: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_backlog,
            max_substeps,
            accumulator: 0.0,
            last_time_ms: None,
            steps_this_frame: 0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Forget history; the next frame starts a fresh measurement
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
        self.steps_this_frame = 0;
    }

    /// Feed a frame timestamp (milliseconds, monotonic)
    ///
    /// The first frame after a reset only records the timestamp.
    pub fn begin_frame(&mut self, now_ms: f64) {
        let elapsed = match self.last_time_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).max(0.0),
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        self.accumulator = (self.accumulator + elapsed.min(self.max_backlog)).min(self.max_backlog);
        self.steps_this_frame = 0;
    }

    /// Consume one step if enough time has built up
    pub fn should_step(&mut self) -> bool {
        if self.steps_this_frame >= self.max_substeps || self.accumulator < self.step {
            return false;
        }
        self.accumulator -= self.step;
        self.steps_this_frame += 1;
        true
    }

    pub fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut FixedClock) -> u32 {
        let mut n = 0;
        while clock.should_step() {
            n += 1;
        }
        n
    }

    #[test]
    fn test_first_frame_runs_nothing() {
        let mut clock = FixedClock::default();
        clock.begin_frame(1000.0);
        assert_eq!(drain(&mut clock), 0);
    }

    #[test]
    fn test_refresh_rate_independent() {
        // One simulated second at 60 Hz and at 144 Hz yields the same 45 steps
        for hz in [60.0_f64, 144.0] {
            let mut clock = FixedClock::default();
            clock.begin_frame(0.0);
            let frames = hz as usize;
            let mut total = 0;
            for i in 1..=frames {
                clock.begin_frame(i as f64 * 1000.0 / hz);
                total += drain(&mut clock);
            }
            assert!((44..=45).contains(&total), "{hz} Hz ran {total} steps");
        }
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FixedClock::default();
        clock.begin_frame(0.0);
        clock.begin_frame(10_000.0);
        let steps = drain(&mut clock);
        // 250ms of backlog at 45 Hz
        assert_eq!(steps, 11);
        assert!(steps <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_substep_cap() {
        let mut clock = FixedClock::new(0.01, 1.0, 4);
        clock.begin_frame(0.0);
        clock.begin_frame(500.0);
        assert_eq!(drain(&mut clock), 4);
        assert_eq!(clock.steps_this_frame(), 4);
    }

    #[test]
    fn test_time_going_backwards_is_ignored() {
        let mut clock = FixedClock::default();
        clock.begin_frame(500.0);
        clock.begin_frame(100.0);
        assert_eq!(drain(&mut clock), 0);
    }

    #[test]
    fn test_reset_clears_backlog() {
        let mut clock = FixedClock::default();
        clock.begin_frame(0.0);
        clock.begin_frame(200.0);
        clock.reset();
        clock.begin_frame(5000.0);
        assert_eq!(drain(&mut clock), 0);
    }
}
