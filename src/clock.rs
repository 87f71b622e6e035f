//! Fixed-step simulation clock
//!
//! Absorbs variable host frame deltas and drains them in whole `SIM_DT`
//! increments, so the simulation runs at 60 Hz regardless of display refresh.

use crate::consts::{MAX_FRAME_DT, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame timestamp and any leftover time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Leftover time (seconds) not yet consumed by a step
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Frame delta in seconds for a host timestamp in milliseconds
    ///
    /// The first call after a reset yields zero. Deltas are clamped to
    /// `[0, MAX_FRAME_DT]` so a suspended tab does not trigger a burst of
    /// catch-up steps.
    pub fn frame_delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
    }

    /// Absorb a frame delta and run `step` once per whole tick
    ///
    /// While paused the time is still drained, but `step` is never called.
    /// Returns the number of steps executed.
    pub fn advance<F>(&mut self, frame_dt: f32, paused: bool, mut step: F) -> u32
    where
        F: FnMut(f32),
    {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            if !paused {
                step(SIM_DT);
                steps += 1;
            }
            self.accumulator -= SIM_DT;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_step_per_sixtieth() {
        let mut clock = SimClock::new();
        let mut total = 0;
        for _ in 0..10 {
            total += clock.advance(SIM_DT, false, |dt| assert_eq!(dt, SIM_DT));
        }
        assert!((9..=10).contains(&total));
    }

    #[test]
    fn test_high_refresh_rate_keeps_sim_rate() {
        let mut clock = SimClock::new();
        let mut steps = 0;
        for _ in 0..144 {
            steps += clock.advance(1.0 / 144.0, false, |_| {});
        }
        assert!((59..=60).contains(&steps));
        assert!(clock.accumulator() < SIM_DT);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = SimClock::new();
        assert_eq!(clock.frame_delta(1000.0), 0.0);
        let dt = clock.frame_delta(6000.0);
        assert_eq!(dt, MAX_FRAME_DT);
        let steps = clock.advance(dt, false, |_| {});
        assert!((5..=6).contains(&steps));
    }

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = SimClock::new();
        clock.frame_delta(500.0);
        assert_eq!(clock.frame_delta(400.0), 0.0);
    }

    #[test]
    fn test_paused_drains_without_stepping() {
        let mut clock = SimClock::new();
        let mut called = 0;
        for _ in 0..30 {
            let steps = clock.advance(0.05, true, |_| called += 1);
            assert_eq!(steps, 0);
        }
        assert_eq!(called, 0);
        // No backlog builds up while paused
        assert!(clock.accumulator() < SIM_DT);
        let steps = clock.advance(SIM_DT, false, |_| called += 1);
        assert!(steps <= 2);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut clock = SimClock::new();
        clock.frame_delta(10.0);
        clock.advance(0.01, false, |_| {});
        clock.reset();
        assert_eq!(clock.accumulator(), 0.0);
        assert_eq!(clock.frame_delta(99_999.0), 0.0);
    }
}
