//! Monotonic time sources

use std::time::Instant;

/// Monotonic time source in seconds
pub trait Clock {
    /// Current time in seconds. Never decreases between calls.
    fn now(&mut self) -> f64;
}

/// Wall-clock time measured from construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Simulated clock for headless runs: every read advances time by one step
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    time: f64,
    step: f64,
}

impl FixedStepClock {
    /// Clock starting at `start` that advances `step` seconds per read
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            time: start,
            step: step.max(0.0),
        }
    }

    /// Clock ticking at `fps` frames per second, starting at zero
    pub fn at_fps(fps: f32) -> Self {
        Self::new(0.0, 1.0 / f64::from(fps.max(1.0)))
    }

    /// Time the next read will return, without advancing
    pub fn peek(&self) -> f64 {
        self.time
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> f64 {
        let now = self.time;
        self.time += self.step;
        now
    }
}
