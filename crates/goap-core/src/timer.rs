/// A countdown that elapses after `interval` seconds of ticking.
///
/// `tick` reports `true` exactly once, on the tick that reaches zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownTimer {
    interval: f32,
    remaining: f32,
    running: bool,
}

impl CountdownTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: interval,
            running: false,
        }
    }

    /// Restart from the full interval. Has no effect while already running.
    pub fn start(&mut self) {
        if !self.running {
            self.remaining = self.interval;
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }

    pub fn tick(&mut self, dt_seconds: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= dt_seconds;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
