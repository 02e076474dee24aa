/// Result of advancing the countdown by one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting, with the seconds left.
    Running(u32),
    /// Reached zero on this tick. Reported once.
    Expired,
    /// Already stopped; nothing happened.
    Idle,
}

/// A one-second countdown that fires `Expired` exactly once.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: true,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Remaining time as `m:ss`.
    pub fn format_clock(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
