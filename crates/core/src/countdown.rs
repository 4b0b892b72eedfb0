//! Whole-exam countdown.
//!
//! `SessionClock` holds the countdown state only. Something else supplies the
//! one-second cadence and calls [`SessionClock::tick`]; in tests that is a loop,
//! in a running session it is an interval timer.

/// One elapsed second as observed by the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Seconds left after this tick.
    pub remaining: u32,
    /// Set on the single tick that took the clock to zero.
    pub expired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Idle,
    Running,
    Stopped,
    Expired,
}

/// Countdown that reports expiry exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    remaining: u32,
    state: ClockState,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            remaining: 0,
            state: ClockState::Idle,
        }
    }

    /// Begins counting down from `total_seconds`.
    pub fn start(&mut self, total_seconds: u32) {
        self.remaining = total_seconds;
        self.state = ClockState::Running;
    }

    /// Halts the countdown. Safe to call repeatedly or on a clock that never started.
    ///
    /// Stopping an expired clock keeps it expired.
    pub fn stop(&mut self) {
        if self.state != ClockState::Expired {
            self.state = ClockState::Stopped;
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `None` when the clock is not running, so ticks delivered after
    /// `stop` or after expiry are dropped. The tick that reaches zero has
    /// `expired` set and leaves the clock stopped for good.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.state != ClockState::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        let expired = self.remaining == 0;
        if expired {
            self.state = ClockState::Expired;
        }

        Some(Tick {
            remaining: self.remaining,
            expired,
        })
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == ClockState::Expired
    }
}

/// Renders seconds as `MM:SS`; hours roll into the minutes field.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
