// Copyright 2025 the Plinth Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leading-edge throttling with a single trailing pass.

use core::time::Duration;

/// Where a [`Throttle`] is in its cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottleState {
    /// No pass ran recently; the next request runs immediately.
    #[default]
    Idle,
    /// A pass ran; requests before `until` are deferred.
    CoolingDown {
        /// End of the current window.
        until: Duration,
    },
    /// At least one request was deferred; a trailing pass is due at `until`.
    Pending {
        /// When the trailing pass may run.
        until: Duration,
    },
}

/// Rate limiter for layout passes.
///
/// The first request runs immediately and opens a window. Requests inside the window are
/// coalesced; [`Throttle::poll`] reports exactly one trailing run once the window has elapsed,
/// so every burst is followed by a pass that sees its final state.
///
/// Time is supplied by the caller as a monotonic offset from any fixed origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    window: Duration,
    state: ThrottleState,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

impl Throttle {
    /// About one frame at 60 Hz.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(16);

    /// Creates an idle throttle. A zero window never defers.
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            state: ThrottleState::Idle,
        }
    }

    /// The minimum spacing between two passes.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The current state.
    pub fn state(&self) -> ThrottleState {
        self.state
    }

    /// When a deferred pass becomes due, if one is pending.
    pub fn deadline(&self) -> Option<Duration> {
        match self.state {
            ThrottleState::Pending { until } => Some(until),
            _ => None,
        }
    }

    /// Asks for a pass at `now`. Returns `true` if the caller should run it now.
    pub fn request(&mut self, now: Duration) -> bool {
        match self.state {
            ThrottleState::Idle => self.fire(now),
            ThrottleState::CoolingDown { until } | ThrottleState::Pending { until }
                if now >= until =>
            {
                self.fire(now)
            }
            ThrottleState::CoolingDown { until } | ThrottleState::Pending { until } => {
                tracing::trace!(?now, ?until, "throttle: deferring");
                self.state = ThrottleState::Pending { until };
                false
            }
        }
    }

    /// Advances time. Returns `true` if the trailing pass of a burst is due now.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.state {
            ThrottleState::Pending { until } if now >= until => self.fire(now),
            ThrottleState::CoolingDown { until } if now >= until => {
                tracing::trace!(?now, "throttle: idle");
                self.state = ThrottleState::Idle;
                false
            }
            _ => false,
        }
    }

    /// Drops any pending pass and returns to idle.
    pub fn reset(&mut self) {
        self.state = ThrottleState::Idle;
    }

    fn fire(&mut self, now: Duration) -> bool {
        let until = now.saturating_add(self.window);
        tracing::trace!(?now, ?until, "throttle: run");
        self.state = ThrottleState::CoolingDown { until };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_request_runs_immediately() {
        let mut t = Throttle::default();
        assert!(t.request(ms(0)));
        assert_eq!(t.state(), ThrottleState::CoolingDown { until: ms(16) });
        assert_eq!(t.deadline(), None);
    }

    #[test]
    fn burst_coalesces_into_one_trailing_run() {
        let mut t = Throttle::default();
        assert!(t.request(ms(0)));
        assert!(!t.request(ms(2)));
        assert!(!t.request(ms(5)));
        assert!(!t.request(ms(15)));
        assert_eq!(t.deadline(), Some(ms(16)));

        assert!(!t.poll(ms(10)));
        assert!(t.poll(ms(16)));
        // Exactly one trailing run.
        assert!(!t.poll(ms(17)));
        assert!(!t.poll(ms(31)));
        assert_eq!(t.state(), ThrottleState::CoolingDown { until: ms(32) });
        assert!(!t.poll(ms(40)));
        assert_eq!(t.state(), ThrottleState::Idle);
    }

    #[test]
    fn quiet_window_returns_to_idle_without_running() {
        let mut t = Throttle::new(ms(10));
        assert!(t.request(ms(0)));
        assert!(!t.poll(ms(10)));
        assert_eq!(t.state(), ThrottleState::Idle);
    }

    #[test]
    fn request_after_window_runs_on_leading_edge() {
        let mut t = Throttle::new(ms(10));
        assert!(t.request(ms(0)));
        assert!(!t.request(ms(4)));
        // The pending pass is overtaken by a request after the window.
        assert!(t.request(ms(12)));
        assert_eq!(t.state(), ThrottleState::CoolingDown { until: ms(22) });
        assert!(!t.poll(ms(12)));
    }

    #[test]
    fn zero_window_never_defers() {
        let mut t = Throttle::new(Duration::ZERO);
        for i in 0..5 {
            assert!(t.request(ms(i)));
            assert!(t.request(ms(i)));
        }
    }

    #[test]
    fn reset_drops_pending_pass() {
        let mut t = Throttle::default();
        t.request(ms(0));
        t.request(ms(1));
        t.reset();
        assert_eq!(t.state(), ThrottleState::Idle);
        assert!(!t.poll(ms(100)));
    }
}
