use std::time::Duration;

use tracing::trace;

/// What the throttle decided for one redraw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Interval already elapsed: redraw now (leading edge).
    Immediate,
    /// Inside the interval: a trailing redraw is now scheduled for `due`.
    Deferred { due: Duration },
    /// A trailing redraw was already scheduled; this request merged into it.
    Coalesced { due: Duration },
}

impl ThrottleDecision {
    #[must_use]
    pub fn redraw_now(self) -> bool {
        matches!(self, Self::Immediate)
    }
}

/// Leading + trailing redraw coalescer.
///
/// At most one redraw per `interval`. A request inside the interval is never
/// dropped: it is deferred to fire exactly at interval expiry, and any further
/// requests before then merge into that single trailing redraw. Time is a
/// monotonic timestamp supplied by the host clock.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawThrottle {
    interval: Duration,
    last_redraw: Option<Duration>,
    pending_due: Option<Duration>,
    redraw_count: u64,
    coalesced_count: u64,
}

impl RedrawThrottle {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_redraw: None,
            pending_due: None,
            redraw_count: 0,
            coalesced_count: 0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn last_redraw(&self) -> Option<Duration> {
        self.last_redraw
    }

    /// Deadline of the scheduled trailing redraw, if any.
    #[must_use]
    pub fn pending_due(&self) -> Option<Duration> {
        self.pending_due
    }

    #[must_use]
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    #[must_use]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced_count
    }

    pub fn request(&mut self, now: Duration) -> ThrottleDecision {
        if let Some(due) = self.pending_due {
            self.coalesced_count += 1;
            trace!(?due, "redraw request coalesced");
            return ThrottleDecision::Coalesced { due };
        }

        match self.last_redraw {
            Some(last) if now.checked_sub(last).is_none_or(|elapsed| elapsed < self.interval) => {
                let due = last + self.interval;
                self.pending_due = Some(due);
                trace!(?due, "redraw request deferred");
                ThrottleDecision::Deferred { due }
            }
            _ => {
                self.record_redraw(now);
                ThrottleDecision::Immediate
            }
        }
    }

    /// Fires the trailing redraw once its deadline is reached.
    ///
    /// Returns the timestamp the redraw is accounted to (the deadline itself).
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let due = self.pending_due?;
        if now < due {
            return None;
        }
        self.pending_due = None;
        self.record_redraw(due);
        trace!(?due, "trailing redraw fired");
        Some(due)
    }

    /// Accounts an unthrottled redraw (data or theme change) to the clock.
    pub fn note_forced_redraw(&mut self, now: Duration) {
        self.pending_due = None;
        self.record_redraw(now);
    }

    pub fn cancel_pending(&mut self) {
        self.pending_due = None;
    }

    fn record_redraw(&mut self, at: Duration) {
        self.last_redraw = Some(at);
        self.redraw_count += 1;
    }
}

impl Default for RedrawThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
