//! Latest-wins render scheduling.
//!
//! Slider changes arrive faster than renders finish. [`RenderScheduler`]
//! tracks the newest [`Adjustments`] with a monotonic sequence number,
//! hands out at most one render at a time and discards every result that
//! was overtaken by a newer submission.
//!
//! ```text
//!            submit                 start
//!   Idle ------------> Pending ------------> Computing
//!    ^                    ^                   |   |
//!    |                    |  finish (newer    |   | submit
//!    |                    |  vector waiting)  |   v
//!    |                    +-------------------+  (stays Computing,
//!    |      finish (latest)                   |   follow-up queued)
//!    +----------------------------------------+
//! ```
//!
//! The scheduler is a plain state machine: it never runs the engine and
//! never blocks. Debouncing is the caller's timer; history is not tracked.
//!
//! # Example
//!
//! ```rust
//! use spektra_ops::schedule::{Completion, RenderScheduler};
//! use spektra_ops::{Adjustments, Field};
//!
//! let mut sched = RenderScheduler::new();
//! sched.submit(Adjustments::identity().with(Field::Exposure, 10.0));
//! let job = sched.start().unwrap();
//!
//! // The user keeps dragging while the render runs.
//! sched.submit(Adjustments::identity().with(Field::Exposure, 20.0));
//!
//! assert_eq!(sched.finish(job.seq, "stale frame"), Completion::Superseded);
//! let next = sched.start().unwrap();
//! assert_eq!(next.adjustments.exposure, 20.0);
//! assert_eq!(sched.finish(next.seq, "fresh frame"), Completion::Accepted("fresh frame"));
//! ```

#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::Adjustments;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderState {
    /// Nothing to do.
    Idle,
    /// A vector is waiting to be rendered.
    Pending,
    /// A render is in flight.
    Computing,
}

/// A render handed out by [`RenderScheduler::start`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderJob {
    /// Sequence number of the submission being rendered.
    pub seq: u64,
    /// The vector to render.
    pub adjustments: Adjustments,
}

/// Outcome of [`RenderScheduler::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The result belongs to the newest submission and may be shown.
    Accepted(T),
    /// A newer submission exists; the result was dropped.
    Superseded,
}

impl<T> Completion<T> {
    /// Returns the accepted result, if any.
    pub fn accepted(self) -> Option<T> {
        match self {
            Completion::Accepted(v) => Some(v),
            Completion::Superseded => None,
        }
    }

    /// Returns `true` for [`Completion::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Completion::Accepted(_))
    }
}

/// Latest-wins render state machine.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    /// Last sequence number issued by `submit`.
    latest_seq: u64,
    /// Newest vector not yet handed to `start`.
    pending: Option<Adjustments>,
    /// Sequence number of the render in flight.
    in_flight: Option<u64>,
}

impl RenderScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    ///
    /// A render in flight takes precedence over a queued follow-up.
    pub fn state(&self) -> RenderState {
        if self.in_flight.is_some() {
            RenderState::Computing
        } else if self.pending.is_some() {
            RenderState::Pending
        } else {
            RenderState::Idle
        }
    }

    /// Sequence number of the newest submission (0 before the first).
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Returns `true` if a vector is queued behind (or instead of) a render.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records `adjustments` as the newest vector and returns its
    /// sequence number.
    ///
    /// An older queued vector is replaced, never merged.
    pub fn submit(&mut self, adjustments: Adjustments) -> u64 {
        self.latest_seq += 1;
        if self.pending.replace(adjustments).is_some() {
            trace!(seq = self.latest_seq, "coalesced pending submission");
        }
        debug!(seq = self.latest_seq, state = ?self.state(), "render submitted");
        self.latest_seq
    }

    /// Takes the newest queued vector for rendering.
    ///
    /// Returns `None` when nothing is queued or a render is already in
    /// flight; at most one job is outstanding at a time.
    pub fn start(&mut self) -> Option<RenderJob> {
        if self.in_flight.is_some() {
            return None;
        }
        let adjustments = self.pending.take()?;
        let seq = self.latest_seq;
        self.in_flight = Some(seq);
        debug!(seq, "render started");
        Some(RenderJob { seq, adjustments })
    }

    /// Reports a finished render.
    ///
    /// The result is [`Completion::Accepted`] only if `seq` is still the
    /// newest submission. Finishing a job that is not the one in flight
    /// (a stray or duplicate report) is always superseded and leaves the
    /// state unchanged.
    pub fn finish<T>(&mut self, seq: u64, result: T) -> Completion<T> {
        if self.in_flight != Some(seq) {
            debug!(seq, in_flight = ?self.in_flight, "ignoring unknown render");
            return Completion::Superseded;
        }
        self.in_flight = None;

        if seq == self.latest_seq {
            debug!(seq, "render accepted");
            Completion::Accepted(result)
        } else {
            debug!(seq, latest = self.latest_seq, "render superseded");
            Completion::Superseded
        }
    }

    /// Drops any queued vector and forgets the render in flight.
    ///
    /// Sequence numbers keep increasing, so a late `finish` for the
    /// abandoned render is superseded.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;

    fn exposure(v: f32) -> Adjustments {
        Adjustments::identity().with(Field::Exposure, v)
    }

    #[test]
    fn test_idle_start() {
        let mut sched = RenderScheduler::new();
        assert_eq!(sched.state(), RenderState::Idle);
        assert_eq!(sched.latest_seq(), 0);
        assert!(sched.start().is_none());
    }

    #[test]
    fn test_single_render_cycle() {
        let mut sched = RenderScheduler::new();
        let seq = sched.submit(exposure(5.0));
        assert_eq!(seq, 1);
        assert_eq!(sched.state(), RenderState::Pending);

        let job = sched.start().unwrap();
        assert_eq!(job.seq, 1);
        assert_eq!(job.adjustments, exposure(5.0));
        assert_eq!(sched.state(), RenderState::Computing);

        assert_eq!(sched.finish(job.seq, 42), Completion::Accepted(42));
        assert_eq!(sched.state(), RenderState::Idle);
    }

    #[test]
    fn test_pending_submissions_coalesce() {
        let mut sched = RenderScheduler::new();
        sched.submit(exposure(1.0));
        sched.submit(exposure(2.0));
        let last = sched.submit(exposure(3.0));

        let job = sched.start().unwrap();
        assert_eq!(job.seq, last);
        assert_eq!(job.adjustments.exposure, 3.0);
        assert!(sched.start().is_none());
    }

    #[test]
    fn test_submit_while_computing_supersedes() {
        let mut sched = RenderScheduler::new();
        sched.submit(exposure(1.0));
        let first = sched.start().unwrap();

        sched.submit(exposure(2.0));
        assert_eq!(sched.state(), RenderState::Computing);
        assert!(sched.has_pending());
        // Only one job in flight.
        assert!(sched.start().is_none());

        assert_eq!(sched.finish(first.seq, "old"), Completion::Superseded);
        assert_eq!(sched.state(), RenderState::Pending);

        let second = sched.start().unwrap();
        assert_eq!(second.adjustments.exposure, 2.0);
        assert!(sched.finish(second.seq, "new").is_accepted());
        assert_eq!(sched.state(), RenderState::Idle);
    }

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let mut sched = RenderScheduler::new();
        let mut prev = 0;
        for i in 0..10 {
            let seq = sched.submit(exposure(i as f32));
            assert!(seq > prev);
            prev = seq;
            if i % 3 == 0 {
                if let Some(job) = sched.start() {
                    sched.finish(job.seq, ());
                }
            }
        }
    }

    #[test]
    fn test_stray_finish_is_ignored() {
        let mut sched = RenderScheduler::new();
        sched.submit(exposure(1.0));
        let job = sched.start().unwrap();

        assert_eq!(sched.finish(job.seq + 7, 0), Completion::Superseded);
        assert_eq!(sched.state(), RenderState::Computing);
        assert_eq!(sched.finish(job.seq, 1).accepted(), Some(1));
        assert_eq!(sched.finish(job.seq, 2), Completion::Superseded);
    }

    #[test]
    fn test_cancel() {
        let mut sched = RenderScheduler::new();
        sched.submit(exposure(1.0));
        let job = sched.start().unwrap();
        sched.submit(exposure(2.0));
        sched.cancel();

        assert_eq!(sched.state(), RenderState::Idle);
        assert_eq!(sched.finish(job.seq, ()), Completion::Superseded);
        assert!(sched.start().is_none());
    }
}
