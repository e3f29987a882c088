//! Shutdown coordination state machine
//!
//! ```text
//! RUNNING --END--> DRAINING --queue empty && all workers idle--> STOPPED
//!    \                  \
//!     +---- worker failure ----+---------------------------------> STOPPED (failed)
//! ```
//!
//! `ShutdownState` holds no lock of its own. It lives inside the job queue's
//! mutex so that "queue is empty" and "every worker is idle" are observed in
//! the same critical section.

use crate::types::LedgerError;

/// Lifecycle phase of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting and executing requests
    Running,
    /// No new requests; queued and in-flight work still finishing
    Draining,
    /// All work finished (or the pool failed); safe to tear down
    Stopped,
}

/// Pool bookkeeping guarded by the job queue lock
#[derive(Debug)]
pub struct ShutdownState {
    phase: Phase,
    workers: usize,
    idle: usize,
    failure: Option<LedgerError>,
}

impl ShutdownState {
    pub fn new(workers: usize) -> Self {
        Self {
            phase: Phase::Running,
            workers,
            idle: 0,
            failure: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_accepting(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    pub fn idle_workers(&self) -> usize {
        self.idle
    }

    /// A worker is about to wait for work
    pub fn worker_idle(&mut self) {
        self.idle += 1;
    }

    /// A worker has taken a job
    pub fn worker_busy(&mut self) {
        self.idle = self.idle.saturating_sub(1);
    }

    /// Stop accepting requests
    pub fn begin_drain(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Draining;
        }
    }

    /// Move to STOPPED if draining, the queue is empty and nobody is working
    ///
    /// Returns `true` only on the call that performs the transition.
    pub fn try_stop(&mut self, queue_empty: bool) -> bool {
        if self.phase == Phase::Draining && queue_empty && self.idle == self.workers {
            self.phase = Phase::Stopped;
            true
        } else {
            false
        }
    }

    /// Stop immediately, remembering the first failure
    pub fn fail(&mut self, error: LedgerError) {
        self.failure.get_or_insert(error);
        self.phase = Phase::Stopped;
    }

    pub fn take_failure(&mut self) -> Option<LedgerError> {
        self.failure.take()
    }
}
