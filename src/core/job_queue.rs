//! Job queue shared by the dispatcher and the worker pool
//!
//! An unbounded FIFO guarded by one mutex and two condition variables:
//! - `work_available` wakes workers when a request is enqueued or the phase
//!   changes;
//! - `drained` wakes the main thread once the server reaches STOPPED.
//!
//! The queue also owns the [`ShutdownState`], so the idle-worker count and the
//! lifecycle phase only change under the same lock as the job list. There is
//! no polling thread: the dispatcher signals on enqueue, and the last worker to
//! go idle during a drain performs the STOPPED transition itself.

use crate::core::shutdown::{Phase, ShutdownState};
use crate::types::{LedgerError, Request, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug)]
struct QueueState {
    jobs: VecDeque<Request>,
    shutdown: ShutdownState,
}

/// FIFO of pending requests plus pool lifecycle state
#[derive(Debug)]
pub struct JobQueue {
    state: Mutex<QueueState>,
    work_available: Condvar,
    drained: Condvar,
}

impl JobQueue {
    /// Create an empty queue serving a pool of `workers` threads
    pub fn new(workers: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                shutdown: ShutdownState::new(workers),
            }),
            work_available: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Append a request and wake one waiting worker
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` once draining has begun.
    pub fn enqueue(&self, request: Request) -> Result<()> {
        let mut state = self.state.lock();
        if !state.shutdown.is_accepting() {
            return Err(LedgerError::QueueClosed {
                request: request.id,
            });
        }
        state.jobs.push_back(request);
        drop(state);

        self.work_available.notify_one();
        Ok(())
    }

    /// Block until a request is available and take it from the head
    ///
    /// The caller counts as idle while it waits. Returns `None` once the server
    /// has stopped, which tells the worker to exit.
    pub fn dequeue_blocking(&self) -> Option<Request> {
        let mut state = self.state.lock();
        state.shutdown.worker_idle();

        loop {
            if state.shutdown.is_stopped() {
                return None;
            }
            if let Some(request) = state.jobs.pop_front() {
                state.shutdown.worker_busy();
                return Some(request);
            }
            if state.shutdown.try_stop(true) {
                drop(state);
                self.drained.notify_all();
                self.work_available.notify_all();
                return None;
            }
            self.work_available.wait(&mut state);
        }
    }

    /// Stop accepting requests and let the pool drain
    pub fn begin_drain(&self) {
        let mut state = self.state.lock();
        state.shutdown.begin_drain();
        let empty = state.jobs.is_empty();
        let stopped = state.shutdown.try_stop(empty);
        drop(state);

        if stopped {
            self.drained.notify_all();
        }
        self.work_available.notify_all();
    }

    /// Block until the server reaches STOPPED
    ///
    /// # Errors
    ///
    /// Returns the failure that aborted the pool, if any.
    pub fn wait_stopped(&self) -> Result<()> {
        let mut state = self.state.lock();
        while !state.shutdown.is_stopped() {
            self.drained.wait(&mut state);
        }
        match state.shutdown.take_failure() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Stop at once because a worker hit a fatal error
    ///
    /// Queued requests are discarded.
    pub fn abort(&self, error: LedgerError) {
        let mut state = self.state.lock();
        state.shutdown.fail(error);
        state.jobs.clear();
        drop(state);

        self.drained.notify_all();
        self.work_available.notify_all();
    }

    pub fn size(&self) -> usize {
        self.state.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().jobs.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().shutdown.phase()
    }

    pub fn idle_workers(&self) -> usize {
        self.state.lock().shutdown.idle_workers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RequestKind, Timestamp};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn check(id: u64) -> Request {
        Request::new(
            id,
            RequestKind::BalanceCheck { account: 1 },
            Timestamp::new(0, 0),
        )
    }

    #[test]
    fn test_fifo_order() {
        let queue = JobQueue::new(1);
        queue.enqueue(check(1)).unwrap();
        queue.enqueue(check(2)).unwrap();
        queue.enqueue(check(3)).unwrap();

        assert_eq!(queue.size(), 3);
        let ids: Vec<u64> = (0..3)
            .map(|_| queue.dequeue_blocking().unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_enqueue_after_drain_is_refused() {
        let queue = JobQueue::new(1);
        queue.begin_drain();

        assert_eq!(
            queue.enqueue(check(4)),
            Err(LedgerError::QueueClosed { request: 4 })
        );
    }

    #[test]
    fn test_drain_with_no_workers_waiting_stays_draining() {
        let queue = JobQueue::new(2);
        queue.begin_drain();
        assert_eq!(queue.phase(), Phase::Draining);
    }

    #[test]
    fn test_waiting_worker_wakes_on_enqueue() {
        let queue = Arc::new(JobQueue::new(1));
        let (tx, rx) = mpsc::channel();

        let worker = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                tx.send(queue.dequeue_blocking().map(|r| r.id)).unwrap();
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        queue.enqueue(check(9)).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), Some(9));
        worker.join().unwrap();
        assert_eq!(queue.idle_workers(), 0);
    }

    #[test]
    fn test_drain_stops_after_last_worker_goes_idle() {
        let queue = Arc::new(JobQueue::new(2));
        for id in 1..=20 {
            queue.enqueue(check(id)).unwrap();
        }

        let workers: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut taken = Vec::new();
                    while let Some(request) = queue.dequeue_blocking() {
                        taken.push(request.id);
                    }
                    taken
                })
            })
            .collect();

        queue.begin_drain();
        queue.wait_stopped().unwrap();

        let mut all: Vec<u64> = workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (1..=20).collect::<Vec<_>>());
        assert_eq!(queue.phase(), Phase::Stopped);
    }

    #[test]
    fn test_abort_wakes_waiters_with_failure() {
        let queue = Arc::new(JobQueue::new(1));

        let worker = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue_blocking())
        };

        queue.abort(LedgerError::lock_not_held(2));

        assert_eq!(queue.wait_stopped(), Err(LedgerError::lock_not_held(2)));
        assert_eq!(worker.join().unwrap(), None);
    }
}
