//! Fixed-size pool of worker threads
//!
//! Each worker loops: wait on the job queue, execute the request through the
//! [`LedgerEngine`], stamp the end time, append the log line. Workers exit when
//! the queue reports STOPPED.
//!
//! A worker that hits a fatal error (invariant violation, log write failure)
//! aborts the queue, then exits. The rest of the pool wakes at once; the
//! dispatcher notices the stopped queue before its next read of input.
//! [`WorkerPool::join`] reports that failure.

use crate::core::engine::LedgerEngine;
use crate::core::job_queue::JobQueue;
use crate::core::traits::AccountStore;
use crate::io::ResultLog;
use crate::types::{Completion, LedgerError, Request, Result, Timestamp};
use log::{debug, error};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handles to the running worker threads
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Start `workers` threads consuming from `queue`
    ///
    /// # Errors
    ///
    /// If a thread cannot be spawned, the threads already started are stopped
    /// and joined, and a configuration error is returned.
    pub fn spawn<S>(
        workers: usize,
        queue: Arc<JobQueue>,
        engine: Arc<LedgerEngine<S>>,
        log: Arc<ResultLog>,
    ) -> Result<Self>
    where
        S: AccountStore + ?Sized + 'static,
    {
        let mut handles = Vec::with_capacity(workers);

        for index in 0..workers {
            let worker = Worker {
                index,
                queue: Arc::clone(&queue),
                engine: Arc::clone(&engine),
                log: Arc::clone(&log),
            };
            let spawned = thread::Builder::new()
                .name(format!("worker-{}", index))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    let error =
                        LedgerError::invalid_config(format!("cannot start worker {}: {}", index, e));
                    queue.abort(error.clone());
                    let _ = WorkerPool { handles }.join();
                    return Err(error);
                }
            }
        }

        Ok(Self { handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit
    ///
    /// # Returns
    ///
    /// The total number of requests completed by the pool.
    ///
    /// # Errors
    ///
    /// Returns `WorkerFailed` if a worker thread panicked.
    pub fn join(self) -> Result<u64> {
        let mut completed = 0;
        let mut failure = None;

        for (index, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(count) => completed += count,
                Err(_) => {
                    failure.get_or_insert(LedgerError::WorkerFailed {
                        worker: index,
                        message: "worker thread panicked".to_string(),
                    });
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(completed),
        }
    }
}

struct Worker<S: AccountStore + ?Sized> {
    index: usize,
    queue: Arc<JobQueue>,
    engine: Arc<LedgerEngine<S>>,
    log: Arc<ResultLog>,
}

impl<S: AccountStore + ?Sized> Worker<S> {
    fn run(self) -> u64 {
        let mut completed = 0;

        while let Some(request) = self.queue.dequeue_blocking() {
            if let Err(e) = self.process(request) {
                error!("worker {} stopping the server: {}", self.index, e);
                self.queue.abort(LedgerError::WorkerFailed {
                    worker: self.index,
                    message: e.to_string(),
                });
                break;
            }
            completed += 1;
        }

        debug!("worker {} exiting after {} requests", self.index, completed);
        completed
    }

    fn process(&self, request: Request) -> Result<()> {
        let outcome = self.engine.execute(&request.kind)?;
        let completion = Completion {
            request: request.id,
            outcome,
            start: request.start,
            end: Timestamp::now(),
        };
        debug!("worker {} finished: {}", self.index, completion);
        self.log.append(&completion)
    }
}
