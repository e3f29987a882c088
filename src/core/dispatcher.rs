//! Request dispatcher (submission path)
//!
//! The dispatcher is the only writer of request ids: it takes `&mut self`, so
//! ids are strictly increasing and gap-free no matter how many workers run.
//! Each accepted request is stamped, enqueued and acknowledged with
//! `< ID <n>` before any worker has looked at it.

use crate::core::job_queue::JobQueue;
use crate::core::shutdown::Phase;
use crate::io::{parse_command, Command};
use crate::types::{InputError, Request, RequestId, RequestKind, Result, Timestamp};
use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// What happened to one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Request queued under this id
    Accepted(RequestId),
    /// Line rejected, nothing queued
    Rejected(InputError),
    /// Blank line
    Ignored,
    /// `END` received, draining has begun
    Closed,
}

/// Parses input lines, assigns request ids and feeds the job queue
#[derive(Debug)]
pub struct Dispatcher {
    queue: Arc<JobQueue>,
    account_count: usize,
    next_id: RequestId,
    closed: bool,
}

impl Dispatcher {
    pub fn new(queue: Arc<JobQueue>, account_count: usize) -> Self {
        Self {
            queue,
            account_count,
            next_id: 1,
            closed: false,
        }
    }

    /// Number of requests accepted so far
    pub fn accepted(&self) -> u64 {
        self.next_id - 1
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle one input line
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` if a request arrives after `END`.
    pub fn submit_line(&mut self, line: &str) -> Result<Submission> {
        match parse_command(line, self.account_count) {
            Ok(None) => Ok(Submission::Ignored),
            Ok(Some(Command::End)) => {
                self.close();
                Ok(Submission::Closed)
            }
            Ok(Some(Command::Check { account })) => self
                .submit(RequestKind::BalanceCheck { account })
                .map(Submission::Accepted),
            Ok(Some(Command::Transfer { legs })) => self
                .submit(RequestKind::Transfer { legs })
                .map(Submission::Accepted),
            Err(e) => {
                warn!("rejected input {:?}: {}", line.trim(), e);
                Ok(Submission::Rejected(e))
            }
        }
    }

    /// Stamp, number and enqueue a request
    pub fn submit(&mut self, kind: RequestKind) -> Result<RequestId> {
        let id = self.next_id;
        self.queue
            .enqueue(Request::new(id, kind, Timestamp::now()))?;
        self.next_id += 1;
        debug!("queued request {}", id);
        Ok(id)
    }

    /// Stop accepting input and start draining
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            info!("input closed after {} requests, draining", self.accepted());
            self.queue.begin_drain();
        }
    }

    /// Read commands until `END` or end of input
    ///
    /// Writes the optional `> ` prompt before each read, then the `< ID` line
    /// or rejection message for each command, to `out`. End of input without
    /// `END` closes the dispatcher as if `END` had been sent. A line that is
    /// not valid UTF-8 is rejected like any other malformed line.
    ///
    /// If the pool has stopped on a fatal error, no further line is read.
    ///
    /// # Returns
    ///
    /// The number of accepted requests.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if reading `input` or writing `out` fails.
    pub fn serve<R: BufRead>(&mut self, mut input: R, out: &mut dyn Write, prompt: bool) -> Result<u64> {
        let mut buf = Vec::new();

        while !self.closed {
            if self.queue.phase() == Phase::Stopped {
                warn!("worker pool stopped, no longer reading input");
                break;
            }
            if prompt {
                write!(out, "> ")?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                warn!("end of input without END, shutting down");
                self.close();
                break;
            }

            let submission = match std::str::from_utf8(&buf) {
                Ok(line) => self.submit_line(line)?,
                Err(e) => {
                    warn!("rejected input that is not UTF-8: {}", e);
                    Submission::Rejected(InputError::InvalidEncoding)
                }
            };
            match submission {
                Submission::Accepted(id) => writeln!(out, "< ID {}", id)?,
                Submission::Rejected(e) => writeln!(out, "{}", e)?,
                Submission::Ignored | Submission::Closed => {}
            }
            out.flush()?;
        }

        Ok(self.accepted())
    }
}
