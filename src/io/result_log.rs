//! Output log of completed requests
//!
//! Workers append one line per finished request. Each append happens under a
//! process-wide mutex, so lines from different workers never interleave. Lines
//! appear in completion order, which is not submission order once more than one
//! worker is running.

use crate::types::{Completion, LedgerError, Result};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

struct LogState {
    writer: Box<dyn Write + Send>,
    lines: u64,
}

/// Shared, line-serialized result sink
pub struct ResultLog {
    state: Mutex<LogState>,
}

impl ResultLog {
    /// Create (or truncate) the log file at `path`
    ///
    /// # Errors
    ///
    /// An unopenable log file is a configuration error.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            LedgerError::invalid_config(format!(
                "cannot open log file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Log into an arbitrary writer
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            state: Mutex::new(LogState {
                writer: Box::new(writer),
                lines: 0,
            }),
        }
    }

    /// Append the log line for one completed request
    pub fn append(&self, completion: &Completion) -> Result<()> {
        let mut state = self.state.lock();
        writeln!(state.writer, "{}", completion)?;
        state.lines += 1;
        Ok(())
    }

    /// Number of lines appended so far
    pub fn lines_written(&self) -> u64 {
        self.state.lock().lines
    }

    /// Flush buffered lines and return the total written
    pub fn close(&self) -> Result<u64> {
        let mut state = self.state.lock();
        state.writer.flush()?;
        Ok(state.lines)
    }
}

impl std::fmt::Debug for ResultLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultLog")
            .field("lines", &self.lines_written())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, Timestamp};
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn completion(request: u64, outcome: Outcome) -> Completion {
        Completion {
            request,
            outcome,
            start: Timestamp::new(1, 5),
            end: Timestamp::new(1, 10),
        }
    }

    #[test]
    fn test_lines_are_written_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let log = ResultLog::create(&path).unwrap();
        log.append(&completion(1, Outcome::Applied)).unwrap();
        log.append(&completion(2, Outcome::InsufficientFunds(3))).unwrap();
        assert_eq!(log.close().unwrap(), 2);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1 OK TIME 1.000005 1.000010\n2 ISF 3 TIME 1.000005 1.000010\n"
        );
    }

    #[test]
    fn test_unopenable_path_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        assert!(matches!(
            ResultLog::create(&path),
            Err(LedgerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let log = Arc::new(ResultLog::create(&path).unwrap());

        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..250 {
                        log.append(&completion(worker * 1000 + i, Outcome::Balance(-12345)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        log.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1000);
        assert!(lines
            .iter()
            .all(|line| line.ends_with(" BAL -12345 TIME 1.000005 1.000010")));
    }
}
