//! Error types for the ledger server
//!
//! This module defines all error types that can occur while the server is
//! starting up, accepting input, or executing requests.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: invalid worker/account counts, unusable log or
//!   seed files, thread spawn failures. Fatal before any request is processed.
//! - **Input Errors**: a malformed command line. Recoverable, only that line is
//!   rejected (see [`InputError`]).
//! - **Invariant Violations**: an account touched without its lock, an unknown
//!   account reaching the lock registry. Fatal, they mean the locking protocol
//!   is broken.
//!
//! Insufficient funds is not an error: it is the `ISF` outcome
//! of a transfer (see [`crate::types::Outcome`]).

use crate::types::{AccountId, RequestId};
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Main error type for the ledger server
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A startup parameter is out of range
    ///
    /// This is a fatal error that prevents the server from starting.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the offending parameter
        message: String,
    },

    /// The account store could not be created
    ///
    /// This is a fatal error that prevents the server from starting.
    #[error("Failed to initialize {count} accounts: {message}")]
    StoreInit {
        /// Requested account count
        count: i64,
        /// Why initialization failed
        message: String,
    },

    /// I/O error occurred while reading input or writing the log
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The balance seed file could not be parsed
    #[error("Balance file error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    SeedError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A request was submitted after shutdown began
    #[error("Job queue is closed, request {request} was not accepted")]
    QueueClosed {
        /// The request that was refused
        request: RequestId,
    },

    /// An account outside `1..=count` reached the lock registry or store
    ///
    /// The dispatcher validates ids, so this is an invariant violation.
    #[error("Account {account} does not exist (ledger has {count} accounts)")]
    UnknownAccount {
        /// The offending account id
        account: AccountId,
        /// Number of accounts in the ledger
        count: usize,
    },

    /// An account was read or written without holding its lock
    ///
    /// Invariant violation: fatal.
    #[error("Account {account} accessed without holding its lock")]
    LockNotHeld {
        /// The account that was accessed
        account: AccountId,
    },

    /// A worker thread failed and the pool was aborted
    #[error("Worker {worker} failed: {message}")]
    WorkerFailed {
        /// Index of the failing worker
        worker: usize,
        /// Description of the failure
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::SeedError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId, count: usize) -> Self {
        LedgerError::UnknownAccount { account, count }
    }

    /// Create a LockNotHeld error
    pub fn lock_not_held(account: AccountId) -> Self {
        LedgerError::LockNotHeld { account }
    }

    /// Create a SeedError without position information
    pub fn seed(message: impl Into<String>) -> Self {
        LedgerError::SeedError {
            line: None,
            message: message.into(),
        }
    }

    /// Whether this error means the locking or queueing invariants are broken
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            LedgerError::UnknownAccount { .. }
                | LedgerError::LockNotHeld { .. }
        )
    }
}

/// Reason a single input line was rejected
///
/// Input errors are contained to the line that produced them; the dispatcher
/// prints the message and keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("An invalid request was entered. The following are allowed: CHECK, TRANS, END.")]
    UnknownCommand { command: String },

    #[error("{command} expects {expected}")]
    WrongArity {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{token}' is not a valid {field}")]
    InvalidNumber { token: String, field: &'static str },

    #[error("Account {account} does not exist, valid accounts are 1 to {count}")]
    AccountOutOfRange { account: i64, count: usize },

    /// The line is not valid UTF-8
    #[error("An invalid request was entered. The following are allowed: CHECK, TRANS, END.")]
    InvalidEncoding,
}
