//! Server configuration
//!
//! `ServerConfig` is the validated form of the command-line arguments. Every
//! range check that can fail before a request is processed happens here, so
//! configuration errors are reported before any thread starts.

use crate::cli::LockingKind;
use crate::types::{Balance, LedgerError, Result};
use std::path::PathBuf;

/// Validated startup parameters
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Number of worker threads (at least 1)
    pub workers: usize,
    /// Number of accounts (at least 1)
    pub accounts: usize,
    /// Result log path
    pub output: PathBuf,
    /// Opening balance of accounts without a seed row
    pub initial_balance: Balance,
    /// Optional `account,balance` seed table
    pub seed_file: Option<PathBuf>,
    pub locking: LockingKind,
    /// Optional path for the final balance table
    pub dump_file: Option<PathBuf>,
    /// Print `> ` before reading each line
    pub prompt: bool,
}

impl ServerConfig {
    /// Create a config with the required parameters and default options
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `workers` or `accounts` is not positive.
    pub fn new(workers: i64, accounts: i64, output: impl Into<PathBuf>) -> Result<Self> {
        let workers = positive(workers, "worker count")?;
        let accounts = positive(accounts, "account count")?;

        Ok(Self {
            workers,
            accounts,
            output: output.into(),
            initial_balance: 0,
            seed_file: None,
            locking: LockingKind::Fine,
            dump_file: None,
            prompt: true,
        })
    }

    /// Set the opening balance of every account
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a negative balance.
    pub fn with_initial_balance(mut self, balance: Balance) -> Result<Self> {
        if balance < 0 {
            return Err(LedgerError::invalid_config(format!(
                "initial balance must not be negative, got {}",
                balance
            )));
        }
        self.initial_balance = balance;
        Ok(self)
    }

    pub fn with_seed_file(mut self, path: Option<PathBuf>) -> Self {
        self.seed_file = path;
        self
    }

    pub fn with_locking(mut self, locking: LockingKind) -> Self {
        self.locking = locking;
        self
    }

    pub fn with_dump_file(mut self, path: Option<PathBuf>) -> Self {
        self.dump_file = path;
        self
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }
}

fn positive(value: i64, what: &str) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| {
            LedgerError::invalid_config(format!("{} must be at least 1, got {}", what, value))
        })
}
