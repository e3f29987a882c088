use crate::config::ServerConfig;
use crate::types::{Balance, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Concurrent transaction server over an in-memory account ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-server")]
#[command(
    about = "Concurrent transaction server over an in-memory account ledger",
    long_about = None
)]
pub struct CliArgs {
    /// Number of worker threads
    #[arg(value_name = "WORKERS", allow_negative_numbers = true)]
    pub workers: i64,

    /// Number of accounts, ids run from 1 to ACCOUNTS
    #[arg(value_name = "ACCOUNTS", allow_negative_numbers = true)]
    pub accounts: i64,

    /// Path of the output log
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Opening balance of every account not listed in --balances
    #[arg(
        long = "initial-balance",
        value_name = "AMOUNT",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub initial_balance: Balance,

    /// CSV file (account,balance) with per-account opening balances
    #[arg(long = "balances", value_name = "FILE")]
    pub balances: Option<PathBuf>,

    /// Locking strategy for account access
    #[arg(
        long = "locking",
        value_name = "STRATEGY",
        default_value = "fine",
        help = "Locking strategy: 'fine' for per-account locks or 'coarse' for one ledger lock"
    )]
    pub locking: LockingKind,

    /// Write final balances as CSV to this file after shutdown
    #[arg(long = "dump-balances", value_name = "FILE")]
    pub dump_balances: Option<PathBuf>,

    /// Do not print the "> " prompt before each input line
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,
}

/// Available locking strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LockingKind {
    Fine,
    Coarse,
}

impl CliArgs {
    /// Build a validated ServerConfig from the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the worker count, account count or opening
    /// balance is out of range.
    pub fn to_server_config(&self) -> Result<ServerConfig> {
        Ok(ServerConfig::new(self.workers, self.accounts, self.output.clone())?
            .with_initial_balance(self.initial_balance)?
            .with_seed_file(self.balances.clone())
            .with_locking(self.locking)
            .with_dump_file(self.dump_balances.clone())
            .with_prompt(!self.no_prompt))
    }
}
