//! Concurrent Ledger Server Library
//! # Overview
//!
//! This library implements a transaction server over a fixed-size, in-memory
//! ledger of account balances. Clients submit balance checks and multi-account
//! transfers as text lines; each accepted request gets an id, is queued, and
//! is executed by a fixed pool of worker threads. Every completion is appended
//! to a result log as one line.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Request, Outcome, errors)
//! - [`cli`] - CLI argument parsing
//! - [`config`] - Validated startup parameters
//! - [`core`] - Concurrent machinery:
//!   - [`core::account_store`] - Balance table
//!   - [`core::lock_registry`] - Per-account locks, acquired in ascending order
//!   - [`core::engine`] - Balance checks and all-or-nothing transfers
//!   - [`core::job_queue`] - Pending requests and the shutdown state machine
//!   - [`core::worker_pool`] - Worker threads
//!   - [`core::dispatcher`] - Id assignment and enqueueing
//! - [`strategy`] - Fine-grained and coarse locking
//! - [`io`] - Command parsing, result log and balance tables
//! - [`server`] - Startup, serving and teardown
//!
//! # Commands
//!
//! - **CHECK** `<account>`: report the balance of one account
//! - **TRANS** `<account> <amount> ...`: apply signed amounts atomically,
//!   or none of them if any account would go negative
//! - **END**: stop accepting requests, drain the queue and shut down
//!
//! # Log Format
//!
//! ```text
//! 1 OK TIME 1700000000.000100 1700000000.000450
//! 2 BAL 70 TIME 1700000000.000120 1700000000.000300
//! 3 ISF 3 TIME 1700000000.000130 1700000000.000310
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod server;
pub mod strategy;
pub mod types;

pub use config::ServerConfig;
pub use crate::core::{AccountStore, Dispatcher, InMemoryAccountStore, JobQueue, LedgerEngine, WorkerPool};
pub use io::ResultLog;
pub use server::{run, ServerReport};
pub use types::{Account, AccountId, Balance, InputError, LedgerError, Outcome, RequestId};
