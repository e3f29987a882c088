//! Core server components
//!
//! This module contains the concurrent machinery of the ledger server:
//! - `traits` - the account store abstraction
//! - `account_store` - fixed-size in-memory balance table
//! - `lock_registry` - one lock per account, ascending acquisition
//! - `locked_accounts` - store access gated on held locks
//! - `engine` - balance check and atomic transfer execution
//! - `job_queue` - FIFO of pending requests with wait/wake signalling
//! - `shutdown` - RUNNING / DRAINING / STOPPED state machine
//! - `worker_pool` - fixed pool of worker threads
//! - `dispatcher` - input parsing, id assignment and enqueueing

pub mod account_store;
pub mod dispatcher;
pub mod engine;
pub mod job_queue;
pub mod lock_registry;
pub mod locked_accounts;
pub mod shutdown;
pub mod traits;
pub mod worker_pool;

pub use account_store::InMemoryAccountStore;
pub use dispatcher::{Dispatcher, Submission};
pub use engine::LedgerEngine;
pub use job_queue::JobQueue;
pub use lock_registry::{Coverage, HeldLocks, LockRegistry};
pub use locked_accounts::LockedAccounts;
pub use shutdown::{Phase, ShutdownState};
pub use traits::AccountStore;
pub use worker_pool::WorkerPool;
