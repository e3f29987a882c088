//! Server orchestration
//!
//! Wires the components together for one run of the server:
//!
//! ```text
//! input lines -> Dispatcher -> JobQueue -> WorkerPool -> LedgerEngine -> AccountStore
//!                    |                          |
//!                 "< ID n"                  ResultLog
//! ```
//!
//! Startup builds the store, log, locking strategy and pool; any failure there
//! is fatal and no request is processed. After `END` (or end of input) the
//! main thread waits for the queue to report STOPPED, joins the workers, then
//! tears down the store and closes the log.

use crate::config::ServerConfig;
use crate::core::{AccountStore, Dispatcher, InMemoryAccountStore, JobQueue, LedgerEngine, WorkerPool};
use crate::io::{dump_balances, read_balances, ResultLog};
use crate::strategy::create_strategy;
use crate::types::{Account, Result};
use log::info;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerReport {
    /// Requests acknowledged with `< ID`
    pub accepted: u64,
    /// Requests executed by the pool
    pub completed: u64,
    /// Lines written to the result log
    pub log_lines: u64,
    /// Balances at teardown, ascending by id
    pub balances: Vec<Account>,
}

/// Run the server until `END` or end of input, then drain and tear down
///
/// # Arguments
///
/// * `config` - Validated startup parameters
/// * `input` - Source of command lines
/// * `out` - Destination of prompts and `< ID` acknowledgements
///
/// # Errors
///
/// Configuration errors are returned before any request runs. A fatal worker
/// failure is returned after the pool has stopped.
pub fn run<R: BufRead>(config: &ServerConfig, input: R, out: &mut dyn Write) -> Result<ServerReport> {
    let seed = match &config.seed_file {
        Some(path) => read_balances(path)?,
        None => Vec::new(),
    };
    let store = Arc::new(InMemoryAccountStore::with_seed(
        config.accounts as i64,
        config.initial_balance,
        &seed,
    )?);
    let log = Arc::new(ResultLog::create(&config.output)?);
    let locking = create_strategy(config.locking, config.accounts);

    info!(
        "starting {} workers over {} accounts with {} locking, logging to {}",
        config.workers,
        store.count(),
        locking.name(),
        config.output.display()
    );

    let engine = Arc::new(LedgerEngine::new(Arc::clone(&store), locking));
    let queue = Arc::new(JobQueue::new(config.workers));
    let pool = WorkerPool::spawn(
        config.workers,
        Arc::clone(&queue),
        Arc::clone(&engine),
        Arc::clone(&log),
    )?;

    let mut dispatcher = Dispatcher::new(Arc::clone(&queue), config.accounts);
    let served = dispatcher.serve(input, out, config.prompt);
    // A failed read still has to drain what was already accepted
    dispatcher.close();

    let stopped = queue.wait_stopped();
    let joined = pool.join();
    // A worker failure explains a refused submission, so report it first
    stopped?;
    let completed = joined?;
    let accepted = served?;

    drop(engine);
    let log_lines = log.close()?;
    let balances = match Arc::try_unwrap(store) {
        Ok(store) => store.teardown(),
        Err(shared) => shared.snapshot(),
    };

    if let Some(path) = &config.dump_file {
        dump_balances(&balances, path)?;
    }

    info!(
        "shutdown complete: {} accepted, {} completed, {} log lines",
        accepted, completed, log_lines
    );

    Ok(ServerReport {
        accepted,
        completed,
        log_lines,
        balances,
    })
}
