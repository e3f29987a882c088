//! Locking strategy module
//!
//! This module defines the Strategy pattern for deciding which locks a request
//! must hold while it touches the ledger. Both strategies satisfy the same
//! atomicity and deadlock-freedom guarantees; they differ only in how much
//! parallelism they allow.
//!
//! - [`FineGrainedLocking`]: one lock per account, acquired in ascending id
//!   order. Requests over disjoint accounts run fully in parallel.
//! - [`CoarseLocking`]: one lock for the whole ledger. Every request is
//!   serialized; useful as a baseline when benchmarking.

use crate::cli::LockingKind;
use crate::core::HeldLocks;
use crate::types::{AccountId, Result};

pub mod coarse;
pub mod fine;

pub use coarse::CoarseLocking;
pub use fine::FineGrainedLocking;

/// Locking strategy trait
///
/// Implementations hand out a [`HeldLocks`] guard that covers at least every
/// account in `accounts` and must never allow two guards that cover the same
/// account to exist at once.
pub trait LockingStrategy: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Block until the locks covering `accounts` are held
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if an account is unknown or the
    /// acquisition order would break the deadlock-avoidance protocol.
    fn acquire(&self, accounts: &[AccountId]) -> Result<HeldLocks<'_>>;
}

/// Create a locking strategy for a ledger of `account_count` accounts
///
/// # Arguments
///
/// * `kind` - The strategy selected on the command line
/// * `account_count` - Number of accounts in the ledger
///
/// # Returns
///
/// A boxed trait object implementing the LockingStrategy trait
pub fn create_strategy(kind: LockingKind, account_count: usize) -> Box<dyn LockingStrategy> {
    match kind {
        LockingKind::Fine => Box::new(FineGrainedLocking::new(account_count)),
        LockingKind::Coarse => Box::new(CoarseLocking::new(account_count)),
    }
}
