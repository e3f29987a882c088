//! Fine-grained locking strategy
//!
//! Balance checks take the one lock for their account. Transfers take the lock
//! of every distinct account they name, in ascending id order, through the
//! [`LockRegistry`].

use crate::core::{HeldLocks, LockRegistry};
use crate::strategy::LockingStrategy;
use crate::types::{AccountId, Result};

/// Per-account locking with ascending acquisition order
#[derive(Debug)]
pub struct FineGrainedLocking {
    registry: LockRegistry,
}

impl FineGrainedLocking {
    pub fn new(account_count: usize) -> Self {
        Self {
            registry: LockRegistry::new(account_count),
        }
    }
}

impl LockingStrategy for FineGrainedLocking {
    fn name(&self) -> &'static str {
        "fine"
    }

    fn acquire(&self, accounts: &[AccountId]) -> Result<HeldLocks<'_>> {
        match accounts {
            [single] => self.registry.lock(*single),
            many => self.registry.lock_ascending(many),
        }
    }
}
