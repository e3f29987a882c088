//! Coarse-grained locking strategy
//!
//! A single mutex guards the whole ledger. Every request holds it for its
//! entire check and write phase, so there is no ordering to get wrong and no
//! parallelism between requests either.

use crate::core::HeldLocks;
use crate::strategy::LockingStrategy;
use crate::types::{AccountId, LedgerError, Result};
use parking_lot::Mutex;

/// Ledger-wide locking
#[derive(Debug)]
pub struct CoarseLocking {
    ledger: Mutex<()>,
    account_count: usize,
}

impl CoarseLocking {
    pub fn new(account_count: usize) -> Self {
        Self {
            ledger: Mutex::new(()),
            account_count,
        }
    }
}

impl LockingStrategy for CoarseLocking {
    fn name(&self) -> &'static str {
        "coarse"
    }

    fn acquire(&self, accounts: &[AccountId]) -> Result<HeldLocks<'_>> {
        if let Some(&unknown) = accounts
            .iter()
            .find(|&&id| id == 0 || id > self.account_count)
        {
            return Err(LedgerError::unknown_account(unknown, self.account_count));
        }
        Ok(HeldLocks::ledger(self.ledger.lock()))
    }
}
