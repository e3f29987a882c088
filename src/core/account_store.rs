//! In-memory account store
//!
//! This module provides the `InMemoryAccountStore`, a fixed array of balances
//! created once at startup and torn down after the server has drained.
//!
//! # Synchronization
//!
//! Each cell is an `AtomicI64` accessed with `Relaxed` ordering. The atomics
//! only make the type `Sync`; ordering between workers comes from the account
//! locks that callers hold around every access.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, Balance, LedgerError, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

/// Fixed-size in-memory balance table
#[derive(Debug)]
pub struct InMemoryAccountStore {
    cells: Box<[AtomicI64]>,
}

impl InMemoryAccountStore {
    /// Create `count` accounts, each holding `initial`
    ///
    /// # Errors
    ///
    /// Returns `StoreInit` if `count` is not positive or the table cannot be
    /// allocated.
    pub fn initialize(count: i64, initial: Balance) -> Result<Self> {
        if count <= 0 {
            return Err(LedgerError::StoreInit {
                count,
                message: "account count must be positive".to_string(),
            });
        }
        let len = usize::try_from(count).map_err(|_| LedgerError::StoreInit {
            count,
            message: "account count does not fit in memory".to_string(),
        })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|e| LedgerError::StoreInit {
                count,
                message: e.to_string(),
            })?;
        cells.extend((0..len).map(|_| AtomicI64::new(initial)));

        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    /// Create `count` accounts holding `initial`, then apply per-account seeds
    ///
    /// # Errors
    ///
    /// Besides the `initialize` errors, returns `SeedError` if a seed names an
    /// account outside `1..=count`, names the same account twice, or carries a
    /// negative balance.
    pub fn with_seed(count: i64, initial: Balance, seed: &[Account]) -> Result<Self> {
        let store = Self::initialize(count, initial)?;
        let mut seen = HashSet::with_capacity(seed.len());

        for account in seed {
            if !seen.insert(account.id) {
                return Err(LedgerError::seed(format!(
                    "account {} is listed more than once",
                    account.id
                )));
            }
            if account.balance < 0 {
                return Err(LedgerError::seed(format!(
                    "account {} has negative opening balance {}",
                    account.id, account.balance
                )));
            }
            store.write(account.id, account.balance).map_err(|_| {
                LedgerError::seed(format!(
                    "account {} is outside 1..={}",
                    account.id,
                    store.count()
                ))
            })?;
        }

        Ok(store)
    }

    /// Release the store and return the final balances
    pub fn teardown(self) -> Vec<Account> {
        self.snapshot()
    }

    fn cell(&self, id: AccountId) -> Result<&AtomicI64> {
        id.checked_sub(1)
            .and_then(|index| self.cells.get(index))
            .ok_or_else(|| LedgerError::unknown_account(id, self.cells.len()))
    }
}

impl AccountStore for InMemoryAccountStore {
    fn count(&self) -> usize {
        self.cells.len()
    }

    fn read(&self, id: AccountId) -> Result<Balance> {
        Ok(self.cell(id)?.load(Ordering::Relaxed))
    }

    fn write(&self, id: AccountId, value: Balance) -> Result<()> {
        self.cell(id)?.store(value, Ordering::Relaxed);
        Ok(())
    }

    fn snapshot(&self) -> Vec<Account> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| Account::new(index + 1, cell.load(Ordering::Relaxed)))
            .collect()
    }
}
