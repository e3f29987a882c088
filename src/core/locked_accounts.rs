//! Lock-checked access to the account store
//!
//! [`LockedAccounts`] pairs a store with the [`HeldLocks`] guard of the worker
//! using it. Reads and writes of accounts the guard does not cover fail with
//! `LockNotHeld` instead of racing, which turns the store's "caller holds the
//! lock" contract into something the engine cannot get wrong silently.

use crate::core::lock_registry::HeldLocks;
use crate::core::traits::AccountStore;
use crate::types::{AccountId, Balance, LedgerError, Result};

/// Store view limited to the accounts whose locks are held
#[derive(Debug)]
pub struct LockedAccounts<'a, S: AccountStore + ?Sized> {
    store: &'a S,
    held: HeldLocks<'a>,
}

impl<'a, S: AccountStore + ?Sized> LockedAccounts<'a, S> {
    pub fn new(store: &'a S, held: HeldLocks<'a>) -> Self {
        Self { store, held }
    }

    pub fn read(&self, id: AccountId) -> Result<Balance> {
        self.ensure_held(id)?;
        self.store.read(id)
    }

    pub fn write(&mut self, id: AccountId, value: Balance) -> Result<()> {
        self.ensure_held(id)?;
        self.store.write(id, value)
    }

    /// Drop the view and release its locks
    pub fn release(self) {
        self.held.unlock_all();
    }

    fn ensure_held(&self, id: AccountId) -> Result<()> {
        if self.held.covers(id) {
            Ok(())
        } else {
            Err(LedgerError::lock_not_held(id))
        }
    }
}
