//! Core traits for account storage
//!
//! The ledger engine talks to balances only through [`AccountStore`], so the
//! storage primitive can be swapped without touching the locking protocol.

use crate::types::{Account, AccountId, Balance, Result};

/// Fixed-size table of account balances
///
/// The store is a plain mapping from id to balance. It performs no locking of
/// its own: callers must hold the lock covering `id` before calling
/// [`read`](AccountStore::read) or [`write`](AccountStore::write). Inside the
/// crate that precondition is enforced by
/// [`LockedAccounts`](crate::core::LockedAccounts), which is the only path the
/// engine uses to reach a store.
pub trait AccountStore: Send + Sync {
    /// Number of accounts, ids are `1..=count`
    fn count(&self) -> usize;

    /// Read the balance of `id`
    fn read(&self, id: AccountId) -> Result<Balance>;

    /// Overwrite the balance of `id`
    fn write(&self, id: AccountId, value: Balance) -> Result<()>;

    /// Copy of every balance in ascending id order
    ///
    /// Only meaningful once no worker can be mutating the store.
    fn snapshot(&self) -> Vec<Account>;
}
