//! Per-account lock registry
//!
//! One mutex per account id, created at startup and never resized. Every
//! multi-account operation goes through [`LockRegistry::lock_ascending`], which
//! acquires the distinct ids in strictly increasing order. With a single global
//! acquisition order no cycle of waiting workers can form, so transfers over
//! overlapping account sets cannot deadlock.
//!
//! Locks are released by dropping the returned [`HeldLocks`] guard.

use crate::types::{AccountId, LedgerError, Result};
use parking_lot::{Mutex, MutexGuard};

/// Which accounts a [`HeldLocks`] guard covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// Exactly these accounts, ascending and distinct
    Accounts(Vec<AccountId>),
    /// Every account in the ledger
    Ledger,
}

/// Locks held by one worker for the duration of one request
///
/// Dropping the guard releases every lock it holds.
#[must_use = "locks are released as soon as the guard is dropped"]
pub struct HeldLocks<'a> {
    coverage: Coverage,
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl<'a> HeldLocks<'a> {
    /// Guard over the single ledger-wide lock
    pub(crate) fn ledger(guard: MutexGuard<'a, ()>) -> Self {
        HeldLocks {
            coverage: Coverage::Ledger,
            _guards: vec![guard],
        }
    }

    /// Whether `id` is protected by this guard
    pub fn covers(&self, id: AccountId) -> bool {
        match &self.coverage {
            Coverage::Accounts(ids) => ids.binary_search(&id).is_ok(),
            Coverage::Ledger => true,
        }
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Release every lock in the set
    pub fn unlock_all(self) {}
}

impl std::fmt::Debug for HeldLocks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeldLocks")
            .field("coverage", &self.coverage)
            .finish()
    }
}

/// Indexed table of account locks
#[derive(Debug)]
pub struct LockRegistry {
    locks: Box<[Mutex<()>]>,
}

impl LockRegistry {
    /// Create one lock for each account `1..=count`
    pub fn new(count: usize) -> Self {
        Self {
            locks: (0..count).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Lock a single account, blocking until it is free
    pub fn lock(&self, id: AccountId) -> Result<HeldLocks<'_>> {
        let guard = self.slot(id)?.lock();
        Ok(HeldLocks {
            coverage: Coverage::Accounts(vec![id]),
            _guards: vec![guard],
        })
    }

    /// Lock every distinct account in `ids`, lowest id first
    ///
    /// The ids are sorted and deduplicated here, so callers cannot break the
    /// ascending order. All ids are validated before anything is locked, so an
    /// unknown id never leaves a partial lock set behind.
    pub fn lock_ascending(&self, ids: &[AccountId]) -> Result<HeldLocks<'_>> {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let slots = ordered
            .iter()
            .map(|&id| self.slot(id))
            .collect::<Result<Vec<_>>>()?;
        let guards = slots.into_iter().map(|slot| slot.lock()).collect();

        Ok(HeldLocks {
            coverage: Coverage::Accounts(ordered),
            _guards: guards,
        })
    }

    fn slot(&self, id: AccountId) -> Result<&Mutex<()>> {
        id.checked_sub(1)
            .and_then(|index| self.locks.get(index))
            .ok_or_else(|| LedgerError::unknown_account(id, self.locks.len()))
    }

    #[cfg(test)]
    fn is_locked(&self, id: AccountId) -> bool {
        self.locks[id - 1].is_locked()
    }
}
