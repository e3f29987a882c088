//! Request execution engine
//!
//! This module provides the `LedgerEngine` that executes one request against
//! the account store under the configured locking strategy.
//!
//! # Transfer atomicity
//!
//! A transfer runs in two phases while holding every lock it needs:
//! 1. **Check**: walk the legs in submission order, keeping a running balance
//!    per account. The first leg that would leave its account negative aborts
//!    the transfer with `ISF <account>`.
//! 2. **Write**: only if every leg passed, store the final balance of each
//!    touched account.
//!
//! No write happens before every check has passed, and no other worker can
//! observe the accounts between the phases, so a transfer is either applied in
//! full or not at all.

use crate::core::locked_accounts::LockedAccounts;
use crate::core::traits::AccountStore;
use crate::strategy::LockingStrategy;
use crate::types::{AccountId, Balance, Outcome, RequestKind, Result, TransferLeg};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Executes balance checks and transfers against the ledger
#[derive(Debug)]
pub struct LedgerEngine<S: AccountStore + ?Sized> {
    store: Arc<S>,
    locking: Box<dyn LockingStrategy>,
}

impl<S: AccountStore + ?Sized> LedgerEngine<S> {
    /// Create a new LedgerEngine
    ///
    /// # Arguments
    ///
    /// * `store` - The shared account store
    /// * `locking` - Strategy deciding which locks a request holds
    pub fn new(store: Arc<S>, locking: Box<dyn LockingStrategy>) -> Self {
        LedgerEngine { store, locking }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn locking(&self) -> &dyn LockingStrategy {
        self.locking.as_ref()
    }

    /// Execute a single request
    ///
    /// Locks are released before this returns, so the caller can stamp the end
    /// time and log without holding any account lock.
    ///
    /// # Errors
    ///
    /// Only invariant violations (unknown account, lock not held) are errors.
    /// Insufficient funds is reported as [`Outcome::InsufficientFunds`].
    pub fn execute(&self, request: &RequestKind) -> Result<Outcome> {
        let held = self.locking.acquire(&request.accounts())?;
        let accounts = LockedAccounts::new(self.store.as_ref(), held);

        let outcome = match request {
            RequestKind::BalanceCheck { account } => {
                Outcome::Balance(accounts.read(*account)?)
            }
            RequestKind::Transfer { legs } => return apply_transfer(accounts, legs),
        };
        accounts.release();
        Ok(outcome)
    }
}

fn apply_transfer<S: AccountStore + ?Sized>(
    mut accounts: LockedAccounts<'_, S>,
    legs: &[TransferLeg],
) -> Result<Outcome> {
    // Check phase: nothing is written until every leg has passed
    let mut staged: BTreeMap<AccountId, Balance> = BTreeMap::new();
    for leg in legs {
        let current = match staged.get(&leg.account) {
            Some(&balance) => balance,
            None => accounts.read(leg.account)?,
        };
        match current.checked_add(leg.delta) {
            Some(next) if next >= 0 => {
                staged.insert(leg.account, next);
            }
            _ => return Ok(Outcome::InsufficientFunds(leg.account)),
        }
    }

    for (account, balance) in staged {
        accounts.write(account, balance)?;
    }
    accounts.release();
    Ok(Outcome::Applied)
}
