//! Account-related types for the ledger
//!
//! Accounts are identified by a 1-based id and hold a signed integer balance.
//! The account set is fixed at startup.

use serde::{Deserialize, Serialize};

/// Account identifier, valid range `1..=count`
pub type AccountId = usize;

/// Signed account balance
pub type Balance = i64;

/// Point-in-time view of one account
///
/// Produced by the account store at teardown and used for the balance seed and
/// dump files (`account,balance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account id
    #[serde(rename = "account")]
    pub id: AccountId,

    /// Balance at the time the snapshot was taken
    pub balance: Balance,
}

impl Account {
    /// Create an account snapshot
    pub fn new(id: AccountId, balance: Balance) -> Self {
        Account { id, balance }
    }
}
