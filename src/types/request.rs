//! Request-related types for the ledger server
//!
//! This module defines the requests that flow from the dispatcher through the
//! job queue to the workers, the timestamps stamped on them, and the completed
//! result that is written to the output log.

use super::account::{AccountId, Balance};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Request identifier
///
/// Assigned by the dispatcher starting at 1, strictly increasing and gap-free.
pub type RequestId = u64;

/// Wall-clock timestamp with microsecond resolution
///
/// Formats as `<seconds>.<microseconds>` with the microseconds zero-padded to
/// six digits, which is the form used on every log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: u64,
    pub micros: u32,
}

impl Timestamp {
    /// Capture the current wall-clock time
    pub fn now() -> Self {
        // A clock set before 1970 is reported as the epoch rather than failing a request
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp {
            secs: elapsed.as_secs(),
            micros: elapsed.subsec_micros(),
        }
    }

    pub fn new(secs: u64, micros: u32) -> Self {
        Timestamp { secs, micros }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

/// One `(account, delta)` pair of a transfer
///
/// A negative delta debits the account, a positive one credits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLeg {
    pub account: AccountId,
    pub delta: Balance,
}

impl TransferLeg {
    pub fn new(account: AccountId, delta: Balance) -> Self {
        TransferLeg { account, delta }
    }
}

/// The two kinds of work a client can submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Read one account's balance
    BalanceCheck { account: AccountId },

    /// Apply every leg or none of them
    ///
    /// Legs keep submission order; the same account may appear more than once.
    Transfer { legs: Vec<TransferLeg> },
}

impl RequestKind {
    /// Distinct accounts this request touches, in ascending order
    ///
    /// This is the lock set for the request.
    pub fn accounts(&self) -> Vec<AccountId> {
        match self {
            RequestKind::BalanceCheck { account } => vec![*account],
            RequestKind::Transfer { legs } => {
                let mut ids: Vec<AccountId> = legs.iter().map(|leg| leg.account).collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            }
        }
    }
}

/// A queued unit of work
///
/// Created by the dispatcher, owned by the job queue until a single worker
/// dequeues it, then discarded after its log line is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub kind: RequestKind,
    /// Captured at submission
    pub start: Timestamp,
}

impl Request {
    pub fn new(id: RequestId, kind: RequestKind, start: Timestamp) -> Self {
        Request { id, kind, start }
    }
}

/// Result of executing a request against the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Balance observed by a balance check
    Balance(Balance),

    /// Transfer applied in full
    Applied,

    /// Transfer discarded because this account would have gone negative
    ///
    /// The account is the first one, in submission order, to fail the check.
    InsufficientFunds(AccountId),
}

/// A finished request, ready to be appended to the output log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub request: RequestId,
    pub outcome: Outcome,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Balance(balance) => write!(f, "{} BAL {}", self.request, balance)?,
            Outcome::Applied => write!(f, "{} OK", self.request)?,
            Outcome::InsufficientFunds(account) => write!(f, "{} ISF {}", self.request, account)?,
        }
        write!(f, " TIME {} {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::padded(Timestamp::new(1700000000, 42), "1700000000.000042")]
    #[case::full(Timestamp::new(5, 999999), "5.999999")]
    #[case::zero(Timestamp::new(0, 0), "0.000000")]
    fn test_timestamp_display(#[case] ts: Timestamp, #[case] expected: &str) {
        assert_eq!(ts.to_string(), expected);
    }

    #[rstest]
    #[case::balance(Outcome::Balance(70), "12 BAL 70 TIME 10.000001 10.000250")]
    #[case::negative_balance(Outcome::Balance(-3), "12 BAL -3 TIME 10.000001 10.000250")]
    #[case::applied(Outcome::Applied, "12 OK TIME 10.000001 10.000250")]
    #[case::isf(Outcome::InsufficientFunds(3), "12 ISF 3 TIME 10.000001 10.000250")]
    fn test_completion_log_line(#[case] outcome: Outcome, #[case] expected: &str) {
        let completion = Completion {
            request: 12,
            outcome,
            start: Timestamp::new(10, 1),
            end: Timestamp::new(10, 250),
        };
        assert_eq!(completion.to_string(), expected);
    }

    #[test]
    fn test_transfer_accounts_are_sorted_and_distinct() {
        let kind = RequestKind::Transfer {
            legs: vec![
                TransferLeg::new(7, -5),
                TransferLeg::new(2, 5),
                TransferLeg::new(7, 1),
                TransferLeg::new(4, -1),
            ],
        };
        assert_eq!(kind.accounts(), vec![2, 4, 7]);
    }

    #[test]
    fn test_balance_check_locks_single_account() {
        let kind = RequestKind::BalanceCheck { account: 9 };
        assert_eq!(kind.accounts(), vec![9]);
    }

    #[test]
    fn test_timestamp_now_has_microsecond_range() {
        let ts = Timestamp::now();
        assert!(ts.micros < 1_000_000);
        assert!(ts.secs > 0);
    }
}
