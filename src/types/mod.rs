//! Types module
//!
//! Contains core data structures used throughout the server.
//! This module organizes types into logical submodules:
//! - `account`: account ids, balances and snapshots
//! - `request`: requests, timestamps and completed results
//! - `error`: error types for the ledger server

pub mod account;
pub mod error;
pub mod request;

pub use account::{Account, AccountId, Balance};
pub use error::{InputError, LedgerError, Result};
pub use request::{
    Completion, Outcome, Request, RequestId, RequestKind, Timestamp, TransferLeg,
};
