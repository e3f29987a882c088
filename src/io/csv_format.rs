//! CSV format handling for balance tables
//!
//! The server can be seeded from, and dump its final state to, a two-column
//! CSV table:
//!
//! ```text
//! account,balance
//! 1,100
//! 2,50
//! ```
//!
//! Rows are (de)serialized straight into [`Account`] via serde.

use crate::types::{Account, LedgerError, Result};
use csv::{ReaderBuilder, Trim, Writer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Read opening balances from the CSV file at `path`
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be opened or a row is malformed.
pub fn read_balances(path: &Path) -> Result<Vec<Account>> {
    let file = File::open(path).map_err(|e| {
        LedgerError::seed(format!("cannot open '{}': {}", path.display(), e))
    })?;
    parse_balances(file)
}

/// Parse a balance table from any reader
pub fn parse_balances<R: Read>(input: R) -> Result<Vec<Account>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let mut accounts = Vec::new();
    for row in reader.deserialize::<Account>() {
        accounts.push(row?);
    }
    Ok(accounts)
}

/// Write account balances in CSV format
///
/// Accounts are sorted by id for deterministic output.
pub fn write_balances(accounts: &[Account], output: &mut dyn Write) -> Result<()> {
    let mut sorted = accounts.to_vec();
    sorted.sort_by_key(|account| account.id);

    let mut writer = Writer::from_writer(output);
    for account in &sorted {
        writer.serialize(account)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write account balances to a new file at `path`
pub fn dump_balances(accounts: &[Account], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    write_balances(accounts, &mut file)
}
