//! I/O module
//!
//! Handles everything that crosses the process boundary.
//!
//! # Components
//!
//! - `command` - parsing of client input lines into commands
//! - `result_log` - the line-serialized output log of completed requests
//! - `csv_format` - balance seed and dump tables

pub mod command;
pub mod csv_format;
pub mod result_log;

pub use command::{parse_command, Command};
pub use csv_format::{dump_balances, read_balances, write_balances};
pub use result_log::ResultLog;
