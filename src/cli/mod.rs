// CLI module
// Argument parsing for `ledger-server <WORKERS> <ACCOUNTS> <OUTPUT> [OPTIONS]`

mod args;

pub use args::{CliArgs, LockingKind};

use clap::Parser;

/// Read the process arguments
///
/// On a parse error or `--help`, clap prints to stderr/stdout and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
