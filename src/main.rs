//! Concurrent Ledger Server CLI
//!
//! Reads commands from stdin, acknowledges each accepted request on stdout and
//! appends one line per completed request to the output log.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- 4 1000 out.txt
//! cargo run -- 4 3 out.txt --balances seed.csv --dump-balances final.csv
//! cargo run -- 8 1000 out.txt --locking coarse --no-prompt < commands.txt
//! ```
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Clean shutdown after END or end of input
//! - 1: Error (invalid arguments, unwritable log, failed worker, etc.)

use env_logger::Env;
use ledger_server::cli;
use ledger_server::server;
use ledger_server::types::Result;
use std::io;
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<()> {
    let config = args.to_server_config()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    server::run(&config, stdin.lock(), &mut stdout)?;
    Ok(())
}
