//! Input line parsing
//!
//! Turns one line of client input into a typed [`Command`]. Parsing is pure:
//! no request ids or timestamps are assigned here, that is the dispatcher's
//! job.
//!
//! Accepted forms (tokens separated by any whitespace):
//!
//! ```text
//! CHECK <account>
//! TRANS <account> <amount> [<account> <amount> ...]
//! END
//! ```

use crate::types::{AccountId, Balance, InputError, TransferLeg};

/// A parsed client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check { account: AccountId },
    Transfer { legs: Vec<TransferLeg> },
    End,
}

/// Parse a line against a ledger of `account_count` accounts
///
/// # Returns
///
/// * `Ok(None)` for a blank line
/// * `Ok(Some(command))` for a well-formed command
/// * `Err(InputError)` describing why the line was rejected
pub fn parse_command(line: &str, account_count: usize) -> Result<Option<Command>, InputError> {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let command = match name {
        "CHECK" => match args.as_slice() {
            [account] => Command::Check {
                account: parse_account(account, account_count)?,
            },
            _ => {
                return Err(InputError::WrongArity {
                    command: "CHECK",
                    expected: "exactly one account id",
                })
            }
        },
        "TRANS" => {
            if args.is_empty() || args.len() % 2 != 0 {
                return Err(InputError::WrongArity {
                    command: "TRANS",
                    expected: "one or more <account> <amount> pairs",
                });
            }
            let legs = args
                .chunks_exact(2)
                .map(|pair| {
                    Ok(TransferLeg::new(
                        parse_account(pair[0], account_count)?,
                        parse_amount(pair[1])?,
                    ))
                })
                .collect::<Result<Vec<_>, InputError>>()?;
            Command::Transfer { legs }
        }
        "END" => Command::End,
        other => {
            return Err(InputError::UnknownCommand {
                command: other.to_string(),
            })
        }
    };

    Ok(Some(command))
}

fn parse_account(token: &str, account_count: usize) -> Result<AccountId, InputError> {
    let id: i64 = token.parse().map_err(|_| InputError::InvalidNumber {
        token: token.to_string(),
        field: "account id",
    })?;
    usize::try_from(id)
        .ok()
        .filter(|&id| (1..=account_count).contains(&id))
        .ok_or(InputError::AccountOutOfRange {
            account: id,
            count: account_count,
        })
}

fn parse_amount(token: &str) -> Result<Balance, InputError> {
    token.parse().map_err(|_| InputError::InvalidNumber {
        token: token.to_string(),
        field: "amount",
    })
}
