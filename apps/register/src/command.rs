//! # Register Commands
//!
//! One line of cashier input parsed into a [`Command`].
//!
//! ## Grammar
//! ```text
//! list [category]        search <text>
//! add <id>               rm <id>
//! inc <id>               dec <id>
//! qty <id> <delta>       cart
//! pay cash <amount>      pay card
//! reset                  help
//! quit
//! ```
//!
//! Verbs are case-insensitive. Product ids are passed through untouched so the
//! catalog decides whether they exist.

use kasir_core::ProductId;
use std::str::FromStr;

use crate::error::RegisterError;

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  list [category]     show products, optionally one category
  search <text>       find products by name
  add <id>            add one unit to the cart
  inc <id>            increase quantity by one
  dec <id>            decrease quantity by one
  qty <id> <delta>    change quantity by delta (e.g. -2)
  rm <id>             remove the line
  cart                show the cart and totals
  pay cash <amount>   pay with cash and print the change
  pay card            pay by card, QR or transfer
  reset               clear the cart
  help                show this text
  quit                exit";

/// A parsed register command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { category: Option<String> },
    Search { query: String },
    Add { id: ProductId },
    ChangeQuantity { id: ProductId, delta: i64 },
    Remove { id: ProductId },
    ShowCart,
    /// Tendered amount as typed; the register reads it with the configured
    /// currency precision.
    PayCash { amount: String },
    PayCard,
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = RegisterError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List {
                category: (!rest.is_empty()).then(|| rest.to_string()),
            }),
            "search" | "find" => {
                if rest.is_empty() {
                    return Err(RegisterError::command("usage: search <text>"));
                }
                Ok(Command::Search {
                    query: rest.to_string(),
                })
            }
            "add" => Ok(Command::Add {
                id: single_id(&args, "add <id>")?,
            }),
            "inc" => Ok(Command::ChangeQuantity {
                id: single_id(&args, "inc <id>")?,
                delta: 1,
            }),
            "dec" => Ok(Command::ChangeQuantity {
                id: single_id(&args, "dec <id>")?,
                delta: -1,
            }),
            "qty" => match args.as_slice() {
                [id, delta] => {
                    let delta = delta.parse::<i64>().map_err(|_| {
                        RegisterError::command(format!("'{}' is not a whole number", delta))
                    })?;
                    Ok(Command::ChangeQuantity {
                        id: ProductId::new(*id),
                        delta,
                    })
                }
                _ => Err(RegisterError::command("usage: qty <id> <delta>")),
            },
            "rm" | "remove" => Ok(Command::Remove {
                id: single_id(&args, "rm <id>")?,
            }),
            "cart" => Ok(Command::ShowCart),
            "pay" => parse_pay(&args),
            "reset" | "clear" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(RegisterError::command(format!(
                "unknown command '{}' (type 'help')",
                other
            ))),
        }
    }
}

fn single_id(args: &[&str], usage: &str) -> Result<ProductId, RegisterError> {
    match args {
        [id] => Ok(ProductId::new(*id)),
        _ => Err(RegisterError::command(format!("usage: {}", usage))),
    }
}

fn parse_pay(args: &[&str]) -> Result<Command, RegisterError> {
    match args {
        [method, amount] if method.eq_ignore_ascii_case("cash") => Ok(Command::PayCash {
            amount: amount.to_string(),
        }),
        [method] if is_non_cash(method) => Ok(Command::PayCard),
        _ => Err(RegisterError::command(
            "usage: pay cash <amount> | pay card",
        )),
    }
}

fn is_non_cash(method: &str) -> bool {
    ["card", "qris", "transfer", "non-cash"]
        .iter()
        .any(|m| method.eq_ignore_ascii_case(m))
}
