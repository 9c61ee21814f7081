//! Parsing of console input lines into shop commands.

use core::str::FromStr;

use thiserror::Error;

use bazaar_catalog::ProductId;
use bazaar_core::DomainError;

/// One user request read from the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopCommand {
    Products,
    Show(ProductId),
    Add { product_id: ProductId, quantity: i64 },
    Edit { product_id: ProductId, quantity: i64 },
    Remove(ProductId),
    Cart,
    Total,
    Checkout,
    Wish(ProductId),
    Unwish(ProductId),
    Wishlist,
    History,
    Help,
    Exit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help' for a list of commands)")]
    Unknown(String),

    #[error("usage: {usage}")]
    Usage { usage: &'static str },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl FromStr for ShopCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match verb.as_str() {
            "products" | "list" | "1" => no_args(&args, "products", ShopCommand::Products)?,
            "show" | "details" => ShopCommand::Show(one_id(&args, "show <product-id>")?),
            "add" | "2" => {
                let (product_id, quantity) = id_and_quantity(&args, "add <product-id> <quantity>")?;
                ShopCommand::Add {
                    product_id,
                    quantity,
                }
            }
            "cart" | "view" | "3" => no_args(&args, "cart", ShopCommand::Cart)?,
            "edit" | "update" | "4" => {
                let (product_id, quantity) =
                    id_and_quantity(&args, "edit <product-id> <new-quantity>")?;
                ShopCommand::Edit {
                    product_id,
                    quantity,
                }
            }
            "remove" | "rm" | "5" => ShopCommand::Remove(one_id(&args, "remove <product-id>")?),
            "checkout" | "6" => no_args(&args, "checkout", ShopCommand::Checkout)?,
            "exit" | "quit" | "q" | "7" => no_args(&args, "exit", ShopCommand::Exit)?,
            "total" => no_args(&args, "total", ShopCommand::Total)?,
            "wish" => ShopCommand::Wish(one_id(&args, "wish <product-id>")?),
            "unwish" => ShopCommand::Unwish(one_id(&args, "unwish <product-id>")?),
            "wishlist" => no_args(&args, "wishlist", ShopCommand::Wishlist)?,
            "history" => no_args(&args, "history", ShopCommand::History)?,
            "help" | "?" | "menu" => no_args(&args, "help", ShopCommand::Help)?,
            _ => return Err(CommandError::Unknown(verb)),
        };
        Ok(command)
    }
}

fn no_args(
    args: &[&str],
    usage: &'static str,
    command: ShopCommand,
) -> Result<ShopCommand, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage { usage })
    }
}

fn one_id(args: &[&str], usage: &'static str) -> Result<ProductId, CommandError> {
    match args {
        [id] => Ok(ProductId::new(*id)?),
        _ => Err(CommandError::Usage { usage }),
    }
}

fn id_and_quantity(args: &[&str], usage: &'static str) -> Result<(ProductId, i64), CommandError> {
    match args {
        [id, quantity] => Ok((ProductId::new(*id)?, parse_quantity(quantity)?)),
        _ => Err(CommandError::Usage { usage }),
    }
}

/// Signed so that `0` and `-3` reach the domain and fail there as invalid
/// quantities; anything that is not an integer fails here the same way.
fn parse_quantity(raw: &str) -> Result<i64, DomainError> {
    raw.parse::<i64>()
        .map_err(|_| DomainError::invalid_quantity(format!("'{raw}' is not a whole number")))
}
