//! Argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "swapform", version, about = "Token swap quotes from a live price list")]
pub struct Cli {
    /// Settings file (defaults to ./swapform.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use built-in mock prices instead of the remote price list
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List priced tokens
    Prices {
        /// Case-insensitive symbol filter
        #[arg(long)]
        search: Option<String>,

        /// Symbol to leave out (the other side of a swap)
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Show rate, output amount and USD values for a swap
    Quote(SwapArgs),

    /// Run a simulated swap
    Swap(SwapArgs),

    /// Keep polling prices and log each refresh
    Watch {
        /// Stop after this many polls
        #[arg(long)]
        polls: Option<u64>,
    },

    /// Rank wallet balances and value them in USD
    Wallet {
        /// JSON file with `[{currency, amount, blockchain}]`
        #[arg(long)]
        balances: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SwapArgs {
    #[arg(long)]
    pub from: String,

    #[arg(long)]
    pub to: String,

    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,
}
