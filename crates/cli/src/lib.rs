//! Command-line front end for the swap form
//!
//! Wires the price feed and swap session into a handful of subcommands.

pub mod cli;
pub mod commands;
pub mod render;
pub mod settings;

pub use cli::{Cli, Command, SwapArgs};
pub use commands::run;
pub use settings::{load_settings, parse_settings};
