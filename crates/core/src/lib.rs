//! Core types and pure logic for the swap form
//!
//! This crate provides the pieces shared by every other component:
//! - Price records and token quotes
//! - Swap rate calculation and display rounding
//! - Token selection filtering
//! - Swap form state and validation
//! - Wallet balance ranking
//! - Configuration and error types

pub mod types;
pub mod tokens;
pub mod display;
pub mod quotes;
pub mod selection;
pub mod form;
pub mod wallet;
pub mod config;
pub mod errors;

pub use types::*;
pub use tokens::*;
pub use quotes::*;
pub use selection::*;
pub use form::*;
pub use wallet::*;
pub use config::*;
pub use errors::*;
