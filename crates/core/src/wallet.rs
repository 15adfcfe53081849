//! Wallet balance ranking
//!
//! Balances are ordered by how prominently their blockchain should be
//! listed, then valued against the current price map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::display::format_fixed;
use crate::CoreResult;

/// Blockchain a balance lives on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Blockchain {
    Osmosis,
    Ethereum,
    Arbitrum,
    Zilliqa,
    Neo,
    Other(String),
}

impl Blockchain {
    pub fn name(&self) -> &str {
        match self {
            Blockchain::Osmosis => "Osmosis",
            Blockchain::Ethereum => "Ethereum",
            Blockchain::Arbitrum => "Arbitrum",
            Blockchain::Zilliqa => "Zilliqa",
            Blockchain::Neo => "Neo",
            Blockchain::Other(name) => name,
        }
    }

    /// Listing priority; `None` means the chain is not listed at all
    pub fn priority(&self) -> Option<i32> {
        match self {
            Blockchain::Osmosis => Some(100),
            Blockchain::Ethereum => Some(50),
            Blockchain::Arbitrum => Some(30),
            Blockchain::Zilliqa => Some(20),
            Blockchain::Neo => Some(20),
            Blockchain::Other(_) => None,
        }
    }
}

impl From<String> for Blockchain {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Osmosis" => Blockchain::Osmosis,
            "Ethereum" => Blockchain::Ethereum,
            "Arbitrum" => Blockchain::Arbitrum,
            "Zilliqa" => Blockchain::Zilliqa,
            "Neo" => Blockchain::Neo,
            _ => Blockchain::Other(name),
        }
    }
}

impl From<Blockchain> for String {
    fn from(chain: Blockchain) -> Self {
        chain.name().to_string()
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub currency: String,
    pub amount: f64,
    pub blockchain: Blockchain,
}

/// A ranked, valued balance ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRow {
    pub currency: String,
    pub blockchain: Blockchain,
    pub amount: f64,
    pub formatted_amount: String,
    pub usd_value: Option<f64>,
}

impl WalletRow {
    pub fn formatted_usd(&self) -> String {
        match self.usd_value {
            Some(v) => format_fixed(v, 2),
            None => "-".to_string(),
        }
    }
}

/// Decode a wallet export: a JSON array of balances
pub fn parse_balances(json: &str) -> CoreResult<Vec<WalletBalance>> {
    let balances: Vec<WalletBalance> = serde_json::from_str(json)?;
    Ok(balances)
}

/// Drop unlisted chains and negative amounts, order by priority (stable),
/// and value each balance in USD where a price is known.
pub fn rank_balances(balances: &[WalletBalance], prices: &HashMap<String, f64>) -> Vec<WalletRow> {
    let mut ranked: Vec<(i32, &WalletBalance)> = balances
        .iter()
        .filter(|b| b.amount >= 0.0)
        .filter_map(|b| b.blockchain.priority().map(|p| (p, b)))
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked
        .into_iter()
        .map(|(_, balance)| WalletRow {
            currency: balance.currency.clone(),
            blockchain: balance.blockchain.clone(),
            amount: balance.amount,
            formatted_amount: format_fixed(balance.amount, 2),
            usd_value: prices.get(&balance.currency).map(|price| price * balance.amount),
        })
        .collect()
}
