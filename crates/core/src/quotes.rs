//! Swap rate calculation
//!
//! `compute_swap` is a pure function of the two selected quotes and the
//! typed amount. It never fails: malformed input degrades to zero and an
//! unusable pair degrades to an empty result.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::display::{format_amount, format_rate, format_usd};
use crate::TokenQuote;

/// Numeric swap result, full precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub input_amount: f64,
    pub rate: f64,
    pub destination_amount: f64,
    pub source_usd: f64,
    pub destination_usd: f64,
    /// False when either side is unset or unpriced
    pub priced: bool,
}

/// Display strings for a swap result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDisplay {
    pub rate: String,
    pub destination_amount: String,
    pub source_usd: String,
    pub destination_usd: String,
}

impl SwapQuote {
    pub fn empty() -> Self {
        Self {
            input_amount: 0.0,
            rate: 0.0,
            destination_amount: 0.0,
            source_usd: 0.0,
            destination_usd: 0.0,
            priced: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.priced
    }

    /// Round for display. A zero input shows an empty destination amount.
    pub fn display(&self) -> SwapDisplay {
        if !self.priced {
            return SwapDisplay {
                rate: "0".to_string(),
                destination_amount: String::new(),
                source_usd: String::new(),
                destination_usd: String::new(),
            };
        }

        let destination_amount = if self.input_amount > 0.0 {
            format_amount(self.destination_amount)
        } else {
            String::new()
        };

        SwapDisplay {
            rate: format_rate(self.rate),
            destination_amount,
            source_usd: format_usd(self.source_usd),
            destination_usd: format_usd(self.destination_usd),
        }
    }
}

/// Parse a typed amount. Empty, malformed, non-finite and negative input
/// all count as zero.
pub fn parse_amount(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Derive rate, destination amount and USD values for a swap
pub fn compute_swap(
    source: Option<&TokenQuote>,
    destination: Option<&TokenQuote>,
    amount_text: &str,
) -> SwapQuote {
    let (source, destination) = match (source, destination) {
        (Some(s), Some(d)) => (s, d),
        _ => return SwapQuote::empty(),
    };

    if !(destination.price.is_finite() && destination.price > 0.0) {
        warn!(
            "Refusing to quote {} -> {}: destination price {}",
            source.currency, destination.currency, destination.price
        );
        return SwapQuote::empty();
    }

    let input_amount = parse_amount(amount_text);
    let rate = source.price / destination.price;
    let destination_amount = input_amount * rate;
    let source_usd = input_amount * source.price;
    let destination_usd = destination_amount * destination.price;

    if !(destination_amount.is_finite() && source_usd.is_finite() && destination_usd.is_finite()) {
        warn!(
            "Amount {} overflows the {} -> {} quote",
            input_amount, source.currency, destination.currency
        );
        return SwapQuote::empty();
    }

    SwapQuote {
        input_amount,
        rate,
        destination_amount,
        source_usd,
        destination_usd,
        priced: true,
    }
}
