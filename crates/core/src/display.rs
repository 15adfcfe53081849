//! Display rounding for amounts, rates and USD values
//!
//! Rounding happens here and only here; numeric values carried around the
//! rest of the crate keep full f64 precision.

use rust_decimal::prelude::*;

/// Fraction digits shown for an exchange rate
pub const RATE_FRACTION_DIGITS: u32 = 6;

/// Fraction digits shown for a token amount
pub const AMOUNT_FRACTION_DIGITS: u32 = 8;

/// Fraction digits shown for a USD value
pub const USD_FRACTION_DIGITS: u32 = 2;

fn rounded(value: f64, dp: u32) -> Option<Decimal> {
    let d = Decimal::from_f64(value)?.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if d.is_zero() {
        Some(Decimal::ZERO)
    } else {
        Some(d)
    }
}

/// Round to at most `dp` fraction digits, trimming trailing zeros
pub fn format_max_fraction(value: f64, dp: u32) -> String {
    match rounded(value, dp) {
        Some(d) => d.normalize().to_string(),
        None => {
            // Outside Decimal's range
            let text = format!("{:.*}", dp as usize, value);
            if text.contains('.') {
                text.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                text
            }
        }
    }
}

/// Round to exactly `dp` fraction digits
pub fn format_fixed(value: f64, dp: u32) -> String {
    match rounded(value, dp) {
        Some(mut d) => {
            d.rescale(dp);
            d.to_string()
        }
        None => format!("{:.*}", dp as usize, value),
    }
}

pub fn format_rate(rate: f64) -> String {
    format_max_fraction(rate, RATE_FRACTION_DIGITS)
}

pub fn format_amount(amount: f64) -> String {
    format_max_fraction(amount, AMOUNT_FRACTION_DIGITS)
}

pub fn format_usd(value: f64) -> String {
    format_fixed(value, USD_FRACTION_DIGITS)
}

/// Token prices use the rate precision
pub fn format_price(price: f64) -> String {
    format_max_fraction(price, RATE_FRACTION_DIGITS)
}

/// Remove digit grouping so a displayed amount can be typed back in
pub fn strip_grouping(text: &str) -> String {
    text.chars().filter(|c| *c != ',').collect()
}
