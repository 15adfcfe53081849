//! Core type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Price record exactly as delivered by the quote source
///
/// Fields are optional because the upstream list is not curated: some
/// entries carry no price, some carry no usable date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPriceRecord {
    pub currency: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawPriceRecord {
    pub fn new(currency: &str, price: f64, date: &str) -> Self {
        Self {
            currency: currency.to_string(),
            price: Some(price),
            date: Some(date.to_string()),
        }
    }
}

/// A priced observation of one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub currency: String,
    pub price: f64,
    pub observed_at: DateTime<Utc>,
}

impl PriceRecord {
    /// Validate a raw record.
    ///
    /// Returns `None` for unpriced records (missing, zero, negative or
    /// non-finite price). A missing or unparsable date sorts before every
    /// real observation.
    pub fn from_raw(raw: RawPriceRecord) -> Option<Self> {
        let price = match raw.price {
            Some(p) if p.is_finite() && p > 0.0 => p,
            _ => {
                debug!("Skipping unpriced record for {}", raw.currency);
                return None;
            }
        };

        let observed_at = raw
            .date
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Some(Self {
            currency: raw.currency,
            price,
            observed_at,
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!("Unparsable price date {:?}: {}", value, e);
            None
        }
    }
}

/// Latest known price of a currency plus display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    pub currency: String,
    pub price: f64,
    pub observed_at: DateTime<Utc>,
    pub icon_url: String,
}

impl TokenQuote {
    /// Attach the icon reference `{icon_base_path}/{currency}.svg`
    pub fn from_record(record: PriceRecord, icon_base_path: &str) -> Self {
        let base = icon_base_path.trim_end_matches('/');
        let icon_url = format!("{}/{}.svg", base, record.currency);

        Self {
            currency: record.currency,
            price: record.price,
            observed_at: record.observed_at,
            icon_url,
        }
    }

    pub fn is_same_token(&self, other: &TokenQuote) -> bool {
        self.currency == other.currency
    }
}

impl fmt::Display for TokenQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ ${}", self.currency, crate::display::format_price(self.price))
    }
}
