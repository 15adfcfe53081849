//! Token picker filtering

use crate::TokenQuote;

/// Quotes matching `search` (case-insensitive substring of the symbol),
/// excluding the token already picked on the other side of the swap.
/// Input order is preserved.
pub fn filter_tokens<'a>(
    quotes: &'a [TokenQuote],
    search: &str,
    opposite: Option<&TokenQuote>,
) -> Vec<&'a TokenQuote> {
    let query = search.trim().to_lowercase();
    let excluded = opposite.map(|t| t.currency.as_str());

    quotes
        .iter()
        .filter(|q| q.currency.to_lowercase().contains(&query))
        .filter(|q| Some(q.currency.as_str()) != excluded)
        .collect()
}

/// Exact symbol lookup
pub fn find_token<'a>(quotes: &'a [TokenQuote], symbol: &str) -> Option<&'a TokenQuote> {
    quotes.iter().find(|q| q.currency == symbol)
}
