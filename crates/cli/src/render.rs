//! Text rendering of domain values

use swapform_core::display::{format_price, format_usd};
use swapform_core::{SwapDisplay, SwapState, TokenIcon, TokenQuote, WalletRow};
use swapform_executor::SwapReceipt;
use swapform_price_feed::FeedStatus;

pub fn quote_line(quote: &TokenQuote) -> String {
    format!(
        "{:<10} ${:>18}  {}",
        quote.currency,
        format_price(quote.price),
        TokenIcon::for_quote(quote).url()
    )
}

/// Rate line plus both sides of the swap
pub fn swap_lines(state: &SwapState, display: &SwapDisplay) -> Vec<String> {
    let (source, destination) = match (&state.source_token, &state.destination_token) {
        (Some(s), Some(d)) => (s, d),
        _ => return vec!["Select both tokens to see a quote".to_string()],
    };

    let receive = if display.destination_amount.is_empty() {
        "-".to_string()
    } else {
        display.destination_amount.clone()
    };

    vec![
        format!("1 {} ≈ {} {}", source.currency, display.rate, destination.currency),
        format!(
            "You pay:     {} {} (${})",
            state.source_amount.trim(),
            source.currency,
            display.source_usd
        ),
        format!(
            "You receive: {} {} (${})",
            receive, destination.currency, display.destination_usd
        ),
    ]
}

pub fn receipt_lines(receipt: &SwapReceipt) -> Vec<String> {
    vec![
        receipt.title().to_string(),
        receipt.message(),
        format!("Reference: {}", receipt.id),
    ]
}

pub fn wallet_line(row: &WalletRow) -> String {
    format!(
        "{:<10} {:<10} {:>14}  ${:>14}",
        row.blockchain.name(),
        row.currency,
        row.formatted_amount,
        row.formatted_usd()
    )
}

pub fn status_line(status: &FeedStatus) -> String {
    match status {
        FeedStatus::Loading => "Loading prices...".to_string(),
        FeedStatus::Fresh => "Prices up to date".to_string(),
        FeedStatus::Stale => "Prices are stale".to_string(),
        FeedStatus::Failed { error, has_quotes: true } => {
            format!("{} Showing last known prices. ({})", error.user_message(), error)
        }
        FeedStatus::Failed { error, has_quotes: false } => {
            format!("{} ({})", error.user_message(), error)
        }
    }
}

pub fn usd(value: f64) -> String {
    format!("${}", format_usd(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use swapform_core::PriceFeedError;

    fn quote(currency: &str, price: f64) -> TokenQuote {
        TokenQuote {
            currency: currency.to_string(),
            price,
            observed_at: Utc::now(),
            icon_url: format!("/icons/{}.svg", currency),
        }
    }

    #[test]
    fn test_swap_lines() {
        let state = SwapState::new()
            .with_source(quote("ETH", 2500.0))
            .with_destination(quote("USDC", 1.0))
            .with_amount("1");

        let lines = swap_lines(&state, &state.display());

        assert_eq!(lines[0], "1 ETH ≈ 2500 USDC");
        assert_eq!(lines[1], "You pay:     1 ETH ($2500.00)");
        assert_eq!(lines[2], "You receive: 2500 USDC ($2500.00)");
    }

    #[test]
    fn test_swap_lines_without_tokens() {
        let state = SwapState::new();
        assert_eq!(swap_lines(&state, &state.display()).len(), 1);
    }

    #[test]
    fn test_failed_status_mentions_retained_prices() {
        let status = FeedStatus::Failed {
            error: PriceFeedError::Status(503),
            has_quotes: true,
        };

        assert!(status_line(&status).contains("Showing last known prices"));
    }

    #[test]
    fn test_quote_line_contains_icon() {
        let line = quote_line(&quote("ATOM", 7.186657333333334));
        assert!(line.starts_with("ATOM"));
        assert!(line.contains("7.186657"));
        assert!(line.ends_with("/icons/ATOM.svg"));
    }

    #[test]
    fn test_usd() {
        assert_eq!(usd(12.3), "$12.30");
    }
}
