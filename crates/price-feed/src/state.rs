//! Committed quote list
//!
//! The book holds one immutable snapshot behind an `Arc`. A successful
//! refresh swaps in a new snapshot whole; a failed one leaves it alone and
//! records the error.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use swapform_core::{find_token, PriceFeedError, TokenQuote};

/// Identifies one refresh attempt; later attempts get larger tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// One successful fetch
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    pub quotes: Vec<TokenQuote>,
    pub fetched_at: DateTime<Utc>,
    ticket: RefreshTicket,
}

impl QuoteSnapshot {
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age_at(now) > max_age
    }
}

/// What the form should show about the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing fetched yet
    Loading,
    Fresh,
    Stale,
    /// Latest attempt failed; `has_quotes` tells whether older data is still served
    Failed { error: PriceFeedError, has_quotes: bool },
}

#[derive(Debug)]
pub struct QuoteBook {
    current: RwLock<Option<Arc<QuoteSnapshot>>>,
    last_error: RwLock<Option<PriceFeedError>>,
    next_ticket: AtomicU64,
    refresh_count: AtomicU64,
    failure_count: AtomicU64,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            last_error: RwLock::new(None),
            next_ticket: AtomicU64::new(0),
            refresh_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }

    /// Take a ticket before starting a fetch
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn committed_ticket(current: &Option<Arc<QuoteSnapshot>>) -> RefreshTicket {
        current.as_ref().map_or(RefreshTicket(0), |s| s.ticket)
    }

    /// Replace the snapshot. Returns false if a newer refresh already committed.
    pub fn commit(&self, ticket: RefreshTicket, quotes: Vec<TokenQuote>) -> bool {
        let mut current = self.current.write();
        if Self::committed_ticket(&current) >= ticket {
            return false;
        }

        *current = Some(Arc::new(QuoteSnapshot {
            quotes,
            fetched_at: Utc::now(),
            ticket,
        }));
        *self.last_error.write() = None;
        self.refresh_count.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Record a failed refresh; the committed snapshot is kept
    pub fn record_failure(&self, ticket: RefreshTicket, error: PriceFeedError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);

        let current = self.current.read();
        if Self::committed_ticket(&current) < ticket {
            *self.last_error.write() = Some(error);
        }
    }

    pub fn snapshot(&self) -> Option<Arc<QuoteSnapshot>> {
        self.current.read().clone()
    }

    /// Current quotes, empty before the first success
    pub fn quotes(&self) -> Vec<TokenQuote> {
        self.snapshot().map(|s| s.quotes.clone()).unwrap_or_default()
    }

    pub fn find(&self, symbol: &str) -> Option<TokenQuote> {
        let snapshot = self.snapshot()?;
        find_token(&snapshot.quotes, symbol).cloned()
    }

    /// Currency -> USD price
    pub fn price_map(&self) -> HashMap<String, f64> {
        self.snapshot()
            .map(|s| s.quotes.iter().map(|q| (q.currency.clone(), q.price)).collect())
            .unwrap_or_default()
    }

    pub fn last_error(&self) -> Option<PriceFeedError> {
        self.last_error.read().clone()
    }

    pub fn status_at(&self, now: DateTime<Utc>, max_age: Duration) -> FeedStatus {
        let snapshot = self.snapshot();

        if let Some(error) = self.last_error() {
            return FeedStatus::Failed {
                error,
                has_quotes: snapshot.is_some(),
            };
        }

        match snapshot {
            None => FeedStatus::Loading,
            Some(s) if s.is_stale_at(now, max_age) => FeedStatus::Stale,
            Some(_) => FeedStatus::Fresh,
        }
    }

    pub fn status(&self, max_age: Duration) -> FeedStatus {
        self.status_at(Utc::now(), max_age)
    }

    pub fn stats(&self) -> QuoteBookStats {
        let snapshot = self.snapshot();

        QuoteBookStats {
            quote_count: snapshot.as_ref().map_or(0, |s| s.quotes.len()),
            refresh_count: self.refresh_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            last_refresh_age: snapshot.map(|s| s.age_at(Utc::now())),
        }
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the quote book
#[derive(Debug, Clone)]
pub struct QuoteBookStats {
    pub quote_count: usize,
    pub refresh_count: u64,
    pub failure_count: u64,
    pub last_refresh_age: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(currency: &str, price: f64) -> TokenQuote {
        TokenQuote {
            currency: currency.to_string(),
            price,
            observed_at: Utc::now(),
            icon_url: format!("/icons/{}.svg", currency),
        }
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let book = QuoteBook::new();

        let first = book.begin_refresh();
        assert!(book.commit(first, vec![quote("ETH", 2500.0)]));

        let second = book.begin_refresh();
        book.record_failure(second, PriceFeedError::Status(502));

        assert_eq!(book.quotes().len(), 1);
        assert_eq!(book.find("ETH").unwrap().price, 2500.0);
        assert_eq!(
            book.status(Duration::from_secs(30)),
            FeedStatus::Failed {
                error: PriceFeedError::Status(502),
                has_quotes: true
            }
        );

        let third = book.begin_refresh();
        assert!(book.commit(third, vec![quote("ETH", 2600.0)]));
        assert_eq!(book.status(Duration::from_secs(30)), FeedStatus::Fresh);
        assert_eq!(book.stats().failure_count, 1);
        assert_eq!(book.stats().refresh_count, 2);
    }

    #[test]
    fn test_older_ticket_cannot_overwrite() {
        let book = QuoteBook::new();
        let slow = book.begin_refresh();
        let fast = book.begin_refresh();

        assert!(book.commit(fast, vec![quote("ETH", 2600.0)]));
        assert!(!book.commit(slow, vec![quote("ETH", 2500.0)]));
        assert_eq!(book.find("ETH").unwrap().price, 2600.0);

        // A late failure from the superseded request is not reported
        book.record_failure(slow, PriceFeedError::Request("reset".to_string()));
        assert_eq!(book.last_error(), None);
    }

    #[test]
    fn test_status_transitions() {
        let book = QuoteBook::new();
        let max_age = Duration::from_secs(30);
        assert_eq!(book.status(max_age), FeedStatus::Loading);

        let ticket = book.begin_refresh();
        book.commit(ticket, vec![quote("BTC", 45000.0)]);

        let later = Utc::now() + chrono::Duration::seconds(31);
        assert_eq!(book.status_at(later, max_age), FeedStatus::Stale);
    }

    #[test]
    fn test_failure_before_any_data() {
        let book = QuoteBook::new();
        let ticket = book.begin_refresh();
        book.record_failure(ticket, PriceFeedError::Decode("eof".to_string()));

        assert!(book.quotes().is_empty());
        assert!(matches!(
            book.status(Duration::from_secs(30)),
            FeedStatus::Failed { has_quotes: false, .. }
        ));
    }

    #[test]
    fn test_price_map() {
        let book = QuoteBook::new();
        let ticket = book.begin_refresh();
        book.commit(ticket, vec![quote("BTC", 45000.0), quote("ETH", 2500.0)]);

        let prices = book.price_map();
        assert_eq!(prices.get("ETH"), Some(&2500.0));
        assert_eq!(prices.len(), 2);
    }
}
