//! Swap form session
//!
//! Owns the form state for one user session. Every edit replaces the whole
//! `SwapState`; selected tokens are re-resolved against the latest quote
//! book whenever a result is derived, so a poll that lands mid-edit is
//! picked up on the next read.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use swapform_core::{
    filter_tokens, FormConfig, SelectionError, SwapDisplay, SwapQuote, SwapState, TokenQuote,
    ValidationError,
};
use swapform_price_feed::{DebouncedRefresh, FeedStatus, QuoteBook, Refresher};

use crate::builder::SwapOrder;
use crate::simulator::{SwapReceipt, SwapSimulator};

/// Which side of the swap a token is picked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

pub struct SwapSession {
    book: Arc<QuoteBook>,
    state: SwapState,
    refetch: DebouncedRefresh,
    simulator: SwapSimulator,
    max_quote_age: Duration,
}

impl SwapSession {
    pub fn new(refresher: Refresher, form: &FormConfig, max_quote_age: Duration) -> Self {
        Self {
            book: refresher.book(),
            state: SwapState::new(),
            refetch: DebouncedRefresh::new(form.refetch_debounce(), refresher),
            simulator: SwapSimulator::new(form.swap_delay()),
            max_quote_age,
        }
    }

    /// Raw form state as last edited
    pub fn state(&self) -> &SwapState {
        &self.state
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.book.status(self.max_quote_age)
    }

    /// Tokens offered for one side, excluding the other side's pick
    pub fn token_choices(&self, side: Side, search: &str) -> Vec<TokenQuote> {
        let quotes = self.book.quotes();
        let opposite = match side {
            Side::Source => self.state.destination_token.as_ref(),
            Side::Destination => self.state.source_token.as_ref(),
        };

        filter_tokens(&quotes, search, opposite).into_iter().cloned().collect()
    }

    fn lookup(&self, symbol: &str) -> Result<TokenQuote, SelectionError> {
        self.book
            .find(symbol)
            .ok_or_else(|| SelectionError::UnknownToken(symbol.to_string()))
    }

    pub fn select_source(&mut self, symbol: &str) -> Result<(), SelectionError> {
        let token = self.lookup(symbol)?;
        debug!("Source token set to {}", token.currency);
        self.state = self.state.with_source(token);
        Ok(())
    }

    pub fn select_destination(&mut self, symbol: &str) -> Result<(), SelectionError> {
        let token = self.lookup(symbol)?;
        debug!("Destination token set to {}", token.currency);
        self.state = self.state.with_destination(token);
        Ok(())
    }

    pub fn set_amount(&mut self, text: &str) {
        self.state = self.state.with_amount(text);
    }

    /// The amount field lost focus; schedule a debounced refetch.
    /// Returns `false` when called outside a Tokio runtime.
    pub fn finish_amount_edit(&self) -> bool {
        self.refetch.trigger()
    }

    pub fn refetch_pending(&self) -> bool {
        self.refetch.is_pending()
    }

    fn refresh_token(&self, token: &Option<TokenQuote>) -> Option<TokenQuote> {
        token
            .as_ref()
            .map(|t| self.book.find(&t.currency).unwrap_or_else(|| t.clone()))
    }

    /// Form state with selections priced from the latest quotes
    pub fn resolved_state(&self) -> SwapState {
        SwapState {
            source_token: self.refresh_token(&self.state.source_token),
            destination_token: self.refresh_token(&self.state.destination_token),
            source_amount: self.state.source_amount.clone(),
        }
    }

    pub fn preview(&self) -> SwapQuote {
        self.resolved_state().quote()
    }

    pub fn display(&self) -> SwapDisplay {
        self.preview().display()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.resolved_state().validate()
    }

    /// Swap roles; the current output becomes the new input
    pub fn reverse(&mut self) {
        self.state = self.resolved_state().reversed();
        debug!("Reversed swap direction");
    }

    /// Validate, run the simulated confirmation, then clear the amount
    pub async fn submit(&mut self) -> Result<SwapReceipt, ValidationError> {
        let order = SwapOrder::from_state(&self.resolved_state())?;
        info!("Submitting swap: {}", order.summary());

        let receipt = self.simulator.confirm(order).await;
        self.state = self.state.cleared_amount();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use swapform_core::RawPriceRecord;
    use swapform_price_feed::{QuoteSource, StaticQuoteSource};
    use tokio_test::assert_ok;

    const T1: &str = "2023-08-29T07:10:40.000Z";
    const T2: &str = "2023-08-29T07:10:50.000Z";

    async fn session_with(source: Arc<StaticQuoteSource>) -> (SwapSession, Refresher) {
        let refresher = Refresher::new(source, Arc::new(QuoteBook::new()), "/icons");
        assert_ok!(refresher.refresh().await);
        let session = SwapSession::new(refresher.clone(), &FormConfig::default(), Duration::from_secs(30));
        (session, refresher)
    }

    fn market() -> Vec<RawPriceRecord> {
        vec![
            RawPriceRecord::new("ETH", 2500.0, T1),
            RawPriceRecord::new("USDC", 1.0, T1),
            RawPriceRecord::new("BUSD", 1.0, T1),
        ]
    }

    #[tokio::test]
    async fn test_quote_and_reverse() {
        let (mut session, _) = session_with(Arc::new(StaticQuoteSource::new(market()))).await;

        session.select_source("ETH").unwrap();
        session.select_destination("USDC").unwrap();
        session.set_amount("1");
        assert_eq!(session.display().destination_amount, "2500");

        session.reverse();
        assert_eq!(session.state().source_amount, "2500");
        assert_eq!(session.display().destination_amount, "1");
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let (mut session, _) = session_with(Arc::new(StaticQuoteSource::new(market()))).await;

        assert_eq!(
            session.select_source("DOGE"),
            Err(SelectionError::UnknownToken("DOGE".to_string()))
        );
        assert_eq!(session.validate(), Err(ValidationError::MissingSourceToken));
    }

    #[tokio::test]
    async fn test_choices_exclude_other_side() {
        let (mut session, _) = session_with(Arc::new(StaticQuoteSource::new(market()))).await;
        session.select_source("USDC").unwrap();

        let choices: Vec<String> = session
            .token_choices(Side::Destination, "usd")
            .into_iter()
            .map(|q| q.currency)
            .collect();
        assert_eq!(choices, vec!["BUSD"]);
    }

    #[tokio::test]
    async fn test_preview_uses_latest_prices() {
        let source = Arc::new(StaticQuoteSource::new(market()));
        let (mut session, refresher) = session_with(source.clone()).await;

        session.select_source("ETH").unwrap();
        session.select_destination("USDC").unwrap();
        session.set_amount("2");

        source.set_records(vec![
            RawPriceRecord::new("ETH", 3000.0, T2),
            RawPriceRecord::new("USDC", 1.0, T2),
        ]);
        refresher.refresh().await.unwrap();

        assert_eq!(session.display().destination_amount, "6000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_clears_amount() {
        let (mut session, _) = session_with(Arc::new(StaticQuoteSource::new(market()))).await;

        session.select_source("ETH").unwrap();
        session.select_destination("USDC").unwrap();
        session.set_amount("0.5");

        let receipt = session.submit().await.unwrap();
        assert_eq!(receipt.message(), "Swapped 0.5 ETH for 1250 USDC");
        assert_eq!(session.state().source_amount, "");
        assert_eq!(session.validate(), Err(ValidationError::MissingAmount));
        assert_eq!(session.submit().await, Err(ValidationError::MissingAmount));
    }

    struct CountingSource {
        inner: StaticQuoteSource,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl QuoteSource for CountingSource {
        async fn fetch_records(&self) -> swapform_core::PriceFeedResult<Vec<RawPriceRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_records().await
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_amount_edits_debounce_refetch() {
        let source = Arc::new(CountingSource {
            inner: StaticQuoteSource::new(market()),
            calls: AtomicUsize::new(0),
        });
        let refresher = Refresher::new(source.clone(), Arc::new(QuoteBook::new()), "/icons");
        let mut session = SwapSession::new(refresher, &FormConfig::default(), Duration::from_secs(30));

        for text in ["1", "12", "125"] {
            session.set_amount(text);
            session.finish_amount_edit();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(session.refetch_pending());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.feed_status(), FeedStatus::Fresh);
    }

    #[test]
    fn test_finish_edit_without_runtime() {
        let refresher = Refresher::new(
            Arc::new(StaticQuoteSource::new(market())),
            Arc::new(QuoteBook::new()),
            "/icons",
        );
        let mut session = SwapSession::new(refresher, &FormConfig::default(), Duration::from_secs(30));

        session.set_amount("1");
        assert!(!session.finish_amount_edit());
        assert!(!session.refetch_pending());
        assert_eq!(session.state().source_amount, "1");
    }
}
