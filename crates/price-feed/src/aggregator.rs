//! Price aggregator - fetches, dedups and polls

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use swapform_core::{FeedConfig, PriceFeedResult, PriceRecord, RawPriceRecord, TokenQuote};
use crate::feeds::QuoteSource;
use crate::state::QuoteBook;

/// Aggregator configuration
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub icon_base_path: String,
    pub poll_interval: Duration,
    pub max_quote_age: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for AggregatorConfig {
    fn from(feed: &FeedConfig) -> Self {
        Self {
            icon_base_path: feed.icon_base_path.clone(),
            poll_interval: feed.poll_interval(),
            max_quote_age: feed.stale_after(),
        }
    }
}

/// Turn a raw batch into the quote list.
///
/// Unpriced records are dropped, each currency keeps its latest
/// observation (last seen wins on equal timestamps) and the result is
/// sorted by symbol.
pub fn aggregate(records: Vec<RawPriceRecord>, icon_base_path: &str) -> Vec<TokenQuote> {
    let mut latest: HashMap<String, PriceRecord> = HashMap::new();

    for record in records.into_iter().filter_map(PriceRecord::from_raw) {
        match latest.get(&record.currency) {
            Some(existing) if existing.observed_at > record.observed_at => {}
            _ => {
                latest.insert(record.currency.clone(), record);
            }
        }
    }

    let mut quotes: Vec<TokenQuote> = latest
        .into_values()
        .map(|record| TokenQuote::from_record(record, icon_base_path))
        .collect();
    quotes.sort_by(|a, b| a.currency.cmp(&b.currency));
    quotes
}

/// Cloneable handle that fetches and commits one refresh
#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn QuoteSource>,
    book: Arc<QuoteBook>,
    icon_base_path: Arc<str>,
}

impl Refresher {
    pub fn new(source: Arc<dyn QuoteSource>, book: Arc<QuoteBook>, icon_base_path: &str) -> Self {
        Self {
            source,
            book,
            icon_base_path: Arc::from(icon_base_path),
        }
    }

    /// Fetch and aggregate without touching the book
    pub async fn fetch_quotes(&self) -> PriceFeedResult<Vec<TokenQuote>> {
        let records = self.source.fetch_records().await?;
        let raw_count = records.len();
        let quotes = aggregate(records, &self.icon_base_path);
        debug!(
            "Aggregated {} raw records into {} quotes ({})",
            raw_count,
            quotes.len(),
            self.source.name()
        );
        Ok(quotes)
    }

    /// Fetch and commit. On failure the previous snapshot stays up.
    pub async fn refresh(&self) -> PriceFeedResult<usize> {
        let ticket = self.book.begin_refresh();

        match self.fetch_quotes().await {
            Ok(quotes) => {
                let count = quotes.len();
                if self.book.commit(ticket, quotes) {
                    debug!("Committed {} quotes", count);
                } else {
                    debug!("Discarded superseded refresh {:?}", ticket);
                }
                Ok(count)
            }
            Err(e) => {
                warn!("Price refresh failed, keeping previous quotes: {}", e);
                self.book.record_failure(ticket, e.clone());
                Err(e)
            }
        }
    }

    pub fn book(&self) -> Arc<QuoteBook> {
        Arc::clone(&self.book)
    }
}

/// Main price aggregator
pub struct PriceAggregator {
    config: AggregatorConfig,
    refresher: Refresher,
    handles: Vec<JoinHandle<()>>,
    running: Arc<RwLock<bool>>,
}

impl PriceAggregator {
    pub fn new(config: AggregatorConfig, source: Arc<dyn QuoteSource>) -> Self {
        let refresher = Refresher::new(source, Arc::new(QuoteBook::new()), &config.icon_base_path);

        Self {
            config,
            refresher,
            handles: vec![],
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Get shared book reference
    pub fn book(&self) -> Arc<QuoteBook> {
        self.refresher.book()
    }

    pub fn refresher(&self) -> Refresher {
        self.refresher.clone()
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub async fn fetch_quotes(&self) -> PriceFeedResult<Vec<TokenQuote>> {
        self.refresher.fetch_quotes().await
    }

    pub async fn refresh(&self) -> PriceFeedResult<usize> {
        self.refresher.refresh().await
    }

    /// Start polling. The first poll runs immediately.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        if self.is_running().await {
            anyhow::bail!("Price aggregator already running");
        }

        info!("Starting price aggregator, polling every {:?}", self.config.poll_interval);
        *self.running.write().await = true;

        let refresher = self.refresher.clone();
        let poll_interval = self.config.poll_interval;
        let running = Arc::clone(&self.running);

        let poll_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if !*running.read().await {
                    break;
                }

                // Failures are logged and recorded in the book
                if let Ok(count) = refresher.refresh().await {
                    let stats = refresher.book().stats();
                    info!(
                        "Quote book: {} quotes, {} refreshes, {} failures",
                        count, stats.refresh_count, stats.failure_count
                    );
                }
            }
        });

        self.handles.push(poll_handle);

        Ok(())
    }

    /// Stop polling
    pub async fn stop(&mut self) {
        info!("Stopping price aggregator");
        *self.running.write().await = false;

        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Check if running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Get statistics
    pub fn stats(&self) -> AggregatorStats {
        let book_stats = self.book().stats();

        AggregatorStats {
            poller_count: self.handles.len(),
            quote_count: book_stats.quote_count,
            refresh_count: book_stats.refresh_count,
            failure_count: book_stats.failure_count,
            last_refresh_age: book_stats.last_refresh_age,
        }
    }
}

impl Drop for PriceAggregator {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

/// Aggregator statistics
#[derive(Debug, Clone)]
pub struct AggregatorStats {
    pub poller_count: usize,
    pub quote_count: usize,
    pub refresh_count: u64,
    pub failure_count: u64,
    pub last_refresh_age: Option<Duration>,
}
