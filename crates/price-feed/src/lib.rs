//! Token price feed
//!
//! Features:
//! - HTTP quote source with a static in-memory alternative
//! - Dedup by currency, latest observation wins
//! - Whole-list snapshot replacement, stale-while-revalidate on failure
//! - Fixed-interval polling
//! - Debounced on-demand refetch

pub mod aggregator;
pub mod debounce;
pub mod feeds;
pub mod state;

pub use aggregator::{aggregate, AggregatorConfig, AggregatorStats, PriceAggregator, Refresher};
pub use debounce::DebouncedRefresh;
pub use feeds::{HttpQuoteSource, QuoteSource, StaticQuoteSource};
pub use state::{FeedStatus, QuoteBook, QuoteBookStats, QuoteSnapshot, RefreshTicket};
