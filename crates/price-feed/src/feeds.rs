//! Quote source implementations

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use swapform_core::{FeedConfig, PriceFeedError, PriceFeedResult, RawPriceRecord};

/// Anything that can deliver a raw price list
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_records(&self) -> PriceFeedResult<Vec<RawPriceRecord>>;
    fn name(&self) -> &str;
}

/// Read-only HTTP GET of a JSON price list
pub struct HttpQuoteSource {
    client: reqwest::Client,
    url: String,
}

impl HttpQuoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &FeedConfig) -> PriceFeedResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PriceFeedError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: config.prices_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_records(&self) -> PriceFeedResult<Vec<RawPriceRecord>> {
        debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PriceFeedError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceFeedError::Status(status.as_u16()));
        }

        let records: Vec<RawPriceRecord> = response
            .json()
            .await
            .map_err(|e| PriceFeedError::Decode(e.to_string()))?;

        debug!("Received {} price records from {}", records.len(), self.url);
        Ok(records)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// In-memory quote source for offline runs and tests
#[derive(Debug, Default)]
pub struct StaticQuoteSource {
    records: RwLock<Vec<RawPriceRecord>>,
}

impl StaticQuoteSource {
    pub fn new(records: Vec<RawPriceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Fixed mock prices for demos
    pub fn demo() -> Self {
        let date = "2023-08-29T07:10:40.000Z";
        Self::new(vec![
            RawPriceRecord::new("ATOM", 7.186657333333334, date),
            RawPriceRecord::new("BLUR", 0.20811525423728813, date),
            RawPriceRecord::new("BTC", 45000.0, date),
            RawPriceRecord::new("ETH", 2500.0, date),
            RawPriceRecord::new("NEO", 12.5, date),
            RawPriceRecord::new("OSMO", 0.95, date),
            RawPriceRecord::new("USD", 1.0, date),
            RawPriceRecord::new("USDC", 1.0, date),
            RawPriceRecord::new("ZIL", 0.05, date),
        ])
    }

    /// Replace the served list
    pub fn set_records(&self, records: Vec<RawPriceRecord>) {
        info!("Static quote source now serving {} records", records.len());
        *self.records.write() = records;
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    async fn fetch_records(&self) -> PriceFeedResult<Vec<RawPriceRecord>> {
        Ok(self.records.read().clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
