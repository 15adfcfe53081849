//! Simulated swap confirmation
//!
//! Nothing settles: the simulator waits a fixed delay and echoes the order
//! back as a confirmation message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::builder::SwapOrder;

/// Confirmation of a simulated swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub id: Uuid,
    pub source_amount: String,
    pub source_currency: String,
    pub destination_amount: String,
    pub destination_currency: String,
    pub confirmed_at: DateTime<Utc>,
}

impl SwapReceipt {
    pub fn title(&self) -> &'static str {
        "Swap Successful!"
    }

    pub fn message(&self) -> String {
        format!(
            "Swapped {} {} for {} {}",
            self.source_amount, self.source_currency, self.destination_amount, self.destination_currency
        )
    }
}

/// Confirms orders after a fixed delay
#[derive(Debug, Clone)]
pub struct SwapSimulator {
    delay: Duration,
}

impl SwapSimulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn confirm(&self, order: SwapOrder) -> SwapReceipt {
        info!("Simulating swap of {} ({:?} delay)", order.summary(), self.delay);
        tokio::time::sleep(self.delay).await;

        let receipt = SwapReceipt {
            id: Uuid::new_v4(),
            source_amount: order.source_amount,
            source_currency: order.source.currency,
            destination_amount: order.destination_amount,
            destination_currency: order.destination.currency,
            confirmed_at: Utc::now(),
        };

        info!("Swap {} confirmed: {}", receipt.id, receipt.message());
        receipt
    }
}

impl Default for SwapSimulator {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swapform_core::{SwapState, TokenQuote};
    use tokio::time::Instant;

    fn quote(currency: &str, price: f64) -> TokenQuote {
        TokenQuote {
            currency: currency.to_string(),
            price,
            observed_at: Utc::now(),
            icon_url: format!("/icons/{}.svg", currency),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_waits_and_echoes_order() {
        let state = SwapState::new()
            .with_source(quote("ETH", 2500.0))
            .with_destination(quote("USDC", 1.0))
            .with_amount("1");
        let order = SwapOrder::from_state(&state).unwrap();

        let simulator = SwapSimulator::default();
        let started = Instant::now();
        let receipt = simulator.confirm(order).await;

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(receipt.message(), "Swapped 1 ETH for 2500 USDC");
        assert_eq!(receipt.title(), "Swap Successful!");
    }
}
