//! Order builder for swap submission

use swapform_core::{SwapQuote, SwapState, TokenQuote, ValidationError};

/// A validated swap ready for confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOrder {
    pub source: TokenQuote,
    pub destination: TokenQuote,
    /// Amount exactly as typed
    pub source_amount: String,
    pub destination_amount: String,
    pub quote: SwapQuote,
}

impl SwapOrder {
    /// Build an order from the current form state
    pub fn from_state(state: &SwapState) -> Result<Self, ValidationError> {
        state.validate()?;

        let (source, destination) = match (&state.source_token, &state.destination_token) {
            (Some(s), Some(d)) => (s.clone(), d.clone()),
            (None, _) => return Err(ValidationError::MissingSourceToken),
            (_, None) => return Err(ValidationError::MissingDestinationToken),
        };

        let quote = state.quote();
        let destination_amount = quote.display().destination_amount;

        Ok(Self {
            source,
            destination,
            source_amount: state.source_amount.trim().to_string(),
            destination_amount,
            quote,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} for {} {}",
            self.source_amount, self.source.currency, self.destination_amount, self.destination.currency
        )
    }
}
