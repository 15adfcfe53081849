//! Swap form state
//!
//! The state is an immutable record: every edit produces a new `SwapState`
//! and the destination amount is always derived from the current fields.

use serde::{Deserialize, Serialize};

use crate::display::strip_grouping;
use crate::{compute_swap, SwapDisplay, SwapQuote, TokenQuote, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapState {
    pub source_token: Option<TokenQuote>,
    pub destination_token: Option<TokenQuote>,
    pub source_amount: String,
}

impl SwapState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(&self, token: TokenQuote) -> Self {
        Self {
            source_token: Some(token),
            ..self.clone()
        }
    }

    pub fn with_destination(&self, token: TokenQuote) -> Self {
        Self {
            destination_token: Some(token),
            ..self.clone()
        }
    }

    pub fn with_amount(&self, text: &str) -> Self {
        Self {
            source_amount: text.to_string(),
            ..self.clone()
        }
    }

    pub fn cleared_amount(&self) -> Self {
        self.with_amount("")
    }

    pub fn quote(&self) -> SwapQuote {
        compute_swap(
            self.source_token.as_ref(),
            self.destination_token.as_ref(),
            &self.source_amount,
        )
    }

    pub fn display(&self) -> SwapDisplay {
        self.quote().display()
    }

    /// Swap roles. The previous destination amount becomes the new input.
    pub fn reversed(&self) -> Self {
        let destination_amount = self.display().destination_amount;

        Self {
            source_token: self.destination_token.clone(),
            destination_token: self.source_token.clone(),
            source_amount: strip_grouping(&destination_amount),
        }
    }

    /// Check the form can be submitted
    pub fn validate(&self) -> Result<(), ValidationError> {
        let source = self.source_token.as_ref().ok_or(ValidationError::MissingSourceToken)?;
        let destination = self
            .destination_token
            .as_ref()
            .ok_or(ValidationError::MissingDestinationToken)?;

        let amount = match self.source_amount.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return Err(ValidationError::MissingAmount),
        };
        if amount == 0.0 {
            return Err(ValidationError::MissingAmount);
        }
        if amount < 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }

        if source.is_same_token(destination) {
            return Err(ValidationError::SameToken);
        }

        if self.quote().is_empty() {
            return Err(ValidationError::Unquotable);
        }

        Ok(())
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }
}
