//! Token icon resolution
//!
//! Each quote points at `{icon_base_path}/{currency}.svg`. Not every symbol
//! has an asset, so the renderer reports load failures back through
//! [`TokenIcon::on_load_error`] and falls back to a short text glyph.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AssetLoadError, TokenQuote};

/// What the renderer should draw for a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IconRender {
    Image { url: String },
    FallbackGlyph { glyph: String },
}

/// Icon state for one rendered token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIcon {
    symbol: String,
    url: String,
    load_failed: bool,
}

impl TokenIcon {
    pub fn new(symbol: &str, url: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            url: url.to_string(),
            load_failed: false,
        }
    }

    pub fn for_quote(quote: &TokenQuote) -> Self {
        Self::new(&quote.currency, &quote.icon_url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_failed(&self) -> bool {
        self.load_failed
    }

    /// Asset load failure hook. Never surfaced to the user.
    pub fn on_load_error(&mut self, err: AssetLoadError) {
        debug!("{}; using fallback glyph for {}", err, self.symbol);
        self.load_failed = true;
    }

    pub fn render(&self) -> IconRender {
        if self.load_failed {
            IconRender::FallbackGlyph {
                glyph: fallback_glyph(&self.symbol),
            }
        } else {
            IconRender::Image {
                url: self.url.clone(),
            }
        }
    }
}

/// First two characters of the symbol
pub fn fallback_glyph(symbol: &str) -> String {
    symbol.chars().take(2).collect()
}
