//! Deterministic market intel: fixed competitor names and neutral sentiment.

use crate::domain::intel::fallback_competitors;
use crate::ports::market_intel_port::{MarketIntelError, MarketIntelPort, Sentiment};

#[derive(Debug, Clone, Default)]
pub struct StaticMarketIntel {
    competitors: Option<Vec<String>>,
}

impl StaticMarketIntel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every competitor lookup with `names`.
    pub fn with_competitors(names: Vec<String>) -> Self {
        Self {
            competitors: Some(names),
        }
    }
}

impl MarketIntelPort for StaticMarketIntel {
    fn competitors(&self, _company: &str) -> Result<Vec<String>, MarketIntelError> {
        Ok(self
            .competitors
            .clone()
            .unwrap_or_else(fallback_competitors))
    }

    fn sentiment(&self, _text: &str) -> Result<Sentiment, MarketIntelError> {
        Ok(Sentiment::neutral())
    }
}
