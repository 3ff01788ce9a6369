//! Market intelligence port trait.
//!
//! Implementations typically call a remote inference service and may be slow
//! or fail. Callers in the pipeline go through
//! [`BoundedMarketIntel`](crate::domain::intel::BoundedMarketIntel),
//! which enforces a timeout and substitutes static values.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: String,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self {
            score: 0.5,
            label: "NEUTRAL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("market intel unavailable: {reason}")]
pub struct MarketIntelError {
    pub reason: String,
}

pub trait MarketIntelPort: Send + Sync {
    fn competitors(&self, company: &str) -> Result<Vec<String>, MarketIntelError>;
    fn sentiment(&self, text: &str) -> Result<Sentiment, MarketIntelError>;
}
