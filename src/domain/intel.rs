//! Timeout and fallback policy for market intel lookups.
//!
//! Each lookup runs on its own worker thread. If no answer arrives within
//! the timeout, or the lookup fails, the static fallback is returned and the
//! worker is left to finish on its own.

use crate::ports::market_intel_port::{MarketIntelError, MarketIntelPort, Sentiment};
use log::warn;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const COMPETITOR_COUNT: usize = 3;
pub const FALLBACK_COMPETITORS: [&str; COMPETITOR_COUNT] =
    ["Competitor A", "Competitor B", "Competitor C"];

pub fn fallback_competitors() -> Vec<String> {
    FALLBACK_COMPETITORS.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone)]
pub struct BoundedMarketIntel {
    inner: Arc<dyn MarketIntelPort>,
    timeout: Duration,
}

impl BoundedMarketIntel {
    pub fn new(inner: Arc<dyn MarketIntelPort>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Exactly [`COMPETITOR_COUNT`] names, trimmed and non-blank.
    pub fn competitors(&self, company: &str) -> Vec<String> {
        let company = company.to_string();
        match self.call("competitors", move |intel| intel.competitors(&company)) {
            Some(names) => normalize_competitors(names),
            None => fallback_competitors(),
        }
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        let text = text.to_string();
        self.call("sentiment", move |intel| intel.sentiment(&text))
            .unwrap_or_else(Sentiment::neutral)
    }

    fn call<T, F>(&self, what: &str, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MarketIntelPort) -> Result<T, MarketIntelError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name(format!("intel-{what}"))
            .spawn(move || {
                // The receiver may have given up already.
                let _ = tx.send(f(inner.as_ref()));
            });
        if let Err(e) = spawned {
            warn!("{what} lookup not started: {e}");
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!("{what} lookup failed: {e}");
                None
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!("{what} lookup timed out after {:?}", self.timeout);
                None
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!("{what} lookup aborted");
                None
            }
        }
    }
}

/// Trim, drop blanks, keep at most [`COMPETITOR_COUNT`] and pad with `Competitor N`.
pub fn normalize_competitors(names: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .take(COMPETITOR_COUNT)
        .collect();
    while names.len() < COMPETITOR_COUNT {
        names.push(format!("Competitor {}", names.len() + 1));
    }
    names
}
