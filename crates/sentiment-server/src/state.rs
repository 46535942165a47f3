//! Shared application state

use std::sync::Arc;
use std::time::Instant;

use sentiment_core::SentimentAnalyzer;

/// Service version reported by the introspection routes
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// State shared by every request handler
#[derive(Debug)]
pub struct AppState {
    analyzer: SentimentAnalyzer,
    started_at: Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(analyzer: SentimentAnalyzer) -> SharedState {
        Arc::new(Self {
            analyzer,
            started_at: Instant::now(),
        })
    }

    pub fn analyzer(&self) -> &SentimentAnalyzer {
        &self.analyzer
    }

    /// Seconds since the state was created
    pub fn uptime(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
