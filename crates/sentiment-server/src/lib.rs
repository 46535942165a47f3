//! HTTP service for news sentiment analysis
//!
//! Wraps [`sentiment_core::SentimentAnalyzer`] in an axum router exposing
//! `/analyze` plus the usual liveness and introspection routes.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::{Cli, ServerConfig};
pub use error::{Result, ServerError};
pub use logging::init_tracing;
pub use routes::router;
pub use state::{AppState, SharedState};
