//! Server configuration: environment defaults with CLI overrides

use std::env;

use clap::Parser;

use crate::error::{Result, ServerError};

/// Command-line arguments for the sentiment service
#[derive(Debug, Default, Parser)]
#[command(name = "sentiment-server", version, about = "News sentiment analysis service")]
pub struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Listener and logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT`, keeping defaults for unset variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = env::var("HOST").ok().filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("PORT is not a valid port: {port}")))?;
        }

        Ok(config)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.host {
            self.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        self.log_json |= cli.log_json;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
