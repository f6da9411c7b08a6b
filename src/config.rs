use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::Level;

pub struct Config {
    pub environment: String,
    pub log_level: Level,
    /// Serve on a local listener instead of the Lambda runtime.
    pub listen_addr: Option<SocketAddr>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: parse_level(env::var("LOG_LEVEL").ok().as_deref()),
            listen_addr: parse_listen_addr(env::var("LISTEN_ADDR").ok().as_deref())?,
        })
    }
}

/// Falls back to `info` for unset or unknown levels.
pub fn parse_level(value: Option<&str>) -> Level {
    value
        .and_then(|level| level.trim().parse().ok())
        .unwrap_or(Level::INFO)
}

/// Unset means Lambda. A value that does not parse is a startup error.
pub fn parse_listen_addr(value: Option<&str>) -> Result<Option<SocketAddr>> {
    value
        .map(|addr| {
            addr.trim()
                .parse()
                .with_context(|| format!("LISTEN_ADDR is not a socket address: {addr}"))
        })
        .transpose()
}
