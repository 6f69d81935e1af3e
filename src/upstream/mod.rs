//! Clients for the services the advisor consults.
//!
//! Each client makes exactly one bounded-time call per operation and reports
//! the outcome as a `Result`. Neither retries.

pub mod bitcoind;
pub mod lnd;

use std::time::Duration;

use reqwest::Url;

use crate::error::AdvisorError;

pub use bitcoind::{BitcoindClient, RpcRequest};
pub use lnd::LndClient;

/// Build the HTTP client shared by one upstream's calls.
fn http_client(timeout: Duration) -> Result<reqwest::Client, AdvisorError> {
    Ok(reqwest::Client::builder()
        // Bounds the whole call: connect, send and body read
        .timeout(timeout)
        .tcp_nodelay(true)
        .build()?)
}

fn parse_base_url(name: &str, raw: &str) -> Result<Url, AdvisorError> {
    Url::parse(raw).map_err(|e| AdvisorError::InvalidConfig(format!("{name}: {e}")))
}
