//! HTTP retrieval of station and trip datasets.
//!
//! The transport sits behind the [`HttpClient`] trait so tests can stub it;
//! the aggregation core never fetches anything itself, it is handed
//! materialized records by the caller.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, ensure};

/// Fetches `url` and returns the response body.
///
/// # Errors
///
/// Returns an error on transport failure or a non-success HTTP status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    ensure!(
        resp.status().is_success(),
        "dataset fetch failed: {} returned {}",
        url,
        resp.status()
    );
    Ok(resp.bytes().await?.to_vec())
}
