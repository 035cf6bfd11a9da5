//! Redirect resolution for shared map links.
//!
//! Short links (`maps.app.goo.gl/...`) only reveal the venue once the
//! redirect chain has been followed. The resolver performs a plain GET with a
//! browser-like User-Agent, since the short-link service answers bots with an
//! interstitial page instead of a redirect.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use super::BaseUrlResolver;

/// Upper bound on redirect hops before giving up
const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Redirect resolver backed by reqwest
pub struct HttpUrlResolver {
    client: reqwest::Client,
}

impl HttpUrlResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BaseUrlResolver for HttpUrlResolver {
    async fn resolve(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to resolve {}", url))?;

        // The final URL carries the venue even when the landing page itself
        // answers with an error status.
        let resolved = response.url().to_string();
        tracing::debug!(
            url = %url,
            resolved = %resolved,
            status = %response.status(),
            "Resolved map link"
        );
        Ok(resolved)
    }
}
