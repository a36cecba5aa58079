//! # CDN
//!
//! Edge cache in front of the public storefront.
//!
//! The storefront reads the cache version to bust its own asset URLs, so the
//! database counter is what actually invalidates things. Purging the CDN on top
//! of that only shortens the time stale pages linger at the edge.
//!
//!
//!
//! ## Purge
//! - Only runs when both the API token and zone id are configured
//! - `POST {api_base}/zones/{zone_id}/purge_cache` with `{"purge_everything": true}`
//! - Transport errors and non-2xx answers both count as a failed purge
//! - A failed purge is reported to the caller, who decides whether it matters
//!
//!
//!
//! ## Commands
//!
//! Purge by hand.
//! ```sh
//! curl -X POST -H "Authorization: Bearer $(cat /run/secrets/CLOUDFLARE_API_TOKEN)" \
//!   -H "Content-Type: application/json" \
//!   --data '{"purge_everything":true}' \
//!   https://api.cloudflare.com/client/v4/zones/$(cat /run/secrets/CLOUDFLARE_ZONE_ID)/purge_cache
//! ```
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

const PURGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CdnCredentials {
    pub api_token: String,
    pub zone_id: String,
}

#[derive(Error, Debug)]
pub enum CdnError {
    #[error("CDN purge request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    Purged,
    NotConfigured,
}

pub struct CdnClient {
    http: Client,
    api_base: String,
    credentials: Option<CdnCredentials>,
}

impl CdnClient {
    pub fn new(api_base: &str, credentials: Option<CdnCredentials>) -> Self {
        let http = Client::builder()
            .timeout(PURGE_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to configure CDN client, using defaults");
                Client::new()
            });

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn purge_everything(&self) -> Result<PurgeOutcome, CdnError> {
        let Some(credentials) = &self.credentials else {
            return Ok(PurgeOutcome::NotConfigured);
        };

        let url = purge_url(&self.api_base, &credentials.zone_id);

        self.http
            .post(&url)
            .bearer_auth(&credentials.api_token)
            .json(&json!({ "purge_everything": true }))
            .send()
            .await?
            .error_for_status()?;

        info!("CDN cache purged");

        Ok(PurgeOutcome::Purged)
    }
}

fn purge_url(api_base: &str, zone_id: &str) -> String {
    format!("{api_base}/zones/{zone_id}/purge_cache")
}
