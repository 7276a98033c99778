use crate::config::DaemonConfig;
use crate::models::DaemonNode;
use anyhow::Context;
use std::time::Duration;

/// Thin client for the external backup daemon's HTTP API. No retries; every
/// call carries the configured timeout.
pub struct DaemonClient {
    base_url: String,
    client: reqwest::Client,
}

impl DaemonClient {
    pub fn new(config: &DaemonConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(format!("confboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// Devices known to the daemon, via `/nodes.json`.
    pub async fn nodes(&self) -> anyhow::Result<Vec<DaemonNode>> {
        let response = self
            .client
            .get(format!("{}/nodes.json", self.base_url))
            .send()
            .await
            .context("failed to fetch the node list")?;
        if !response.status().is_success() {
            anyhow::bail!("daemon returned status {}", response.status());
        }
        response
            .json::<Vec<DaemonNode>>()
            .await
            .context("failed to parse the node list")
    }

    /// Asks the daemon to pull one device's configuration now. The daemon's
    /// response is ignored.
    pub async fn trigger(&self, device: &str) -> anyhow::Result<()> {
        self.client
            .get(format!("{}/node/next/{}", self.base_url, device))
            .send()
            .await
            .with_context(|| format!("failed to trigger a backup of '{device}'"))?;
        Ok(())
    }

    /// Asks the daemon to reload its node list, via `/reload.json`, and
    /// returns the daemon's response body for relaying.
    pub async fn reload(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .get(format!("{}/reload.json", self.base_url))
            .send()
            .await
            .context("failed to reach the daemon")?;
        response
            .text()
            .await
            .context("failed to read the daemon response")
    }
}
