use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use rf_core::ports::ConnectivityPort;

#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("build HTTP client failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Confirms connectivity with a HEAD request.
///
/// Any transport error or non-success status counts as "not connected".
pub struct HttpConnectivity {
    client: reqwest::Client,
    probe_url: String,
}

impl HttpConnectivity {
    pub fn new(probe_url: impl Into<String>, timeout: Duration) -> Result<Self, ConnectivityError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            probe_url: probe_url.into(),
        })
    }

    pub fn probe_url(&self) -> &str {
        &self.probe_url
    }
}

#[async_trait]
impl ConnectivityPort for HttpConnectivity {
    async fn is_connected(&self) -> bool {
        match self.client.head(&self.probe_url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!(status = %response.status(), ok, "connectivity probe answered");
                ok
            }
            Err(err) => {
                debug!(error = %err, "connectivity probe failed");
                false
            }
        }
    }
}
