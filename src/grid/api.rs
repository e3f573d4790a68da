//! Grid telemetry API integration

use crate::error::{Error, Result};
use crate::grid::types::LocationRecord;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the external grid telemetry service
#[derive(Clone)]
pub struct GridTelemetryApi {
    client: Client,
    url: String,
}

impl GridTelemetryApi {
    /// Create a new telemetry client with an explicit request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("grid-sched/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpError)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the current telemetry records for all locations.
    ///
    /// One network round trip per call. Callers are expected to fetch once
    /// per scheduling cycle and share the snapshot across score calls rather
    /// than refetching per node.
    pub async fn fetch_records(&self) -> Result<Vec<LocationRecord>> {
        debug!("Fetching grid telemetry from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::NetworkError(format!(
                "grid telemetry API returned HTTP {}",
                response.status()
            )));
        }

        let records: Vec<LocationRecord> = response.json().await?;

        info!("Fetched grid telemetry for {} locations", records.len());

        Ok(records)
    }
}
