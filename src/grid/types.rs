//! Types for grid-aware scheduling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Node label whose value is the join key against telemetry records
pub const LOCATION_LABEL: &str = "location";

/// One energy telemetry sample for a named location.
///
/// Field names follow the external service's JSON payload verbatim.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocationRecord {
    /// Sample timestamp, opaque to scoring
    #[serde(rename = "Time")]
    pub time: String,
    /// Battery state of charge in percent, expected range 0-100
    #[serde(rename = "Battery_charge")]
    pub battery_charge: f64,
    /// Renewable generation in kW
    #[serde(rename = "Renewable_output")]
    pub renewable_output: f64,
    /// Primary load in kW; must be nonzero for the renewable ratio to be defined
    #[serde(rename = "Primary_load")]
    pub primary_load: f64,
    /// Load the grid could not serve, in kW
    #[serde(rename = "Unmet_load")]
    pub unmet_load: f64,
    /// Location key, matched against the node `location` label
    #[serde(rename = "Location")]
    pub location: String,
}

/// Telemetry fetched once per scheduling cycle and shared by every
/// per-node score call within that cycle.
#[derive(Clone, Debug)]
pub struct GridSnapshot {
    /// Decoded records, at most one per location
    pub records: Vec<LocationRecord>,
    /// Fetch timestamp
    pub fetched_at: DateTime<Utc>,
}

impl GridSnapshot {
    /// Create a snapshot stamped with the current time
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }

    /// First record whose location matches `key`, if any
    pub fn find_location(&self, key: &str) -> Option<&LocationRecord> {
        self.records.iter().find(|r| r.location == key)
    }
}

/// Configuration for the grid-aware scheduler
#[derive(Clone, Debug)]
pub struct GridSchedulerConfig {
    /// Telemetry endpoint returning a JSON array of location records
    pub telemetry_url: String,
    /// Post-bind notification endpoint; `None` disables the notification
    pub notify_url: Option<String>,
    /// Invert the suffix preference: favor nodes whose name suffix does
    /// not match the pod's
    pub reverse: bool,
    /// Timeout for the telemetry fetch
    pub fetch_timeout: Duration,
    /// Pause between scheduling cycles
    pub cycle_interval: Duration,
}

impl Default for GridSchedulerConfig {
    fn default() -> Self {
        Self {
            telemetry_url: "https://p9-scheduler-plugins.vercel.app/data".to_string(),
            notify_url: Some("https://p9-scheduler-plugins.vercel.app/log".to_string()),
            reverse: false,
            fetch_timeout: Duration::from_secs(10),
            cycle_interval: Duration::from_secs(5),
        }
    }
}
