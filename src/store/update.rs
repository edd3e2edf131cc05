use crate::model::{AiSuggestion, Alert, Device, EfficiencyData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Change notification broadcast to store subscribers
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreUpdate {
    /// Every device advanced by one tick
    DevicesUpdated {
        devices: Vec<Device>,
        timestamp: DateTime<Utc>,
    },
    /// A new efficiency sample was appended to the history
    EfficiencySample {
        sample: EfficiencyData,
        evicted: usize,
    },
    #[serde(rename_all = "camelCase")]
    AlertAcknowledged {
        alert_id: String,
        timestamp: DateTime<Utc>,
    },
    /// All collections were regenerated
    Refreshed { timestamp: DateTime<Utc> },
}

/// Point-in-time copy of the whole store
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub devices: Vec<Device>,
    pub alerts: Vec<Alert>,
    pub efficiency_data: Vec<EfficiencyData>,
    pub ai_suggestions: Vec<AiSuggestion>,
}

/// Store lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Nothing generated yet
    Uninitialized,
    /// Data generated; ticks are applied
    Live,
}
