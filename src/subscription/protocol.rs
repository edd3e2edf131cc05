use crate::store::{DashboardSnapshot, StoreUpdate};
use serde::{Deserialize, Serialize};

/// Update streams a client can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Devices,
    Efficiency,
    Alerts,
}

impl Topic {
    /// Topic a store update belongs to; refreshes belong to every topic
    pub fn of(update: &StoreUpdate) -> Option<Topic> {
        match update {
            StoreUpdate::DevicesUpdated { .. } => Some(Topic::Devices),
            StoreUpdate::EfficiencySample { .. } => Some(Topic::Efficiency),
            StoreUpdate::AlertAcknowledged { .. } => Some(Topic::Alerts),
            StoreUpdate::Refreshed { .. } => None,
        }
    }
}

/// Client → Server message types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { topic: Topic },
    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: Topic },
    #[serde(rename = "acknowledge", rename_all = "camelCase")]
    Acknowledge { alert_id: String },
    #[serde(rename = "refresh")]
    Refresh,
}

/// Server → Client message types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Full state, sent on connect and after a refresh
    #[serde(rename = "snapshot")]
    Snapshot { data: DashboardSnapshot },
    #[serde(rename = "update")]
    Update { update: StoreUpdate },
    #[serde(rename = "error")]
    Error { error: String },
}

impl From<StoreUpdate> for ServerMessage {
    fn from(update: StoreUpdate) -> Self {
        ServerMessage::Update { update }
    }
}
