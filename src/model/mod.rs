// Dashboard entity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;


/// Kind of simulated sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Temperature,
    Humidity,
    Energy,
    Pressure,
    Vibration,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "temperature",
            DeviceType::Humidity => "humidity",
            DeviceType::Energy => "energy",
            DeviceType::Pressure => "pressure",
            DeviceType::Vibration => "vibration",
        }
    }

    /// Capitalized name used in device display names
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "Temperature",
            DeviceType::Humidity => "Humidity",
            DeviceType::Energy => "Energy",
            DeviceType::Pressure => "Pressure",
            DeviceType::Vibration => "Vibration",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connectivity / health status of a device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Warning,
    Error,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Warning => "warning",
            DeviceStatus::Error => "error",
        }
    }
}

/// A simulated sensor or meter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub status: DeviceStatus,
    pub location: String,
    /// Always within `[min_value, max_value]`
    pub current_value: f64,
    pub unit: String,
    pub min_value: f64,
    pub max_value: f64,
    pub normal_range: (f64, f64),
    pub last_update: DateTime<Utc>,
    /// Percentage in `[0, 100]`
    pub efficiency: f64,
}

impl Device {
    /// True when the current reading sits inside the normal operating range
    pub fn is_in_normal_range(&self) -> bool {
        let (lo, hi) = self.normal_range;
        self.current_value >= lo && self.current_value <= hi
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Anomaly,
    Threshold,
    Offline,
    Maintenance,
}

impl AlertType {
    pub const ALL: [AlertType; 4] = [
        AlertType::Anomaly,
        AlertType::Threshold,
        AlertType::Offline,
        AlertType::Maintenance,
    ];

    /// Canned message attached to generated alerts of this type
    pub fn message(&self) -> &'static str {
        match self {
            AlertType::Anomaly => "Anomalous behavior detected in sensor readings",
            AlertType::Threshold => "Value exceeded normal operating range",
            AlertType::Offline => "Device communication lost",
            AlertType::Maintenance => "Scheduled maintenance required",
        }
    }
}

/// Ordered low → critical
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

/// Notification tied to a device
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub device_id: String,
    pub device_name: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Only ever moves from false to true
    pub acknowledged: bool,
}

/// The four named sub-factor scores of an efficiency sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyFactors {
    pub uptime: f64,
    pub performance: f64,
    pub energy: f64,
    pub maintenance: f64,
}

impl EfficiencyFactors {
    pub fn values(&self) -> [f64; 4] {
        [self.uptime, self.performance, self.energy, self.maintenance]
    }
}

/// One timestamped efficiency snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyData {
    pub timestamp: DateTime<Utc>,
    pub overall_score: f64,
    pub device_scores: HashMap<String, f64>,
    pub factors: EfficiencyFactors,
}

/// Ordered low → high
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Energy,
    Maintenance,
    Performance,
    Optimization,
}

/// Static recommendation record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub category: SuggestionCategory,
    pub estimated_savings: u32,
    pub implementation_time: String,
    /// 1..=10
    pub priority: u8,
}

/// Authenticated user profile (the only persisted state)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
