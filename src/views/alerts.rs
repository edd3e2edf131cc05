use super::contains_ignore_case;
use crate::model::{Alert, Severity};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Acknowledgement state filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Acknowledged,
    Unacknowledged,
}

/// Alert list filter; absent fields match everything
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlertFilter {
    /// Matched against device name and message
    pub search: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<AckStatus>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        if let Some(ref search) = self.search {
            if !contains_ignore_case(&alert.device_name, search)
                && !contains_ignore_case(&alert.message, search)
            {
                return false;
            }
        }

        if let Some(severity) = self.severity {
            if alert.severity != severity {
                return false;
            }
        }

        match self.status {
            Some(AckStatus::Acknowledged) => alert.acknowledged,
            Some(AckStatus::Unacknowledged) => !alert.acknowledged,
            None => true,
        }
    }
}

pub fn filter_alerts(alerts: &[Alert], filter: &AlertFilter) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|alert| filter.matches(alert))
        .cloned()
        .collect()
}

/// Group alerts by calendar day (UTC), newest day first
pub fn group_by_day(alerts: &[Alert]) -> Vec<(NaiveDate, Vec<Alert>)> {
    let mut groups: BTreeMap<NaiveDate, Vec<Alert>> = BTreeMap::new();
    for alert in alerts {
        groups
            .entry(alert.timestamp.date_naive())
            .or_default()
            .push(alert.clone());
    }
    groups.into_iter().rev().collect()
}

/// Coarse relative age: "Just now", "12m ago", "3h ago", "2d ago"
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "Just now".to_string()
    }
}

/// Headline counters for the alerts page
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCounts {
    pub total: usize,
    pub unacknowledged: usize,
    pub critical_unacknowledged: usize,
    /// Unacknowledged alerts keyed by severity name
    pub unacknowledged_by_severity: BTreeMap<String, usize>,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut counts = AlertCounts {
            total: alerts.len(),
            ..Default::default()
        };

        for severity in Severity::ALL {
            counts
                .unacknowledged_by_severity
                .insert(severity_key(severity).to_string(), 0);
        }

        for alert in alerts.iter().filter(|a| !a.acknowledged) {
            counts.unacknowledged += 1;
            if alert.severity == Severity::Critical {
                counts.critical_unacknowledged += 1;
            }
            *counts
                .unacknowledged_by_severity
                .entry(severity_key(alert.severity).to_string())
                .or_default() += 1;
        }

        counts
    }
}

fn severity_key(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Critical => "critical",
    }
}
