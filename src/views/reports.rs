use crate::model::{DeviceStatus, Severity};
use crate::store::DashboardSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Efficiency,
    Devices,
    Alerts,
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "efficiency" => Ok(ReportKind::Efficiency),
            "devices" => Ok(ReportKind::Devices),
            "alerts" => Ok(ReportKind::Alerts),
            other => Err(format!("Unknown report kind '{}'", other)),
        }
    }
}

/// Latest efficiency figures, rounded to whole percent
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyReport {
    pub samples: usize,
    pub current_score: i64,
    pub uptime: i64,
    pub performance: i64,
    pub energy: i64,
    pub maintenance: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    pub total: usize,
    pub online: usize,
    pub warning: usize,
    pub offline: usize,
    pub error: usize,
    /// Share of devices online, whole percent
    pub online_percent: i64,
    pub average_efficiency: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub total: usize,
    pub unacknowledged: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Report {
    Efficiency {
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
        #[serde(flatten)]
        stats: EfficiencyReport,
    },
    Devices {
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
        #[serde(flatten)]
        stats: DeviceReport,
    },
    Alerts {
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
        #[serde(flatten)]
        stats: AlertReport,
    },
}

pub fn build_report(kind: ReportKind, snapshot: &DashboardSnapshot, now: DateTime<Utc>) -> Report {
    match kind {
        ReportKind::Efficiency => Report::Efficiency {
            generated_at: now,
            stats: efficiency_report(snapshot),
        },
        ReportKind::Devices => Report::Devices {
            generated_at: now,
            stats: device_report(snapshot),
        },
        ReportKind::Alerts => Report::Alerts {
            generated_at: now,
            stats: alert_report(snapshot),
        },
    }
}

fn efficiency_report(snapshot: &DashboardSnapshot) -> EfficiencyReport {
    let current = snapshot.efficiency_data.last();
    let round = |v: Option<f64>| v.unwrap_or(0.0).round() as i64;

    EfficiencyReport {
        samples: snapshot.efficiency_data.len(),
        current_score: round(current.map(|s| s.overall_score)),
        uptime: round(current.map(|s| s.factors.uptime)),
        performance: round(current.map(|s| s.factors.performance)),
        energy: round(current.map(|s| s.factors.energy)),
        maintenance: round(current.map(|s| s.factors.maintenance)),
    }
}

fn device_report(snapshot: &DashboardSnapshot) -> DeviceReport {
    let devices = &snapshot.devices;
    let count = |status: DeviceStatus| devices.iter().filter(|d| d.status == status).count();
    let total = devices.len();
    let online = count(DeviceStatus::Online);

    let (online_percent, average_efficiency) = if total == 0 {
        (0, 0)
    } else {
        let avg = devices.iter().map(|d| d.efficiency).sum::<f64>() / total as f64;
        (
            (online as f64 / total as f64 * 100.0).round() as i64,
            avg.round() as i64,
        )
    };

    DeviceReport {
        total,
        online,
        warning: count(DeviceStatus::Warning),
        offline: count(DeviceStatus::Offline),
        error: count(DeviceStatus::Error),
        online_percent,
        average_efficiency,
    }
}

fn alert_report(snapshot: &DashboardSnapshot) -> AlertReport {
    let alerts = &snapshot.alerts;
    let count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();

    AlertReport {
        total: alerts.len(),
        unacknowledged: alerts.iter().filter(|a| !a.acknowledged).count(),
        critical: count(Severity::Critical),
        high: count(Severity::High),
        medium: count(Severity::Medium),
        low: count(Severity::Low),
    }
}
