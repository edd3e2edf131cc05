use crate::model::{Device, DeviceStatus, EfficiencyData, EfficiencyFactors};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of trailing samples plotted on the trend chart
pub const CHART_POINTS: usize = 20;

/// One rounded point of the efficiency trend chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub score: i64,
    pub uptime: i64,
    pub performance: i64,
    pub energy: i64,
    pub maintenance: i64,
}

/// Aggregate view of the efficiency page
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencySummary {
    pub current_score: Option<f64>,
    /// Current minus previous overall score; 0 with fewer than two samples
    pub trend: f64,
    pub current_factors: Option<EfficiencyFactors>,
    pub active_devices: usize,
    pub total_devices: usize,
    /// Mean device efficiency; 0 without devices
    pub average_device_efficiency: f64,
    pub chart: Vec<ChartPoint>,
}

pub fn summarize_efficiency(history: &[EfficiencyData], devices: &[Device]) -> EfficiencySummary {
    let current = history.last();
    let previous = history.len().checked_sub(2).and_then(|i| history.get(i));

    let trend = match (current, previous) {
        (Some(current), Some(previous)) => current.overall_score - previous.overall_score,
        _ => 0.0,
    };

    let average_device_efficiency = if devices.is_empty() {
        0.0
    } else {
        devices.iter().map(|d| d.efficiency).sum::<f64>() / devices.len() as f64
    };

    let chart = history
        .iter()
        .skip(history.len().saturating_sub(CHART_POINTS))
        .map(|sample| ChartPoint {
            timestamp: sample.timestamp,
            score: sample.overall_score.round() as i64,
            uptime: sample.factors.uptime.round() as i64,
            performance: sample.factors.performance.round() as i64,
            energy: sample.factors.energy.round() as i64,
            maintenance: sample.factors.maintenance.round() as i64,
        })
        .collect();

    EfficiencySummary {
        current_score: current.map(|s| s.overall_score),
        trend,
        current_factors: current.map(|s| s.factors),
        active_devices: devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .count(),
        total_devices: devices.len(),
        average_device_efficiency,
        chart,
    }
}
