// Read-only projections over store snapshots for the dashboard pages

pub mod alerts;
pub mod devices;
pub mod efficiency;
pub mod reports;
pub mod suggestions;

pub use alerts::{filter_alerts, group_by_day, time_ago, AckStatus, AlertCounts, AlertFilter};
pub use devices::{filter_devices, DeviceFilter};
pub use efficiency::{summarize_efficiency, ChartPoint, EfficiencySummary};
pub use reports::{build_report, AlertReport, DeviceReport, EfficiencyReport, Report, ReportKind};
pub use suggestions::{
    filter_suggestions, monthly_savings, SuggestionFilter, SuggestionSort, SuggestionTotals,
};

/// Case-insensitive substring match; an empty needle matches everything
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
