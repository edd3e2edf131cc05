use crate::model::{AiSuggestion, Alert, Device, EfficiencyData};
use crate::store::{DashboardSnapshot, DashboardStore};
use crate::views::{
    build_report, filter_alerts, filter_devices, filter_suggestions, group_by_day,
    monthly_savings, summarize_efficiency, time_ago, AlertCounts, AlertFilter, DeviceFilter,
    EfficiencySummary, Report, ReportKind, SuggestionFilter, SuggestionTotals,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Shared state for the dashboard API
pub struct DashboardAppState {
    pub store: Arc<DashboardStore>,
}

/// Device with its normal-range flag as shown on the device card
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEntry {
    #[serde(flatten)]
    pub device: Device,
    pub in_range: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceListResponse {
    pub devices: Vec<DeviceEntry>,
    pub total: usize,
    pub active_filters: usize,
}

/// Alert with its relative age as shown in the feed
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEntry {
    #[serde(flatten)]
    pub alert: Alert,
    pub time_ago: String,
}

#[derive(Serialize)]
pub struct AlertDay {
    pub date: NaiveDate,
    pub alerts: Vec<AlertEntry>,
}

#[derive(Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
    pub days: Vec<AlertDay>,
    pub counts: AlertCounts,
}

#[derive(Serialize)]
pub struct EfficiencyResponse {
    pub history: Vec<EfficiencyData>,
    pub summary: EfficiencySummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionEntry {
    #[serde(flatten)]
    pub suggestion: AiSuggestion,
    pub monthly_savings: u32,
}

#[derive(Serialize)]
pub struct SuggestionListResponse {
    pub suggestions: Vec<SuggestionEntry>,
    pub totals: SuggestionTotals,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create dashboard API router
pub fn create_dashboard_router(state: Arc<DashboardAppState>) -> Router {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/devices", get(list_devices))
        .route("/api/devices/:id", get(get_device))
        .route("/api/alerts", get(list_alerts))
        .route("/api/alerts/:id/acknowledge", post(acknowledge_alert))
        .route("/api/efficiency", get(get_efficiency))
        .route("/api/suggestions", get(list_suggestions))
        .route("/api/reports/:kind", get(get_report))
        .route("/api/refresh", post(refresh))
        .with_state(state)
}

/// GET /api/dashboard - Full snapshot of all four collections
async fn get_dashboard(State(state): State<Arc<DashboardAppState>>) -> Json<DashboardSnapshot> {
    Json(state.store.snapshot())
}

/// GET /api/devices - List devices
///
/// Query parameters:
/// - `search`: substring of name or location, case-insensitive
/// - `status`: online | offline | warning | error
/// - `type`: temperature | humidity | energy | pressure | vibration
async fn list_devices(
    State(state): State<Arc<DashboardAppState>>,
    Query(filter): Query<DeviceFilter>,
) -> Json<DeviceListResponse> {
    let devices = state.store.devices();
    let entries = filter_devices(&devices, &filter)
        .into_iter()
        .map(|device| DeviceEntry {
            in_range: device.is_in_normal_range(),
            device,
        })
        .collect();

    Json(DeviceListResponse {
        devices: entries,
        total: devices.len(),
        active_filters: filter.active_count(),
    })
}

/// GET /api/devices/:id
async fn get_device(
    State(state): State<Arc<DashboardAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    state
        .store
        .get_device(&id)
        .map(Json)
        .ok_or(ApiError::NotFound("Device not found"))
}

/// GET /api/alerts - List alerts, newest day first
///
/// Query parameters:
/// - `search`: substring of device name or message
/// - `severity`: low | medium | high | critical
/// - `status`: acknowledged | unacknowledged
async fn list_alerts(
    State(state): State<Arc<DashboardAppState>>,
    Query(filter): Query<AlertFilter>,
) -> Json<AlertListResponse> {
    let alerts = state.store.alerts();
    let filtered = filter_alerts(&alerts, &filter);
    let now = Utc::now();

    let days = group_by_day(&filtered)
        .into_iter()
        .map(|(date, alerts)| AlertDay {
            date,
            alerts: alerts
                .into_iter()
                .map(|alert| AlertEntry {
                    time_ago: time_ago(alert.timestamp, now),
                    alert,
                })
                .collect(),
        })
        .collect();

    // Counts cover every alert, not just the filtered page
    Json(AlertListResponse {
        counts: AlertCounts::from_alerts(&alerts),
        alerts: filtered,
        days,
    })
}

/// POST /api/alerts/:id/acknowledge - Unknown ids are accepted and ignored
async fn acknowledge_alert(
    State(state): State<Arc<DashboardAppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.acknowledge_alert(&id);
    StatusCode::NO_CONTENT
}

/// GET /api/efficiency - Rolling history plus headline summary
async fn get_efficiency(State(state): State<Arc<DashboardAppState>>) -> Json<EfficiencyResponse> {
    let history = state.store.efficiency_data();
    let devices = state.store.devices();
    let summary = summarize_efficiency(&history, &devices);

    Json(EfficiencyResponse { history, summary })
}

/// GET /api/suggestions
///
/// Query parameters:
/// - `category`: energy | maintenance | performance | optimization
/// - `impact`: low | medium | high
/// - `sort`: priority (default) | savings | impact
async fn list_suggestions(
    State(state): State<Arc<DashboardAppState>>,
    Query(filter): Query<SuggestionFilter>,
) -> Json<SuggestionListResponse> {
    let suggestions = state.store.ai_suggestions();
    let totals = SuggestionTotals::from_suggestions(&suggestions);

    let entries = filter_suggestions(&suggestions, &filter)
        .into_iter()
        .map(|suggestion| SuggestionEntry {
            monthly_savings: monthly_savings(&suggestion),
            suggestion,
        })
        .collect();

    Json(SuggestionListResponse {
        suggestions: entries,
        totals,
    })
}

/// GET /api/reports/:kind - efficiency | devices | alerts
async fn get_report(
    State(state): State<Arc<DashboardAppState>>,
    Path(kind): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let kind: ReportKind = kind.parse().map_err(ApiError::BadRequest)?;
    let snapshot = state.store.snapshot();

    Ok(Json(build_report(kind, &snapshot, Utc::now())))
}

/// POST /api/refresh - Regenerate every collection
async fn refresh(State(state): State<Arc<DashboardAppState>>) -> Json<DashboardSnapshot> {
    info!("Dashboard refresh requested");
    state.store.refresh_data();
    Json(state.store.snapshot())
}

/// Dashboard API error types
#[derive(Debug)]
enum ApiError {
    NotFound(&'static str),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}
