// Integration tests for the dashboard HTTP routes

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use iotdash::api::{create_dashboard_router, DashboardAppState};
use iotdash::config::SimulationConfig;
use iotdash::store::DashboardStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn create_store() -> Arc<DashboardStore> {
    let store = DashboardStore::new(SimulationConfig {
        seed: Some(2024),
        ..SimulationConfig::default()
    });
    store.initialize();
    Arc::new(store)
}

fn create_test_app(store: Arc<DashboardStore>) -> Router {
    create_dashboard_router(Arc::new(DashboardAppState { store }))
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_dashboard_snapshot() {
    let app = create_test_app(create_store());

    let response = app.oneshot(request("GET", "/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["devices"].as_array().unwrap().len(), 12);
    assert_eq!(body["alerts"].as_array().unwrap().len(), 8);
    assert_eq!(body["efficiencyData"].as_array().unwrap().len(), 20);
    assert!(!body["aiSuggestions"].as_array().unwrap().is_empty());

    let device = &body["devices"][0];
    assert_eq!(device["id"], "device-1");
    assert!(device["type"].is_string());
    assert!(device["currentValue"].is_number());
    assert_eq!(device["normalRange"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_device_filters() {
    let app = create_test_app(create_store());

    let response = app
        .oneshot(request("GET", "/api/devices?type=temperature"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let devices = body["devices"].as_array().unwrap();
    assert!(!devices.is_empty());
    assert!(devices.iter().all(|d| d["type"] == "temperature"));
    for device in devices {
        let value = device["currentValue"].as_f64().unwrap();
        let lo = device["normalRange"][0].as_f64().unwrap();
        let hi = device["normalRange"][1].as_f64().unwrap();
        assert_eq!(device["inRange"], lo <= value && value <= hi);
    }
    assert_eq!(body["total"], 12);
    assert_eq!(body["activeFilters"], 1);
}

#[tokio::test]
async fn test_invalid_filter_value_rejected() {
    let app = create_test_app(create_store());

    let response = app
        .oneshot(request("GET", "/api/devices?status=melting"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_device_returns_404() {
    let app = create_test_app(create_store());

    let response = app
        .oneshot(request("GET", "/api/devices/device-404"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Device not found");
}

#[tokio::test]
async fn test_acknowledge_alert() {
    let store = create_store();
    let app = create_test_app(Arc::clone(&store));

    let response = app
        .clone()
        .oneshot(request("POST", "/api/alerts/alert-3/acknowledge"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let alert = store
        .alerts()
        .into_iter()
        .find(|a| a.id == "alert-3")
        .unwrap();
    assert!(alert.acknowledged);

    let response = app
        .oneshot(request("GET", "/api/alerts?status=acknowledged"))
        .await
        .unwrap();
    let body = json_body(response).await;
    let ids: Vec<&str> = body["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["id"].as_str())
        .collect();
    assert!(ids.contains(&"alert-3"));
}

#[tokio::test]
async fn test_acknowledge_unknown_alert_is_accepted() {
    let store = create_store();
    let before = store.alerts();
    let app = create_test_app(Arc::clone(&store));

    let response = app
        .oneshot(request("POST", "/api/alerts/alert-999/acknowledge"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.alerts(), before);
}

#[tokio::test]
async fn test_efficiency_endpoint() {
    let app = create_test_app(create_store());

    let response = app.oneshot(request("GET", "/api/efficiency")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 20);
    assert_eq!(
        body["summary"]["currentScore"],
        history.last().unwrap()["overallScore"]
    );
    assert_eq!(body["summary"]["totalDevices"], 12);
}

#[tokio::test]
async fn test_suggestions_sorted_by_savings() {
    let app = create_test_app(create_store());

    let response = app
        .oneshot(request("GET", "/api/suggestions?sort=savings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let savings: Vec<u64> = body["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["estimatedSavings"].as_u64().unwrap())
        .collect();
    assert!(savings.windows(2).all(|w| w[0] >= w[1]));
    assert!(body["suggestions"][0]["monthlySavings"].is_number());
}

#[tokio::test]
async fn test_reports() {
    let store = create_store();

    for kind in ["efficiency", "devices", "alerts"] {
        let app = create_test_app(Arc::clone(&store));
        let response = app
            .oneshot(request("GET", &format!("/api/reports/{}", kind)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["kind"], kind);
        assert!(body["generatedAt"].is_string());
    }

    let app = create_test_app(store);
    let response = app
        .oneshot(request("GET", "/api/reports/weather"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_regenerates_collections() {
    let store = create_store();
    for _ in 0..3 {
        store.tick(chrono::Utc::now());
    }
    assert_eq!(store.efficiency_data().len(), 23);

    let app = create_test_app(Arc::clone(&store));
    let response = app.oneshot(request("POST", "/api/refresh")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["efficiencyData"].as_array().unwrap().len(), 20);
    assert_eq!(store.efficiency_data().len(), 20);
}
