// HTTP and WebSocket APIs

pub mod dashboard;
pub mod session;
pub mod websocket;

pub use dashboard::{create_dashboard_router, DashboardAppState};
pub use session::{create_session_router, SessionAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::session::SessionManager;
use crate::store::DashboardStore;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Merge every API router over the shared store and session
pub fn create_app(store: Arc<DashboardStore>, session: Arc<SessionManager>) -> Router {
    let dashboard_state = Arc::new(DashboardAppState {
        store: Arc::clone(&store),
    });
    let ws_state = Arc::new(WsAppState { store });
    let session_state = Arc::new(SessionAppState { session });

    Router::new()
        .merge(create_dashboard_router(dashboard_state))
        .merge(create_ws_router(ws_state))
        .merge(create_session_router(session_state))
        .layer(CorsLayer::permissive())
}
