use crate::model::User;
use crate::session::{SessionError, SessionManager, SignupRequest};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for session API
pub struct SessionAppState {
    pub session: Arc<SessionManager>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create session API router
pub fn create_session_router(state: Arc<SessionAppState>) -> Router {
    Router::new()
        .route("/api/session", get(get_session).delete(logout))
        .route("/api/session/login", post(login))
        .route("/api/session/signup", post(signup))
        .with_state(state)
}

/// GET /api/session - Current user, if any
async fn get_session(State(state): State<Arc<SessionAppState>>) -> Json<SessionResponse> {
    let user = state.session.current_user();
    Json(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}

/// POST /api/session/login
async fn login(
    State(state): State<Arc<SessionAppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, SessionError> {
    state
        .session
        .login(&request.email, &request.password)
        .map(Json)
}

/// POST /api/session/signup
async fn signup(
    State(state): State<Arc<SessionAppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), SessionError> {
    let user = state.session.signup(&request)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /api/session - Log out; succeeds when already signed out
async fn logout(State(state): State<Arc<SessionAppState>>) -> Result<StatusCode, SessionError> {
    state.session.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match self {
            SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            SessionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::MissingEmail
            | SessionError::MissingPassword
            | SessionError::PasswordMismatch
            | SessionError::PasswordTooShort => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DEMO_EMAIL, DEMO_PASSWORD};
    use tempfile::TempDir;

    fn create_test_state(dir: &TempDir) -> Arc<SessionAppState> {
        let session = SessionManager::open(dir.path().join("session.json")).unwrap();
        Arc::new(SessionAppState {
            session: Arc::new(session),
        })
    }

    #[tokio::test]
    async fn test_login_then_session() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);

        let request = LoginRequest {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        };
        let user = login(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(user.0.id, "1");

        let current = get_session(State(state)).await;
        assert!(current.0.authenticated);
        assert_eq!(current.0.user.map(|u| u.id), Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);

        let request = LoginRequest {
            email: DEMO_EMAIL.to_string(),
            password: "nope".to_string(),
        };
        let result = login(State(state), Json(request)).await;
        assert_eq!(result.err(), Some(SessionError::InvalidCredentials));
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            SessionError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SessionError::PasswordMismatch.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SessionError::Storage("disk full".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
