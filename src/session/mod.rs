// Mock authentication and the persisted user profile

mod storage;

pub use storage::LocalStorage;

use crate::model::User;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Storage key holding the signed-in user
pub const USER_STORAGE_KEY: &str = "iot-dashboard-user";

/// Credentials accepted by the mock login
pub const DEMO_EMAIL: &str = "admin@iotexdigital.com";
pub const DEMO_PASSWORD: &str = "admin123";

const MIN_PASSWORD_LEN: usize = 6;

const ADMIN_AVATAR: &str =
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?w=150&h=150&fit=crop&crop=face";
const SIGNUP_AVATAR: &str =
    "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg?w=150&h=150&fit=crop&crop=face";

/// Signup form as submitted
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Session holder for one dashboard instance
///
/// The user profile is read from storage once when opened and written on
/// every login, signup and logout.
pub struct SessionManager {
    inner: Mutex<SessionState>,
}

struct SessionState {
    storage: LocalStorage,
    user: Option<User>,
}

impl SessionManager {
    /// Open the session backed by the storage file at `path`
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let storage = LocalStorage::open(path)?;

        let user = match storage.get_item(USER_STORAGE_KEY) {
            Some(value) => match serde_json::from_value::<User>(value.clone()) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored user profile unreadable, ignoring");
                    None
                }
            },
            None => None,
        };

        if let Some(ref user) = user {
            info!(user_id = %user.id, "Restored session");
        }

        Ok(Self {
            inner: Mutex::new(SessionState { storage, user }),
        })
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    /// Sign in with the demo credentials
    pub fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        if email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }
        if password.is_empty() {
            return Err(SessionError::MissingPassword);
        }
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            warn!(email = %email, "Login rejected");
            return Err(SessionError::InvalidCredentials);
        }

        let user = User {
            id: "1".to_string(),
            email: email.to_string(),
            name: "IoTeX Admin".to_string(),
            avatar: Some(ADMIN_AVATAR.to_string()),
        };
        self.set_user(user)
    }

    /// Create a local account; any well-formed form succeeds
    pub fn signup(&self, request: &SignupRequest) -> Result<User, SessionError> {
        if request.email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }
        if request.password != request.confirm_password {
            return Err(SessionError::PasswordMismatch);
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::PasswordTooShort);
        }

        let user = User {
            id: Utc::now().timestamp_millis().to_string(),
            email: request.email.clone(),
            name: request.name.clone(),
            avatar: Some(SIGNUP_AVATAR.to_string()),
        };
        self.set_user(user)
    }

    /// Clear the signed-in user
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut state = self.lock();
        state
            .storage
            .remove_item(USER_STORAGE_KEY)
            .map_err(|e| SessionError::Storage(format!("{:#}", e)))?;

        if let Some(user) = state.user.take() {
            info!(user_id = %user.id, "Logged out");
        }
        Ok(())
    }

    fn set_user(&self, user: User) -> Result<User, SessionError> {
        let value =
            serde_json::to_value(&user).map_err(|e| SessionError::Storage(e.to_string()))?;

        let mut state = self.lock();
        state
            .storage
            .set_item(USER_STORAGE_KEY, value)
            .map_err(|e| SessionError::Storage(format!("{:#}", e)))?;
        state.user = Some(user.clone());

        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Session errors
#[derive(Debug, PartialEq, Clone)]
pub enum SessionError {
    MissingEmail,
    MissingPassword,
    PasswordMismatch,
    PasswordTooShort,
    InvalidCredentials,
    /// Profile could not be written to storage
    Storage(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::MissingEmail => write!(f, "Please enter your email address"),
            SessionError::MissingPassword => write!(f, "Please enter your password"),
            SessionError::PasswordMismatch => write!(f, "Passwords do not match"),
            SessionError::PasswordTooShort => {
                write!(f, "Password must be at least {} characters", MIN_PASSWORD_LEN)
            }
            SessionError::InvalidCredentials => write!(f, "Invalid credentials"),
            SessionError::Storage(e) => write!(f, "Session storage failed: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}
