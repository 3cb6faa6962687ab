//! Auth-session state for the signed-in administrator.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route gate and by every request (bearer token); written only
//! by login and logout. Persisted through [`DurableStorage`] so a restart
//! resumes the session.
//!
//! DESIGN
//! ======
//! `authenticated` is derived from the token rather than stored next to it,
//! so the two cannot disagree.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::watch;
use tracing::{info, warn};
use wire::{Credentials, Envelope, LoginResponse, UserProfile};

use super::status::OpStatus;
use crate::net::{ApiClient, ApiRequest, ClientError, Method, RequestBody};
use crate::util::storage::DurableStorage;

pub const TOKEN_KEY: &str = "admin_dashboard_token";
pub const USER_KEY: &str = "admin_dashboard_user";
pub const LOGIN_PATH: &str = "/login";
pub const LOGIN_FAILED: &str = "Login failed";
pub const NETWORK_ERROR: &str = "Network error";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub login: OpStatus,
}

impl SessionState {
    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.login.error()
    }
}

pub struct Session {
    client: ApiClient,
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Resume from storage. A stored profile that does not parse is removed.
    #[must_use]
    pub fn restore(client: ApiClient, storage: Arc<dyn DurableStorage>) -> Self {
        let token = storage.get(TOKEN_KEY).filter(|token| !token.is_empty());
        let user = storage.get(USER_KEY).and_then(|raw| match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "stored profile unreadable; discarding");
                if let Err(e) = storage.remove(USER_KEY) {
                    warn!(error = %e, "failed to remove stored profile");
                }
                None
            }
        });
        client.set_bearer(token.clone());
        let (state, _) = watch::channel(SessionState { token, user, login: OpStatus::Idle });
        Self { client, storage, state }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().authenticated()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    /// Client-side checks run before any request.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] when a field is blank or the email is malformed.
    pub fn validate(credentials: &Credentials) -> Result<(), ClientError> {
        let email = credentials.email.trim();
        if email.is_empty() {
            return Err(ClientError::Validation("Email is required".into()));
        }
        if !looks_like_email(email) {
            return Err(ClientError::Validation("Email is invalid".into()));
        }
        if credentials.password.is_empty() {
            return Err(ClientError::Validation("Password is required".into()));
        }
        Ok(())
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// # Errors
    ///
    /// Validation failures, or the login failure reason: the server's
    /// `message`, else "Login failed", and "Network error" when the request
    /// never got a response. The reason is also recorded on the session.
    pub async fn login(&self, credentials: Credentials) -> Result<UserProfile, ClientError> {
        if let Err(err) = Self::validate(&credentials) {
            self.fail(&err);
            return Err(err);
        }
        self.state.send_modify(|state| state.login = OpStatus::Pending);

        let body = json!({ "email": credentials.email.trim(), "password": credentials.password });
        let request = ApiRequest::new(Method::Post, LOGIN_PATH).with_body(RequestBody::Json(body));
        let result = self
            .client
            .send_anonymous(request)
            .await
            .map_err(|err| normalize_login_error(&err))
            .and_then(|body| {
                Envelope::classify(body)
                    .into_record::<LoginResponse>()
                    .ok()
                    .flatten()
                    .ok_or_else(|| ClientError::Decode(LOGIN_FAILED.to_owned()))
            });

        let login = match result {
            Ok(login) => login,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        let profile = UserProfile::from(&login);
        self.persist(&login.access_token, &profile);
        self.client.set_bearer(Some(login.access_token.clone()));
        let stored = profile.clone();
        self.state.send_modify(|state| {
            state.token = Some(login.access_token);
            state.user = Some(stored);
            state.login = OpStatus::Idle;
        });
        info!(user_id = profile.id, role = %profile.role, "login succeeded");
        Ok(profile)
    }

    /// Destroy the session locally. No request is made.
    pub fn logout(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(error = %e, key, "failed to clear stored session");
            }
        }
        self.client.set_bearer(None);
        self.state.send_replace(SessionState::default());
        info!("logged out");
    }

    /// Drop a session the server no longer accepts.
    pub fn invalidate(&self, reason: &str) {
        warn!(%reason, "session invalidated");
        self.logout();
    }

    /// Replace the stored profile (after a profile edit).
    pub fn set_user(&self, profile: UserProfile) {
        match serde_json::to_string(&profile) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(USER_KEY, &raw) {
                    warn!(error = %e, "failed to persist profile");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode profile"),
        }
        self.state.send_modify(|state| state.user = Some(profile));
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.login.clear_error());
    }

    fn fail(&self, err: &ClientError) {
        warn!(error = %err, "login failed");
        let reason = err.reason().to_owned();
        self.state.send_modify(|state| state.login = OpStatus::Failed(reason));
    }

    fn persist(&self, token: &str, profile: &UserProfile) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            warn!(error = %e, "failed to persist token");
        }
        match serde_json::to_string(profile) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(USER_KEY, &raw) {
                    warn!(error = %e, "failed to persist profile");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode profile"),
        }
    }
}

/// Map transport failures onto the reasons shown on the login form.
fn normalize_login_error(err: &ClientError) -> ClientError {
    match err {
        ClientError::Network(_) => ClientError::Network(NETWORK_ERROR.to_owned()),
        ClientError::Api { status, message } => {
            let generic = reqwest::StatusCode::from_u16(*status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .is_none_or(|text| text == message);
            let message = if generic || message.is_empty() { LOGIN_FAILED.to_owned() } else { message.clone() };
            ClientError::Api { status: *status, message }
        }
        ClientError::Decode(_) => ClientError::Decode(LOGIN_FAILED.to_owned()),
        ClientError::Validation(_) => err.clone(),
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
