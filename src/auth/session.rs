use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::TokenStore;
use crate::error::ApiError;
use crate::models::Identity;
use crate::notify::Notifier;

/// Who is using the client right now. Owns the in-memory identity and the
/// persisted bearer token; injected into page containers rather than
/// accessed as ambient global state.
///
/// None of these operations propagate errors: login/register report success
/// as a boolean, logout and restore always leave the store in a consistent
/// state.
pub struct SessionStore {
    api: Arc<ApiClient>,
    tokens: TokenStore,
    notifier: Arc<dyn Notifier>,
    identity: Option<Identity>,
}

impl SessionStore {
    pub fn new(api: Arc<ApiClient>, tokens: TokenStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            tokens,
            notifier,
            identity: None,
        }
    }

    /// Recomputed from the identity on every call, never cached separately.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Exchange credentials for a bearer token. On success the token is
    /// persisted and the identity from the login response becomes current.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        match self.api.login(username, password).await {
            Ok(resp) => {
                if let Err(err) = self.tokens.save(&resp.access_token) {
                    tracing::error!("Failed to persist session token: {err}");
                    self.notifier.notify("Login failed");
                    return false;
                }
                tracing::info!(username = %resp.identity.username, "Logged in");
                self.identity = Some(resp.identity);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Login rejected");
                let notice = match err {
                    ApiError::Status { .. } | ApiError::Unauthorized => {
                        "Login failed: invalid username or password"
                    }
                    _ => "Login error",
                };
                self.notifier.notify(notice);
                false
            }
        }
    }

    /// Create an account. The register response carries only a token, so
    /// the identity is provisional (zero karma, no enrollments) until the
    /// next authoritative fetch fills it in.
    pub async fn register(&mut self, username: &str, password: &str) -> bool {
        match self.api.register(username, password).await {
            Ok(resp) => {
                if let Err(err) = self.tokens.save(&resp.access_token) {
                    tracing::error!("Failed to persist session token: {err}");
                    self.notifier.notify("Registration failed");
                    return false;
                }
                self.identity = Some(Identity {
                    // Not in the register response; the next fetch fills it.
                    id: String::new(),
                    username: username.to_string(),
                    profile_picture: None,
                    enrolled_courses: Vec::new(),
                    karma: 0,
                });
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Registration rejected");
                self.notifier
                    .notify("Registration failed: username may already exist");
                false
            }
        }
    }

    /// Clear the persisted token and the in-memory identity. Takes effect
    /// locally without a server round-trip and works with no prior session.
    pub fn logout(&mut self) {
        self.tokens.clear();
        self.identity = None;
    }

    /// On application start: if a token is persisted, exchange it for the
    /// authoritative identity. An invalid or expired token is cleared and
    /// the session stays unauthenticated.
    pub async fn restore(&mut self) {
        if self.tokens.load().is_none() {
            return;
        }
        match self.api.fetch_identity().await {
            Ok(identity) => {
                tracing::debug!(username = %identity.username, "Session restored");
                self.identity = Some(identity);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Stored session token rejected");
                self.tokens.clear();
                self.identity = None;
                self.notifier.notify("Authentication failed");
            }
        }
    }

    /// Replace a provisional or stale identity with the backend's current
    /// view (enrollments and karma change server-side).
    pub async fn refresh_identity(&mut self) {
        match self.api.fetch_identity().await {
            Ok(identity) => self.identity = Some(identity),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to refresh identity");
            }
        }
    }
}
