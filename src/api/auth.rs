//! Credential exchange and token-based identity retrieval. These calls
//! return errors instead of notifying directly: the session store branches
//! on the outcome and owns the user-facing messaging.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::Identity;

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Successful login: a bearer token plus the identity fields the backend
/// bundles into the same response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(flatten)]
    pub identity: Identity,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub access_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// POST /login. Unauthenticated; the caller persists the returned token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = Credentials { username, password };
        self.send(self.post("/login").json(&body)).await
    }

    /// POST /register. Returns a token only; the authoritative identity is
    /// fetched separately.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<RegisterResponse> {
        let body = Credentials { username, password };
        self.send(self.post("/register").json(&body)).await
    }

    /// GET /api/user: exchange the persisted token for the authoritative
    /// identity. Fails with `Unauthorized` when the token is invalid or
    /// expired.
    pub async fn fetch_identity(&self) -> ApiResult<Identity> {
        self.send(self.authed(self.get("/api/user"))).await
    }
}
