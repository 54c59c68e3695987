// One function per backend endpoint, grouped by area. Every function owns
// its failure handling: non-2xx statuses and malformed bodies become an
// `ApiError` here and never leak transport shapes to callers.

pub mod auth;
pub mod chat;
pub mod courses;
pub mod posts;
pub mod users;

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::TokenStore;
use crate::error::{ApiError, ApiResult};
use crate::notify::Notifier;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            notifier,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Attach `Authorization: Bearer <token>` when a token is persisted.
    /// The token is read fresh on every request.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the JSON body into `T`. Any non-2xx status
    /// is a failure; the JSON error body's human-readable message is kept
    /// when present.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Emit the user-facing notice for a failed action and log the cause.
    /// Pass-through on success.
    fn report<T>(&self, action: &str, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(ref err) = result {
            tracing::warn!(error = %err, "{action}");
            self.notifier.notify(action);
        }
        result
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    err: Option<String>,
}

/// The backend is inconsistent about its error key (`message` vs `err`);
/// accept either, fall back to the status line.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.err))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
