//! Back-office REST API client.
//!
//! Attaches the session's bearer token to every request, maps transport and
//! HTTP failures onto [`BackofficeError`], and revokes the session when a
//! token-bearing request outside `/auth/` is answered with 401/403.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::BackofficeConfig;
use crate::error::{friendly_error, status_error, BackofficeError, Result};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &BackofficeConfig, session: Arc<Session>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackofficeError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<R> {
        let value = self.request(Method::GET, path, query, None::<&()>).await?;
        decode(value)
    }

    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let value = self.request(Method::POST, path, &[], Some(body)).await?;
        decode(value)
    }

    pub async fn put<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let value = self.request(Method::PUT, path, &[], Some(body)).await?;
        decode(value)
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let value = self.request(Method::DELETE, path, &[], None::<&()>).await?;
        decode(value)
    }

    /// Perform one request and return the JSON body (`Null` for empty bodies).
    ///
    /// `path` should include the leading slash, e.g. `/customers/42`.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let request_id = Uuid::new_v4();

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("X-Request-Id", request_id.to_string());
        if !query.is_empty() {
            req = req.query(query);
        }
        let token = self.session.bearer_token();
        if let Some(token) = token.as_ref() {
            req = req.bearer_auth(token.as_str());
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        debug!(%method, path, %request_id, "sending back-office request");
        let resp = req.send().await.map_err(|e| {
            let message = friendly_error(&self.base_url, &e);
            warn!(%method, path, %request_id, error = %message, "request failed");
            BackofficeError::Network(message)
        })?;

        let status = resp.status();
        let body_text = resp.text().await.map_err(|e| {
            let message = friendly_error(&self.base_url, &e);
            warn!(
                %method,
                path,
                %request_id,
                status = status.as_u16(),
                error = %message,
                "response body unreadable"
            );
            BackofficeError::Network(message)
        })?;
        let result = interpret_response(status, &body_text);

        match &result {
            Err(BackofficeError::Unauthorized(reason))
                if revokes_session(path, token.is_some()) =>
            {
                self.session.force_logout(reason);
            }
            Err(e) => {
                warn!(
                    %method,
                    path,
                    %request_id,
                    status = status.as_u16(),
                    error = %e,
                    "request rejected"
                );
            }
            Ok(_) => {}
        }
        result
    }
}

/// A 401/403 tears the session down only when the request was sent with
/// the session's token and was not itself part of an account flow (a wrong
/// password on `/auth/login` must not sign anyone out).
fn revokes_session(path: &str, sent_token: bool) -> bool {
    sent_token && !path.starts_with("/auth/")
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| BackofficeError::Decode(e.to_string()))
}

/// Map a status + body onto the error taxonomy, preserving the server's
/// message and validation details when the body carries them.
pub(crate) fn interpret_response(status: StatusCode, body_text: &str) -> Result<Value> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BackofficeError::Unauthorized(format!(
            "{} (HTTP {})",
            error_message(status, body_text),
            status.as_u16()
        )));
    }

    if !status.is_success() {
        return Err(BackofficeError::Server {
            status: status.as_u16(),
            message: error_message(status, body_text),
        });
    }

    if body_text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body_text)
        .map_err(|e| BackofficeError::Decode(format!("Invalid JSON from back-office API: {e}")))
}

/// Server-supplied `message`/`error` (plus `details`/`errors`), falling back
/// to the generic text for `status`.
fn error_message(status: StatusCode, body_text: &str) -> String {
    let trimmed = body_text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(json) => {
            let message = json
                .get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(|s| s.to_string())
                .unwrap_or_else(|| status_error(status));
            match json.get("details").or_else(|| json.get("errors")) {
                Some(details) => format!("{message}: {details}"),
                None => message,
            }
        }
        Err(_) if !trimmed.is_empty() => format!("{}: {trimmed}", status_error(status)),
        Err(_) => status_error(status),
    }
}
