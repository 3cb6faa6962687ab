//! reqwest-backed [`Transport`].
//!
//! Thin wrapper: build the request, send it, map the status. Body parsing and
//! error-message extraction are pure functions so they can be tested without
//! a server.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};
use wire::FormPayload;

use super::{ApiRequest, ClientError, Method, RequestBody, Transport};
use crate::config::Timeouts;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ClientError::Network(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = request.method.as_str(), path = %request.path, "api request");

        let mut builder = self
            .http
            .request(reqwest_method(request.method), &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Form(payload) => builder.multipart(multipart_form(&payload)?),
        };

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, path = %request.path, "api request failed");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            let message = api_error_message(status, &text);
            warn!(status, path = %request.path, %message, "api error response");
            return Err(ClientError::Api { status, message });
        }

        parse_body(&text)
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_form(payload: &FormPayload) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for (key, value) in payload.form_fields() {
        form = form.text(key, value);
    }
    for (key, attachment) in payload.files() {
        let part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.mime)
            .map_err(|e| ClientError::Validation(format!("invalid attachment type: {e}")))?;
        form = form.part(key.clone(), part);
    }
    Ok(form)
}

// =============================================================================
// PARSING
// =============================================================================

/// Decode a 2xx body. An empty body (204, bare DELETE) is `null`.
pub(crate) fn parse_body(text: &str) -> Result<Value, ClientError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Message for a non-2xx response: the body's `message` field, else the
/// canonical status text.
#[must_use]
pub fn api_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .map_or_else(|| format!("HTTP {status}"), str::to_owned)
        })
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
