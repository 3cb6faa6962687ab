use serde_json::Value;
use wire::FormPayload;

use super::ClientError;

/// Query-string pairs in send order.
pub type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(FormPayload),
}

impl RequestBody {
    /// A form without attachments is sent as a plain JSON object.
    #[must_use]
    pub fn from_payload(payload: FormPayload) -> Self {
        if payload.is_multipart() { Self::Form(payload) } else { Self::Json(payload.to_json()) }
    }
}

/// One API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path below the base URL, e.g. `/super-admin/users`.
    pub path: String,
    pub query: QueryPairs,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: RequestBody::Empty, bearer: None }
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryPairs) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Query value for `key`, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends an [`ApiRequest`] and returns the decoded JSON body of a 2xx response.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// [`ClientError::Network`] when no response arrives,
    /// [`ClientError::Api`] for non-2xx statuses, and
    /// [`ClientError::Decode`] when a 2xx body is not JSON.
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError>;
}
