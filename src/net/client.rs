use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use super::{ApiRequest, ClientError, Method, QueryPairs, RequestBody, Transport};

/// Transport plus the current bearer token.
///
/// Cloning is cheap; clones share the token, so a login through one clone is
/// seen by every slice holding another.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    bearer: Arc<watch::Sender<Option<String>>>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (bearer, _) = watch::channel(None);
        Self { transport, bearer: Arc::new(bearer) }
    }

    /// Replace the token attached to subsequent requests.
    pub fn set_bearer(&self, token: Option<String>) {
        self.bearer.send_replace(token);
    }

    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.bearer.borrow().clone()
    }

    /// Send with `Authorization: Bearer` when a token is held.
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`ClientError`].
    pub async fn send(&self, mut request: ApiRequest) -> Result<Value, ClientError> {
        if request.bearer.is_none() {
            request.bearer = self.bearer();
        }
        self.transport.send(request).await
    }

    /// Send without any token (login).
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`ClientError`].
    pub async fn send_anonymous(&self, mut request: ApiRequest) -> Result<Value, ClientError> {
        request.bearer = None;
        self.transport.send(request).await
    }

    /// # Errors
    ///
    /// Propagates the transport's [`ClientError`].
    pub async fn get(&self, path: &str, query: QueryPairs) -> Result<Value, ClientError> {
        self.send(ApiRequest::new(Method::Get, path).with_query(query)).await
    }

    /// # Errors
    ///
    /// Propagates the transport's [`ClientError`].
    pub async fn post(&self, path: &str, body: RequestBody) -> Result<Value, ClientError> {
        self.send(ApiRequest::new(Method::Post, path).with_body(body)).await
    }

    /// # Errors
    ///
    /// Propagates the transport's [`ClientError`].
    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.send(ApiRequest::new(Method::Delete, path)).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
