//! Scripted [`Transport`] shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{ApiClient, ApiRequest, ClientError, Transport};

pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, ClientError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(VecDeque::new()), requests: Mutex::new(Vec::new()) })
    }

    pub(crate) fn push_ok(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub(crate) fn push_err(&self, err: ClientError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn push_api_err(&self, status: u16, message: &str) {
        self.push_err(ClientError::Api { status, message: message.into() });
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request sent")
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(Value::Null))
    }
}

/// Client over a fresh mock, already holding `token`.
pub(crate) fn client_with_token(token: Option<&str>) -> (ApiClient, Arc<MockTransport>) {
    let mock = MockTransport::new();
    let client = ApiClient::new(mock.clone());
    client.set_bearer(token.map(str::to_owned));
    (client, mock)
}
