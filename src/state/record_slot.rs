//! Single-object resource slot.
//!
//! Settings, dashboard statistics, and ledger detail are one object rather
//! than a collection. A [`RecordSlot`] holds that object with independent
//! fetch and update status, using the same `watch`-channel state model and
//! stale-fetch guard as [`super::slice::ResourceSlice`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::status::OpStatus;
use crate::net::{ApiClient, ApiRequest, ClientError, Method, QueryPairs};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOp {
    Fetch,
    Update,
}

impl SlotOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Update => "update",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlotState<T> {
    pub value: Option<T>,
    pub fetch: OpStatus,
    pub update: OpStatus,
}

impl<T> Default for SlotState<T> {
    fn default() -> Self {
        Self { value: None, fetch: OpStatus::Idle, update: OpStatus::Idle }
    }
}

impl<T> SlotState<T> {
    fn slot_mut(&mut self, op: SlotOp) -> &mut OpStatus {
        match op {
            SlotOp::Fetch => &mut self.fetch,
            SlotOp::Update => &mut self.update,
        }
    }
}

pub struct RecordSlot<T> {
    client: ApiClient,
    path: String,
    state: Arc<watch::Sender<SlotState<T>>>,
    fetch_seq: Arc<AtomicU64>,
}

impl<T> Clone for RecordSlot<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            state: Arc::clone(&self.state),
            fetch_seq: Arc::clone(&self.fetch_seq),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> RecordSlot<T> {
    #[must_use]
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SlotState::default());
        Self { client, path: path.into(), state: Arc::new(state), fetch_seq: Arc::new(AtomicU64::new(0)) }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn snapshot(&self) -> SlotState<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SlotState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.state.borrow().value.clone()
    }

    #[must_use]
    pub fn status(&self, op: SlotOp) -> OpStatus {
        let state = self.state.borrow();
        match op {
            SlotOp::Fetch => state.fetch.clone(),
            SlotOp::Update => state.update.clone(),
        }
    }

    pub fn clear_error(&self, op: SlotOp) {
        self.state.send_modify(|state| state.slot_mut(op).clear_error());
    }

    pub fn clear_all_errors(&self) {
        self.state.send_modify(|state| {
            state.fetch.clear_error();
            state.update.clear_error();
        });
    }

    /// Drop the held value. An in-flight fetch is invalidated and its
    /// pending status settles back to idle.
    pub fn clear(&self) {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.value = None;
            if state.fetch.is_pending() {
                state.fetch = OpStatus::Idle;
            }
        });
    }

    fn fail(&self, op: SlotOp, err: &ClientError) {
        warn!(resource = %self.path, op = op.as_str(), error = %err, "record operation failed");
        let reason = err.reason().to_owned();
        self.state.send_modify(|state| *state.slot_mut(op) = OpStatus::Failed(reason));
    }

    /// `GET {sub_path}` and store whatever `decode` extracts.
    ///
    /// `sub_path` is appended to the slot path (empty for the slot itself).
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the fetch slot unless a newer
    /// fetch or a [`clear`](Self::clear) superseded this one.
    pub async fn fetch_with<F>(&self, sub_path: &str, query: QueryPairs, decode: F) -> Result<Option<T>, ClientError>
    where
        F: FnOnce(Value) -> Result<Option<T>, ClientError>,
    {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.fetch = OpStatus::Pending);

        let path = format!("{}{sub_path}", self.path);
        let result = self.client.get(&path, query).await.and_then(decode);

        if self.fetch_seq.load(Ordering::SeqCst) != seq {
            debug!(resource = %path, seq, "stale fetch response discarded");
            return result;
        }
        match result {
            Ok(value) => {
                let stored = value.clone();
                self.state.send_modify(|state| {
                    state.value = stored;
                    state.fetch = OpStatus::Idle;
                });
                Ok(value)
            }
            Err(err) => {
                self.fail(SlotOp::Fetch, &err);
                Err(err)
            }
        }
    }

    /// Send `request` and fold the response into the held value with `apply`.
    ///
    /// `apply` sees the value held when the response arrives, so a fetch that
    /// lands while the update is in flight is not overwritten.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] from the request or from `apply`, also recorded in
    /// the update slot.
    pub async fn update_with<F>(&self, request: ApiRequest, apply: F) -> Result<T, ClientError>
    where
        F: FnOnce(Option<T>, Value) -> Result<T, ClientError>,
    {
        self.state.send_modify(|state| state.update = OpStatus::Pending);
        let body = match self.client.send(request).await {
            Ok(body) => body,
            Err(err) => {
                self.fail(SlotOp::Update, &err);
                return Err(err);
            }
        };

        let mut result = None;
        self.state.send_modify(|state| match apply(state.value.clone(), body) {
            Ok(value) => {
                state.value = Some(value.clone());
                state.update = OpStatus::Idle;
                result = Some(Ok(value));
            }
            Err(err) => result = Some(Err(err)),
        });
        match result {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => {
                self.fail(SlotOp::Update, &err);
                Err(err)
            }
            None => Err(ClientError::Decode("update result was not applied".into())),
        }
    }

    /// Record a failure detected before any request was sent.
    pub fn reject_update(&self, err: &ClientError) {
        self.fail(SlotOp::Update, err);
    }

    /// `POST {path}/{id}?_method=put`, the form-update convention of the backend.
    #[must_use]
    pub fn spoofed_put(&self, id: wire::RecordId) -> ApiRequest {
        ApiRequest::new(Method::Post, format!("{}/{id}", self.path))
            .with_query(vec![("_method".to_owned(), "put".to_owned())])
    }
}

#[cfg(test)]
#[path = "record_slot_test.rs"]
mod tests;
