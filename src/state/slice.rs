//! Generic resource slice.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every list-shaped admin resource (users, slides, topics, question groups,
//! questions, ledgers, countries) is a `ResourceSlice<R>` bound to one REST
//! base path. Page controllers call its operations; views subscribe to its
//! state.
//!
//! DESIGN
//! ======
//! - State lives in a `watch` channel and every transition is a single
//!   `send_modify`, so subscribers never see a half-applied update and no lock
//!   is held across a request.
//! - Each operation kind owns an [`OpStatus`] slot. Failures are recorded in
//!   the slot and also returned to the caller.
//! - A failed list keeps the previous collection (stale but available).
//! - Overlapping `list` calls are sequenced: only the most recently issued
//!   list may apply its response.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};
use wire::{Envelope, FormPayload, PageMeta, Record, RecordId, SoftDelete};

use super::pagination::PageCursor;
use super::status::{OpKind, OpStatus};
use crate::net::{ApiClient, ApiRequest, ClientError, Method, QueryPairs, RequestBody};

// =============================================================================
// QUERY
// =============================================================================

/// Filter parameters of a list fetch. Blank values are never sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub role: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = non_blank(role.into());
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = non_blank(term.into());
        self
    }

    #[must_use]
    pub fn date_range(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.date_from = from.and_then(non_blank);
        self.date_to = to.and_then(non_blank);
        self
    }

    #[must_use]
    pub fn dates(self, range: &DateRange) -> Self {
        self.date_range(range.from.clone(), range.to.clone())
    }

    #[must_use]
    pub fn to_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_owned(), page.to_string()));
        }
        let text = [
            ("role", &self.role),
            ("search", &self.search),
            ("date_from", &self.date_from),
            ("date_to", &self.date_to),
        ];
        for (key, value) in text {
            if let Some(value) = value {
                pairs.push((key.to_owned(), value.clone()));
            }
        }
        pairs
    }
}

/// Optional `date_from`/`date_to` filter (`YYYY-MM-DD`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    #[must_use]
    pub fn new(from: Option<String>, to: Option<String>) -> Self {
        Self { from: from.and_then(non_blank), to: to.and_then(non_blank) }
    }

    #[must_use]
    pub fn to_pairs(&self) -> QueryPairs {
        ListQuery::default().dates(self).to_pairs()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct SliceState<R> {
    pub items: Vec<R>,
    pub cursor: PageCursor,
    /// Filter of the last list fetch; page changes reuse it.
    pub last_query: ListQuery,
    pub list: OpStatus,
    pub create: OpStatus,
    pub update: OpStatus,
    pub delete: OpStatus,
    pub restore: OpStatus,
}

impl<R> Default for SliceState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::default(),
            last_query: ListQuery::default(),
            list: OpStatus::Idle,
            create: OpStatus::Idle,
            update: OpStatus::Idle,
            delete: OpStatus::Idle,
            restore: OpStatus::Idle,
        }
    }
}

impl<R: Record> SliceState<R> {
    #[must_use]
    pub fn status(&self, kind: OpKind) -> &OpStatus {
        match kind {
            OpKind::List => &self.list,
            OpKind::Create => &self.create,
            OpKind::Update => &self.update,
            OpKind::Delete => &self.delete,
            OpKind::Restore => &self.restore,
        }
    }

    fn slot_mut(&mut self, kind: OpKind) -> &mut OpStatus {
        match kind {
            OpKind::List => &mut self.list,
            OpKind::Create => &mut self.create,
            OpKind::Update => &mut self.update,
            OpKind::Delete => &mut self.delete,
            OpKind::Restore => &mut self.restore,
        }
    }

    #[must_use]
    pub fn find(&self, id: RecordId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the record with the same id. Returns false when absent.
    fn replace(&mut self, record: R) -> bool {
        match self.items.iter_mut().find(|item| item.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// SLICE
// =============================================================================

pub struct ResourceSlice<R: Record> {
    client: ApiClient,
    base_path: String,
    state: Arc<watch::Sender<SliceState<R>>>,
    list_seq: Arc<AtomicU64>,
}

impl<R: Record> Clone for ResourceSlice<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_path: self.base_path.clone(),
            state: Arc::clone(&self.state),
            list_seq: Arc::clone(&self.list_seq),
        }
    }
}

impl<R: Record> ResourceSlice<R> {
    #[must_use]
    pub fn new(client: ApiClient, base_path: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SliceState::default());
        Self {
            client,
            base_path: base_path.into(),
            state: Arc::new(state),
            list_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn snapshot(&self) -> SliceState<R> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SliceState<R>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        self.state.borrow().cursor
    }

    #[must_use]
    pub fn last_query(&self) -> ListQuery {
        self.state.borrow().last_query.clone()
    }

    #[must_use]
    pub fn status(&self, kind: OpKind) -> OpStatus {
        self.state.borrow().status(kind).clone()
    }

    pub fn clear_error(&self, kind: OpKind) {
        self.state.send_modify(|state| state.slot_mut(kind).clear_error());
    }

    pub fn clear_all_errors(&self) {
        self.state.send_modify(|state| {
            for kind in OpKind::ALL {
                state.slot_mut(kind).clear_error();
            }
        });
    }

    /// Move the cursor to `page`, clamped to the known range. Returns the page set.
    pub fn set_page(&self, page: u64) -> u64 {
        let mut applied = 1;
        self.state.send_modify(|state| applied = state.cursor.set_page(page));
        applied
    }

    /// Drop every record and reset the cursor and slots.
    pub fn reset(&self) {
        self.list_seq.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SliceState::default());
    }

    fn record_path(&self, id: RecordId) -> String {
        format!("{}/{id}", self.base_path)
    }

    fn begin(&self, kind: OpKind) {
        self.state.send_modify(|state| *state.slot_mut(kind) = OpStatus::Pending);
    }

    fn fail(&self, kind: OpKind, err: &ClientError) {
        warn!(resource = %self.base_path, op = kind.as_str(), error = %err, "resource operation failed");
        let reason = err.reason().to_owned();
        self.state.send_modify(|state| *state.slot_mut(kind) = OpStatus::Failed(reason));
    }

    // -------------------------------------------------------------------------
    // OPERATIONS
    // -------------------------------------------------------------------------

    /// Fetch one page of the collection and replace it.
    ///
    /// Without pagination metadata the cursor resets to one page holding
    /// every returned record.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`]; it is also recorded in the list slot unless a
    /// newer list superseded this one.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<R>, ClientError> {
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let remembered = query.clone();
        self.state.send_modify(|state| {
            state.list = OpStatus::Pending;
            state.last_query = remembered;
        });

        let result = self
            .client
            .get(&self.base_path, query.to_pairs())
            .await
            .and_then(decode_list::<R>);

        if self.list_seq.load(Ordering::SeqCst) != seq {
            debug!(resource = %self.base_path, seq, "stale list response discarded");
            return result.map(|(items, _)| items);
        }

        match result {
            Ok((items, meta)) => {
                let cursor = meta
                    .as_ref()
                    .map_or_else(|| PageCursor::unpaginated(items.len() as u64), PageCursor::from_meta);
                let returned = items.clone();
                self.state.send_modify(|state| {
                    state.items = items;
                    state.cursor = cursor;
                    state.list = OpStatus::Idle;
                });
                debug!(resource = %self.base_path, count = returned.len(), "list applied");
                Ok(returned)
            }
            Err(err) => {
                self.fail(OpKind::List, &err);
                Err(err)
            }
        }
    }

    /// Create a record and append it. Attachments switch the body to multipart.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the create slot.
    pub async fn create(&self, payload: FormPayload) -> Result<R, ClientError> {
        self.begin(OpKind::Create);
        let result = self
            .client
            .post(&self.base_path, RequestBody::from_payload(payload))
            .await
            .and_then(|body| decode_record::<R>(body, "created record"));
        match result {
            Ok(record) => {
                let appended = record.clone();
                self.state.send_modify(|state| {
                    state.items.push(appended);
                    state.cursor.record_created();
                    state.create = OpStatus::Idle;
                });
                Ok(record)
            }
            Err(err) => {
                self.fail(OpKind::Create, &err);
                Err(err)
            }
        }
    }

    /// Update a record and replace it in place.
    ///
    /// JSON payloads go out as `PUT {base}/{id}`. Multipart payloads go out
    /// as `POST {base}/{id}?_method=put`, since the backend cannot read
    /// multipart bodies on PUT. A response without a record is treated as an
    /// acknowledgement and the sent fields are merged over the local copy;
    /// with no local copy there is nothing to return and `None` comes back.
    /// A result whose id is not in the collection is discarded.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the update slot.
    pub async fn update(&self, id: RecordId, payload: FormPayload) -> Result<Option<R>, ClientError> {
        self.begin(OpKind::Update);
        let sent_fields = payload.to_json();
        let request = if payload.is_multipart() {
            ApiRequest::new(Method::Post, self.record_path(id))
                .with_query(vec![("_method".to_owned(), "put".to_owned())])
                .with_body(RequestBody::Form(payload))
        } else {
            ApiRequest::new(Method::Put, self.record_path(id)).with_body(RequestBody::Json(sent_fields.clone()))
        };

        let result = match self.client.send(request).await {
            Ok(body) => self.updated_record(id, body, &sent_fields),
            Err(err) => Err(err),
        };
        match result {
            Ok(record) => {
                let replacement = record.clone();
                self.state.send_modify(|state| {
                    if !replacement.is_some_and(|record| state.replace(record)) {
                        debug!(resource = %self.base_path, id, "update result not in collection; discarded");
                    }
                    state.update = OpStatus::Idle;
                });
                Ok(record)
            }
            Err(err) => {
                self.fail(OpKind::Update, &err);
                Err(err)
            }
        }
    }

    fn updated_record(&self, id: RecordId, body: Value, sent_fields: &Value) -> Result<Option<R>, ClientError> {
        if let Some(record) = returned_record::<R>(body)? {
            return Ok(Some(record));
        }
        let local = self.state.borrow().find(id).cloned();
        match local {
            Some(local) => Ok(Some(wire::merge_record(&local, sent_fields)?)),
            None => Ok(None),
        }
    }

    /// Delete a record and remove it locally.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the delete slot; the record stays.
    pub async fn delete(&self, id: RecordId) -> Result<(), ClientError> {
        self.begin(OpKind::Delete);
        match self.client.delete(&self.record_path(id)).await {
            Ok(_) => {
                self.state.send_modify(|state| {
                    state.items.retain(|item| item.id() != id);
                    state.cursor.record_deleted();
                    state.delete = OpStatus::Idle;
                });
                Ok(())
            }
            Err(err) => {
                self.fail(OpKind::Delete, &err);
                Err(err)
            }
        }
    }
}

impl<R: SoftDelete> ResourceSlice<R> {
    /// Restore a soft-deleted record via `POST {base}/{id}/restore`.
    ///
    /// A returned record replaces the local one; otherwise the local
    /// tombstone is cleared. Returns the local record after the change, if
    /// the collection holds it.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the restore slot.
    pub async fn restore(&self, id: RecordId) -> Result<Option<R>, ClientError> {
        self.begin(OpKind::Restore);
        let path = format!("{}/restore", self.record_path(id));
        let result = self
            .client
            .post(&path, RequestBody::Empty)
            .await
            .and_then(returned_record::<R>);
        match result {
            Ok(returned) => {
                let mut restored = None;
                self.state.send_modify(|state| {
                    match returned {
                        Some(record) if record.id() == id => {
                            state.replace(record);
                        }
                        _ => {
                            if let Some(item) = state.items.iter_mut().find(|item| item.id() == id) {
                                item.clear_tombstone();
                            }
                        }
                    }
                    restored = state.find(id).cloned();
                    state.restore = OpStatus::Idle;
                });
                Ok(restored)
            }
            Err(err) => {
                self.fail(OpKind::Restore, &err);
                Err(err)
            }
        }
    }
}

fn decode_list<R: Record>(body: Value) -> Result<(Vec<R>, Option<PageMeta>), ClientError> {
    Ok(Envelope::classify(body).into_records::<R>()?)
}

/// Record carried by a mutation response, if any. A bare acknowledgement
/// such as `{message: "..."}` carries none.
fn returned_record<R: Record>(body: Value) -> Result<Option<R>, ClientError> {
    match Envelope::classify(body) {
        Envelope::Single(value) if value.get("id").is_none() => Ok(None),
        other => Ok(other.into_record::<R>()?),
    }
}

pub(crate) fn decode_record<R: Record>(body: Value, what: &str) -> Result<R, ClientError> {
    Envelope::classify(body)
        .into_record::<R>()?
        .ok_or_else(|| ClientError::Decode(format!("response carried no {what}")))
}

#[cfg(test)]
#[path = "slice_test.rs"]
mod tests;
