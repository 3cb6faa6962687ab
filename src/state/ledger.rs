//! Coach and trainee ledgers: a filtered listing plus one individual ledger.

use wire::{LedgerDetail, LedgerRow, RecordId, coach_ledger_detail, trainee_ledger_detail};

use super::record_slot::{RecordSlot, SlotState};
use super::slice::{DateRange, ListQuery, ResourceSlice, SliceState};
use crate::net::{ApiClient, ClientError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerKind {
    Coaches,
    Trainees,
}

impl LedgerKind {
    /// Resource path segment below the role prefix.
    #[must_use]
    pub fn resource(self) -> &'static str {
        match self {
            Self::Coaches => "coach-ledger",
            Self::Trainees => "trainee-ledger",
        }
    }

    fn decode_detail(self, body: serde_json::Value) -> Result<LedgerDetail, ClientError> {
        let detail = match self {
            Self::Coaches => coach_ledger_detail(body)?,
            Self::Trainees => trainee_ledger_detail(body)?,
        };
        Ok(detail)
    }
}

#[derive(Clone)]
pub struct LedgerSlice {
    kind: LedgerKind,
    rows: ResourceSlice<LedgerRow>,
    detail: RecordSlot<LedgerDetail>,
}

impl LedgerSlice {
    /// `path` is the full ledger path, e.g. `/super-admin/coach-ledger`.
    #[must_use]
    pub fn new(client: ApiClient, kind: LedgerKind, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind,
            rows: ResourceSlice::new(client.clone(), path.clone()),
            detail: RecordSlot::new(client, path),
        }
    }

    #[must_use]
    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    #[must_use]
    pub fn rows(&self) -> &ResourceSlice<LedgerRow> {
        &self.rows
    }

    #[must_use]
    pub fn list_state(&self) -> SliceState<LedgerRow> {
        self.rows.snapshot()
    }

    #[must_use]
    pub fn detail_state(&self) -> SlotState<LedgerDetail> {
        self.detail.snapshot()
    }

    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the list slot.
    pub async fn list(&self, range: &DateRange) -> Result<Vec<LedgerRow>, ClientError> {
        self.rows.list(ListQuery::default().dates(range)).await
    }

    /// Fetch the individual ledger of one coach or trainee.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the detail fetch slot.
    pub async fn fetch_detail(&self, id: RecordId, range: &DateRange) -> Result<Option<LedgerDetail>, ClientError> {
        let kind = self.kind;
        self.detail
            .fetch_with(&format!("/{id}"), range.to_pairs(), move |body| kind.decode_detail(body).map(Some))
            .await
    }

    /// Drop the individual ledger when leaving the detail view.
    pub fn clear_detail(&self) {
        self.detail.clear();
    }

    /// Loaded rows matching `term` on the party's name, email, phone, or spend.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<LedgerRow> {
        self.rows
            .items()
            .into_iter()
            .filter(|row| row.matches(term))
            .collect()
    }

    pub fn clear_list_error(&self) {
        self.rows.clear_all_errors();
    }

    pub fn clear_detail_error(&self) {
        self.detail.clear_all_errors();
    }

    pub fn clear_all_errors(&self) {
        self.clear_list_error();
        self.clear_detail_error();
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
