//! Coach and trainee ledger screens.
//!
//! The screen is in list mode until a row is selected, then in detail mode
//! for that party. The date filter applies to whichever mode is showing.

use wire::{LedgerDetail, LedgerRow, RecordId};

use crate::net::ClientError;
use crate::state::ledger::{LedgerKind, LedgerSlice};
use crate::state::slice::DateRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerView {
    List,
    Detail(RecordId),
}

pub struct LedgerPage {
    ledger: LedgerSlice,
    range: DateRange,
    view: LedgerView,
}

impl LedgerPage {
    #[must_use]
    pub fn new(ledger: LedgerSlice) -> Self {
        Self { ledger, range: DateRange::default(), view: LedgerView::List }
    }

    /// Start with a date filter already applied.
    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn kind(&self) -> LedgerKind {
        self.ledger.kind()
    }

    #[must_use]
    pub fn ledger(&self) -> &LedgerSlice {
        &self.ledger
    }

    #[must_use]
    pub fn view(&self) -> LedgerView {
        self.view
    }

    #[must_use]
    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// # Errors
    ///
    /// The list failure, also recorded in the list slot.
    pub async fn mount(&self) -> Result<Vec<LedgerRow>, ClientError> {
        self.ledger.list(&self.range).await
    }

    /// Enter detail mode for `id` and fetch its ledger.
    ///
    /// # Errors
    ///
    /// The detail failure, also recorded in the detail fetch slot.
    pub async fn select(&mut self, id: RecordId) -> Result<Option<LedgerDetail>, ClientError> {
        self.view = LedgerView::Detail(id);
        self.ledger.fetch_detail(id, &self.range).await
    }

    /// Return to the list and drop the loaded detail.
    pub fn back(&mut self) {
        self.view = LedgerView::List;
        self.ledger.clear_detail();
    }

    /// Store a new date filter and refetch the active view.
    ///
    /// # Errors
    ///
    /// The failure of the refetch, recorded in its slot.
    pub async fn apply_dates(&mut self, range: DateRange) -> Result<(), ClientError> {
        self.range = range;
        match self.view {
            LedgerView::List => self.ledger.list(&self.range).await.map(drop),
            LedgerView::Detail(id) => self.ledger.fetch_detail(id, &self.range).await.map(drop),
        }
    }

    #[must_use]
    pub fn search(&self, term: &str) -> Vec<LedgerRow> {
        self.ledger.search(term)
    }

    pub fn unmount(&self) {
        self.ledger.clear_all_errors();
        self.ledger.clear_detail();
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
