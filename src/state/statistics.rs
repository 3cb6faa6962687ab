//! Dashboard statistics.

use serde_json::Value;
use wire::DashboardStatistics;

use super::record_slot::{RecordSlot, SlotOp, SlotState};
use super::slice::DateRange;
use crate::net::{ApiClient, ClientError};

#[derive(Clone)]
pub struct StatisticsSlice {
    slot: RecordSlot<DashboardStatistics>,
}

impl StatisticsSlice {
    #[must_use]
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self { slot: RecordSlot::new(client, path) }
    }

    #[must_use]
    pub fn statistics(&self) -> Option<DashboardStatistics> {
        self.slot.value()
    }

    #[must_use]
    pub fn snapshot(&self) -> SlotState<DashboardStatistics> {
        self.slot.snapshot()
    }

    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the fetch slot.
    pub async fn fetch(&self, range: &DateRange) -> Result<Option<DashboardStatistics>, ClientError> {
        self.slot.fetch_with("", range.to_pairs(), decode_statistics).await
    }

    pub fn clear_error(&self) {
        self.slot.clear_error(SlotOp::Fetch);
    }

    pub fn clear(&self) {
        self.slot.clear();
    }
}

/// Figures sit under `data` when wrapped, else at the top level.
fn decode_statistics(body: Value) -> Result<Option<DashboardStatistics>, ClientError> {
    let figures = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(inner)) => inner,
            Some(Value::Null) => return Ok(None),
            Some(other) => {
                map.insert("data".to_owned(), other);
                map
            }
            None => map,
        },
        Value::Null => return Ok(None),
        _ => return Err(ClientError::Decode("statistics must be an object".into())),
    };
    Ok(Some(DashboardStatistics(figures)))
}

#[cfg(test)]
#[path = "statistics_test.rs"]
mod tests;
