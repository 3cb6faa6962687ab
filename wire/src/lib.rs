//! Shared REST wire model for the admin API.
//!
//! This crate owns the representation of everything that crosses the HTTP
//! boundary: record DTOs, the list/mutation envelope, pagination metadata,
//! and form payloads that may carry binary attachments.
//!
//! DESIGN
//! ======
//! The backend returns the same logical data in several shapes (bare arrays,
//! `{data: [...]}`, `{data: {...}}`, doubly wrapped objects). [`Envelope`]
//! classifies a body once, at the transport boundary, so state code only ever
//! sees `Vec<R>` or `Option<R>`.

mod envelope;
mod ledger;
mod payload;
mod records;

pub use envelope::{Envelope, PageMeta};
pub use ledger::{LedgerDetail, LedgerRow, coach_ledger_detail, trainee_ledger_detail};
pub use payload::{Attachment, FormPayload};
pub use records::{
    APP_IMAGES_KEY, Answer, AppSettings, Country, Credentials, DashboardStatistics, LocalizedText, LoginResponse, Question,
    QuestionGroup, Role, Slide, Topic, UserProfile, UserRecord, resolve_settings,
};

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Server-assigned record identifier.
pub type RecordId = u64;

/// Error returned when a response body does not decode into the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A JSON value could not be deserialized into the target type.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The body classified into a shape the caller cannot use.
    #[error("unexpected response shape: expected {0}")]
    UnexpectedShape(&'static str),
}

/// A REST record addressable by identifier.
pub trait Record: Clone + std::fmt::Debug + DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Identifier used to match records for update and delete.
    fn id(&self) -> RecordId;
}

/// A record that supports soft deletion and restore.
pub trait SoftDelete: Record {
    /// Whether the record currently carries a tombstone marker.
    fn is_deleted(&self) -> bool;

    /// Remove the tombstone marker in place.
    fn clear_tombstone(&mut self);
}

/// Overlay the top-level fields of `patch` onto `current`.
///
/// Fields absent from `patch` keep their current value; a non-object patch
/// leaves the record unchanged.
///
/// # Errors
///
/// Returns [`WireError::Decode`] if the merged object no longer fits `R`.
pub fn merge_record<R: Record>(current: &R, patch: &Value) -> Result<R, WireError> {
    let Value::Object(patch) = patch else {
        return Ok(current.clone());
    };
    let mut merged = serde_json::to_value(current)?;
    if let Value::Object(fields) = &mut merged {
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
    }
    Ok(serde_json::from_value(merged)?)
}

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| D::Error::custom(format!("expected record id, got {value}")))
}

pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    id_from_value(&value)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected record id, got {value}")))
}

/// Read an identifier from a JSON number or numeric string.
#[must_use]
pub fn id_from_value(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
