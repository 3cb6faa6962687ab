//! Coach and trainee ledgers.
//!
//! Ledger rows are reports rather than records: they may lack an `id`, and
//! their shape differs between the coach and trainee endpoints. Rows keep the
//! raw JSON object and expose the handful of lookups the console needs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{PageMeta, Record, RecordId, WireError, deserialize_opt_id, id_from_value};

/// One row of a ledger listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(default, deserialize_with = "deserialize_opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LedgerRow {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Identifier of the coach or trainee this row belongs to.
    ///
    /// Nested `coach`/`trainee` objects win over flat `coach_id`/`trainee_id`
    /// columns; the row's own id is the last resort.
    #[must_use]
    pub fn subject_id(&self) -> Option<RecordId> {
        ["coach", "trainee"]
            .iter()
            .find_map(|party| self.fields.get(*party)?.get("id").and_then(id_from_value))
            .or_else(|| {
                ["coach_id", "trainee_id"]
                    .iter()
                    .find_map(|column| self.fields.get(*column).and_then(id_from_value))
            })
            .or(self.id)
    }

    /// Case-insensitive match on the party's name, email, phone, or total spend.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let mut haystack: Vec<&str> = Vec::new();
        for party in ["coach", "trainee"] {
            if let Some(Value::Object(info)) = self.fields.get(party) {
                for key in ["name", "user_name", "email", "phone"] {
                    if let Some(text) = info.get(key).and_then(Value::as_str) {
                        haystack.push(text);
                    }
                }
            }
        }
        for column in ["coach_name", "coach_email"] {
            if let Some(text) = self.fields.get(column).and_then(Value::as_str) {
                haystack.push(text);
            }
        }
        if let Some(total) = self.fields.get("spending").and_then(|spending| spending.get("total")) {
            if let Some(text) = total.as_str() {
                haystack.push(text);
            }
        }
        haystack.iter().any(|text| text.to_lowercase().contains(&needle))
    }
}

/// Ledger rows are read-only; a row without its own id is keyed by its subject.
impl Record for LedgerRow {
    fn id(&self) -> RecordId {
        self.id.or_else(|| self.subject_id()).unwrap_or_default()
    }
}

/// The individual ledger of one coach or trainee.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerDetail {
    /// Profile and summary figures of the coach or trainee.
    pub subject: Map<String, Value>,
    pub entries: Vec<LedgerRow>,
    pub meta: Option<PageMeta>,
}

/// Decode `GET /coach-ledger/{id}`: `{data: [...], coach: {...}, meta: {...}}`.
///
/// # Errors
///
/// Returns [`WireError`] if the body is not an object or a row fails to decode.
pub fn coach_ledger_detail(body: Value) -> Result<LedgerDetail, WireError> {
    let Value::Object(mut map) = body else {
        return Err(WireError::UnexpectedShape("coach ledger object"));
    };
    let entries = match map.remove("data") {
        Some(Value::Array(rows)) => decode_rows(rows)?,
        _ => Vec::new(),
    };
    let subject = match map.remove("coach") {
        Some(Value::Object(coach)) => coach,
        _ => Map::new(),
    };
    Ok(LedgerDetail { subject, entries, meta: decode_meta(&map) })
}

/// Decode `GET /trainee-ledger/{id}`.
///
/// The body is `{data: {trainee, subscriptions, spending, coaches}}`. The
/// subject is the trainee profile with the summary blocks folded in; the
/// entries are the per-coach rows.
///
/// # Errors
///
/// Returns [`WireError`] if `data` is neither null nor an object, or a row fails to decode.
pub fn trainee_ledger_detail(body: Value) -> Result<LedgerDetail, WireError> {
    let Value::Object(mut map) = body else {
        return Err(WireError::UnexpectedShape("trainee ledger object"));
    };
    let meta = decode_meta(&map);
    let mut data = match map.remove("data") {
        None | Some(Value::Null) => return Ok(LedgerDetail { meta, ..LedgerDetail::default() }),
        Some(Value::Object(data)) => data,
        Some(_) => return Err(WireError::UnexpectedShape("trainee ledger object")),
    };

    let mut subject = match data.remove("trainee") {
        Some(Value::Object(trainee)) => trainee,
        _ => Map::new(),
    };
    for key in ["subscriptions", "spending"] {
        if let Some(block) = data.get(key) {
            subject.insert(key.to_owned(), block.clone());
        }
    }
    let coaches = match data.remove("coaches") {
        Some(Value::Array(rows)) => rows,
        _ => Vec::new(),
    };
    subject.insert("coaches".to_owned(), Value::Array(coaches.clone()));

    Ok(LedgerDetail { subject, entries: decode_rows(coaches)?, meta })
}

fn decode_rows(rows: Vec<Value>) -> Result<Vec<LedgerRow>, WireError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(WireError::from))
        .collect()
}

fn decode_meta(map: &Map<String, Value>) -> Option<PageMeta> {
    map.get("meta")
        .and_then(|raw| serde_json::from_value::<PageMeta>(raw.clone()).ok())
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
