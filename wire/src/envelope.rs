//! Response envelope classification.
//!
//! List endpoints answer `{data: [...], meta: {...}, links: {...}}`, mutation
//! endpoints answer `{data: {...}}`, and a handful of endpoints answer with a
//! bare array, a bare object, or a doubly wrapped `{data: {data: [...]}}`.
//! Every body passes through [`Envelope::classify`] exactly once.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::WireError;

/// Pagination metadata attached to list responses.
///
/// Every field is optional on the wire; numbers may arrive as strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub current_page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub last_page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub per_page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub from: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub to: Option<u64>,
}

/// Canonical shape of a response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope {
    /// A sequence of records, with pagination metadata when the server sent it.
    Collection { items: Vec<Value>, meta: Option<PageMeta> },
    /// Exactly one record.
    Single(Value),
    /// No payload (`null`, `{}`, or `{data: null}`).
    Empty,
}

impl Envelope {
    /// Classify a raw JSON body into its canonical shape.
    #[must_use]
    pub fn classify(body: Value) -> Self {
        match body {
            Value::Null => Self::Empty,
            Value::Array(items) => Self::Collection { items, meta: None },
            Value::Object(mut map) => {
                let Some(data) = map.remove("data") else {
                    return if map.is_empty() { Self::Empty } else { Self::Single(Value::Object(map)) };
                };
                let meta = map
                    .get("meta")
                    .and_then(|raw| serde_json::from_value::<PageMeta>(raw.clone()).ok());
                match data {
                    Value::Null => Self::Empty,
                    Value::Array(items) => Self::Collection { items, meta },
                    Value::Object(inner) if is_wrapper(&inner) => match Self::classify(Value::Object(inner)) {
                        Self::Collection { items, meta: None } => Self::Collection { items, meta },
                        other => other,
                    },
                    other => Self::Single(other),
                }
            }
            other => Self::Single(other),
        }
    }

    /// Decode into a record list. A single object becomes a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] if any item does not fit `R`.
    pub fn into_records<R: DeserializeOwned>(self) -> Result<(Vec<R>, Option<PageMeta>), WireError> {
        match self {
            Self::Collection { items, meta } => {
                let records = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<R>, _>>()?;
                Ok((records, meta))
            }
            Self::Single(value) => Ok((vec![serde_json::from_value(value)?], None)),
            Self::Empty => Ok((Vec::new(), None)),
        }
    }

    /// Decode into at most one record. A collection yields its first item.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] if the selected item does not fit `R`.
    pub fn into_record<R: DeserializeOwned>(self) -> Result<Option<R>, WireError> {
        let value = match self {
            Self::Single(value) => value,
            Self::Collection { items, .. } => match items.into_iter().next() {
                Some(first) => first,
                None => return Ok(None),
            },
            Self::Empty => return Ok(None),
        };
        Ok(Some(serde_json::from_value(value)?))
    }
}

/// An inner object is a second wrapper when it carries `data` but is not itself a record.
fn is_wrapper(map: &Map<String, Value>) -> bool {
    map.contains_key("data") && !map.contains_key("id")
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_u64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
