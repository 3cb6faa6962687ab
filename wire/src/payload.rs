//! Mutation payloads.
//!
//! A [`FormPayload`] is a set of JSON fields plus zero or more binary
//! attachments. Without attachments it is sent as a JSON body; with any
//! attachment it is sent as `multipart/form-data`, and nested JSON fields are
//! flattened into bracketed keys (`answers[0][description][en]`).

use serde_json::{Map, Value};

/// A binary file attached to a form payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Build an attachment, guessing the MIME type from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self { file_name, mime, bytes }
    }
}

/// Ordered fields and attachments for a create/update request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormPayload {
    fields: Map<String, Value>,
    files: Vec<(String, Attachment)>,
    force_multipart: bool,
}

impl FormPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the fields of a JSON object. Non-object values yield an empty payload.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields, ..Self::default() },
            _ => Self::default(),
        }
    }

    /// Set a field, replacing any previous value for `key`.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Append an attachment under `key`. Repeating a key sends repeated parts.
    #[must_use]
    pub fn file(mut self, key: impl Into<String>, attachment: Attachment) -> Self {
        self.files.push((key.into(), attachment));
        self
    }

    /// Send as multipart even without attachments (form endpoints).
    #[must_use]
    pub fn multipart(mut self) -> Self {
        self.force_multipart = true;
        self
    }

    /// Remove a field and return its previous value.
    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether this payload must be sent as multipart.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.force_multipart || !self.files.is_empty()
    }

    #[must_use]
    pub fn files(&self) -> &[(String, Attachment)] {
        &self.files
    }

    /// JSON body used when the payload has no attachments.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Text parts for a multipart body, nested values flattened to bracketed keys.
    ///
    /// `null` values are omitted; booleans are sent as `1`/`0`.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (key, value) in &self.fields {
            flatten_into(key, value, &mut out);
        }
        out
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push((prefix.to_owned(), if *flag { "1" } else { "0" }.to_owned())),
        Value::Number(number) => out.push((prefix.to_owned(), number.to_string())),
        Value::String(text) => out.push((prefix.to_owned(), text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{prefix}[{index}]"), item, out);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                flatten_into(&format!("{prefix}[{key}]"), item, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
