//! App-image settings: home, splash, and exercise screen images.

use serde_json::Value;
use wire::{AppSettings, Attachment, Envelope, FormPayload, resolve_settings};

use super::record_slot::{RecordSlot, SlotOp, SlotState};
use crate::net::{ApiClient, ClientError, RequestBody};

pub const SETTINGS_ID_MISSING: &str = "Settings ID not found. Please refresh the page and try again.";

/// Form submitted by the settings screen. Empty fields are not sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsUpdate {
    pub value: Option<String>,
    pub home_screen: Option<Attachment>,
    pub splash_screen: Vec<Attachment>,
    pub exercise_screen: Option<Attachment>,
    /// Ids of stored images to remove.
    pub images_to_delete: Vec<String>,
}

impl SettingsUpdate {
    #[must_use]
    pub fn into_payload(self) -> FormPayload {
        let mut payload = FormPayload::new();
        if let Some(value) = self.value.filter(|v| !v.is_empty()) {
            payload = payload.field("value", value);
        }
        if let Some(image) = self.home_screen {
            payload = payload.file("home_screen", image);
        }
        for image in self.splash_screen {
            payload = payload.file("splash_screen[]", image);
        }
        if let Some(image) = self.exercise_screen {
            payload = payload.file("exercise_screen", image);
        }
        if !self.images_to_delete.is_empty() {
            payload = payload.field("images_to_delete", self.images_to_delete);
        }
        payload
    }
}

#[derive(Clone)]
pub struct SettingsSlice {
    slot: RecordSlot<AppSettings>,
}

impl SettingsSlice {
    #[must_use]
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self { slot: RecordSlot::new(client, path) }
    }

    #[must_use]
    pub fn settings(&self) -> Option<AppSettings> {
        self.slot.value()
    }

    #[must_use]
    pub fn snapshot(&self) -> SlotState<AppSettings> {
        self.slot.snapshot()
    }

    #[must_use]
    pub fn slot(&self) -> &RecordSlot<AppSettings> {
        &self.slot
    }

    /// Fetch settings; a list response resolves to the `app_images` entry.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], also recorded in the fetch slot.
    pub async fn fetch(&self) -> Result<Option<AppSettings>, ClientError> {
        self.slot
            .fetch_with("", Vec::new(), |body| Ok(resolve_settings(Envelope::classify(body))?))
            .await
    }

    /// Submit `update` against the loaded settings id, always as multipart.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] with [`SETTINGS_ID_MISSING`] when no
    /// settings are loaded; otherwise any request failure. Both are recorded
    /// in the update slot.
    pub async fn update(&self, update: SettingsUpdate) -> Result<AppSettings, ClientError> {
        let Some(id) = self.slot.value().map(|settings| settings.id) else {
            let err = ClientError::Validation(SETTINGS_ID_MISSING.to_owned());
            self.slot.reject_update(&err);
            return Err(err);
        };
        let request = self
            .slot
            .spoofed_put(id)
            .with_body(RequestBody::Form(update.into_payload()));
        self.slot.update_with(request, merge_settings).await
    }

    pub fn clear_error(&self, op: SlotOp) {
        self.slot.clear_error(op);
    }

    pub fn clear_all_errors(&self) {
        self.slot.clear_all_errors();
    }

    /// Forget the loaded settings; a later update needs a fresh fetch.
    pub fn clear(&self) {
        self.slot.clear();
    }
}

/// Overlay the response fields on the current settings.
fn merge_settings(current: Option<AppSettings>, body: Value) -> Result<AppSettings, ClientError> {
    let patch = match Envelope::classify(body) {
        Envelope::Single(value) => value,
        Envelope::Collection { items, .. } => items.into_iter().next().unwrap_or(Value::Null),
        Envelope::Empty => Value::Null,
    };
    match current {
        Some(current) => Ok(wire::merge_record(&current, &patch)?),
        None => serde_json::from_value(patch).map_err(|e| ClientError::Decode(e.to_string())),
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
