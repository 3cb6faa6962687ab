//! Record DTOs for each admin resource.
//!
//! Fields the console reads are typed; everything else is kept in `extra` so a
//! record survives a decode/encode cycle unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Envelope, Record, RecordId, SoftDelete, WireError, deserialize_id, deserialize_opt_id};

// =============================================================================
// LOCALIZED TEXT
// =============================================================================

/// Text that is either a plain string or an `{en, ar}` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized {
        #[serde(default)]
        en: Option<String>,
        #[serde(default)]
        ar: Option<String>,
    },
}

impl LocalizedText {
    /// Text for `lang` (`"en"` or `"ar"`), falling back to the other language.
    #[must_use]
    pub fn text(&self, lang: &str) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Localized { en, ar } => {
                let (preferred, fallback) = if lang == "ar" { (ar, en) } else { (en, ar) };
                preferred.as_deref().or(fallback.as_deref()).unwrap_or_default()
            }
        }
    }
}

// =============================================================================
// USERS
// =============================================================================

/// A role attached to a user account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<RecordId>,
    pub name: String,
}

/// A platform account: admin, coach, or trainee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Soft-delete tombstone.
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Name of the first role, if any.
    #[must_use]
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(|role| role.name.as_str())
    }
}

impl Record for UserRecord {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl SoftDelete for UserRecord {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn clear_tombstone(&mut self) {
        self.deleted_at = None;
    }
}

// =============================================================================
// CONTENT
// =============================================================================

/// A home-screen slider entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Slide {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// A course topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Topic {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// A named group of assessment questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionGroup {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub title_ar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionGroup {
    /// Display title for `lang`, preferring the per-language columns.
    #[must_use]
    pub fn display_title(&self, lang: &str) -> &str {
        let column = if lang == "ar" { &self.title_ar } else { &self.title_en };
        column
            .as_deref()
            .or_else(|| self.title.as_ref().map(|title| title.text(lang)))
            .unwrap_or_default()
    }
}

impl Record for QuestionGroup {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// One answer option of a question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
}

/// A question inside a question group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Question {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// A country option used by account forms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Country {
    fn id(&self) -> RecordId {
        self.id
    }
}

// =============================================================================
// SETTINGS + STATISTICS
// =============================================================================

/// Key under which the app-image settings are stored.
pub const APP_IMAGES_KEY: &str = "app_images";

/// App-image settings (home, splash, and exercise screens).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for AppSettings {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Pick the app-image settings out of a settings response.
///
/// A collection resolves to the entry keyed `app_images`, else its first entry.
///
/// # Errors
///
/// Returns [`WireError::Decode`] if the chosen entry does not fit [`AppSettings`].
pub fn resolve_settings(envelope: Envelope) -> Result<Option<AppSettings>, WireError> {
    match envelope {
        Envelope::Collection { items, .. } => {
            let chosen = items
                .iter()
                .position(|item| item.get("key").and_then(Value::as_str) == Some(APP_IMAGES_KEY))
                .or(if items.is_empty() { None } else { Some(0) });
            match chosen {
                Some(index) => Ok(Some(serde_json::from_value(items[index].clone())?)),
                None => Ok(None),
            }
        }
        other => other.into_record(),
    }
}

/// Server-computed dashboard figures. The shape is owned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardStatistics(pub Map<String, Value>);

impl DashboardStatistics {
    /// Read a top-level numeric figure.
    #[must_use]
    pub fn figure(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.parse().ok(),
            _ => None,
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Login form body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The `data` object returned by a successful login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub access_token: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Profile summary kept in the session and in durable storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: RecordId,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<&LoginResponse> for UserProfile {
    fn from(login: &LoginResponse) -> Self {
        Self {
            id: login.id,
            name: login.user_name.clone(),
            email: login.email.clone(),
            phone: login.phone.clone(),
            role: login
                .roles
                .first()
                .map_or_else(|| "user".to_owned(), |role| role.name.clone()),
            roles: login.roles.clone(),
            created_at: login.created_at.clone(),
            updated_at: login.updated_at.clone(),
        }
    }
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
