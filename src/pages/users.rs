//! Users, coaches, and trainees screens.
//!
//! All three drive the same users slice; coaches and trainees pin the `role`
//! filter and stamp it onto every form they submit.

use serde_json::Value;
use wire::{Country, FormPayload, RecordId, UserRecord, id_from_value};

use super::refetch;
use crate::net::ClientError;
use crate::state::slice::{ListQuery, ResourceSlice};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserMode {
    All,
    Coaches,
    Trainees,
}

impl UserMode {
    /// Role filter sent with every list request.
    #[must_use]
    pub fn role(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Coaches => Some("coach"),
            Self::Trainees => Some("trainee"),
        }
    }
}

pub struct UsersPage {
    users: ResourceSlice<UserRecord>,
    mode: UserMode,
}

impl UsersPage {
    #[must_use]
    pub fn new(users: ResourceSlice<UserRecord>, mode: UserMode) -> Self {
        Self { users, mode }
    }

    #[must_use]
    pub fn mode(&self) -> UserMode {
        self.mode
    }

    #[must_use]
    pub fn users(&self) -> &ResourceSlice<UserRecord> {
        &self.users
    }

    fn query(&self, page: u64, search: Option<String>) -> ListQuery {
        let mut query = ListQuery::default().page(page);
        if let Some(role) = self.mode.role() {
            query = query.role(role);
        }
        if let Some(term) = search {
            query = query.search(term);
        }
        query
    }

    fn current_search(&self) -> Option<String> {
        self.users.last_query().search
    }

    /// # Errors
    ///
    /// The list failure, also recorded in the list slot.
    pub async fn mount(&self) -> Result<Vec<UserRecord>, ClientError> {
        self.users.list(self.query(1, None)).await
    }

    /// Jump to page 1 filtered by `term`. A blank term clears the filter.
    ///
    /// # Errors
    ///
    /// The list failure, also recorded in the list slot.
    pub async fn search(&self, term: &str) -> Result<Vec<UserRecord>, ClientError> {
        self.users.list(self.query(1, Some(term.to_owned()))).await
    }

    /// Clamp `page`, move the cursor there, and refetch with the same filters.
    ///
    /// # Errors
    ///
    /// The list failure, also recorded in the list slot.
    pub async fn change_page(&self, page: u64) -> Result<Vec<UserRecord>, ClientError> {
        let page = self.users.set_page(page);
        self.users.list(self.query(page, self.current_search())).await
    }

    /// Refetch the current page with the current filters.
    pub async fn refresh(&self) {
        let page = self.users.cursor().current_page();
        refetch(&self.users, self.query(page, self.current_search())).await;
    }

    fn stamp_role(&self, payload: FormPayload) -> FormPayload {
        match self.mode.role() {
            Some(role) => payload.field("role", role),
            None => payload,
        }
    }

    /// # Errors
    ///
    /// The create failure, also recorded in the create slot.
    pub async fn create(&self, payload: FormPayload) -> Result<UserRecord, ClientError> {
        let created = self.users.create(self.stamp_role(payload)).await?;
        self.refresh().await;
        Ok(created)
    }

    /// Update an account. An empty password means "unchanged" and is not sent.
    ///
    /// Returns `None` when the server only acknowledged an account this page
    /// has not listed.
    ///
    /// # Errors
    ///
    /// The update failure, also recorded in the update slot.
    pub async fn update(&self, id: RecordId, mut payload: FormPayload) -> Result<Option<UserRecord>, ClientError> {
        if is_blank(payload.get("password")) {
            payload.remove_field("password");
        }
        let updated = self.users.update(id, self.stamp_role(payload)).await?;
        self.refresh().await;
        Ok(updated)
    }

    /// # Errors
    ///
    /// The delete failure, also recorded in the delete slot.
    pub async fn delete(&self, id: RecordId) -> Result<(), ClientError> {
        self.users.delete(id).await?;
        self.refresh().await;
        Ok(())
    }

    /// # Errors
    ///
    /// The restore failure, also recorded in the restore slot.
    pub async fn restore(&self, id: RecordId) -> Result<Option<UserRecord>, ClientError> {
        let restored = self.users.restore(id).await?;
        self.refresh().await;
        Ok(restored)
    }

    pub fn unmount(&self) {
        self.users.clear_all_errors();
    }
}

/// Copy the selected country's dialling code into `phone_country`.
#[must_use]
pub fn with_country(payload: FormPayload, countries: &[Country]) -> FormPayload {
    let code = payload
        .get("country_id")
        .and_then(id_from_value)
        .and_then(|id| countries.iter().find(|country| country.id == id))
        .and_then(|country| country.country_code.clone());
    match code {
        Some(code) => payload.field("phone_country", code),
        None => payload,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Null) => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
