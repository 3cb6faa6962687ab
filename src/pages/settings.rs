//! App settings screen.

use wire::AppSettings;

use crate::net::ClientError;
use crate::state::settings::{SettingsSlice, SettingsUpdate};

pub struct SettingsPage {
    settings: SettingsSlice,
}

impl SettingsPage {
    #[must_use]
    pub fn new(settings: SettingsSlice) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsSlice {
        &self.settings
    }

    /// # Errors
    ///
    /// The fetch failure, also recorded in the fetch slot.
    pub async fn mount(&self) -> Result<Option<AppSettings>, ClientError> {
        self.settings.fetch().await
    }

    /// Send the form, then reload so stored image URLs are current.
    ///
    /// # Errors
    ///
    /// The update failure, also recorded in the update slot. A failed reload
    /// after a successful update lands in the fetch slot only.
    pub async fn submit(&self, update: SettingsUpdate) -> Result<AppSettings, ClientError> {
        let updated = self.settings.update(update).await?;
        if let Err(e) = self.settings.fetch().await {
            tracing::debug!(error = %e, "settings reload after update failed");
        }
        Ok(updated)
    }

    pub fn unmount(&self) {
        self.settings.clear_all_errors();
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
