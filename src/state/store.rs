//! The single state container.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup and passed by reference to every page controller.
//! All slices share one [`ApiClient`], so the token written by login is the
//! token every slice sends.

use std::sync::Arc;

use wire::{Country, Question, QuestionGroup, Slide, Topic, UserRecord};

use super::auth::Session;
use super::ledger::{LedgerKind, LedgerSlice};
use super::nested::ScopedSlices;
use super::preferences::Preferences;
use super::settings::SettingsSlice;
use super::slice::ResourceSlice;
use super::statistics::StatisticsSlice;
use crate::config::AdminConfig;
use crate::net::{ApiClient, ClientError, HttpTransport, Transport};
use crate::util::auth::{GateDecision, gate};
use crate::util::storage::{DurableStorage, FileStorage};

pub const COUNTRIES_PATH: &str = "/countries";

pub struct AdminStore {
    pub config: AdminConfig,
    pub client: ApiClient,
    pub session: Session,
    pub preferences: Preferences,
    pub users: ResourceSlice<UserRecord>,
    pub slides: ResourceSlice<Slide>,
    pub topics: ResourceSlice<Topic>,
    pub question_groups: ResourceSlice<QuestionGroup>,
    pub countries: ResourceSlice<Country>,
    pub settings: SettingsSlice,
    pub statistics: StatisticsSlice,
    pub coaches_ledger: LedgerSlice,
    pub trainees_ledger: LedgerSlice,
}

impl AdminStore {
    #[must_use]
    pub fn new(config: AdminConfig, transport: Arc<dyn Transport>, storage: Arc<dyn DurableStorage>) -> Self {
        let client = ApiClient::new(transport);
        let session = Session::restore(client.clone(), Arc::clone(&storage));
        let preferences = Preferences::load(storage);
        let path = |resource: &str| config.admin_path(resource);
        let ledger = |kind: LedgerKind| LedgerSlice::new(client.clone(), kind, path(kind.resource()));

        Self {
            users: ResourceSlice::new(client.clone(), path("users")),
            slides: ResourceSlice::new(client.clone(), path("home/slides")),
            topics: ResourceSlice::new(client.clone(), path("courses/topics")),
            question_groups: ResourceSlice::new(client.clone(), path("courses/question-groups")),
            countries: ResourceSlice::new(client.clone(), COUNTRIES_PATH),
            settings: SettingsSlice::new(client.clone(), path("settings")),
            statistics: StatisticsSlice::new(client.clone(), path("dashboard/statistics")),
            coaches_ledger: ledger(LedgerKind::Coaches),
            trainees_ledger: ledger(LedgerKind::Trainees),
            session,
            preferences,
            client,
            config,
        }
    }

    /// Production wiring: reqwest transport and the JSON state file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client fails to build.
    pub fn from_config(config: AdminConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config.base_url.clone(), config.timeouts)?;
        let storage = FileStorage::open(config.state_path.clone());
        Ok(Self::new(config, Arc::new(transport), Arc::new(storage)))
    }

    /// Fresh nested question slices for one question-groups view.
    #[must_use]
    pub fn question_scopes(&self) -> ScopedSlices<Question> {
        ScopedSlices::new(self.client.clone(), self.config.admin_path("courses"), "questions")
    }

    #[must_use]
    pub fn ledger(&self, kind: LedgerKind) -> &LedgerSlice {
        match kind {
            LedgerKind::Coaches => &self.coaches_ledger,
            LedgerKind::Trainees => &self.trainees_ledger,
        }
    }

    /// Gate a navigation against the current session.
    #[must_use]
    pub fn gate(&self, path: &str) -> GateDecision {
        gate(path, self.session.is_authenticated())
    }

    /// Log out and drop every cached collection and object of the previous
    /// session.
    pub fn logout(&self) {
        self.session.logout();
        self.users.reset();
        self.slides.reset();
        self.topics.reset();
        self.question_groups.reset();
        self.countries.reset();
        self.coaches_ledger.rows().reset();
        self.trainees_ledger.rows().reset();
        self.coaches_ledger.clear_detail();
        self.trainees_ledger.clear_detail();
        self.settings.clear();
        self.statistics.clear();
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
