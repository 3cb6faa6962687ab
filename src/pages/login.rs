//! Login screen.

use wire::{Credentials, UserProfile};

use crate::net::ClientError;
use crate::state::auth::Session;
use crate::util::auth::DASHBOARD_ROUTE;

pub struct LoginPage<'a> {
    session: &'a Session,
}

impl<'a> LoginPage<'a> {
    #[must_use]
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Where to go on mount: an already signed-in admin skips the form.
    #[must_use]
    pub fn mount(&self) -> Option<&'static str> {
        self.session.is_authenticated().then_some(DASHBOARD_ROUTE)
    }

    /// Validate, then sign in. Returns the profile and the route to open.
    ///
    /// # Errors
    ///
    /// The validation or login failure, also recorded on the session.
    pub async fn submit(&self, credentials: Credentials) -> Result<(UserProfile, &'static str), ClientError> {
        let profile = self.session.login(credentials).await?;
        Ok((profile, DASHBOARD_ROUTE))
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.session.snapshot().error().map(str::to_owned)
    }

    pub fn dismiss_error(&self) {
        self.session.clear_error();
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
