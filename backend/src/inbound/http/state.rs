//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DashboardQuery, FixtureDashboardQuery, FixtureLoginService, FixturePurchaseCommand,
    FixtureRegistrationService, LoginService, PurchaseCommand, RegistrationService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub purchases: Arc<dyn PurchaseCommand>,
    pub dashboard: Arc<dyn DashboardQuery>,
}

impl HttpState {
    /// Construct state over fixture ports, for tests and doc examples.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixture();
    /// let _login = state.login.clone();
    /// ```
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            registration: Arc::new(FixtureRegistrationService),
            login: Arc::new(FixtureLoginService),
            purchases: Arc::new(FixturePurchaseCommand),
            dashboard: Arc::new(FixtureDashboardQuery::default()),
        }
    }
}
