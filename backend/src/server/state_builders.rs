//! Builders for HTTP state ports backed by Diesel adapters or fixtures.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    FixtureDashboardQuery, FixtureLoginService, FixturePurchaseCommand,
    FixtureRegistrationService,
};
use backend::domain::{
    DashboardQueryService, PasswordLoginService, PurchaseCommandService, RegistrationServiceImpl,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DieselPurchaseLedger, DieselReferralStatsRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the shared HTTP state from configured ports and fixture fallbacks.
///
/// With a database pool, every driving port is served by a domain service
/// over a Diesel adapter; without one (handler tests, doc examples) the
/// fixture ports answer instead.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            let users = DieselUserRepository::new(pool.clone());
            let ledger = DieselPurchaseLedger::new(pool.clone());
            let stats = DieselReferralStatsRepository::new(pool.clone());
            HttpState {
                registration: Arc::new(RegistrationServiceImpl::new(users.clone())),
                login: Arc::new(PasswordLoginService::new(users.clone())),
                purchases: Arc::new(PurchaseCommandService::new(ledger)),
                dashboard: Arc::new(DashboardQueryService::new(
                    users,
                    stats,
                    config.client_base_url.clone(),
                )),
            }
        }
        None => HttpState {
            registration: Arc::new(FixtureRegistrationService),
            login: Arc::new(FixtureLoginService),
            purchases: Arc::new(FixturePurchaseCommand),
            dashboard: Arc::new(FixtureDashboardQuery::default()),
        },
    };
    web::Data::new(state)
}
