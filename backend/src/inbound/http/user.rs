//! Signed-in user API handlers.
//!
//! ```text
//! GET /api/user/dashboard
//! POST /api/user/purchase
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::purchase::PurchaseOutcome;
use crate::domain::referral::DashboardSummary;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Dashboard view returned by `GET /api/user/dashboard`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_referred_users: i64,
    pub converted_users: i64,
    pub total_credits_earned: i64,
    /// Shareable link embedding the user's referral code.
    pub referral_link: String,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            total_referred_users: summary.total_referred_users,
            converted_users: summary.converted_users,
            total_credits_earned: summary.total_credits_earned.value(),
            referral_link: summary.referral_link.into(),
        }
    }
}

/// Purchase result returned by `POST /api/user/purchase`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub awarded: bool,
    pub message: String,
    /// The buyer's credit balance after the purchase settled.
    pub credits: i64,
}

impl From<PurchaseOutcome> for PurchaseResponse {
    fn from(outcome: PurchaseOutcome) -> Self {
        Self {
            awarded: outcome.awarded,
            message: outcome.message,
            credits: outcome.credits.value(),
        }
    }
}

/// Referral counters, credit balance, and share link for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/user/dashboard",
    responses(
        (status = 200, description = "Dashboard view", body = DashboardResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User no longer exists", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["user"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardResponse>> {
    let user = session.require_user_id()?;
    let summary = state.dashboard.dashboard(&user).await?;
    Ok(web::Json(DashboardResponse::from(summary)))
}

/// Record a simulated purchase and settle any pending referral.
///
/// A first purchase by a referred user awards credits to both parties in the
/// same transaction that logs the purchase.
#[utoipa::path(
    post,
    path = "/api/user/purchase",
    responses(
        (status = 200, description = "Purchase recorded", body = PurchaseResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User no longer exists", body = Error),
        (status = 409, description = "Conflicted with a concurrent purchase, retry", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["user"],
    operation_id = "purchase"
)]
#[post("/purchase")]
pub async fn purchase(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PurchaseResponse>> {
    let user = session.require_user_id()?;
    let outcome = state.purchases.purchase(&user).await?;
    Ok(web::Json(PurchaseResponse::from(outcome)))
}
