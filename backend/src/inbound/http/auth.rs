//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"lina@test.com","password":"pw","referralCode":"AAA111"}
//! POST /api/auth/login {"email":"lina@test.com","password":"pw"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    ApiResult, AuthValidationError, Error, LoginCredentials, RegistrationRequest, UserAccount,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Referral code of an existing user, if the caller followed a share link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User summary returned by both auth endpoints.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub email: String,
    pub referral_code: String,
    pub credits: i64,
}

impl From<&UserAccount> for UserSummaryResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: *account.id().as_uuid(),
            email: account.email().to_string(),
            referral_code: account.referral_code().to_string(),
            credits: account.credits().value(),
        }
    }
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    match err {
        AuthValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        AuthValidationError::InvalidEmail => Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        AuthValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new account and establish a session.
///
/// An invalid or unknown referral code is ignored rather than rejected, so a
/// stale share link never blocks sign-up.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserSummaryResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Referral code allocation exhausted", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let request = RegistrationRequest::try_from_parts(
        &payload.email,
        &payload.password,
        payload.referral_code.as_deref(),
    )
    .map_err(map_auth_validation_error)?;
    let account = state.registration.register(request).await?;
    session.persist_user(account.id())?;
    Ok(HttpResponse::Created().json(UserSummaryResponse::from(&account)))
}

/// Authenticate a user and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent error
/// schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserSummaryResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_auth_validation_error)?;
    let account = state.login.authenticate(&credentials).await?;
    session.persist_user(account.id())?;
    Ok(HttpResponse::Ok().json(UserSummaryResponse::from(&account)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::{
        FixtureLoginService, FixturePurchaseCommand, MockLoginService, MockRegistrationService,
    };
    use crate::domain::ports::{FixtureDashboardQuery, FixtureRegistrationService};
    use crate::domain::{Credits, EmailAddress, ReferralCode, UserId};

    use super::*;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .app_data(web::Data::new(state))
            .service(web::scope("/api/auth").service(register).service(login))
    }

    fn fixture_state() -> HttpState {
        HttpState::fixture()
    }

    fn account() -> UserAccount {
        UserAccount::from_parts(
            UserId::random(),
            EmailAddress::new("lina@test.com").expect("valid email"),
            ReferralCode::new("AAA111").expect("valid code"),
            Credits::new(4).expect("valid credits"),
            None,
            chrono::Utc::now(),
        )
    }

    #[derive(Debug)]
    struct ValidationExpectation<'a> {
        message: &'a str,
        field: &'a str,
        code: &'a str,
    }

    #[rstest]
    #[case(
        "   ",
        "pw",
        ValidationExpectation {
            message: "email must not be empty",
            field: "email",
            code: "empty_email",
        }
    )]
    #[case(
        "not-an-email",
        "pw",
        ValidationExpectation {
            message: "email must be a valid address",
            field: "email",
            code: "invalid_email",
        }
    )]
    #[case(
        "lina@test.com",
        "",
        ValidationExpectation {
            message: "password must not be empty",
            field: "password",
            code: "empty_password",
        }
    )]
    #[actix_web::test]
    async fn register_rejects_invalid_payloads(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: ValidationExpectation<'_>,
    ) {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&RegisterRequest {
                email: email.into(),
                password: password.into(),
                referral_code: None,
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some(expected.message)
        );
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
        let details = value
            .get("details")
            .and_then(Value::as_object)
            .expect("details present");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some(expected.field)
        );
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some(expected.code)
        );
    }

    #[actix_web::test]
    async fn register_returns_created_summary_and_session() {
        let account = account();
        let expected_id = *account.id().as_uuid();
        let mut registration = MockRegistrationService::new();
        registration
            .expect_register()
            .once()
            .returning(move |_| Ok(account.clone()));
        let state = HttpState {
            registration: Arc::new(registration),
            login: Arc::new(FixtureLoginService),
            purchases: Arc::new(FixturePurchaseCommand),
            dashboard: Arc::new(FixtureDashboardQuery::default()),
        };
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&RegisterRequest {
                email: "Lina@Test.com".into(),
                password: "hunter2stronger".into(),
                referral_code: Some("AAA111".into()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("summary payload");
        assert_eq!(
            value.get("id").and_then(Value::as_str),
            Some(expected_id.to_string().as_str())
        );
        assert_eq!(
            value.get("referralCode").and_then(Value::as_str),
            Some("AAA111")
        );
        assert_eq!(value.get("credits").and_then(Value::as_i64), Some(4));
        assert!(value.get("referral_code").is_none());
    }

    #[actix_web::test]
    async fn login_success_establishes_session() {
        let account = account();
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .once()
            .returning(move |_| Ok(account.clone()));
        let state = HttpState {
            registration: Arc::new(FixtureRegistrationService),
            login: Arc::new(login_service),
            purchases: Arc::new(FixturePurchaseCommand),
            dashboard: Arc::new(FixtureDashboardQuery::default()),
        };
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: "lina@test.com".into(),
                password: "hunter2stronger".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[actix_web::test]
    async fn login_failure_is_unauthorised() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: "lina@test.com".into(),
                password: "wrong-password".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("Invalid email or password")
        );
    }
}
