//! Staff login and logout handlers.
//!
//! ```text
//! POST /voluntarios/login    username/password form; redirects to the listing
//! POST /voluntarios/logout   purge session; redirect to the home page
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Redirect target after a successful login.
const LOGIN_SUCCESS_LOCATION: &str = "/voluntarios/lista/";
/// Redirect target after logout.
const LOGOUT_LOCATION: &str = "/";

/// Login form body for `POST /voluntarios/login`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "required" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "required" })),
    }
}

/// Authenticate a staff member and establish a session.
///
/// # Errors
///
/// - `400 Bad Request`: blank username or password.
/// - `401 Unauthorized`: unknown user or wrong password.
#[utoipa::path(
    post,
    path = "/voluntarios/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Authenticated; redirect to the listing",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank credentials", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        form.username.as_deref().unwrap_or_default(),
        form.password.as_deref().unwrap_or_default(),
    )
    .map_err(map_login_validation_error)?;

    let staff_id = state.login.authenticate(&credentials).await?;
    session.persist_staff(staff_id)?;
    tracing::info!(staff = %staff_id, "staff login");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_SUCCESS_LOCATION))
        .finish())
}

/// Drop the session and return the client to the home page.
#[utoipa::path(
    post,
    path = "/voluntarios/logout",
    responses(
        (status = 303, description = "Session purged; redirect home")
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGOUT_LOCATION))
        .finish()
}
