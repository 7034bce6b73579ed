//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the HTTP surface: the public signup endpoints, the session-gated listing,
//! and the health probes. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /voluntarios/login.",
            ))),
        );
    }
}

/// OpenAPI document for the volunteer registration API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Patas do Vale volunteer API",
        description = "Public volunteer signup plus the staff-only listing."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::volunteers::signup_form,
        crate::inbound::http::volunteers::submit_signup,
        crate::inbound::http::volunteers::list_volunteers,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::error::Error,
        crate::domain::error::ErrorCode,
        crate::domain::volunteer::VolunteerId,
        crate::domain::form_schema::SignupFormSchema,
        crate::domain::form_schema::FormField,
        crate::domain::form_schema::Widget,
        crate::inbound::http::volunteers::SignupForm,
        crate::inbound::http::volunteers::VolunteerResponse,
        crate::inbound::http::auth::LoginForm,
    ))
)]
pub struct ApiDoc;
