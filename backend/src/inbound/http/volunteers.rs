//! Volunteer signup and listing handlers.
//!
//! ```text
//! GET  /voluntarios/cadastro   Form schema (fields, widgets, choices)
//! POST /voluntarios/cadastro   Submit the public signup form
//! GET  /voluntarios/lista      Staff-only listing, newest first
//! ```
//!
//! Template rendering is a client concern; the backend serves the form as a
//! schema and answers submissions with redirects or per-field errors.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::VolunteerPersistenceError;
use crate::domain::{
    Error, RawSignup, SignupError, SignupFormSchema, Volunteer, VolunteerId, signup_form_schema,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Redirect target after a stored submission.
const SIGNUP_SUCCESS_LOCATION: &str = "/voluntarios/cadastro/?sucesso=1";
/// Redirect target for anonymous access to staff pages.
pub(crate) const LOGIN_LOCATION: &str = "/voluntarios/login/";

/// Signup form body for `POST /voluntarios/cadastro`.
///
/// Every field is optional at the wire level; the validator reports missing
/// values per field instead of failing deserialization wholesale.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct SignupForm {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl From<SignupForm> for RawSignup {
    fn from(form: SignupForm) -> Self {
        Self {
            nome: form.nome,
            email: form.email,
            telefone: form.telefone,
            endereco: form.endereco,
            cidade: form.cidade,
            area: form.area,
        }
    }
}

/// One stored volunteer as returned by the listing.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerResponse {
    /// Stable identifier.
    pub id: VolunteerId,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub cidade: String,
    pub area: String,
    /// Creation timestamp (UTC).
    pub criado_em: DateTime<Utc>,
}

impl From<&Volunteer> for VolunteerResponse {
    fn from(volunteer: &Volunteer) -> Self {
        Self {
            id: volunteer.id,
            nome: volunteer.nome.as_str().to_owned(),
            email: volunteer.email.as_str().to_owned(),
            telefone: volunteer.telefone.as_str().to_owned(),
            endereco: volunteer.endereco.as_str().to_owned(),
            cidade: volunteer.cidade.as_str().to_owned(),
            area: volunteer.area.as_str().to_owned(),
            criado_em: volunteer.created_at,
        }
    }
}

fn map_signup_error(err: SignupError) -> Error {
    match err {
        SignupError::Validation(validation) => {
            Error::invalid_request("Corrija os campos destacados para enviar o formulário.")
                .with_details(json!({ "fields": validation.errors }))
        }
        SignupError::Persistence(persistence) => map_persistence_error(persistence),
    }
}

pub(crate) fn map_persistence_error(err: VolunteerPersistenceError) -> Error {
    match err {
        VolunteerPersistenceError::Connection { message } => Error::service_unavailable(message),
        VolunteerPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Describe the signup form so a client can render it.
#[utoipa::path(
    get,
    path = "/voluntarios/cadastro",
    responses(
        (status = 200, description = "Form schema", body = SignupFormSchema)
    ),
    tags = ["voluntarios"],
    operation_id = "signupForm"
)]
#[get("/cadastro")]
pub async fn signup_form() -> web::Json<SignupFormSchema> {
    web::Json(signup_form_schema())
}

/// Accept a signup submission from the public form.
///
/// # Errors
///
/// - `400 Bad Request`: one or more fields failed validation; the `details`
///   object carries a `fields` array with per-field codes and messages.
/// - `503 Service Unavailable` / `500`: the record store rejected the insert;
///   nothing was saved.
#[utoipa::path(
    post,
    path = "/voluntarios/cadastro",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Stored; redirect to the form's success state"),
        (status = 400, description = "Validation failed", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["voluntarios"],
    operation_id = "submitSignup"
)]
#[post("/cadastro")]
pub async fn submit_signup(
    state: web::Data<HttpState>,
    form: web::Form<SignupForm>,
) -> ApiResult<HttpResponse> {
    let raw = RawSignup::from(form.into_inner());
    let volunteer = state
        .signup
        .submit(&raw)
        .await
        .map_err(map_signup_error)?;
    tracing::info!(volunteer = %volunteer.id, cidade = %volunteer.cidade, "volunteer registered");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, SIGNUP_SUCCESS_LOCATION))
        .finish())
}

/// List stored volunteers for authenticated staff, newest first.
///
/// Anonymous sessions are redirected to the login entry point rather than
/// answered with a bare 401.
#[utoipa::path(
    get,
    path = "/voluntarios/lista",
    responses(
        (status = 200, description = "Stored volunteers, newest first", body = [VolunteerResponse]),
        (status = 303, description = "Anonymous session; redirect to login"),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["voluntarios"],
    operation_id = "listVolunteers"
)]
#[get("/lista")]
pub async fn list_volunteers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if session.staff_id()?.is_none() {
        return Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGIN_LOCATION))
            .finish());
    }

    let volunteers = state
        .signup
        .list_all()
        .await
        .map_err(map_persistence_error)?;
    let body: Vec<VolunteerResponse> = volunteers.iter().map(VolunteerResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::domain::SignupService;
    use crate::domain::ports::{
        FixtureLoginService, InMemoryVolunteerRepository, NoOpNotifier, NotificationError,
        SignupNotifier, VolunteerRepository,
    };
    use crate::domain::volunteer::VolunteerDraft;
    use crate::inbound::http::auth::login;

    struct FailingRepository;

    #[async_trait]
    impl VolunteerRepository for FailingRepository {
        async fn insert(
            &self,
            _draft: VolunteerDraft,
        ) -> Result<Volunteer, VolunteerPersistenceError> {
            Err(VolunteerPersistenceError::connection("database down"))
        }

        async fn list_all(&self) -> Result<Vec<Volunteer>, VolunteerPersistenceError> {
            Err(VolunteerPersistenceError::connection("database down"))
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl SignupNotifier for FailingNotifier {
        async fn notify(&self, _volunteer: &Volunteer) -> Result<(), NotificationError> {
            Err(NotificationError::transport("connection refused"))
        }
    }

    fn state_with(
        repository: Arc<dyn VolunteerRepository>,
        notifier: Arc<dyn SignupNotifier>,
    ) -> HttpState {
        HttpState::new(
            Arc::new(SignupService::new(repository, notifier)),
            Arc::new(FixtureLoginService::new("agnes", "s3cret")),
        )
    }

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
            .service(
                web::scope("/voluntarios")
                    .service(signup_form)
                    .service(submit_signup)
                    .service(list_volunteers)
                    .service(login),
            )
    }

    fn valid_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("nome", "Maria da Silva"),
            ("email", "maria@example.com"),
            ("telefone", "(12) 98765-4321"),
            ("endereco", "Rua das Flores, 123"),
            ("cidade", "São José dos Campos"),
            ("area", "Cuidados e Bem-Estar"),
        ]
    }

    #[actix_web::test]
    async fn form_schema_lists_the_six_fields() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(NoOpNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/voluntarios/cadastro")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("schema json");
        let fields = value["fields"].as_array().expect("fields array");
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0]["name"], "nome");
    }

    #[actix_web::test]
    async fn valid_submission_redirects_to_success() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(NoOpNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/voluntarios/cadastro")
                .set_form(valid_form())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header");
        assert_eq!(location, SIGNUP_SUCCESS_LOCATION);
    }

    #[actix_web::test]
    async fn invalid_phone_reports_invalid_format() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(NoOpNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let mut form = valid_form();
        form.retain(|(name, _)| *name != "telefone");
        form.push(("telefone", "11987654321"));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/voluntarios/cadastro")
                .set_form(form)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("error json");
        assert_eq!(value["code"], "invalid_request");
        let fields = value["details"]["fields"].as_array().expect("fields");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["field"], "telefone");
        assert_eq!(fields[0]["code"], "invalid_format");
    }

    #[actix_web::test]
    async fn unknown_city_reports_invalid_choice() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(NoOpNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let mut form = valid_form();
        form.retain(|(name, _)| *name != "cidade");
        form.push(("cidade", "Rio de Janeiro"));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/voluntarios/cadastro")
                .set_form(form)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("error json");
        let fields = value["details"]["fields"].as_array().expect("fields");
        assert_eq!(fields[0]["field"], "cidade");
        assert_eq!(fields[0]["code"], "invalid_choice");
    }

    #[actix_web::test]
    async fn anonymous_listing_redirects_to_login() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(NoOpNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/voluntarios/lista")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header");
        assert_eq!(location, LOGIN_LOCATION);
    }

    #[actix_web::test]
    async fn authenticated_listing_sees_submitted_records() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(NoOpNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        for email in ["primeira@example.com", "segunda@example.com"] {
            let mut form = valid_form();
            form.retain(|(name, _)| *name != "email");
            form.push(("email", email));
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/voluntarios/cadastro")
                    .set_form(form)
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::SEE_OTHER);
        }

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/voluntarios/login")
                .set_form(vec![("username", "agnes"), ("password", "s3cret")])
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::SEE_OTHER);
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/voluntarios/lista")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("listing json");
        let entries = value.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["cidade"], "São José dos Campos");
    }

    #[actix_web::test]
    async fn notifier_failure_still_redirects_to_success() {
        let state = state_with(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(FailingNotifier),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/voluntarios/cadastro")
                .set_form(valid_form())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn unavailable_store_maps_to_service_unavailable() {
        let state = state_with(Arc::new(FailingRepository), Arc::new(NoOpNotifier));
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/voluntarios/cadastro")
                .set_form(valid_form())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
