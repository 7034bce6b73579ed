//! End-to-end submission flow over the HTTP surface.
//!
//! Wires the real handlers, session middleware, and dispatcher against the
//! in-memory store: submit → notify → login → list → logout.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::NormalizePath;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::Value;

use voluntarios_backend::Trace;
use voluntarios_backend::domain::SignupService;
use voluntarios_backend::domain::ports::{
    FixtureLoginService, InMemoryVolunteerRepository, NotificationError,
};
use voluntarios_backend::inbound::http::auth::{login, logout};
use voluntarios_backend::inbound::http::state::HttpState;
use voluntarios_backend::inbound::http::volunteers::{
    list_volunteers, signup_form, submit_signup,
};
use voluntarios_backend::outbound::email::{
    EmailNotifier, MailTransport, NotificationSettings, OutgoingEmail,
};

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        self.sent.lock().expect("lock").push(email.clone());
        Ok(())
    }
}

fn state_with_recipients(
    transport: Arc<RecordingTransport>,
    recipients: Vec<String>,
) -> HttpState {
    let notifier = EmailNotifier::new(
        transport,
        NotificationSettings {
            from: "no-reply@patasdovale.org.br".to_owned(),
            recipients,
            fail_silently: true,
        },
    );
    HttpState::new(
        Arc::new(SignupService::new(
            Arc::new(InMemoryVolunteerRepository::new()),
            Arc::new(notifier),
        )),
        Arc::new(FixtureLoginService::new("agnes", "s3cret")),
    )
}

fn app(
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .wrap(NormalizePath::trim())
        .wrap(Trace)
        .service(
            web::scope("/voluntarios")
                .wrap(session)
                .service(signup_form)
                .service(submit_signup)
                .service(list_volunteers)
                .service(login)
                .service(logout),
        )
}

fn valid_form(email: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("nome", "Maria da Silva"),
        ("email", email),
        ("telefone", "(12) 98765-4321"),
        ("endereco", "Rua das Flores, 123"),
        ("cidade", "Jacareí"),
        ("area", "Cuidados e Bem-Estar"),
    ]
}

#[actix_web::test]
async fn submission_notification_login_listing_logout() {
    let transport = Arc::new(RecordingTransport::default());
    let state = state_with_recipients(
        transport.clone(),
        vec!["agnes@patasdovale.org.br".to_owned()],
    );
    let app = test::init_service(app(state)).await;

    // The form schema is public, trailing slash included.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/voluntarios/cadastro/")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));

    // Two submissions, both redirect and both notify staff.
    for email in ["primeira@example.com", "segunda@example.com"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/voluntarios/cadastro/")
                .set_form(valid_form(email))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].to.contains(&"agnes@patasdovale.org.br".to_owned()));
    assert!(sent[0].text_body.contains("primeira@example.com"));

    // The listing is gated until login.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/voluntarios/lista/")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/voluntarios/login/")
    );

    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/voluntarios/login/")
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

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/voluntarios/lista/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let value: Value = serde_json::from_slice(&test::read_body(res).await).expect("listing json");
    let entries = value.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    let emails: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry["email"].as_str())
        .collect();
    assert!(emails.contains(&"primeira@example.com"));
    assert!(emails.contains(&"segunda@example.com"));

    // Logout drops the session; the listing gate closes again.
    let logout_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/voluntarios/logout/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::SEE_OTHER);
    let cleared = logout_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/voluntarios/lista/")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn empty_recipient_list_disables_notifications() {
    let transport = Arc::new(RecordingTransport::default());
    let state = state_with_recipients(transport.clone(), Vec::new());
    let app = test::init_service(app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/voluntarios/cadastro/")
            .set_form(valid_form("maria@example.com"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(transport.sent().is_empty());
}
