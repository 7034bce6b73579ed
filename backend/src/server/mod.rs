//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::config::{BrowserSession, CookieContentSecurity};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, middleware::NormalizePath, web};
use tracing::warn;

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{MailConfig, MailTransportKind};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::SignupService;
use crate::domain::ports::{FixtureLoginService, InMemoryVolunteerRepository, SignupNotifier};
use crate::inbound::http::auth::{login, logout};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::volunteers::{list_volunteers, signup_form, submit_signup};
use crate::middleware::{RequireHttps, Trace};
use crate::outbound::email::{
    ApiMailTransport, ConsoleMailTransport, EmailNotifier, MailTransport, NotificationSettings,
};
use crate::outbound::persistence::{DieselLoginService, DieselVolunteerRepository};

fn build_notifier(mail: &MailConfig) -> std::io::Result<Arc<dyn SignupNotifier>> {
    let transport: Arc<dyn MailTransport> = match &mail.transport {
        MailTransportKind::Console => Arc::new(ConsoleMailTransport),
        MailTransportKind::Api { base_url, token } => Arc::new(
            ApiMailTransport::new(base_url.clone(), token.clone()).map_err(|err| {
                std::io::Error::other(format!("mail transport initialisation failed: {err}"))
            })?,
        ),
    };

    Ok(Arc::new(EmailNotifier::new(
        transport,
        NotificationSettings {
            from: mail.from.clone(),
            recipients: mail.recipients.clone(),
            fail_silently: mail.fail_silently,
        },
    )))
}

/// Assemble handler dependencies from the configuration.
///
/// With a database pool the Diesel adapters are used; without one the server
/// falls back to the in-memory store and the fixture login so the form can be
/// exercised locally.
fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let notifier = build_notifier(&config.mail)?;

    match &config.db_pool {
        Some(pool) => Ok(HttpState::new(
            Arc::new(SignupService::new(
                Arc::new(DieselVolunteerRepository::new(pool.clone())),
                notifier,
            )),
            Arc::new(DieselLoginService::new(pool.clone())),
        )),
        None => {
            warn!("no database pool; using in-memory store and fixture login (dev only)");
            Ok(HttpState::new(
                Arc::new(SignupService::new(
                    Arc::new(InMemoryVolunteerRepository::new()),
                    notifier,
                )),
                Arc::new(FixtureLoginService::new("admin", "password")),
            ))
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    ttl: Duration,
    ssl_redirect: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        ttl,
        ssl_redirect,
    } = deps;

    // Browser-session lifecycle: the cookie dies with the browser, the state
    // inside it after the configured idle TTL.
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(BrowserSession::default().state_ttl(ttl))
        .build();

    let voluntarios = web::scope("/voluntarios")
        .wrap(session)
        .service(signup_form)
        .service(submit_signup)
        .service(list_volunteers)
        .service(login)
        .service(logout);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(NormalizePath::trim())
        .wrap(Trace)
        .wrap(RequireHttps::new(ssl_redirect))
        .service(voluntarios)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when dependencies cannot be initialised or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        session,
        bind_addr,
        ssl_redirect,
        mail: _,
        db_pool: _,
    } = config;
    let SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    } = session;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            ttl,
            ssl_redirect,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
