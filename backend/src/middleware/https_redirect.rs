//! Force-HTTPS redirect middleware.
//!
//! The service runs behind a TLS-terminating proxy, so the scheme is taken
//! from the connection info (which honours `Forwarded` and
//! `X-Forwarded-Proto`). Requests that already arrived over HTTPS, directly
//! or as seen by the proxy, pass through untouched; otherwise the proxy
//! forcing HTTPS itself would cause a redirect loop.

use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

/// Redirect plain-HTTP requests to their HTTPS equivalent when enabled.
#[derive(Clone, Copy)]
pub struct RequireHttps {
    enabled: bool,
}

impl RequireHttps {
    /// Create the middleware; a disabled instance passes everything through.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireHttps
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireHttpsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireHttpsMiddleware {
            service,
            enabled: self.enabled,
        }))
    }
}

/// Service wrapper produced by [`RequireHttps`].
pub struct RequireHttpsMiddleware<S> {
    service: S,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for RequireHttpsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let redirect_to = if self.enabled {
            let info = req.connection_info();
            if info.scheme() == "https" {
                None
            } else {
                let path = req.uri().path_and_query().map_or("/", |pq| pq.as_str());
                Some(format!("https://{}{}", info.host(), path))
            }
        } else {
            None
        };

        if let Some(target) = redirect_to {
            debug!(%target, "redirecting plain-http request");
            let response = HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, target))
                .finish();
            let res = req.into_response(response);
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_boxed_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    fn app(
        enabled: bool,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new().wrap(RequireHttps::new(enabled)).route(
            "/page",
            web::get().to(|| async { HttpResponse::Ok().body("ok") }),
        )
    }

    #[actix_web::test]
    async fn plain_http_is_redirected_preserving_the_path() {
        let app = test::init_service(app(true)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/page?x=1").to_request()).await;
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header");
        assert!(location.starts_with("https://"));
        assert!(location.ends_with("/page?x=1"));
    }

    #[actix_web::test]
    async fn forwarded_https_passes_through() {
        let app = test::init_service(app(true)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/page")
                .insert_header(("X-Forwarded-Proto", "https"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn disabled_middleware_passes_everything_through() {
        let app = test::init_service(app(false)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/page").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
