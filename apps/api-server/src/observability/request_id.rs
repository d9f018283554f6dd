//! Request ID middleware - propagates or generates an ID per request.

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use uuid::Uuid;

/// Header carrying the request ID, both inbound and outbound.
pub static REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied ID that is echoed back.
const MAX_INBOUND_LEN: usize = 128;

/// Reuse the caller's ID when it is short and printable, else mint one.
fn incoming_or_new(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_LEN)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tags every request with an ID, exposes it to handlers through
/// [`RequestId`] and echoes it in the response headers.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = incoming_or_new(req.headers());
        req.extensions_mut().insert(RequestId(request_id.clone()));

        tracing::debug!(
            request_id = %request_id,
            method = %req.method(),
            path = req.path(),
            "Request received"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }

            Ok(res)
        })
    }
}

/// Request ID extractor for handlers.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl actix_web::FromRequest for RequestId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| RequestId(incoming_or_new(req.headers())));

        ready(Ok(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    async fn echo(id: RequestId) -> HttpResponse {
        HttpResponse::Ok().body(id.as_str().to_string())
    }

    #[actix_web::test]
    async fn caller_id_is_propagated() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "abc-123"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, "abc-123");
    }

    #[actix_web::test]
    async fn missing_id_is_generated() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;

        let header = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[test]
    fn oversized_inbound_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderValue::from_str(&"x".repeat(MAX_INBOUND_LEN + 1)).unwrap(),
        );
        assert!(Uuid::parse_str(&incoming_or_new(&headers)).is_ok());
    }
}
