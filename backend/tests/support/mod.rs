//! Shared harness for HTTP integration tests.
//!
//! Builds the real application over in-memory repositories with a clock the
//! test controls, then drives it through `actix_web::test`.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{test as actix_test, web};
use readlist::inbound::http::health::HealthState;
use readlist::inbound::http::state::HttpState;
use readlist::outbound::security::Argon2CredentialHasher;
use readlist::server::{ServerConfig, build_app, build_http_state};
use readlist::test_support::MutableClock;
use serde_json::{Value, json};

/// Handles a test keeps after building the app.
pub struct Harness {
    /// Clock read by the services and the token issuer.
    pub clock: Arc<MutableClock>,
    /// Probe state registered with the app.
    pub health: web::Data<HealthState>,
    /// Services and in-memory stores shared by every app built from here.
    pub http_state: web::Data<HttpState>,
}

impl Harness {
    /// In-memory services with cheap password hashing and a fixed clock.
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::fixed());
        let addr = "127.0.0.1:0".parse().expect("literal address");
        let config = ServerConfig::new(addr, b"integration-secret".to_vec())
            .with_hasher(Argon2CredentialHasher::with_cost(64, 1).expect("cheap argon2 cost"));
        let http_state = web::Data::new(build_http_state(&config, clock.clone()));
        Self {
            clock,
            health: web::Data::new(HealthState::new()),
            http_state,
        }
    }
}

/// Initialise the real application over shared state.
pub async fn init_app(
    health: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(build_app(health, http_state)).await
}

/// Build the application with cheap password hashing.
pub async fn spawn_app() -> (
    impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    Harness,
) {
    let harness = Harness::new();
    let app = init_app(harness.health.clone(), harness.http_state.clone()).await;
    (app, harness)
}

/// Send `request` and return the status with the decoded JSON body
/// (`Value::Null` when the body is empty).
pub async fn send<S>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body).expect("JSON body");
    (status, value)
}

/// Register an account and return its token.
pub async fn register<S>(app: &S, email: &str, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": email,
                "password": "password123",
                "name": name,
                "genres": ["fiction"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in register response")
        .to_owned()
}

/// Add "Dune" for the holder of `token` and return the stored entry.
pub async fn add_dune<S>(app: &S, token: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        authed(actix_test::TestRequest::post().uri("/api/v1/books"), token)
            .set_json(json!({
                "catalogId": "gb1",
                "title": "Dune",
                "authors": ["Herbert"],
                "status": "to-read",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "add book failed: {body}");
    body
}

/// Attach a bearer token.
pub fn authed(request: actix_test::TestRequest, token: &str) -> actix_test::TestRequest {
    request.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}
