//! Account and session behaviour over the HTTP surface.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use readlist::domain::TRACE_ID_HEADER;
use rstest::rstest;
use serde_json::{Value, json};

use support::{add_dune, authed, register, send, spawn_app};

fn login_request(email: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let (app, _harness) = spawn_app().await;
    register(&app, "alice@example.com", "Alice").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": "Alice@Example.com",
                "password": "another-password",
                "name": "Someone Else",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("email_already_exists")
    );
}

#[rstest]
#[case::bad_email("not-an-email", "password123", "Alice", "invalid_email")]
#[case::short_password("alice@example.com", "short", "Alice", "invalid_password")]
#[case::short_name("alice@example.com", "password123", "A", "invalid_name")]
#[actix_web::test]
async fn registration_validation_is_reported(
    #[case] email: &str,
    #[case] password: &str,
    #[case] name: &str,
    #[case] code: &str,
) {
    let (app, _harness) = spawn_app().await;
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "email": email, "password": password, "name": name }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.pointer("/details/code").and_then(Value::as_str), Some(code));
}

#[rstest]
#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let (app, _harness) = spawn_app().await;
    register(&app, "alice@example.com", "Alice").await;

    let (wrong_status, wrong_body) =
        send(&app, login_request("alice@example.com", "wrong-password")).await;
    let (unknown_status, unknown_body) =
        send(&app, login_request("nobody@example.com", "password123")).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body.get("message"), unknown_body.get("message"));
    assert_eq!(wrong_body.get("details"), unknown_body.get("details"));
}

#[rstest]
#[actix_web::test]
async fn tokens_stop_working_at_expiry() {
    let (app, harness) = spawn_app().await;
    let token = register(&app, "alice@example.com", "Alice").await;
    let me = || authed(actix_test::TestRequest::get().uri("/api/v1/users/me"), &token);

    harness.clock.advance_seconds(86_399);
    let (status, _) = send(&app, me().to_request()).await;
    assert_eq!(status, StatusCode::OK);

    harness.clock.advance_seconds(1);
    let (status, _) = send(&app, me().to_request()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, login_request("alice@example.com", "password123")).await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body.get("token").and_then(Value::as_str).expect("token");
    let entry = add_dune(&app, fresh).await;
    assert_eq!(entry.get("title").and_then(Value::as_str), Some("Dune"));
}

#[rstest]
#[case::missing(None)]
#[case::garbage(Some("Bearer not.a.token"))]
#[case::wrong_scheme(Some("Basic YWxpY2U6cGFzc3dvcmQ="))]
#[actix_web::test]
async fn protected_routes_reject_bad_credentials(#[case] header: Option<&str>) {
    let (app, _harness) = spawn_app().await;
    let mut request = actix_test::TestRequest::get().uri("/api/v1/books");
    if let Some(value) = header {
        request = request.insert_header((actix_web::http::header::AUTHORIZATION, value));
    }
    let response = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_web::test]
async fn profile_update_changes_login_email() {
    let (app, _harness) = spawn_app().await;
    let token = register(&app, "alice@example.com", "Alice").await;

    let (status, body) = send(
        &app,
        authed(actix_test::TestRequest::patch().uri("/api/v1/users/me"), &token)
            .set_json(json!({ "email": "alice@books.example", "name": "Alice B" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Alice B"));

    let (status, _) = send(&app, login_request("alice@example.com", "password123")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, login_request("alice@books.example", "password123")).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn readiness_follows_health_state() {
    let (app, harness) = spawn_app().await;
    let probe = || actix_test::TestRequest::get().uri("/health/ready").to_request();

    let (status, _) = send(&app, probe()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    harness.health.mark_ready();
    let (status, body) = send(&app, probe()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("ok"));
}
