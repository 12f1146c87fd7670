//! Bearer-token authentication for protected handlers.
//!
//! [`AuthenticatedUser`] pulls `Authorization: Bearer <token>` from the
//! request and asks the identity port to verify it. Missing, malformed,
//! badly signed and expired tokens all produce the same `401`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde_json::json;

use crate::domain::{Error, SessionIdentity, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller behind a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(SessionIdentity);

impl AuthenticatedUser {
    /// Authenticated user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Verified session details.
    #[must_use]
    pub fn identity(&self) -> &SessionIdentity {
        &self.0
    }
}

fn unauthenticated() -> Error {
    Error::unauthorized("authentication required").with_details(json!({ "code": "unauthenticated" }))
}

/// Extract the raw token from an `Authorization` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let scheme_len = BEARER_PREFIX.len();
    let (scheme, token) = (header.get(..scheme_len)?, header.get(scheme_len..)?);
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = token.ok_or_else(unauthenticated)?;
            let identity = state.identity.authenticate(&token).await?;
            Ok(Self(identity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{App, HttpResponse, http::StatusCode, test as actix_test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use crate::domain::ports::{
        FixtureCatalogSearch, IdentityError, MockIdentityCommand, MockReadingListCommand,
    };

    #[rstest]
    #[case("Bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Bearer    padded  ", Some("padded"))]
    #[case("Bearer ", None)]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("Bear", None)]
    #[case("", None)]
    fn parses_bearer_header(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    fn state_with(identity: MockIdentityCommand) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(identity),
            Arc::new(MockReadingListCommand::new()),
            Arc::new(FixtureCatalogSearch),
        ))
    }

    async fn call_whoami(identity: MockIdentityCommand, header: Option<&str>) -> (StatusCode, String) {
        let app = actix_test::init_service(App::new().app_data(state_with(identity)).route(
            "/whoami",
            web::get().to(|user: AuthenticatedUser| async move {
                HttpResponse::Ok().body(user.user_id().to_string())
            }),
        ))
        .await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let res = actix_test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn valid_token_yields_user() {
        let user_id = UserId::random();
        let mut identity = MockIdentityCommand::new();
        identity
            .expect_authenticate()
            .withf(|token| token == "good-token")
            .times(1)
            .return_once(move |_| {
                Ok(SessionIdentity {
                    user_id,
                    email: "alice@example.com".to_owned(),
                    expires_at: Utc
                        .with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
                        .single()
                        .expect("valid instant"),
                })
            });

        let (status, body) = call_whoami(identity, Some("Bearer good-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
    }

    #[actix_web::test]
    async fn rejected_token_is_unauthorised() {
        let mut identity = MockIdentityCommand::new();
        identity
            .expect_authenticate()
            .return_once(|_| Err(IdentityError::Unauthenticated));

        let (status, _) = call_whoami(identity, Some("Bearer expired")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn missing_header_never_reaches_the_port() {
        let mut identity = MockIdentityCommand::new();
        identity.expect_authenticate().never();

        let (status, body) = call_whoami(identity, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("unauthenticated"));
    }
}
