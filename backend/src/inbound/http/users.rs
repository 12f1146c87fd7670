//! Account HTTP handlers.
//!
//! ```text
//! POST  /api/v1/auth/register {"email":"alice@example.com","password":"password123","name":"Alice","genres":["fiction"]}
//! POST  /api/v1/auth/login    {"email":"alice@example.com","password":"password123"}
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me      {"name":"Alicia"}
//! ```

use std::fmt;

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::LoginOutcome;
use crate::domain::{
    Error, LoginCredentials, Password, ProfileChanges, PublicUser, RegistrationRequest,
    UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/auth/register`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Plaintext password, at least eight characters.
    #[schema(example = "password123")]
    pub password: String,
    /// Display name.
    #[schema(example = "Alice")]
    pub name: String,
    /// Genre preference tags.
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Plaintext password.
    #[schema(example = "password123")]
    pub password: String,
}

/// Request body for `PATCH /api/v1/users/me`. Absent fields stay unchanged.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New email.
    pub email: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New password.
    pub password: Option<String>,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("name", &self.name)
            .field("genres", &self.genres)
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for UpdateProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateProfileRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Session token and the public view of its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Instant the token stops verifying.
    pub expires_at: DateTime<Utc>,
    /// Authenticated user.
    pub user: PublicUser,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token.into_inner(),
            expires_at: outcome.expires_at,
            user: outcome.user,
        }
    }
}

/// New account together with its first session token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Created profile.
    pub user: UserProfile,
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Instant the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

/// Register a new account and log it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid email, password or name", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
        genres,
    } = payload.into_inner();
    let password = Password::new(password);
    let profile = state
        .identity
        .register(RegistrationRequest {
            email,
            password: password.clone(),
            name,
            genres,
        })
        .await?;

    let credentials = LoginCredentials::new(&profile.email, password.expose());
    let outcome = state.identity.login(credentials).await?;
    info!(user_id = %profile.id, "account registered over HTTP");
    Ok(HttpResponse::Created().json(RegisterResponse {
        user: profile,
        token: outcome.token.into_inner(),
        expires_at: outcome.expires_at,
    }))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let outcome = state
        .identity
        .login(LoginCredentials::new(&email, password))
        .await?;
    Ok(web::Json(outcome.into()))
}

/// Fetch the caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.identity.profile(user.user_id()).await?;
    Ok(web::Json(profile))
}

/// Change the caller's email, display name or password.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid email, password or name", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser",
    security(("bearer" = []))
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let UpdateProfileRequest {
        email,
        name,
        password,
    } = payload.into_inner();
    let changes = ProfileChanges {
        email,
        name,
        password: password.map(Password::new),
    };
    let profile = state
        .identity
        .update_profile(user.user_id(), changes)
        .await?;
    Ok(web::Json(profile))
}
