//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] collects every handler under `/api/v1` plus the health probes,
//! the request and response schemas, and the bearer-token security scheme.
//! Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::CatalogVolume;
use crate::domain::{BookEntry, Error, ErrorCode, PublicUser, ReadingStatus, UserProfile};
use crate::inbound::http::books::{AddBookPayload, StatusPayload};
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateProfileRequest,
};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME: &str = "bearer";

/// Registers the `Authorization: Bearer` scheme.
struct BearerAddon;

impl Modify for BearerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token returned by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAddon),
    info(
        title = "Readlist API",
        description = "Accounts, sessions and personal reading lists."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::books::search_catalog,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::add_book,
        crate::inbound::http::books::update_book_status,
        crate::inbound::http::books::remove_book,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PublicUser,
        UserProfile,
        BookEntry,
        ReadingStatus,
        CatalogVolume,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        UpdateProfileRequest,
        AddBookPayload,
        StatusPayload,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "The signed-in user's profile"),
        (name = "books", description = "Reading list and catalog search"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
