//! Reading-list and catalog HTTP handlers.
//!
//! ```text
//! GET    /api/v1/books/search?q=dune
//! GET    /api/v1/books?status=completed
//! POST   /api/v1/books
//! PUT    /api/v1/books/{id}/status {"status":"in-progress"}
//! DELETE /api/v1/books/{id}
//! ```
//!
//! Mutations are scoped to the caller: a book owned by someone else is
//! reported as not found.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{AddBookRequest, CatalogVolume};
use crate::domain::{BookDetails, BookEntry, BookId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Query string for catalog search.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text search terms.
    pub q: Option<String>,
}

/// Query string for listing books.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Optional status filter (`to-read`, `in-progress`, `completed`, `abandoned`).
    pub status: Option<String>,
}

/// Request body for `POST /api/v1/books`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddBookPayload {
    /// Catalog key of the volume.
    #[schema(example = "gb1")]
    pub catalog_id: String,
    /// Title.
    #[schema(example = "Dune")]
    pub title: String,
    /// Authors, at least one.
    pub authors: Vec<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category tags.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Cover image reference.
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Initial reading status.
    #[schema(example = "to-read")]
    pub status: String,
}

/// Request body for `PUT /api/v1/books/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusPayload {
    /// New reading status.
    #[schema(example = "completed")]
    pub status: String,
}

fn parse_book_id(raw: &str) -> Result<BookId, Error> {
    Uuid::parse_str(raw).map(BookId::from_uuid).map_err(|_| {
        Error::invalid_request("book id must be a valid UUID").with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

/// Search the external catalog.
#[utoipa::path(
    get,
    path = "/api/v1/books/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching volumes", body = [CatalogVolume]),
        (status = 400, description = "Missing query", body = Error),
        (status = 503, description = "Catalog unavailable", body = Error)
    ),
    tags = ["books"],
    operation_id = "searchCatalog",
    security([])
)]
#[get("/books/search")]
pub async fn search_catalog(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<CatalogVolume>>> {
    let q = query.into_inner().q.unwrap_or_default();
    let volumes = state.catalog.search(&q).await?;
    Ok(web::Json(volumes))
}

/// List the caller's books, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(ListQuery),
    responses(
        (status = 200, description = "Reading list", body = [BookEntry]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security(("bearer" = []))
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<BookEntry>>> {
    let status = query
        .into_inner()
        .status
        .filter(|value| !value.trim().is_empty());
    let books = match status {
        Some(status) => {
            state
                .reading_list
                .list_books_by_status(user.user_id(), &status)
                .await?
        }
        None => state.reading_list.list_books(user.user_id()).await?,
    };
    Ok(web::Json(books))
}

/// Add a book to the caller's list.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = AddBookPayload,
    responses(
        (status = 201, description = "Stored entry", body = BookEntry),
        (status = 400, description = "Invalid book or status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "addBook",
    security(("bearer" = []))
)]
#[post("/books")]
pub async fn add_book(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AddBookPayload>,
) -> ApiResult<HttpResponse> {
    let AddBookPayload {
        catalog_id,
        title,
        authors,
        description,
        categories,
        image_ref,
        status,
    } = payload.into_inner();
    let entry = state
        .reading_list
        .add_book(AddBookRequest {
            user_id: user.user_id(),
            details: BookDetails {
                catalog_id,
                title,
                authors,
                description,
                categories,
                image_ref,
            },
            status,
        })
        .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// Change the reading status of one of the caller's books.
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}/status",
    params(("id" = String, Path, description = "Book identifier")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Updated entry", body = BookEntry),
        (status = 400, description = "Unknown status or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Book not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "updateBookStatus",
    security(("bearer" = []))
)]
#[put("/books/{id}/status")]
pub async fn update_book_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<StatusPayload>,
) -> ApiResult<web::Json<BookEntry>> {
    let book_id = parse_book_id(&path.into_inner())?;
    let entry = state
        .reading_list
        .update_owned_status(user.user_id(), book_id, &payload.status)
        .await?;
    Ok(web::Json(entry))
}

/// Remove one of the caller's books.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Book not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "removeBook",
    security(("bearer" = []))
)]
#[delete("/books/{id}")]
pub async fn remove_book(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let book_id = parse_book_id(&path.into_inner())?;
    state
        .reading_list
        .remove_owned_book(user.user_id(), book_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
