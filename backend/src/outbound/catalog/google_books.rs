//! Reqwest-backed Google Books catalog adapter.
//!
//! This adapter owns transport details only: request URL construction,
//! timeout and HTTP error mapping, and JSON decoding into catalog volumes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::VolumesResponseDto;
use crate::domain::ports::{CatalogSearch, CatalogSearchError, CatalogVolume};

/// Public Google Books API root.
pub const DEFAULT_GOOGLE_BOOKS_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Catalog adapter issuing `GET {base}/volumes?q=..&key=..` requests.
pub struct GoogleBooksCatalog {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl GoogleBooksCatalog {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn volumes_url(&self, query: &str) -> Result<Url, CatalogSearchError> {
        build_volumes_url(&self.base_url, query, &self.api_key)
    }
}

#[async_trait]
impl CatalogSearch for GoogleBooksCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogVolume>, CatalogSearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogSearchError::empty_query());
        }

        let url = self.volumes_url(query)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let volumes = parse_volumes(body.as_ref())?;
        debug!(count = volumes.len(), "catalog search completed");
        Ok(volumes)
    }
}

fn build_volumes_url(base: &Url, query: &str, api_key: &str) -> Result<Url, CatalogSearchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CatalogSearchError::rejected(format!("catalog base URL {base} has no path")))?
        .pop_if_empty()
        .push("volumes");
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", query);
        if !api_key.is_empty() {
            pairs.append_pair("key", api_key);
        }
    }
    Ok(url)
}

fn parse_volumes(body: &[u8]) -> Result<Vec<CatalogVolume>, CatalogSearchError> {
    let decoded: VolumesResponseDto = serde_json::from_slice(body).map_err(|error| {
        CatalogSearchError::decode(format!("invalid volumes JSON payload: {error}"))
    })?;
    Ok(decoded.into_volumes())
}

fn map_transport_error(error: reqwest::Error) -> CatalogSearchError {
    if error.is_timeout() {
        CatalogSearchError::timeout(error.to_string())
    } else {
        CatalogSearchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CatalogSearchError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CatalogSearchError::timeout(message)
        }
        _ if status.is_client_error() => CatalogSearchError::rejected(message),
        _ => CatalogSearchError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Google Books mapping helpers.

    use super::*;
    use rstest::rstest;

    fn base() -> Url {
        Url::parse(DEFAULT_GOOGLE_BOOKS_BASE_URL).expect("default base URL parses")
    }

    #[test]
    fn builds_volumes_url_with_escaped_query_and_key() {
        let url = build_volumes_url(&base(), "dune & co", "k3y").expect("url should build");
        assert_eq!(url.path(), "/books/v1/volumes");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_owned(), "dune & co".to_owned()),
                ("key".to_owned(), "k3y".to_owned()),
            ]
        );
    }

    #[test]
    fn trailing_slash_in_base_is_tolerated() {
        let base = Url::parse("http://localhost:9000/books/v1/").expect("url");
        let url = build_volumes_url(&base, "dune", "").expect("url should build");
        assert_eq!(url.as_str(), "http://localhost:9000/books/v1/volumes?q=dune");
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Rejected")]
    #[case::too_many(StatusCode::TOO_MANY_REQUESTS, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\":{\"message\":\"quota\"}}");
        let matched = match expected {
            "Timeout" => matches!(error, CatalogSearchError::Timeout { .. }),
            "Rejected" => matches!(error, CatalogSearchError::Rejected { .. }),
            "Transport" => matches!(error, CatalogSearchError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
        assert!(error.to_string().contains("quota"));
    }

    #[test]
    fn parses_volume_info_into_catalog_volumes() {
        let body = r#"{
            "kind": "books#volumes",
            "items": [
                {
                    "id": "gb1",
                    "volumeInfo": {
                        "title": "Dune",
                        "authors": ["Frank Herbert"],
                        "description": "Desert planet.",
                        "categories": ["Fiction"],
                        "imageLinks": { "thumbnail": "http://books.example/dune.jpg" }
                    }
                },
                { "id": "gb2", "volumeInfo": { "title": "Untitled notes" } }
            ]
        }"#;

        let volumes = parse_volumes(body.as_bytes()).expect("JSON should decode");
        assert_eq!(volumes.len(), 2);
        let dune = volumes.first().expect("first volume");
        assert_eq!(dune.catalog_id, "gb1");
        assert_eq!(dune.authors, vec!["Frank Herbert".to_owned()]);
        assert_eq!(dune.image_ref.as_deref(), Some("http://books.example/dune.jpg"));
        let notes = volumes.get(1).expect("second volume");
        assert!(notes.authors.is_empty());
        assert_eq!(notes.description, None);
        assert_eq!(notes.image_ref, None);
    }

    #[test]
    fn missing_items_means_no_results() {
        let volumes = parse_volumes(br#"{"kind":"books#volumes","totalItems":0}"#)
            .expect("JSON should decode");
        assert!(volumes.is_empty());
    }

    #[test]
    fn malformed_json_maps_to_decode() {
        let error = parse_volumes(b"<html>").expect_err("decode should fail");
        assert!(matches!(error, CatalogSearchError::Decode { .. }));
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_query_is_rejected_before_any_request() {
        let catalog = GoogleBooksCatalog::new(base(), "key", Duration::from_secs(1))
            .expect("client builds");
        let error = catalog.search("  ").await.expect_err("blank query");
        assert_eq!(error, CatalogSearchError::EmptyQuery);
    }
}
