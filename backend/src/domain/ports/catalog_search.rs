//! Driven port for the external book catalog.
//!
//! Request handlers use this port to look up titles before adding them to a
//! reading list. The services never call it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::define_port_error;

/// One search hit from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVolume {
    /// Catalog key, used as the book entry's catalog id.
    #[schema(example = "zyTCAlFPjgYC")]
    pub catalog_id: String,
    /// Title.
    #[schema(example = "Dune")]
    pub title: String,
    /// Authors.
    pub authors: Vec<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category tags.
    pub categories: Vec<String>,
    /// Cover thumbnail reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

define_port_error! {
    /// Errors surfaced while searching the catalog.
    pub enum CatalogSearchError {
        /// Query text was blank.
        EmptyQuery => "search query must not be empty",
        /// Network transport failed before a response arrived.
        Transport { message: String } => "catalog transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "catalog request timed out: {message}",
        /// The catalog rejected the request.
        Rejected { message: String } => "catalog rejected request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "catalog response decode failed: {message}",
    }
}

impl CatalogSearchError {
    /// Whether the failure lies with the upstream service.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::EmptyQuery)
    }
}

/// Free-text catalog search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Search for volumes matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<CatalogVolume>, CatalogSearchError>;
}

/// Catalog that never finds anything. Used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogSearch;

#[async_trait]
impl CatalogSearch for FixtureCatalogSearch {
    async fn search(&self, query: &str) -> Result<Vec<CatalogVolume>, CatalogSearchError> {
        if query.trim().is_empty() {
            return Err(CatalogSearchError::empty_query());
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_returns_no_results() {
        let results = FixtureCatalogSearch.search("dune").await.expect("search");
        assert!(results.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn fixture_rejects_blank_queries(#[case] query: &str) {
        let err = FixtureCatalogSearch
            .search(query)
            .await
            .expect_err("blank query");
        assert_eq!(err, CatalogSearchError::EmptyQuery);
        assert!(!err.is_upstream());
    }
}
