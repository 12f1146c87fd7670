//! Reading-list entries.
//!
//! A [`BookEntry`] records one catalog title in a user's list together with
//! its [`ReadingStatus`]. Entries are validated on construction; the status
//! can move between any two values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Stable book entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raised when a status string is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading status: {value}")]
pub struct UnknownStatusError {
    /// Rejected input.
    pub value: String,
}

/// Where a book sits in the reader's progress.
///
/// # Examples
/// ```
/// use readlist::domain::ReadingStatus;
///
/// let status: ReadingStatus = "in-progress".parse().unwrap();
/// assert_eq!(status, ReadingStatus::InProgress);
/// assert_eq!(status.as_str(), "in-progress");
/// assert!("IN_PROGRESS".parse::<ReadingStatus>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    /// Queued for later.
    ToRead,
    /// Currently being read.
    InProgress,
    /// Finished.
    Completed,
    /// Given up on.
    Abandoned,
}

impl ReadingStatus {
    /// Every recognised status.
    pub const ALL: [Self; 4] = [
        Self::ToRead,
        Self::InProgress,
        Self::Completed,
        Self::Abandoned,
    ];

    /// Wire and storage spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "to-read",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError {
                value: s.to_owned(),
            })
    }
}

/// Broken book entry invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookValidationError {
    /// Catalog identifier missing or blank.
    #[error("catalog id must not be empty")]
    EmptyCatalogId,
    /// Title missing or blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Author list empty.
    #[error("at least one author is required")]
    NoAuthors,
    /// An author entry was blank.
    #[error("author names must not be empty")]
    BlankAuthor,
    /// Last update precedes creation.
    #[error("updated_at must not precede created_at")]
    UpdatedBeforeCreated,
}

impl BookValidationError {
    /// Machine-readable code for clients.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyCatalogId => "empty_catalog_id",
            Self::EmptyTitle => "empty_title",
            Self::NoAuthors => "no_authors",
            Self::BlankAuthor => "blank_author",
            Self::UpdatedBeforeCreated => "updated_before_created",
        }
    }
}

/// Catalog metadata for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDetails {
    /// External catalog key.
    pub catalog_id: String,
    /// Title.
    pub title: String,
    /// Authors in catalog order.
    pub authors: Vec<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Category tags.
    pub categories: Vec<String>,
    /// Cover image reference.
    pub image_ref: Option<String>,
}

impl BookDetails {
    /// Check the required fields, returning trimmed copies.
    pub fn validate(self) -> Result<Self, BookValidationError> {
        let catalog_id = self.catalog_id.trim().to_owned();
        if catalog_id.is_empty() {
            return Err(BookValidationError::EmptyCatalogId);
        }
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.authors.is_empty() {
            return Err(BookValidationError::NoAuthors);
        }
        let authors = self
            .authors
            .iter()
            .map(|author| {
                let trimmed = author.trim();
                if trimmed.is_empty() {
                    Err(BookValidationError::BlankAuthor)
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            catalog_id,
            title,
            authors,
            description: self.description,
            categories: self.categories,
            image_ref: self.image_ref.filter(|image| !image.trim().is_empty()),
        })
    }
}

/// A title in a user's reading list.
///
/// ## Invariants
/// - `catalog_id` and `title` are non-blank.
/// - `authors` holds at least one non-blank name.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookEntry {
    #[schema(value_type = String, example = "0b6f2a64-8c1b-4b8e-9b9a-2f1c3d4e5f60")]
    id: BookId,
    #[schema(example = "gb1")]
    catalog_id: String,
    #[schema(example = "Dune")]
    title: String,
    authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,
    status: ReadingStatus,
    #[schema(value_type = String)]
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored fields of a [`BookEntry`].
#[derive(Debug, Clone)]
pub struct BookEntryParts {
    /// Identifier.
    pub id: BookId,
    /// Catalog metadata.
    pub details: BookDetails,
    /// Current status.
    pub status: ReadingStatus,
    /// Owning user.
    pub owner: UserId,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl BookEntry {
    /// Validate `details` and create an entry stamped at `now`.
    pub fn create(
        owner: UserId,
        details: BookDetails,
        status: ReadingStatus,
        now: DateTime<Utc>,
    ) -> Result<Self, BookValidationError> {
        Self::from_parts(BookEntryParts {
            id: BookId::random(),
            details,
            status,
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an entry from stored parts, re-checking its invariants.
    pub fn from_parts(parts: BookEntryParts) -> Result<Self, BookValidationError> {
        let BookEntryParts {
            id,
            details,
            status,
            owner,
            created_at,
            updated_at,
        } = parts;
        if updated_at < created_at {
            return Err(BookValidationError::UpdatedBeforeCreated);
        }
        let BookDetails {
            catalog_id,
            title,
            authors,
            description,
            categories,
            image_ref,
        } = details.validate()?;
        Ok(Self {
            id,
            catalog_id,
            title,
            authors,
            description,
            categories,
            image_ref,
            status,
            owner,
            created_at,
            updated_at,
        })
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// External catalog key.
    #[must_use]
    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    /// Title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Authors in catalog order.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    /// Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Category tags.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Cover image reference, if any.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ReadingStatus {
        self.status
    }

    /// Owning user.
    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Creation instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update instant.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` owns this entry.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Move to `status`. Any status may follow any other.
    pub fn set_status(&mut self, status: ReadingStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now.max(self.created_at);
    }
}

/// Wire form of a [`BookEntry`]; decoding goes through
/// [`BookEntry::from_parts`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookEntryRecord {
    id: BookId,
    catalog_id: String,
    title: String,
    authors: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    image_ref: Option<String>,
    status: ReadingStatus,
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for BookEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = BookEntryRecord::deserialize(deserializer)?;
        Self::from_parts(BookEntryParts {
            id: record.id,
            details: BookDetails {
                catalog_id: record.catalog_id,
                title: record.title,
                authors: record.authors,
                description: record.description,
                categories: record.categories,
                image_ref: record.image_ref,
            },
            status: record.status,
            owner: record.owner,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
        .map_err(serde::de::Error::custom)
    }
}
