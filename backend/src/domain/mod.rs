//! Domain primitives, aggregates and services.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-neutral error payload.
//! - [`User`], [`EmailAddress`], [`DisplayName`]: identity model.
//! - [`BookEntry`], [`ReadingStatus`]: reading-list model.
//! - [`IdentityService`], [`ReadingListService`]: implementations of the
//!   driving ports in [`ports`].

pub mod auth;
pub mod book;
pub mod error;
pub mod identity_service;
pub mod ports;
pub mod reading_list_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, MinimumLengthPolicy, PASSWORD_MIN_LENGTH, Password, PasswordPolicy,
    PasswordPolicyError, ProfileChanges, RegistrationRequest, SessionIdentity, SessionToken,
};
pub use self::book::{
    BookDetails, BookEntry, BookEntryParts, BookId, BookValidationError, ReadingStatus,
    UnknownStatusError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::reading_list_service::ReadingListService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, EmailAddress, PasswordHash, PublicUser,
    User, UserId, UserParts, UserProfile, UserValidationError,
};
