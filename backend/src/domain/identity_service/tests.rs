//! Tests for the identity service.

use std::sync::Arc;

use chrono::Duration;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CredentialHasherError, IssuedToken, MockSessionTokenIssuer, MockUserRepository,
};
use crate::domain::{Password, PasswordHash, SessionToken};
use crate::test_support::MutableClock;

/// Reversible stand-in for Argon2 so expectations stay readable.
struct PrefixHasher;

impl CredentialHasher for PrefixHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError> {
        PasswordHash::new(format!("hashed:{}", password.expose()))
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))
    }

    fn verify(
        &self,
        hash: &PasswordHash,
        password: &Password,
    ) -> Result<bool, CredentialHasherError> {
        let stored = hash
            .as_str()
            .strip_prefix("hashed:")
            .ok_or_else(|| CredentialHasherError::malformed_hash("missing prefix"))?;
        Ok(stored == password.expose())
    }
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::fixed())
}

fn stored_user(clock: &MutableClock, email: &str, password: &str) -> User {
    User::register(
        EmailAddress::parse(email).expect("email"),
        DisplayName::new("Alice").expect("name"),
        PasswordHash::new(format!("hashed:{password}")).expect("hash"),
        vec!["fiction".to_owned()],
        clock.utc(),
    )
}

fn make_service(
    users: MockUserRepository,
    tokens: MockSessionTokenIssuer,
    clock: Arc<MutableClock>,
) -> IdentityService<MockUserRepository> {
    IdentityService::new(
        Arc::new(users),
        Arc::new(PrefixHasher),
        Arc::new(tokens),
        clock,
    )
}

fn registration(email: &str, password: &str, name: &str) -> RegistrationRequest {
    RegistrationRequest {
        email: email.to_owned(),
        password: Password::new(password),
        name: name.to_owned(),
        genres: vec!["fiction".to_owned(), "  ".to_owned()],
    }
}

#[rstest]
#[tokio::test]
async fn register_persists_exactly_once(clock: Arc<MutableClock>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "alice@example.com")
        .times(1)
        .returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|user| {
            user.email().as_ref() == "alice@example.com"
                && user.password_hash().as_str() == "hashed:password123"
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = make_service(users, MockSessionTokenIssuer::new(), clock.clone());
    let profile = service
        .register(registration(" Alice@Example.com ", "password123", "Alice"))
        .await
        .expect("registration succeeds");

    assert_eq!(profile.name, "Alice");
    assert_eq!(profile.email, "alice@example.com");
    assert_eq!(profile.genres, vec!["fiction".to_owned()]);
    assert_eq!(profile.created_at, clock.utc());
    assert_eq!(profile.updated_at, profile.created_at);
}

#[rstest]
#[case::same_fields("password123", "Alice")]
#[case::invalid_password("short", "Alice")]
#[case::invalid_name("password123", "A")]
#[tokio::test]
async fn register_rejects_existing_email_first(
    clock: Arc<MutableClock>,
    #[case] password: &str,
    #[case] name: &str,
) {
    let existing = stored_user(&clock, "alice@example.com", "password123");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    users.expect_create().never();

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .register(registration("ALICE@example.com", password, name))
        .await
        .expect_err("duplicate email");
    assert_eq!(err, IdentityError::EmailAlreadyExists);
}

#[rstest]
#[case::bad_email("not-an-email", "password123", "Alice", "email")]
#[case::short_password("bob@example.com", "1234567", "Bob", "password")]
#[case::short_name("bob@example.com", "password123", "B", "name")]
#[case::long_name("bob@example.com", "password123", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", "name")]
#[tokio::test]
async fn register_validates_before_writing(
    clock: Arc<MutableClock>,
    #[case] email: &str,
    #[case] password: &str,
    #[case] name: &str,
    #[case] field: &str,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users.expect_create().never();

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .register(registration(email, password, name))
        .await
        .expect_err("validation failure");

    match (field, err) {
        ("email", IdentityError::InvalidEmail)
        | ("password", IdentityError::InvalidPassword { .. })
        | ("name", IdentityError::InvalidName { .. }) => {}
        (field, other) => panic!("unexpected error for {field}: {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn register_maps_storage_conflict_to_duplicate(clock: Arc<MutableClock>) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_create()
        .times(1)
        .returning(|_| Err(UserPersistenceError::email_conflict("alice@example.com")));

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .register(registration("alice@example.com", "password123", "Alice"))
        .await
        .expect_err("lost the race");
    assert_eq!(err, IdentityError::EmailAlreadyExists);
}

#[rstest]
#[tokio::test]
async fn register_surfaces_connection_failures(clock: Arc<MutableClock>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(|_| Err(UserPersistenceError::connection("pool timed out")));

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .register(registration("alice@example.com", "password123", "Alice"))
        .await
        .expect_err("repository down");
    assert_eq!(
        err,
        IdentityError::repository_failure("pool timed out", true)
    );
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_valid_credentials(clock: Arc<MutableClock>) {
    let user = stored_user(&clock, "alice@example.com", "password123");
    let user_id = user.id();
    let expires_at = clock.utc() + Duration::hours(24);

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "alice@example.com")
        .return_once(move |_| Ok(Some(user)));
    users.expect_create().never();
    users.expect_update().never();

    let mut tokens = MockSessionTokenIssuer::new();
    tokens
        .expect_issue()
        .withf(move |id, email| *id == user_id && email == "alice@example.com")
        .times(1)
        .returning(move |_, _| {
            Ok(IssuedToken {
                token: SessionToken::new("signed"),
                expires_at,
            })
        });

    let service = make_service(users, tokens, clock);
    let outcome = service
        .login(LoginCredentials::new("Alice@example.com", "password123"))
        .await
        .expect("login succeeds");

    assert_eq!(outcome.token.as_str(), "signed");
    assert_eq!(outcome.expires_at, expires_at);
    assert_eq!(outcome.user.id, user_id);
    assert_eq!(outcome.user.name, "Alice");
}

#[rstest]
#[tokio::test]
async fn login_failures_are_indistinguishable(clock: Arc<MutableClock>) {
    let user = stored_user(&clock, "alice@example.com", "password123");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |email| {
            Ok((email == "alice@example.com").then(|| user.clone()))
        });
    let mut tokens = MockSessionTokenIssuer::new();
    tokens.expect_issue().never();

    let service = make_service(users, tokens, clock);
    let wrong_password = service
        .login(LoginCredentials::new("alice@example.com", "wrong-password"))
        .await
        .expect_err("wrong password");
    let unknown_email = service
        .login(LoginCredentials::new("nobody@example.com", "password123"))
        .await
        .expect_err("unknown email");

    assert_eq!(wrong_password, IdentityError::InvalidCredentials);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[rstest]
#[tokio::test]
async fn login_treats_unusable_hash_as_invalid_credentials(clock: Arc<MutableClock>) {
    let user = User::register(
        EmailAddress::parse("alice@example.com").expect("email"),
        DisplayName::new("Alice").expect("name"),
        PasswordHash::new("garbage").expect("hash"),
        Vec::new(),
        clock.utc(),
    );
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(user)));

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .login(LoginCredentials::new("alice@example.com", "password123"))
        .await
        .expect_err("malformed hash");
    assert_eq!(err, IdentityError::InvalidCredentials);
}

#[rstest]
#[case::malformed(SessionTokenError::malformed("not a jwt"))]
#[case::forged(SessionTokenError::signature_mismatch())]
#[case::expired(SessionTokenError::expired())]
#[tokio::test]
async fn authenticate_collapses_token_rejections(
    clock: Arc<MutableClock>,
    #[case] failure: SessionTokenError,
) {
    let mut tokens = MockSessionTokenIssuer::new();
    tokens
        .expect_verify()
        .return_once(move |_| Err(failure));

    let service = make_service(MockUserRepository::new(), tokens, clock);
    let err = service
        .authenticate("whatever")
        .await
        .expect_err("rejected");
    assert_eq!(err, IdentityError::Unauthenticated);
}

#[rstest]
#[tokio::test]
async fn authenticate_returns_identity(clock: Arc<MutableClock>) {
    let identity = SessionIdentity {
        user_id: UserId::random(),
        email: "alice@example.com".to_owned(),
        expires_at: clock.utc() + Duration::hours(1),
    };
    let expected = identity.clone();
    let mut tokens = MockSessionTokenIssuer::new();
    tokens
        .expect_verify()
        .withf(|token| token == "good")
        .return_once(move |_| Ok(identity));

    let service = make_service(MockUserRepository::new(), tokens, clock);
    let observed = service.authenticate("good").await.expect("valid token");
    assert_eq!(observed, expected);
}

#[rstest]
#[tokio::test]
async fn profile_reports_missing_user(clock: Arc<MutableClock>) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .profile(UserId::random())
        .await
        .expect_err("missing user");
    assert_eq!(err, IdentityError::UserNotFound);
}

#[rstest]
#[tokio::test]
async fn update_profile_refreshes_updated_at(clock: Arc<MutableClock>) {
    let user = stored_user(&clock, "alice@example.com", "password123");
    let user_id = user.id();
    let created_at = user.created_at();
    clock.advance_seconds(90);
    let later = clock.utc();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users
        .expect_update()
        .withf(move |user| {
            user.name().as_ref() == "Alicia"
                && user.password_hash().as_str() == "hashed:new-password"
                && user.updated_at() == later
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let profile = service
        .update_profile(
            user_id,
            ProfileChanges {
                name: Some("Alicia".to_owned()),
                password: Some(Password::new("new-password")),
                ..ProfileChanges::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(profile.name, "Alicia");
    assert_eq!(profile.created_at, created_at);
    assert_eq!(profile.updated_at, later);
}

#[rstest]
#[tokio::test]
async fn update_profile_rejects_email_owned_by_someone_else(clock: Arc<MutableClock>) {
    let user = stored_user(&clock, "alice@example.com", "password123");
    let user_id = user.id();
    let other = stored_user(&clock, "bob@example.com", "password123");

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users
        .expect_find_by_email()
        .withf(|email| email == "bob@example.com")
        .return_once(move |_| Ok(Some(other)));
    users.expect_update().never();

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let err = service
        .update_profile(
            user_id,
            ProfileChanges {
                email: Some("Bob@example.com".to_owned()),
                ..ProfileChanges::default()
            },
        )
        .await
        .expect_err("email taken");
    assert_eq!(err, IdentityError::EmailAlreadyExists);
}

#[rstest]
#[tokio::test]
async fn update_profile_without_changes_skips_write(clock: Arc<MutableClock>) {
    let user = stored_user(&clock, "alice@example.com", "password123");
    let user_id = user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users.expect_update().never();

    let service = make_service(users, MockSessionTokenIssuer::new(), clock);
    let profile = service
        .update_profile(user_id, ProfileChanges::default())
        .await
        .expect("no-op update");
    assert_eq!(profile.id, user_id);
}
