//! Tests for user attribute validation and update stamping.

use super::*;
use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

#[fixture]
fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn alice(created_at: DateTime<Utc>) -> User {
    User::register(
        EmailAddress::parse("alice@example.com").expect("email"),
        DisplayName::new("Alice").expect("name"),
        PasswordHash::new("$argon2id$v=19$stub").expect("hash"),
        vec!["fiction".to_owned()],
        created_at,
    )
}

#[rstest]
#[case("alice@example.com")]
#[case("first.last+tag@sub.example.co")]
#[case("  MiXeD@Example.ORG  ")]
#[case("under_score%x@host-name.io")]
fn accepts_valid_emails(#[case] raw: &str) {
    let email = EmailAddress::parse(raw).expect("valid email");
    assert_eq!(email.as_ref(), raw.trim().to_lowercase());
}

#[rstest]
#[case("")]
#[case("alice")]
#[case("alice@")]
#[case("@example.com")]
#[case("alice@example")]
#[case("alice@example.c")]
#[case("ali ce@example.com")]
fn rejects_invalid_emails(#[case] raw: &str) {
    assert_eq!(
        EmailAddress::parse(raw),
        Err(UserValidationError::InvalidEmail)
    );
}

#[rstest]
#[case("Al")]
#[case("  Bo  ")]
#[case("Émile")]
fn accepts_names_within_bounds(#[case] raw: &str) {
    let name = DisplayName::new(raw).expect("valid name");
    assert_eq!(name.as_ref(), raw.trim());
}

#[rstest]
fn accepts_fifty_character_name() {
    let raw = "n".repeat(DISPLAY_NAME_MAX);
    assert!(DisplayName::new(raw).is_ok());
}

#[rstest]
#[case("")]
#[case("A")]
#[case("   A   ")]
fn rejects_short_names(#[case] raw: &str) {
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::DisplayNameTooShort {
            min: DISPLAY_NAME_MIN
        })
    );
}

#[rstest]
fn rejects_long_names() {
    let raw = "n".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
}

#[rstest]
fn counts_characters_not_bytes() {
    let raw = "é".repeat(DISPLAY_NAME_MAX);
    assert!(DisplayName::new(raw).is_ok());
}

#[rstest]
fn password_hash_debug_is_redacted() {
    let hash = PasswordHash::new("$argon2id$secret").expect("hash");
    assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
}

#[rstest]
fn password_hash_rejects_empty() {
    assert_eq!(
        PasswordHash::new(" "),
        Err(UserValidationError::EmptyPasswordHash)
    );
}

#[rstest]
fn user_id_round_trips_through_string() {
    let id = UserId::random();
    assert_eq!(UserId::new(id.to_string()), Ok(id));
    assert_eq!(UserId::new("nope"), Err(UserValidationError::InvalidId));
}

#[rstest]
fn register_stamps_both_timestamps(alice: User, created_at: DateTime<Utc>) {
    assert_eq!(alice.created_at(), created_at);
    assert_eq!(alice.updated_at(), created_at);
}

#[rstest]
fn updates_refresh_updated_at(mut alice: User, created_at: DateTime<Utc>) {
    let later = created_at + Duration::minutes(5);
    alice.rename(DisplayName::new("Alicia").expect("name"), later);
    assert_eq!(alice.name().as_ref(), "Alicia");
    assert_eq!(alice.updated_at(), later);
}

#[rstest]
fn updates_never_move_before_creation(mut alice: User, created_at: DateTime<Utc>) {
    let earlier = created_at - Duration::hours(1);
    alice.change_email(EmailAddress::parse("a@example.org").expect("email"), earlier);
    assert_eq!(alice.updated_at(), created_at);
}

#[rstest]
fn from_parts_clamps_stale_updated_at(created_at: DateTime<Utc>) {
    let user = User::from_parts(UserParts {
        id: UserId::random(),
        email: EmailAddress::parse("b@example.com").expect("email"),
        name: DisplayName::new("Bob").expect("name"),
        password_hash: PasswordHash::new("h").expect("hash"),
        genres: Vec::new(),
        created_at,
        updated_at: created_at - Duration::seconds(1),
    });
    assert_eq!(user.updated_at(), created_at);
}

#[rstest]
fn public_projection_omits_hash(alice: User) {
    let value = serde_json::to_value(alice.to_public()).expect("serialise");
    let object = value.as_object().expect("object");
    assert_eq!(object.len(), 3);
    assert_eq!(value["email"], "alice@example.com");
    assert_eq!(value["name"], "Alice");
}

#[rstest]
fn profile_uses_camel_case(alice: User) {
    let value = serde_json::to_value(alice.to_profile()).expect("serialise");
    assert!(value.get("createdAt").is_some());
    assert_eq!(value["genres"][0], "fiction");
}
