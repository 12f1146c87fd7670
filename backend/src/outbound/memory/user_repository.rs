//! In-memory [`UserRepository`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

/// User store keyed by id, enforcing unique email addresses.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

fn email_taken(users: &HashMap<UserId, User>, user: &User) -> bool {
    users
        .values()
        .any(|existing| existing.id() != user.id() && existing.email() == user.email())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock()?;
        if email_taken(&users, user) {
            return Err(UserPersistenceError::email_conflict(user.email().as_ref()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let users = self.lock()?;
        Ok(users
            .values()
            .find(|user| user.email().as_ref() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.lock()?;
        Ok(users.get(&id).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock()?;
        if !users.contains_key(&user.id()) {
            return Err(UserPersistenceError::missing(user.id().to_string()));
        }
        if email_taken(&users, user) {
            return Err(UserPersistenceError::email_conflict(user.email().as_ref()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, EmailAddress, PasswordHash};
    use crate::test_support::MutableClock;
    use mockable::Clock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> MutableClock {
        MutableClock::fixed()
    }

    fn user(email: &str, clock: &MutableClock) -> User {
        User::register(
            EmailAddress::parse(email).expect("email"),
            DisplayName::new("Reader").expect("name"),
            PasswordHash::new("hash").expect("hash"),
            vec!["fiction".to_owned()],
            clock.utc(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn stores_and_finds_users(clock: MutableClock) {
        let repo = InMemoryUserRepository::new();
        let alice = user("alice@example.com", &clock);
        repo.create(&alice).await.expect("create");

        let by_email = repo
            .find_by_email("alice@example.com")
            .await
            .expect("lookup");
        assert_eq!(by_email.map(|found| found.id()), Some(alice.id()));
        let by_id = repo.find_by_id(alice.id()).await.expect("lookup");
        assert_eq!(by_id.as_ref().map(User::name), Some(alice.name()));
        assert!(repo.find_by_email("bob@example.com").await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_conflicts(clock: MutableClock) {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("alice@example.com", &clock))
            .await
            .expect("first create");
        let err = repo
            .create(&user("alice@example.com", &clock))
            .await
            .expect_err("duplicate");
        assert_eq!(
            err,
            UserPersistenceError::email_conflict("alice@example.com")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn update_rejects_taken_email(clock: MutableClock) {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("alice@example.com", &clock))
            .await
            .expect("create alice");
        let mut bob = user("bob@example.com", &clock);
        repo.create(&bob).await.expect("create bob");

        bob.change_email(
            EmailAddress::parse("alice@example.com").expect("email"),
            clock.utc(),
        );
        let err = repo.update(&bob).await.expect_err("taken");
        assert!(matches!(err, UserPersistenceError::EmailConflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_unknown_user_is_missing(clock: MutableClock) {
        let repo = InMemoryUserRepository::new();
        let ghost = user("ghost@example.com", &clock);
        let err = repo.update(&ghost).await.expect_err("missing");
        assert_eq!(err, UserPersistenceError::missing(ghost.id().to_string()));
    }
}
