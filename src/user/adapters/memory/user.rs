//! In-memory repository for user lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{EmailAddress, StudentNumber, User, UserId},
    ports::{UserQuery, UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
    student_number_index: HashMap<StudentNumber, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn student_number(user: &User) -> Option<&StudentNumber> {
    user.student_profile()
        .map(|profile| &profile.student_number)
}

fn lock_error(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Helper to look up users through a unique index.
fn find_by_index<K>(
    state: &InMemoryUserState,
    index: &HashMap<K, UserId>,
    key: &K,
) -> Option<User>
where
    K: Eq + std::hash::Hash,
{
    index.get(key).and_then(|id| state.users.get(id)).cloned()
}

fn matching_users<'a>(
    state: &'a InMemoryUserState,
    query: &'a UserQuery,
) -> impl Iterator<Item = &'a User> {
    state.users.values().filter(move |user| query.matches(user))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if state.email_index.contains_key(user.email()) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }
        if let Some(number) = student_number(user) {
            if state.student_number_index.contains_key(number) {
                return Err(UserRepositoryError::DuplicateStudentNumber(number.clone()));
            }
            state.student_number_index.insert(number.clone(), user.id());
        }

        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let old_email = state
            .users
            .get(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?
            .email()
            .clone();

        if old_email != *user.email() {
            if state.email_index.contains_key(user.email()) {
                return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
            }
            state.email_index.remove(&old_email);
            state.email_index.insert(user.email().clone(), user.id());
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .users
            .remove(&id)
            .ok_or(UserRepositoryError::NotFound(id))?;
        state.email_index.remove(removed.email());
        if let Some(number) = student_number(&removed) {
            state.student_number_index.remove(number);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(find_by_index(&state, &state.email_index, email))
    }

    async fn find_by_student_number(
        &self,
        student_number: &StudentNumber,
    ) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(find_by_index(
            &state,
            &state.student_number_index,
            student_number,
        ))
    }

    async fn list(&self, query: &UserQuery) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut users: Vec<User> = matching_users(&state, query).cloned().collect();
        users.sort_by_key(|user| (user.created_at(), user.id()));
        Ok(users)
    }

    async fn count(&self, query: &UserQuery) -> UserRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let total = matching_users(&state, query).count();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }
}
