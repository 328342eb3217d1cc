//! `PostgreSQL` repository implementation for user storage.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::user::{
    domain::{
        CredentialHash, EmailAddress, PersistedUserData, Role, StudentNumber, User, UserId,
        UserStatus,
    },
    ports::{UserQuery, UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by user adapters.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

const EMAIL_UNIQUE_INDEX: &str = "idx_users_email_unique";
const STUDENT_NUMBER_UNIQUE_INDEX: &str = "idx_users_student_number_unique";

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: UserPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let student_number = user
            .student_profile()
            .map(|profile| profile.student_number.clone());
        let new_row = to_row(user)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| {
                    map_unique_violation(err, &email, student_number.as_ref(), || {
                        UserRepositoryError::DuplicateUser(user_id)
                    })
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let student_number = user
            .student_profile()
            .map(|profile| profile.student_number.clone());
        let row = to_row(user)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(|err| {
                    map_unique_violation(err, &email, student_number.as_ref(), || {
                        UserRepositoryError::DuplicateUser(user_id)
                    })
                })?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(users::table.filter(users::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_student_number(
        &self,
        student_number: &StudentNumber,
    ) -> UserRepositoryResult<Option<User>> {
        let lookup = student_number.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::student_number.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self, query: &UserQuery) -> UserRepositoryResult<Vec<User>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let rows = filtered(&filter)
                .order((users::created_at.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn count(&self, query: &UserQuery) -> UserRepositoryResult<u64> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let total = filtered(&filter)
                .count()
                .get_result::<i64>(connection)
                .map_err(UserRepositoryError::persistence)?;
            u64::try_from(total).map_err(UserRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

fn filtered(query: &UserQuery) -> users::BoxedQuery<'static, Pg> {
    let mut statement = users::table.into_boxed();
    if let Some(role) = query.role() {
        statement = statement.filter(users::role.eq(role.as_str()));
    }
    if !query.statuses().is_empty() {
        let statuses: Vec<String> = query
            .statuses()
            .iter()
            .map(|status| status.as_str().to_owned())
            .collect();
        statement = statement.filter(users::status.eq_any(statuses));
    }
    if let Some(supervisor_id) = query.supervisor_id() {
        statement = statement.filter(users::supervisor_id.eq(supervisor_id.into_inner()));
    }
    statement
}

fn map_unique_violation(
    err: DieselError,
    email: &EmailAddress,
    student_number: Option<&StudentNumber>,
    fallback: impl FnOnce() -> UserRepositoryError,
) -> UserRepositoryError {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) = err else {
        return UserRepositoryError::persistence(err);
    };
    match (constraint_of(info.as_ref()), student_number) {
        (Some(EMAIL_UNIQUE_INDEX), _) => UserRepositoryError::DuplicateEmail(email.clone()),
        (Some(STUDENT_NUMBER_UNIQUE_INDEX), Some(number)) => {
            UserRepositoryError::DuplicateStudentNumber(number.clone())
        }
        _ => fallback(),
    }
}

fn constraint_of(info: &dyn DatabaseErrorInformation) -> Option<&str> {
    info.constraint_name()
}

fn to_row(user: &User) -> UserRepositoryResult<NewUserRow> {
    let student_profile = user
        .student_profile()
        .map(serde_json::to_value)
        .transpose()
        .map_err(UserRepositoryError::persistence)?;
    let application_documents = serde_json::to_value(user.application_documents())
        .map_err(UserRepositoryError::persistence)?;
    let completion_documents = serde_json::to_value(user.completion_documents())
        .map_err(UserRepositoryError::persistence)?;

    Ok(NewUserRow {
        id: user.id().into_inner(),
        name: user.name().to_owned(),
        email: user.email().as_str().to_owned(),
        credential: user.credential().as_str().to_owned(),
        role: user.role().as_str().to_owned(),
        status: user.status().as_str().to_owned(),
        student_number: user
            .student_profile()
            .map(|profile| profile.student_number.as_str().to_owned()),
        student_profile,
        application_documents,
        completion_documents,
        documents_completed: user.documents_completed(),
        department: user.department().map(str::to_owned),
        supervisor_id: user.supervisor_id().map(UserId::into_inner),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    })
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        name,
        email: persisted_email,
        credential,
        role: persisted_role,
        status: persisted_status,
        student_profile: persisted_profile,
        application_documents: persisted_application,
        completion_documents: persisted_completion,
        documents_completed,
        department,
        supervisor_id,
        created_at,
        updated_at,
        ..
    } = row;

    let email =
        EmailAddress::new(persisted_email).map_err(UserRepositoryError::invalid_persisted_data)?;
    let role =
        Role::try_from(persisted_role.as_str()).map_err(UserRepositoryError::invalid_persisted_data)?;
    let status = UserStatus::try_from(persisted_status.as_str())
        .map_err(UserRepositoryError::invalid_persisted_data)?;
    let student_profile = persisted_profile
        .map(serde_json::from_value)
        .transpose()
        .map_err(UserRepositoryError::invalid_persisted_data)?;
    let application_documents = serde_json::from_value(persisted_application)
        .map_err(UserRepositoryError::invalid_persisted_data)?;
    let completion_documents = serde_json::from_value(persisted_completion)
        .map_err(UserRepositoryError::invalid_persisted_data)?;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        name,
        email,
        credential: CredentialHash::from_encoded(credential),
        role,
        status,
        student_profile,
        application_documents,
        completion_documents,
        documents_completed,
        department,
        supervisor_id: supervisor_id.map(UserId::from_uuid),
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}
