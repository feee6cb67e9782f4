use crate::models::user::{NewUser, User};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),
    #[error("User with this {field} already exists")]
    Conflict { field: &'static str },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// All users ordered by username. An empty table yields an empty list.
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    /// `Ok(None)` is the not-found result; only database failures are errors.
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            ORDER BY username COLLATE NOCASE ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let (username, email) = normalize(new_user)?;

        // Insert and read-back share one connection so last_insert_rowid
        // refers to this insert.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO users (username, email) VALUES (?, ?)")
            .bind(username)
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(map_insert_error)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(user_id = user.id, "Inserted user row");
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Trims both fields and reports every one that ends up empty.
fn normalize(new_user: &NewUser) -> RepositoryResult<(&str, &str)> {
    let username = new_user.username.trim();
    let email = new_user.email.trim();

    let mut missing = Vec::new();
    if username.is_empty() {
        missing.push("username");
    }
    if email.is_empty() {
        missing.push("email");
    }

    if missing.is_empty() {
        Ok((username, email))
    } else {
        Err(RepositoryError::Validation(missing))
    }
}

// `email` carries the only unique constraint on the table.
fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict { field: "email" }
        }
        _ => RepositoryError::Database(err),
    }
}
