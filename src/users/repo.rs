use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::users::repo_types::{NewUser, UserProfile};

/// Failures reported by the user store, as opposed to "no rows".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("expected a single row filtered by {column}, found several")]
    NotSingle { column: &'static str },
    #[error("column {column} cannot hold the supplied value")]
    InvalidValue { column: &'static str },
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether exactly one user row carries `email`.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    /// The single user named `name`, without the password column.
    async fn find_by_name(&self, name: &str) -> Result<Option<UserProfile>, StoreError>;
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let ids: Vec<(uuid::Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM users
            WHERE email = $1
            LIMIT 2
            "#,
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;
        Ok(ids.len() == 1)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<UserProfile>, StoreError> {
        let mut rows = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, name, email, age, location
            FROM users
            WHERE name = $1
            LIMIT 2
            "#,
        )
        .bind(name)
        .fetch_all(&self.db)
        .await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(StoreError::NotSingle { column: "name" }),
        }
    }

    async fn insert(&self, user: &NewUser) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (name, email, age, location, password)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(&user.location)
        .bind(&user.password_hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
