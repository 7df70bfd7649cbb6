use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the configured database and apply migrations.
    ///
    /// An in-memory database lives inside a single connection, so the pool
    /// is capped at one connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let in_memory = config.url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { config.max_connections };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        Ok(pool)
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, UserError> {
    let id: String = row.try_get("id").map_err(database_error)?;
    let username: String = row.try_get("username").map_err(database_error)?;
    let email: String = row.try_get("email").map_err(database_error)?;
    let password_hash: String = row.try_get("password_hash").map_err(database_error)?;
    let stored_role: String = row.try_get("user_role").map_err(database_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(database_error)?;

    let role = Role::normalize(&stored_role);
    if stored_role.parse::<Role>().is_err() {
        tracing::warn!(
            user_id = %id,
            stored_role = %stored_role,
            "Unrecognized role in user store, treating as USER"
        );
    }

    Ok(User {
        id: UserId::from_string(&id)?,
        username: Username::from_stored(username),
        email: EmailAddress::from_stored(email),
        password_hash,
        role,
        created_at,
    })
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(database_error)?;

        Ok(exists == 1)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, user_role, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, user_role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            database_error(e)
        })?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repository() -> SqliteUserRepository {
        let pool = SqliteUserRepository::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 3,
        })
        .await
        .expect("Failed to open in-memory database");
        SqliteUserRepository::new(pool)
    }

    fn user(email: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repository = repository().await;
        let created = repository
            .create(user("alice@x.io", Role::Admin))
            .await
            .unwrap();

        assert!(repository.exists_by_email("alice@x.io").await.unwrap());
        assert!(!repository.exists_by_email("bob@x.io").await.unwrap());

        let found = repository
            .find_by_email("alice@x.io")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, created.username);
        assert_eq!(found.password_hash, created.password_hash);
        assert_eq!(found.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_find_unknown_email() {
        let repository = repository().await;
        assert!(repository.find_by_email("nobody@x.io").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_store() {
        let repository = repository().await;
        repository.create(user("alice@x.io", Role::User)).await.unwrap();

        let result = repository.create(user("alice@x.io", Role::User)).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_unknown_stored_role_reads_as_user() {
        let repository = repository().await;
        let stored = user("carol@x.io", Role::Admin);
        repository.create(stored.clone()).await.unwrap();

        sqlx::query("UPDATE users SET user_role = 'superuser' WHERE id = ?1")
            .bind(stored.id.to_string())
            .execute(&repository.pool)
            .await
            .unwrap();

        let found = repository.find_by_email("carol@x.io").await.unwrap().unwrap();
        assert_eq!(found.role, Role::User);
    }

    #[tokio::test]
    async fn test_rows_predating_current_rules_still_load() {
        let repository = repository().await;
        let stored = user("erin@x.io", Role::User);
        repository.create(stored.clone()).await.unwrap();

        sqlx::query("UPDATE users SET username = 'erin_legacy' WHERE id = ?1")
            .bind(stored.id.to_string())
            .execute(&repository.pool)
            .await
            .unwrap();

        let found = repository.find_by_email("erin@x.io").await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.username.as_str(), "erin_legacy");
    }

    #[tokio::test]
    async fn test_lowercase_stored_role_is_normalized() {
        let repository = repository().await;
        let stored = user("dave@x.io", Role::User);
        repository.create(stored.clone()).await.unwrap();

        sqlx::query("UPDATE users SET user_role = 'admin' WHERE id = ?1")
            .bind(stored.id.to_string())
            .execute(&repository.pool)
            .await
            .unwrap();

        let found = repository.find_by_email("dave@x.io").await.unwrap().unwrap();
        assert_eq!(found.role, Role::Admin);
    }
}
