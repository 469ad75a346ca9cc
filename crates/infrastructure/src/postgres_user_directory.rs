//! PostgreSQL-backed user directory.

use async_trait::async_trait;
use sqlx::PgPool;

use routewarden_application::{NewAccount, UserDirectory, UserRecord};
use routewarden_core::{AppError, AppResult};
use routewarden_domain::UserId;

/// PostgreSQL implementation of the user directory port.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory backed by the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    password_hash: String,
    is_active: bool,
    is_deleted: bool,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_deleted: row.is_deleted,
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_active, is_deleted
            FROM users
            WHERE username = ANY($1)
            ORDER BY username
            "#,
        )
        .bind(usernames)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find users by username: {error}")))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn ensure_account(&self, account: NewAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO UPDATE
            SET email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                is_active = TRUE,
                is_deleted = FALSE,
                updated_at = now()
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to ensure account: {error}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::migrate::Migrator;
    use sqlx::postgres::PgPoolOptions;

    use routewarden_application::{NewAccount, UserDirectory};

    use super::PostgresUserDirectory;

    static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

    async fn test_pool() -> Option<PgPool> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for postgres user directory tests: {error}");
        }

        Some(pool)
    }

    #[tokio::test]
    async fn ensure_account_upserts_on_username() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let directory = PostgresUserDirectory::new(pool);
        let username = format!("directory_{}", uuid::Uuid::new_v4().simple());

        let created = directory
            .ensure_account(NewAccount {
                username: username.clone(),
                email: format!("{username}@example.test"),
                password_hash: "first-hash".to_owned(),
            })
            .await;
        assert!(created.is_ok());

        let rotated = directory
            .ensure_account(NewAccount {
                username: username.clone(),
                email: format!("{username}@example.test"),
                password_hash: "second-hash".to_owned(),
            })
            .await;
        assert!(rotated.is_ok());

        let found = directory.find_by_usernames(&[username.clone()]).await;
        assert!(found.is_ok());
        let found = found.unwrap_or_default();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, username);
        assert_eq!(found[0].password_hash, "second-hash");
        assert!(found[0].is_active);
        assert!(!found[0].is_deleted);
    }

    #[tokio::test]
    async fn find_by_usernames_only_returns_requested_rows() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let directory = PostgresUserDirectory::new(pool);
        let marker = uuid::Uuid::new_v4().simple().to_string();
        let wanted = format!("wanted_{marker}");
        let other = format!("other_{marker}");

        for username in [wanted.as_str(), other.as_str()] {
            let ensured = directory
                .ensure_account(NewAccount {
                    username: username.to_owned(),
                    email: format!("{username}@example.test"),
                    password_hash: "hash".to_owned(),
                })
                .await;
            assert!(ensured.is_ok());
        }

        let found = directory.find_by_usernames(&[wanted.clone()]).await;
        assert!(found.is_ok());
        let found = found.unwrap_or_default();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, wanted);
    }
}
