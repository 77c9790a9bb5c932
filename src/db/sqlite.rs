use crate::db::models::DbUser;
use crate::db::schema::SQLITE_INIT;
use crate::error::PestError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database and make sure the schema exists.
pub async fn connect(database_url: &str) -> Result<UsersStorage, PestError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    let storage = UsersStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

#[derive(Clone)]
pub struct UsersStorage {
    pool: SqlitePool,
}

impl UsersStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PestError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Plain INSERT. A primary key conflict becomes `UsernameTaken`; any
    /// other failure is passed through untouched.
    pub async fn insert(&self, username: &str, password: &str) -> Result<(), PestError> {
        sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    PestError::UsernameTaken
                }
                other => PestError::DatabaseError(other),
            })?;
        Ok(())
    }

    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<DbUser>, PestError> {
        let row = sqlx::query_as::<_, DbUser>(
            "SELECT username, password FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count(&self) -> Result<i64, PestError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}
