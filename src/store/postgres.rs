use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::info;

use super::{EntryStore, KeyPage, StoreError};

const TABLE: &str = "guestbook_kv";

/// Key-value store on a single Postgres table.
///
/// Listing is keyset-paginated: the cursor is the last key of the previous
/// page and the next page starts strictly after it.
pub struct PostgresStore {
    pool: PgPool,
    page_size: i64,
}

impl PostgresStore {
    pub fn new(pool: PgPool, page_size: usize) -> Self {
        Self {
            pool,
            page_size: page_size.max(1) as i64,
        }
    }

    /// Connect and make sure the backing table exists
    pub async fn connect(database_url: &str, page_size: usize) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        let store = Self::new(pool, page_size);
        store.ensure_schema().await?;
        info!("Connected guestbook store to table {}", TABLE);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            TABLE
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Escape LIKE metacharacters so the prefix matches literally
    fn like_pattern(prefix: &str) -> String {
        let mut pattern = String::with_capacity(prefix.len() + 1);
        for c in prefix.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

#[async_trait]
impl EntryStore for PostgresStore {
    async fn list(&self, prefix: &str, cursor: Option<String>) -> Result<KeyPage, StoreError> {
        let sql = format!(
            "SELECT key FROM {} WHERE key LIKE $1 AND ($2::TEXT IS NULL OR key > $2) ORDER BY key LIMIT $3",
            TABLE
        );

        let rows = sqlx::query(&sql)
            .bind(Self::like_pattern(prefix))
            .bind(cursor)
            .bind(self.page_size + 1)
            .fetch_all(&self.pool)
            .await?;

        let mut keys = rows
            .iter()
            .map(|row| row.try_get::<String, _>("key"))
            .collect::<Result<Vec<_>, _>>()?;

        let cursor = if keys.len() as i64 > self.page_size {
            keys.truncate(self.page_size as usize);
            keys.last().cloned()
        } else {
            None
        };

        Ok(KeyPage { keys, cursor })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let sql = format!("SELECT value FROM {} WHERE key = $1", TABLE);
        let row = sqlx::query(&sql).bind(key).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(row.try_get::<String, _>("value")?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (key, value) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            TABLE
        );
        sqlx::query(&sql).bind(key).bind(value).execute(&self.pool).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE key = $1", TABLE);
        sqlx::query(&sql).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
