/// Repository layer for local persistence
use crate::errors::ApiResult;
use chrono::Utc;
use sqlx::SqlitePool;

/// Named storage slots holding one serialized value each
#[derive(Clone)]
pub struct SlotRepo {
    pool: SqlitePool,
}

impl SlotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the value stored in `slot`, if any
    pub async fn read(&self, slot: &str) -> ApiResult<Option<String>> {
        let row = sqlx::query_as::<_, (String,)>("SELECT value FROM kv_slots WHERE slot = ?1")
            .bind(slot)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Replace the value stored in `slot`
    pub async fn write(&self, slot: &str, value: &str) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO kv_slots(slot, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(slot)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Initialize database tables
pub async fn init_db(pool: &SqlitePool) -> ApiResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS kv_slots(
            slot TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_repo() -> SlotRepo {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps the in-memory database alive and shared
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_db(&pool).await.unwrap();
    SlotRepo::new(pool)
}
