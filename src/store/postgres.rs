use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::model::{Instrument, InstrumentId, Page, PageRequest, SortOrder};
use crate::store::traits::InstrumentStore;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS instrument (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255)
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresInstrumentStore {
    pool: PgPool,
}

impl PostgresInstrumentStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the instrument table if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .context("Failed to create instrument table")?;
        Ok(())
    }
}

/// Build the ORDER BY clause. Columns come from `InstrumentProperty`, never
/// from raw request text.
fn order_by_clause(sort: &[SortOrder]) -> String {
    let columns: Vec<String> = sort
        .iter()
        .map(|order| format!("{} {}", order.property.column(), order.direction.as_sql()))
        .collect();
    format!("ORDER BY {}", columns.join(", "))
}

#[async_trait::async_trait]
impl InstrumentStore for PostgresInstrumentStore {
    async fn insert(&self, instrument: Instrument) -> Result<Instrument> {
        sqlx::query_as::<_, Instrument>(
            "INSERT INTO instrument (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&instrument.name)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert instrument")
    }

    async fn replace(&self, instrument: Instrument) -> Result<Instrument> {
        let id = instrument
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot replace an instrument without an id"))?;

        sqlx::query_as::<_, Instrument>(
            r#"
            INSERT INTO instrument (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(&instrument.name)
        .fetch_one(&self.pool)
        .await
        .context("Failed to replace instrument")
    }

    async fn find_by_id(&self, id: InstrumentId) -> Result<Option<Instrument>> {
        sqlx::query_as::<_, Instrument>("SELECT id, name FROM instrument WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch instrument")
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<Instrument>> {
        let total = self.count().await?;

        let sql = format!(
            "SELECT id, name FROM instrument {} LIMIT $1 OFFSET $2",
            order_by_clause(&request.effective_sort())
        );
        let instruments = sqlx::query_as::<_, Instrument>(&sql)
            .bind(i64::try_from(request.size).unwrap_or(i64::MAX))
            .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list instruments")?;

        Ok(Page::new(instruments, request, total))
    }

    async fn exists_by_id(&self, id: InstrumentId) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM instrument WHERE id = $1) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check instrument existence")?;

        Ok(row.get("present"))
    }

    async fn delete_by_id(&self, id: InstrumentId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM instrument WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete instrument")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM instrument")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count instruments")?;

        let total: i64 = row.get("total");
        Ok(total as u64)
    }
}
