//! PostgreSQL-backed country store.

use crate::domain::enrich::EnrichedCountry;
use crate::domain::model::{CountryQuery, CountryRecord, RefreshStatus};
use crate::storage::{checked_population, CountryStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// Transaction-scoped advisory lock id serialising refresh commits across processes
/// (must be stable across instances).
const REFRESH_LOCK_ID: i64 = 7_310_001;

const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code, exchange_rate, \
     estimated_gdp, flag_url, last_refreshed_at";

#[derive(Clone)]
pub struct PostgresCountryStore {
    pool: PgPool,
}

impl PostgresCountryStore {
    /// Connects and makes sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool; the schema must already exist or be created via `init_schema`.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS countries (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL CHECK (char_length(btrim(name)) > 0),
                capital TEXT,
                region TEXT,
                population BIGINT NOT NULL CHECK (population >= 0),
                currency_code TEXT,
                exchange_rate DOUBLE PRECISION CHECK (exchange_rate > 0),
                estimated_gdp DOUBLE PRECISION,
                flag_url TEXT,
                last_refreshed_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        // Case-insensitive uniqueness; the upsert conflict target.
        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS countries_name_lower_idx ON countries (lower(name))")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS countries_region_lower_idx ON countries (lower(region))")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS countries_currency_upper_idx ON countries (upper(currency_code))",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS refresh_metadata (
                id SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
                last_refreshed_at TIMESTAMPTZ,
                total_countries BIGINT NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "INSERT INTO refresh_metadata (id, last_refreshed_at, total_countries)
             VALUES (1, NULL, 0)
             ON CONFLICT (id) DO NOTHING",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_in_tx(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        country: &EnrichedCountry,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let population = checked_population(country)?;
        sqlx::query(
            "INSERT INTO countries
                (name, capital, region, population, currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ((lower(name))) DO UPDATE SET
                capital = EXCLUDED.capital,
                region = EXCLUDED.region,
                population = EXCLUDED.population,
                currency_code = EXCLUDED.currency_code,
                exchange_rate = EXCLUDED.exchange_rate,
                estimated_gdp = EXCLUDED.estimated_gdp,
                flag_url = EXCLUDED.flag_url,
                last_refreshed_at = EXCLUDED.last_refreshed_at,
                updated_at = now()",
        )
        .bind(&country.name)
        .bind(&country.capital)
        .bind(&country.region)
        .bind(population)
        .bind(country.currency_code())
        .bind(country.exchange_rate())
        .bind(country.estimated_gdp())
        .bind(&country.flag_url)
        .bind(refreshed_at)
        .execute(tx.as_mut())
        .await?;
        Ok(())
    }
}

fn record_from_row(row: &PgRow) -> Result<CountryRecord, sqlx::Error> {
    Ok(CountryRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        capital: row.try_get("capital")?,
        region: row.try_get("region")?,
        population: row.try_get("population")?,
        currency_code: row.try_get("currency_code")?,
        exchange_rate: row.try_get("exchange_rate")?,
        estimated_gdp: row.try_get("estimated_gdp")?,
        flag_url: row.try_get("flag_url")?,
        last_refreshed_at: row.try_get("last_refreshed_at")?,
    })
}

#[async_trait]
impl CountryStore for PostgresCountryStore {
    #[tracing::instrument(level = "debug", skip(self, batch), fields(batch = batch.len()))]
    async fn commit_refresh(
        &self,
        batch: &[EnrichedCountry],
        refreshed_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REFRESH_LOCK_ID)
            .execute(tx.as_mut())
            .await?;

        for country in batch {
            // Dropping `tx` on the error path rolls the transaction back.
            Self::upsert_in_tx(&mut tx, country, refreshed_at).await?;
        }

        let written = batch.len() as u64;
        sqlx::query("UPDATE refresh_metadata SET last_refreshed_at = $1, total_countries = $2 WHERE id = 1")
            .bind(refreshed_at)
            .bind(written as i64)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;
        Ok(written)
    }

    async fn top_by_gdp(&self, limit: usize) -> Result<Vec<CountryRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM countries WHERE estimated_gdp IS NOT NULL ORDER BY estimated_gdp DESC, id ASC LIMIT $1",
            COUNTRY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(record_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn list(&self, query: &CountryQuery) -> Result<Vec<CountryRecord>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM countries WHERE 1=1", COUNTRY_COLUMNS));
        if let Some(region) = query.region.as_deref() {
            builder.push(" AND lower(region) = lower(").push_bind(region.to_string()).push(")");
        }
        if let Some(currency) = query.currency.as_deref() {
            builder
                .push(" AND upper(currency_code) = upper(")
                .push_bind(currency.to_string())
                .push(")");
        }
        builder.push(" ORDER BY ").push(query.sort.order_by_sql());

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(record_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<CountryRecord>, StoreError> {
        let sql = format!("SELECT {} FROM countries WHERE lower(name) = lower($1)", COUNTRY_COLUMNS);
        let row = sqlx::query(&sql).bind(name).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM countries WHERE lower(name) = lower($1)")
            .bind(name)
            .execute(tx.as_mut())
            .await?
            .rows_affected();
        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE refresh_metadata SET total_countries = GREATEST(total_countries - $1, 0) WHERE id = 1",
        )
        .bind(deleted as i64)
        .execute(tx.as_mut())
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn status(&self) -> Result<RefreshStatus, StoreError> {
        let row = sqlx::query("SELECT total_countries, last_refreshed_at FROM refresh_metadata WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(RefreshStatus {
                total_countries: row.try_get("total_countries")?,
                last_refreshed_at: row.try_get("last_refreshed_at")?,
            }),
            None => Ok(RefreshStatus::default()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
