//! Persistence of country records and the refresh metadata singleton.
//!
//! A store owns all writes. `commit_refresh` is all-or-nothing: either every upsert and the
//! metadata update become visible together, or the store is left as it was.

use crate::domain::enrich::EnrichedCountry;
use crate::domain::model::{CountryQuery, CountryRecord, RefreshStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod artifacts;
pub mod memory;
pub mod postgres;

pub use artifacts::{ArtifactCache, ArtifactError, CachedArtifact};
pub use memory::MemoryCountryStore;
pub use postgres::PostgresCountryStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid record '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },
}

/// Row constraints shared by every backend (mirrors the SQL CHECKs).
pub(crate) fn checked_population(country: &EnrichedCountry) -> Result<i64, StoreError> {
    if country.name.trim().is_empty() {
        return Err(StoreError::InvalidRecord {
            name: country.name.clone(),
            reason: "name must not be empty".to_string(),
        });
    }
    i64::try_from(country.population).map_err(|_| StoreError::InvalidRecord {
        name: country.name.clone(),
        reason: format!("population {} exceeds storage range", country.population),
    })
}

#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Upserts the whole batch by case-insensitive name and overwrites the metadata singleton,
    /// in one unit of work. Rows absent from the batch are left untouched.
    ///
    /// Returns the number of records written.
    async fn commit_refresh(
        &self,
        batch: &[EnrichedCountry],
        refreshed_at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Up to `limit` rows with a GDP, highest first, ties in persisted order.
    async fn top_by_gdp(&self, limit: usize) -> Result<Vec<CountryRecord>, StoreError>;

    async fn list(&self, query: &CountryQuery) -> Result<Vec<CountryRecord>, StoreError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<CountryRecord>, StoreError>;

    /// Deletes one row by case-insensitive name and decrements `total_countries` (floor 0).
    /// Returns `false` when nothing matched.
    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError>;

    async fn status(&self) -> Result<RefreshStatus, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases pooled resources. Default is a no-op.
    async fn close(&self) {}
}
