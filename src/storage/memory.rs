//! In-process country store for local development and tests.
//!
//! A refresh is applied to a staged copy of the rows and swapped in only after every upsert
//! succeeded, so readers see either the old state or the new one.

use crate::domain::enrich::EnrichedCountry;
use crate::domain::model::{CountryQuery, CountryRecord, RefreshStatus};
use crate::domain::summary::rank_by_gdp;
use crate::storage::{checked_population, CountryStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: i64,
    /// Insertion order; ids increase along the vector.
    rows: Vec<CountryRecord>,
    status: RefreshStatus,
}

impl MemoryState {
    fn position_of(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.rows.iter().position(|r| r.name.to_lowercase() == wanted)
    }

    fn upsert(&mut self, country: &EnrichedCountry, refreshed_at: DateTime<Utc>) -> Result<(), StoreError> {
        let population = checked_population(country)?;
        match self.position_of(&country.name) {
            Some(idx) => {
                let row = &mut self.rows[idx];
                row.capital = country.capital.clone();
                row.region = country.region.clone();
                row.population = population;
                row.currency_code = country.currency_code().map(str::to_string);
                row.exchange_rate = country.exchange_rate();
                row.estimated_gdp = country.estimated_gdp();
                row.flag_url = country.flag_url.clone();
                row.last_refreshed_at = Some(refreshed_at);
            }
            None => {
                self.next_id += 1;
                self.rows.push(CountryRecord {
                    id: self.next_id,
                    name: country.name.clone(),
                    capital: country.capital.clone(),
                    region: country.region.clone(),
                    population,
                    currency_code: country.currency_code().map(str::to_string),
                    exchange_rate: country.exchange_rate(),
                    estimated_gdp: country.estimated_gdp(),
                    flag_url: country.flag_url.clone(),
                    last_refreshed_at: Some(refreshed_at),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCountryStore {
    state: RwLock<MemoryState>,
}

impl MemoryCountryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CountryStore for MemoryCountryStore {
    async fn commit_refresh(
        &self,
        batch: &[EnrichedCountry],
        refreshed_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let mut staged = state.clone();
        for country in batch {
            staged.upsert(country, refreshed_at)?;
        }
        let written = batch.len() as u64;
        staged.status = RefreshStatus {
            total_countries: written as i64,
            last_refreshed_at: Some(refreshed_at),
        };
        *state = staged;
        Ok(written)
    }

    async fn top_by_gdp(&self, limit: usize) -> Result<Vec<CountryRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(rank_by_gdp(&state.rows, limit).into_iter().cloned().collect())
    }

    async fn list(&self, query: &CountryQuery) -> Result<Vec<CountryRecord>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<CountryRecord> = state
            .rows
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.sort.compare(a, b));
        Ok(rows)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<CountryRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state.position_of(name).map(|idx| state.rows[idx].clone()))
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.position_of(name) {
            Some(idx) => {
                state.rows.remove(idx);
                state.status.total_countries = (state.status.total_countries - 1).max(0);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn status(&self) -> Result<RefreshStatus, StoreError> {
        Ok(self.state.read().await.status.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
