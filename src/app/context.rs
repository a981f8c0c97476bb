//! Explicitly constructed application context: built once at startup, torn down on shutdown.

use crate::app::refresh_service::RefreshService;
use crate::domain::enrich::{GdpMultiplier, RandomMultiplier, SeededMultiplier};
use crate::infra::config::{AppConfig, StorageBackend};
use crate::infra::sources::{ExchangeRateClient, RestCountriesClient};
use crate::storage::{ArtifactCache, CountryStore, MemoryCountryStore, PostgresCountryStore};
use anyhow::Context;
use std::sync::Arc;

pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CountryStore>,
    pub refresh: Arc<RefreshService>,
}

impl AppContext {
    pub async fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn CountryStore> = match config.storage_backend {
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set")?;
                tracing::info!(max_connections = config.database_max_connections, "connecting to PostgreSQL");
                Arc::new(
                    PostgresCountryStore::connect(url, config.database_max_connections)
                        .await
                        .context("failed to initialize PostgreSQL store")?,
                )
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Arc::new(MemoryCountryStore::new())
            }
        };

        let countries = RestCountriesClient::new(config.countries_api_url.clone(), config.fetch_timeout)?;
        let rates = ExchangeRateClient::new(config.exchange_rate_api_url.clone(), config.fetch_timeout)?;

        let multiplier: Arc<dyn GdpMultiplier> = match config.gdp_multiplier_seed {
            Some(seed) => {
                tracing::info!(seed, "using seeded GDP multiplier");
                Arc::new(SeededMultiplier::new(seed))
            }
            None => Arc::new(RandomMultiplier),
        };

        let refresh = RefreshService::new(
            Arc::new(countries),
            Arc::new(rates),
            store.clone(),
            ArtifactCache::new(config.cache_dir.clone()),
        )
        .with_multiplier(multiplier)
        .with_fetch_timeout(config.fetch_timeout);

        Ok(Self {
            config: Arc::new(config),
            store,
            refresh: Arc::new(refresh),
        })
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
        tracing::info!("store closed");
    }
}
