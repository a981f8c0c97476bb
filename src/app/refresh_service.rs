//! The refresh pipeline.
//!
//! One refresh is a single sequential unit of work:
//! 1.  Fetch the country list and the rate table concurrently (fail fast on either).
//! 2.  Reconcile them into enriched records.
//! 3.  Commit the batch plus the metadata singleton atomically.
//! 4.  Regenerate the summary artifact (best effort, after the commit).
//!
//! At most one refresh runs per service at a time; a concurrent request is rejected.

use crate::app::error::RefreshError;
use crate::domain::enrich::{enrich_countries, GdpMultiplier, RandomMultiplier};
use crate::domain::model::RawCountry;
use crate::domain::summary::{SummaryArtifact, TOP_N};
use crate::infra::config::MAX_FETCH_TIMEOUT;
use crate::infra::sources::{
    CountrySource, RateSource, RateTable, SourceError, COUNTRY_SOURCE, RATE_SOURCE,
};
use crate::storage::{ArtifactCache, ArtifactError, CountryStore};
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Result of a committed refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub total_countries: u64,
    pub skipped: usize,
    pub last_refreshed_at: DateTime<Utc>,
    pub artifact_written: bool,
}

pub struct RefreshService {
    countries: Arc<dyn CountrySource>,
    rates: Arc<dyn RateSource>,
    store: Arc<dyn CountryStore>,
    artifacts: ArtifactCache,
    multiplier: Arc<dyn GdpMultiplier>,
    fetch_timeout: Duration,
    /// Single-flight guard. Held for the whole pipeline run.
    in_flight: Mutex<()>,
}

impl RefreshService {
    pub fn new(
        countries: Arc<dyn CountrySource>,
        rates: Arc<dyn RateSource>,
        store: Arc<dyn CountryStore>,
        artifacts: ArtifactCache,
    ) -> Self {
        Self {
            countries,
            rates,
            store,
            artifacts,
            multiplier: Arc::new(RandomMultiplier),
            fetch_timeout: MAX_FETCH_TIMEOUT,
            in_flight: Mutex::new(()),
        }
    }

    /// Replace the production random multiplier (seeded or fixed sources for reproducible runs).
    pub fn with_multiplier(mut self, multiplier: Arc<dyn GdpMultiplier>) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn CountryStore> {
        &self.store
    }

    pub fn artifacts(&self) -> &ArtifactCache {
        &self.artifacts
    }

    /// Runs the full pipeline once.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| RefreshError::AlreadyRunning)?;

        tracing::info!("refresh started");
        let (raw, rates) = tokio::try_join!(self.fetch_countries(), self.fetch_rates())
            .inspect_err(|e| tracing::error!(error = %e, "refresh aborted: source unavailable"))?;
        tracing::info!(countries = raw.len(), rates = rates.len(), "sources fetched");

        let report = enrich_countries(&raw, &rates, self.multiplier.as_ref());
        if report.skipped > 0 {
            tracing::info!(skipped = report.skipped, "skipped countries without name or population");
        }

        let refreshed_at = Utc::now().trunc_subsecs(3);
        let total_countries = self
            .store
            .commit_refresh(&report.countries, refreshed_at)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "refresh rolled back"))?;
        tracing::info!(total_countries, %refreshed_at, "refresh committed");

        let artifact_written = match self.regenerate_artifact(total_countries, refreshed_at).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "summary artifact generation failed");
                false
            }
        };

        Ok(RefreshOutcome {
            total_countries,
            skipped: report.skipped,
            last_refreshed_at: refreshed_at,
            artifact_written,
        })
    }

    /// Builds the summary from the committed store and overwrites the cached files.
    pub async fn regenerate_artifact(
        &self,
        total_countries: u64,
        refreshed_at: DateTime<Utc>,
    ) -> Result<SummaryArtifact, ArtifactError> {
        let top = self.store.top_by_gdp(TOP_N).await?;
        let summary = SummaryArtifact::build(total_countries, &top, refreshed_at, Utc::now());
        self.artifacts.write(&summary).await?;
        tracing::debug!(ranked = summary.top_5_countries_by_gdp.len(), dir = ?self.artifacts.dir(), "summary artifact written");
        Ok(summary)
    }

    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        tokio::time::timeout(self.fetch_timeout, self.countries.fetch_countries())
            .await
            .map_err(|_| SourceError::Timeout {
                source_name: COUNTRY_SOURCE,
                after: self.fetch_timeout,
            })?
    }

    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        tokio::time::timeout(self.fetch_timeout, self.rates.fetch_rates())
            .await
            .map_err(|_| SourceError::Timeout {
                source_name: RATE_SOURCE,
                after: self.fetch_timeout,
            })?
    }
}
