//! Stub sources and fixtures shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use country_rates_cache::domain::enrich::FixedMultiplier;
use country_rates_cache::domain::model::{RawCountry, RawCurrency};
use country_rates_cache::infra::sources::{
    CountrySource, RateSource, RateTable, SourceError, COUNTRY_SOURCE, RATE_SOURCE,
};
use country_rates_cache::storage::{ArtifactCache, CountryStore, MemoryCountryStore};
use country_rates_cache::RefreshService;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MULTIPLIER: f64 = 1500.0;

/// Country source whose payload can be swapped between refreshes.
#[derive(Default)]
pub struct StubCountries {
    payload: Mutex<Vec<RawCountry>>,
    fail: Mutex<bool>,
    delay: Option<Duration>,
}

impl StubCountries {
    pub fn new(payload: Vec<RawCountry>) -> Self {
        Self {
            payload: Mutex::new(payload),
            ..Self::default()
        }
    }

    pub fn slow(payload: Vec<RawCountry>, delay: Duration) -> Self {
        Self {
            payload: Mutex::new(payload),
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_payload(&self, payload: Vec<RawCountry>) {
        *self.payload.lock().unwrap() = payload;
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl CountrySource for StubCountries {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail.lock().unwrap() {
            return Err(SourceError::Status {
                source_name: COUNTRY_SOURCE,
                status: 503,
            });
        }
        Ok(self.payload.lock().unwrap().clone())
    }
}

pub struct StubRates {
    table: RateTable,
    fail: bool,
    delay: Option<Duration>,
}

impl StubRates {
    pub fn new(pairs: &[(&str, f64)]) -> Self {
        Self {
            table: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            fail: false,
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            table: RateTable::new(),
            fail: true,
            delay: None,
        }
    }

    pub fn hanging(delay: Duration) -> Self {
        Self {
            table: RateTable::new(),
            fail: false,
            delay: Some(delay),
        }
    }
}

#[async_trait]
impl RateSource for StubRates {
    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SourceError::Malformed {
                source_name: RATE_SOURCE,
                reason: "result was 'error'".to_string(),
            });
        }
        Ok(self.table.clone())
    }
}

pub fn country(name: &str, population: Option<u64>, currencies: &[&str]) -> RawCountry {
    RawCountry {
        name: Some(name.to_string()),
        capital: Some(format!("{name} City")),
        region: Some("Africa".to_string()),
        population,
        flag: Some(format!("https://flagcdn.com/{}.svg", name.to_lowercase())),
        currencies: Some(
            currencies
                .iter()
                .map(|c| RawCurrency {
                    code: Some(c.to_string()),
                    name: None,
                    symbol: None,
                })
                .collect(),
        ),
    }
}

/// Nigeria and Ghana quoted, Zimbabwe unquoted, Somaliland without currency, plus one entry
/// lacking a population.
pub fn sample_countries() -> Vec<RawCountry> {
    vec![
        country("Nigeria", Some(206_139_589), &["NGN"]),
        country("Ghana", Some(31_072_940), &["GHS", "USD"]),
        country("Zimbabwe", Some(14_862_924), &["ZWL"]),
        country("Somaliland", Some(3_500_000), &[]),
        country("Nopop", None, &["NGN"]),
    ]
}

pub fn sample_rates() -> StubRates {
    StubRates::new(&[("NGN", 1600.0), ("GHS", 15.5), ("USD", 1.0)])
}

pub struct Harness {
    pub countries: Arc<StubCountries>,
    pub store: Arc<MemoryCountryStore>,
    pub service: Arc<RefreshService>,
}

pub fn harness_with(countries: StubCountries, rates: StubRates, cache_dir: &Path) -> Harness {
    let countries = Arc::new(countries);
    let store = Arc::new(MemoryCountryStore::new());
    let store_dyn: Arc<dyn CountryStore> = store.clone();
    let service = RefreshService::new(
        countries.clone(),
        Arc::new(rates),
        store_dyn,
        ArtifactCache::new(cache_dir),
    )
    .with_multiplier(Arc::new(FixedMultiplier(MULTIPLIER)))
    .with_fetch_timeout(Duration::from_millis(500));
    Harness {
        countries,
        store,
        service: Arc::new(service),
    }
}

pub fn harness(cache_dir: &Path) -> Harness {
    harness_with(StubCountries::new(sample_countries()), sample_rates(), cache_dir)
}
