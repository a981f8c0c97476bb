//! External data sources: the country list and the exchange-rate table.

use crate::domain::model::RawCountry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub mod http;

pub use http::{ExchangeRateClient, RestCountriesClient};

pub const COUNTRY_SOURCE: &str = "RestCountries";
pub const RATE_SOURCE: &str = "ExchangeRate";

/// Currency code -> units per USD.
pub type RateTable = HashMap<String, f64>;

/// Any failure to obtain data from a source. The pipeline maps all of them to
/// "source unavailable".
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("Could not fetch data from {source_name} API: {source}")]
    Request {
        source_name: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not fetch data from {source_name} API: HTTP {status}")]
    Status { source_name: &'static str, status: u16 },

    #[error("Could not fetch data from {source_name} API: malformed payload ({reason})")]
    Malformed {
        source_name: &'static str,
        reason: String,
    },

    #[error("Could not fetch data from {source_name} API: timed out after {after:?}")]
    Timeout {
        source_name: &'static str,
        after: Duration,
    },
}

impl SourceError {
    pub fn source_name(&self) -> &'static str {
        match self {
            SourceError::Request { source_name, .. }
            | SourceError::Status { source_name, .. }
            | SourceError::Malformed { source_name, .. }
            | SourceError::Timeout { source_name, .. } => source_name,
        }
    }
}

#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError>;
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable, SourceError>;
}
