//! HTTP adapters for the two public APIs.

use crate::domain::model::RawCountry;
use crate::infra::sources::{
    CountrySource, RateSource, RateTable, SourceError, COUNTRY_SOURCE, RATE_SOURCE,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

fn build_client(timeout: Duration, source_name: &'static str) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("country-rates-cache/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| SourceError::Request { source_name, source })
}

async fn get_json(
    client: &reqwest::Client,
    url: &str,
    source_name: &'static str,
    timeout: Duration,
) -> Result<JsonValue, SourceError> {
    let response = client.get(url).send().await.map_err(|source| {
        if source.is_timeout() {
            SourceError::Timeout { source_name, after: timeout }
        } else {
            SourceError::Request { source_name, source }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name,
            status: status.as_u16(),
        });
    }

    response.json::<JsonValue>().await.map_err(|source| {
        if source.is_timeout() {
            SourceError::Timeout { source_name, after: timeout }
        } else {
            SourceError::Malformed {
                source_name,
                reason: source.to_string(),
            }
        }
    })
}

/// Fetches the country list from a RestCountries-compatible endpoint.
#[derive(Clone)]
pub struct RestCountriesClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl RestCountriesClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout, COUNTRY_SOURCE)?,
            url: url.into(),
            timeout,
        })
    }
}

/// Decodes the list element by element so one odd entry cannot sink the whole batch.
pub fn parse_country_list(payload: JsonValue) -> Result<Vec<RawCountry>, SourceError> {
    let JsonValue::Array(items) = payload else {
        return Err(SourceError::Malformed {
            source_name: COUNTRY_SOURCE,
            reason: "expected a JSON array".to_string(),
        });
    };

    let total = items.len();
    let countries: Vec<RawCountry> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawCountry>(item) {
            Ok(country) => Some(country),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable country entry");
                None
            }
        })
        .collect();

    if countries.len() < total {
        tracing::warn!(
            skipped = total - countries.len(),
            total,
            "country source returned undecodable entries"
        );
    }
    Ok(countries)
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    #[tracing::instrument(level = "debug", skip(self), fields(url = %self.url))]
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        let payload = get_json(&self.client, &self.url, COUNTRY_SOURCE, self.timeout).await?;
        parse_country_list(payload)
    }
}

#[derive(Deserialize)]
struct RatesPayload {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    rates: Option<RateTable>,
}

/// Fetches the USD-based rate table from an open.er-api.com-compatible endpoint.
#[derive(Clone)]
pub struct ExchangeRateClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ExchangeRateClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout, RATE_SOURCE)?,
            url: url.into(),
            timeout,
        })
    }
}

pub fn parse_rate_table(payload: JsonValue) -> Result<RateTable, SourceError> {
    let malformed = |reason: String| SourceError::Malformed {
        source_name: RATE_SOURCE,
        reason,
    };
    let parsed: RatesPayload = serde_json::from_value(payload).map_err(|e| malformed(e.to_string()))?;

    if let Some(result) = parsed.result.as_deref() {
        if result != "success" {
            return Err(malformed(format!("result was '{}'", result)));
        }
    }
    parsed
        .rates
        .ok_or_else(|| malformed("missing 'rates' object".to_string()))
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    #[tracing::instrument(level = "debug", skip(self), fields(url = %self.url))]
    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        let payload = get_json(&self.client, &self.url, RATE_SOURCE, self.timeout).await?;
        parse_rate_table(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn country_list_skips_undecodable_entries() {
        let payload = json!([
            {"name": "France", "capital": "Paris", "region": "Europe", "population": 67000000,
             "flag": "https://flagcdn.com/fr.svg", "currencies": [{"code": "EUR", "name": "Euro", "symbol": "€"}]},
            {"name": "Broken", "population": -5},
            {"name": "Antarctica", "population": 1000}
        ]);
        let countries = parse_country_list(payload).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name.as_deref(), Some("France"));
        assert_eq!(countries[1].currencies, None);
    }

    #[test]
    fn rate_table_requires_success_and_rates() {
        let ok = parse_rate_table(json!({"result": "success", "rates": {"USD": 1.0, "NGN": 1600.5}})).unwrap();
        assert_eq!(ok.get("NGN"), Some(&1600.5));

        assert!(matches!(
            parse_rate_table(json!({"result": "error", "error-type": "quota-reached"})),
            Err(SourceError::Malformed { .. })
        ));
        assert!(parse_rate_table(json!({"result": "success"})).is_err());
    }

    #[tokio::test]
    async fn fetches_countries_over_http() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/all");
                then.status(200).json_body(json!([
                    {"name": "Ghana", "population": 31072940, "currencies": [{"code": "GHS"}]}
                ]));
            })
            .await;

        let client = RestCountriesClient::new(server.url("/v2/all"), Duration::from_secs(5)).unwrap();
        let countries = client.fetch_countries().await.unwrap();
        mock.assert_async().await;
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].population, Some(31072940));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v6/latest/USD");
                then.status(502);
            })
            .await;

        let client = ExchangeRateClient::new(server.url("/v6/latest/USD"), Duration::from_secs(5)).unwrap();
        let err = client.fetch_rates().await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 502, .. }));
        assert_eq!(err.source_name(), RATE_SOURCE);
        assert!(err.to_string().starts_with("Could not fetch data from ExchangeRate API"));
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({"result": "success", "rates": {}}));
            })
            .await;

        let client = ExchangeRateClient::new(server.url("/slow"), Duration::from_millis(300)).unwrap();
        let err = client.fetch_rates().await.unwrap_err();
        assert!(matches!(err, SourceError::Timeout { .. }), "got {err:?}");
    }
}
