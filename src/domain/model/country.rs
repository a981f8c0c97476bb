//! Country types as they arrive from the source, as they are persisted, and as they are queried.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use utoipa::ToSchema;

/// One currency entry declared by a country in the source payload.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawCurrency {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// A country exactly as the country source reports it.
///
/// Every field is optional here; deciding what is usable happens in the enrichment engine.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawCountry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<RawCurrency>>,
}

/// A persisted country row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CountryRecord {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Snapshot of the metadata singleton.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct RefreshStatus {
    pub total_countries: i64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Sort orders accepted by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    GdpDesc,
    GdpAsc,
    #[default]
    NameAsc,
    NameDesc,
    PopulationDesc,
    PopulationAsc,
}

impl SortOrder {
    /// Lenient parse: anything unrecognised falls back to `name_asc`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("gdp_desc") => SortOrder::GdpDesc,
            Some("gdp_asc") => SortOrder::GdpAsc,
            Some("name_desc") => SortOrder::NameDesc,
            Some("population_desc") => SortOrder::PopulationDesc,
            Some("population_asc") => SortOrder::PopulationAsc,
            _ => SortOrder::NameAsc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::GdpDesc => "gdp_desc",
            SortOrder::GdpAsc => "gdp_asc",
            SortOrder::NameAsc => "name_asc",
            SortOrder::NameDesc => "name_desc",
            SortOrder::PopulationDesc => "population_desc",
            SortOrder::PopulationAsc => "population_asc",
        }
    }

    /// SQL `ORDER BY` clause matching [`SortOrder::compare`].
    pub fn order_by_sql(&self) -> &'static str {
        match self {
            SortOrder::GdpDesc => "estimated_gdp DESC NULLS LAST, name ASC",
            SortOrder::GdpAsc => "estimated_gdp ASC NULLS LAST, name ASC",
            SortOrder::NameAsc => "name ASC",
            SortOrder::NameDesc => "name DESC",
            SortOrder::PopulationDesc => "population DESC, name ASC",
            SortOrder::PopulationAsc => "population ASC, name ASC",
        }
    }

    /// Total order used by in-process backends. Null GDP always sorts last.
    pub fn compare(&self, a: &CountryRecord, b: &CountryRecord) -> Ordering {
        let by_name = || a.name.cmp(&b.name);
        match self {
            SortOrder::GdpDesc => cmp_nulls_last(a.estimated_gdp, b.estimated_gdp, true).then_with(by_name),
            SortOrder::GdpAsc => cmp_nulls_last(a.estimated_gdp, b.estimated_gdp, false).then_with(by_name),
            SortOrder::NameAsc => by_name(),
            SortOrder::NameDesc => by_name().reverse(),
            SortOrder::PopulationDesc => b.population.cmp(&a.population).then_with(by_name),
            SortOrder::PopulationAsc => a.population.cmp(&b.population).then_with(by_name),
        }
    }
}

fn cmp_nulls_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.total_cmp(&y);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters and ordering for listing persisted countries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryQuery {
    /// Case-insensitive exact region match.
    pub region: Option<String>,
    /// Case-insensitive exact currency code match.
    pub currency: Option<String>,
    pub sort: SortOrder,
}

impl CountryQuery {
    pub fn matches(&self, record: &CountryRecord) -> bool {
        let region_ok = match self.region.as_deref() {
            Some(wanted) => record
                .region
                .as_deref()
                .is_some_and(|r| r.to_lowercase() == wanted.to_lowercase()),
            None => true,
        };
        let currency_ok = match self.currency.as_deref() {
            Some(wanted) => record
                .currency_code
                .as_deref()
                .is_some_and(|c| c.to_uppercase() == wanted.to_uppercase()),
            None => true,
        };
        region_ok && currency_ok
    }
}
