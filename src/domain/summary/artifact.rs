//! The summary document regenerated after each successful refresh.

use crate::domain::model::CountryRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const SUMMARY_TITLE: &str = "Country Exchange Rate Summary";
pub const TOP_N: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RankedCountry {
    pub rank: usize,
    pub name: String,
    pub currency_code: Option<String>,
    /// Always rendered with exactly two decimals.
    pub estimated_gdp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryArtifact {
    pub title: String,
    pub total_countries: u64,
    pub top_5_countries_by_gdp: Vec<RankedCountry>,
    pub last_refreshed: String,
    pub generated_at: String,
}

/// Picks up to `limit` countries by estimated GDP, highest first.
///
/// Countries without a GDP are not eligible. The sort is stable so equal GDPs keep the
/// order they were given in.
pub fn rank_by_gdp<'a, I>(records: I, limit: usize) -> Vec<&'a CountryRecord>
where
    I: IntoIterator<Item = &'a CountryRecord>,
{
    let mut eligible: Vec<&CountryRecord> = records
        .into_iter()
        .filter(|r| r.estimated_gdp.is_some_and(f64::is_finite))
        .collect();
    eligible.sort_by(|a, b| {
        let (x, y) = (a.estimated_gdp.unwrap_or(0.0), b.estimated_gdp.unwrap_or(0.0));
        y.total_cmp(&x)
    });
    eligible.truncate(limit);
    eligible
}

pub fn format_gdp(value: f64) -> String {
    format!("{:.2}", value)
}

impl SummaryArtifact {
    pub fn build(
        total_countries: u64,
        candidates: &[CountryRecord],
        refreshed_at: DateTime<Utc>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let top_5_countries_by_gdp = rank_by_gdp(candidates, TOP_N)
            .into_iter()
            .enumerate()
            .map(|(idx, record)| RankedCountry {
                rank: idx + 1,
                name: record.name.clone(),
                currency_code: record.currency_code.clone(),
                estimated_gdp: format_gdp(record.estimated_gdp.unwrap_or(0.0)),
            })
            .collect();

        Self {
            title: SUMMARY_TITLE.to_string(),
            total_countries,
            top_5_countries_by_gdp,
            last_refreshed: refreshed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: i64, name: &str, gdp: Option<f64>) -> CountryRecord {
        CountryRecord {
            id,
            name: name.to_string(),
            capital: None,
            region: None,
            population: 1,
            currency_code: Some("CUR".to_string()),
            exchange_rate: gdp.map(|_| 1.0),
            estimated_gdp: gdp,
            flag_url: None,
            last_refreshed_at: None,
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 12, 0, 0).unwrap()
    }

    #[test]
    fn ranks_eligible_countries_only() {
        let rows = vec![
            record(1, "Hundred", Some(100.0)),
            record(2, "NullA", None),
            record(3, "Fifty", Some(50.0)),
            record(4, "NullB", None),
            record(5, "SeventyFive", Some(75.0)),
        ];
        let artifact = SummaryArtifact::build(5, &rows, ts(), ts());
        let ranked: Vec<(usize, &str, &str)> = artifact
            .top_5_countries_by_gdp
            .iter()
            .map(|r| (r.rank, r.name.as_str(), r.estimated_gdp.as_str()))
            .collect();
        assert_eq!(
            ranked,
            vec![
                (1, "Hundred", "100.00"),
                (2, "SeventyFive", "75.00"),
                (3, "Fifty", "50.00"),
            ]
        );
        assert_eq!(artifact.total_countries, 5);
    }

    #[test]
    fn no_eligible_countries_gives_empty_ranking() {
        let rows = vec![record(1, "A", None), record(2, "B", None)];
        let artifact = SummaryArtifact::build(2, &rows, ts(), ts());
        assert!(artifact.top_5_countries_by_gdp.is_empty());
        assert_eq!(artifact.title, SUMMARY_TITLE);
        assert_eq!(artifact.last_refreshed, "2025-10-22T12:00:00.000Z");
    }

    #[test]
    fn keeps_at_most_five_and_ties_stay_in_order() {
        let rows: Vec<CountryRecord> = (1..=7)
            .map(|i| record(i, &format!("C{i}"), Some(if i <= 3 { 10.0 } else { i as f64 })))
            .collect();
        let top = rank_by_gdp(&rows, TOP_N);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C1", "C2", "C3", "C7", "C6"]);
    }

    #[test]
    fn gdp_uses_two_decimals() {
        assert_eq!(format_gdp(1234.5), "1234.50");
        assert_eq!(format_gdp(0.0), "0.00");
        assert_eq!(format_gdp(2.999), "3.00");
    }
}
