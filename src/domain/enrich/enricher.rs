//! Reconciliation of raw countries against the exchange-rate mapping.
//!
//! Pure transformation: no network, no storage. Malformed entries are skipped and counted,
//! they never fail the batch.

use crate::domain::enrich::multiplier::GdpMultiplier;
use crate::domain::model::RawCountry;
use std::collections::HashMap;

/// How a country's currency resolved against the rate mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Valuation {
    /// The country declares no usable currency. GDP is fixed at 0.
    NoCurrency,
    /// The currency exists but the rate source has no usable quote for it.
    Unquoted { currency_code: String },
    Quoted {
        currency_code: String,
        exchange_rate: f64,
        estimated_gdp: f64,
    },
}

impl Valuation {
    pub fn currency_code(&self) -> Option<&str> {
        match self {
            Valuation::NoCurrency => None,
            Valuation::Unquoted { currency_code } | Valuation::Quoted { currency_code, .. } => {
                Some(currency_code)
            }
        }
    }

    pub fn exchange_rate(&self) -> Option<f64> {
        match self {
            Valuation::Quoted { exchange_rate, .. } => Some(*exchange_rate),
            _ => None,
        }
    }

    pub fn estimated_gdp(&self) -> Option<f64> {
        match self {
            Valuation::NoCurrency => Some(0.0),
            Valuation::Unquoted { .. } => None,
            Valuation::Quoted { estimated_gdp, .. } => Some(*estimated_gdp),
        }
    }
}

/// A country ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: u64,
    pub flag_url: Option<String>,
    pub valuation: Valuation,
}

impl EnrichedCountry {
    pub fn currency_code(&self) -> Option<&str> {
        self.valuation.currency_code()
    }

    pub fn exchange_rate(&self) -> Option<f64> {
        self.valuation.exchange_rate()
    }

    pub fn estimated_gdp(&self) -> Option<f64> {
        self.valuation.estimated_gdp()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub countries: Vec<EnrichedCountry>,
    /// Input entries dropped for lacking a name or a population.
    pub skipped: usize,
}

/// `population * multiplier / exchange_rate`.
pub fn estimate_gdp(population: u64, multiplier: f64, exchange_rate: f64) -> f64 {
    population as f64 * multiplier / exchange_rate
}

/// Joins every usable country with its rate and estimates GDP.
pub fn enrich_countries(
    raw: &[RawCountry],
    rates: &HashMap<String, f64>,
    multiplier: &dyn GdpMultiplier,
) -> EnrichmentReport {
    let mut countries = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for entry in raw {
        match enrich_one(entry, rates, multiplier) {
            Some(country) => countries.push(country),
            None => skipped += 1,
        }
    }

    EnrichmentReport { countries, skipped }
}

fn enrich_one(
    entry: &RawCountry,
    rates: &HashMap<String, f64>,
    multiplier: &dyn GdpMultiplier,
) -> Option<EnrichedCountry> {
    let name = non_empty(entry.name.as_deref())?;
    let population = entry.population?;

    // First declared currency wins.
    let first_code = entry
        .currencies
        .as_ref()
        .and_then(|list| list.first())
        .and_then(|currency| non_empty(currency.code.as_deref()));

    let valuation = match first_code {
        None => Valuation::NoCurrency,
        Some(code) => match rates.get(&code).copied().filter(|r| r.is_finite() && *r > 0.0) {
            Some(rate) => Valuation::Quoted {
                estimated_gdp: estimate_gdp(population, multiplier.next_multiplier(), rate),
                exchange_rate: rate,
                currency_code: code,
            },
            None => Valuation::Unquoted { currency_code: code },
        },
    };

    Some(EnrichedCountry {
        name,
        capital: non_empty(entry.capital.as_deref()),
        region: non_empty(entry.region.as_deref()),
        population,
        flag_url: non_empty(entry.flag.as_deref()),
        valuation,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrich::multiplier::{FixedMultiplier, RandomMultiplier, MULTIPLIER_RANGE};
    use crate::domain::model::RawCurrency;

    fn country(name: Option<&str>, population: Option<u64>, codes: &[&str]) -> RawCountry {
        RawCountry {
            name: name.map(str::to_string),
            capital: Some("Capital".to_string()),
            region: Some("Region".to_string()),
            population,
            flag: Some("https://flags.example/x.svg".to_string()),
            currencies: if codes.is_empty() {
                None
            } else {
                Some(
                    codes
                        .iter()
                        .map(|c| RawCurrency {
                            code: Some(c.to_string()),
                            ..RawCurrency::default()
                        })
                        .collect(),
                )
            },
        }
    }

    fn rates(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn skips_entries_without_name_or_population() {
        let raw = vec![
            country(Some("Ok"), Some(10), &["EUR"]),
            country(None, Some(10), &["EUR"]),
            country(Some("   "), Some(10), &["EUR"]),
            country(Some("NoPop"), None, &["EUR"]),
        ];
        let report = enrich_countries(&raw, &rates(&[("EUR", 1.0)]), &FixedMultiplier(1000.0));
        assert_eq!(report.skipped, 3);
        assert_eq!(report.countries.len(), 1);
        assert_eq!(report.countries[0].name, "Ok");
    }

    #[test]
    fn zero_population_is_not_missing() {
        let raw = vec![country(Some("Empty"), Some(0), &["EUR"])];
        let report = enrich_countries(&raw, &rates(&[("EUR", 2.0)]), &FixedMultiplier(1500.0));
        assert_eq!(report.skipped, 0);
        assert_eq!(report.countries[0].estimated_gdp(), Some(0.0));
    }

    #[test]
    fn first_currency_wins() {
        let raw = vec![country(Some("Multi"), Some(100), &["USD", "EUR"])];
        let report = enrich_countries(
            &raw,
            &rates(&[("USD", 1.0), ("EUR", 0.5)]),
            &FixedMultiplier(1000.0),
        );
        let c = &report.countries[0];
        assert_eq!(c.currency_code(), Some("USD"));
        assert_eq!(c.exchange_rate(), Some(1.0));
        assert_eq!(c.estimated_gdp(), Some(100_000.0));
    }

    #[test]
    fn gdp_formula_uses_multiplier_and_rate() {
        let raw = vec![country(Some("Nigeria"), Some(2_000), &["NGN"])];
        let report = enrich_countries(&raw, &rates(&[("NGN", 1600.0)]), &FixedMultiplier(1200.0));
        assert_eq!(report.countries[0].estimated_gdp(), Some(2_000.0 * 1200.0 / 1600.0));
    }

    #[test]
    fn missing_rate_nulls_rate_and_gdp() {
        let raw = vec![country(Some("Nowhere"), Some(5), &["XYZ"])];
        let report = enrich_countries(&raw, &rates(&[("EUR", 1.0)]), &FixedMultiplier(1000.0));
        let c = &report.countries[0];
        assert_eq!(
            c.valuation,
            Valuation::Unquoted {
                currency_code: "XYZ".to_string()
            }
        );
        assert_eq!(c.exchange_rate(), None);
        assert_eq!(c.estimated_gdp(), None);
    }

    #[test]
    fn non_positive_rate_counts_as_missing() {
        let raw = vec![
            country(Some("Zero"), Some(5), &["ZER"]),
            country(Some("Neg"), Some(5), &["NEG"]),
        ];
        let report = enrich_countries(
            &raw,
            &rates(&[("ZER", 0.0), ("NEG", -3.0)]),
            &FixedMultiplier(1000.0),
        );
        assert!(report.countries.iter().all(|c| c.estimated_gdp().is_none()));
    }

    #[test]
    fn no_currency_forces_zero_gdp() {
        let mut blank_code = country(Some("Blank"), Some(7), &["EUR"]);
        blank_code.currencies = Some(vec![RawCurrency::default()]);
        let raw = vec![
            country(Some("Antarctica"), Some(1_000), &[]),
            blank_code,
        ];
        let report = enrich_countries(&raw, &rates(&[("EUR", 1.0)]), &FixedMultiplier(1000.0));
        for c in &report.countries {
            assert_eq!(c.valuation, Valuation::NoCurrency);
            assert_eq!(c.currency_code(), None);
            assert_eq!(c.exchange_rate(), None);
            assert_eq!(c.estimated_gdp(), Some(0.0));
        }
    }

    #[test]
    fn invariant_holds_across_mixed_batch() {
        let raw = vec![
            country(Some("A"), Some(1), &[]),
            country(Some("B"), Some(2), &["EUR"]),
            country(Some("C"), Some(3), &["XXX"]),
            country(Some("D"), Some(4), &["USD", "XXX"]),
        ];
        let report = enrich_countries(
            &raw,
            &rates(&[("EUR", 0.9), ("USD", 1.0)]),
            &RandomMultiplier,
        );
        for c in &report.countries {
            match (c.currency_code(), c.exchange_rate()) {
                (None, _) => assert_eq!(c.estimated_gdp(), Some(0.0)),
                (Some(_), Some(rate)) => {
                    let gdp = c.estimated_gdp().expect("quoted currency has gdp");
                    let multiplier = gdp * rate / c.population as f64;
                    assert!(multiplier > MULTIPLIER_RANGE.start - 1e-6);
                    assert!(multiplier < MULTIPLIER_RANGE.end + 1e-6);
                }
                (Some(_), None) => assert_eq!(c.estimated_gdp(), None),
            }
        }
    }

    #[test]
    fn empty_optional_fields_become_none() {
        let mut raw = country(Some(" France "), Some(1), &[]);
        raw.capital = Some(String::new());
        raw.region = Some("  ".to_string());
        raw.flag = None;
        let report = enrich_countries(&[raw], &HashMap::new(), &FixedMultiplier(1000.0));
        let c = &report.countries[0];
        assert_eq!(c.name, "France");
        assert_eq!(c.capital, None);
        assert_eq!(c.region, None);
        assert_eq!(c.flag_url, None);
    }
}
