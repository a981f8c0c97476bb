//! Reconciliation & enrichment: raw countries + rate mapping -> enriched records.

pub mod enricher;
pub mod multiplier;

pub use enricher::{enrich_countries, estimate_gdp, EnrichedCountry, EnrichmentReport, Valuation};
pub use multiplier::{FixedMultiplier, GdpMultiplier, RandomMultiplier, SeededMultiplier};
