pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{AppContext, RefreshError, RefreshOutcome, RefreshService};
pub use domain::enrich::{enrich_countries, EnrichedCountry, GdpMultiplier, Valuation};
pub use domain::model::{CountryQuery, CountryRecord, RawCountry, RefreshStatus, SortOrder};
pub use infra::config::AppConfig;
pub use storage::{ArtifactCache, CountryStore, MemoryCountryStore, PostgresCountryStore};
