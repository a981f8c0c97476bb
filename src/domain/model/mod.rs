//! Domain model definitions for cached countries.

pub mod country;

pub use country::{
    CountryQuery, CountryRecord, RawCountry, RawCurrency, RefreshStatus, SortOrder,
};
