pub mod context;
pub mod error;
pub mod refresh_service;

pub use context::AppContext;
pub use error::RefreshError;
pub use refresh_service::{RefreshOutcome, RefreshService};
