use crate::infra::sources::SourceError;
use crate::storage::StoreError;

/// Why a refresh did not commit. Artifact failures are not here: they happen after the
/// commit and never fail the refresh.
#[derive(thiserror::Error, Debug)]
pub enum RefreshError {
    #[error("external data source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("a refresh is already in progress")]
    AlreadyRunning,

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}
