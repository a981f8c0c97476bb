use crate::app::{AppContext, RefreshError, RefreshService};
use crate::domain::model::{CountryQuery, SortOrder};
use crate::storage::{ArtifactError, CountryStore, StoreError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CountryStore>,
    pub refresh: Arc<RefreshService>,
}

impl From<&AppContext> for AppState {
    fn from(ctx: &AppContext) -> Self {
        Self {
            store: ctx.store.clone(),
            refresh: ctx.refresh.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct RefreshResponse {
    pub message: String,
    pub total_countries: u64,
    pub last_refreshed_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive region filter (e.g. `Africa`).
    pub region: Option<String>,
    /// Case-insensitive currency code filter (e.g. `NGN`).
    pub currency: Option<String>,
    /// One of `gdp_desc`, `gdp_asc`, `name_asc`, `name_desc`, `population_desc`, `population_asc`.
    /// Defaults to `name_asc`.
    pub sort: Option<String>,
}

impl From<ListParams> for CountryQuery {
    fn from(params: ListParams) -> Self {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        CountryQuery {
            sort: SortOrder::parse(params.sort.as_deref()),
            region: non_empty(params.region),
            currency: non_empty(params.currency),
        }
    }
}

/// Every failure a handler can surface, mapped to one coherent JSON body.
#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    SourceUnavailable(String),
    Conflict(&'static str),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: what.to_string(),
                    details: None,
                },
            ),
            ApiError::SourceUnavailable(details) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: "External data source unavailable".to_string(),
                    details: Some(details),
                },
            ),
            ApiError::Conflict(what) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: what.to_string(),
                    details: None,
                },
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store operation failed");
        ApiError::Internal
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        tracing::error!(error = %err, "reading summary artifact failed");
        ApiError::Internal
    }
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::SourceUnavailable(source) => ApiError::SourceUnavailable(source.to_string()),
            RefreshError::AlreadyRunning => ApiError::Conflict("Refresh already in progress"),
            RefreshError::Persistence(e) => ApiError::from(e),
        }
    }
}
