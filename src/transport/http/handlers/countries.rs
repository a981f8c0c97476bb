use crate::domain::model::{CountryQuery, CountryRecord};
use crate::transport::http::types::{ApiError, AppState, ErrorBody, ListParams, MessageResponse};
use axum::extract::{Path, Query, State};
use axum::Json;

const NOT_FOUND: &str = "Country not found";

#[utoipa::path(
    get,
    path = "/countries",
    params(ListParams),
    responses(
        (status = 200, description = "Cached countries", body = [CountryRecord]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_countries_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CountryRecord>>, ApiError> {
    let query = CountryQuery::from(params);
    let countries = state.store.list(&query).await?;
    tracing::debug!(count = countries.len(), sort = query.sort.as_str(), "listed countries");
    Ok(Json(countries))
}

#[utoipa::path(
    get,
    path = "/countries/{name}",
    params(
        ("name" = String, Path, description = "Country name, case-insensitive")
    ),
    responses(
        (status = 200, description = "Country found", body = CountryRecord),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn get_country_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CountryRecord>, ApiError> {
    state
        .store
        .get_by_name(name.trim())
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

#[utoipa::path(
    delete,
    path = "/countries/{name}",
    params(
        ("name" = String, Path, description = "Country name, case-insensitive")
    ),
    responses(
        (status = 200, description = "Country deleted", body = MessageResponse),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn delete_country_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete_by_name(name.trim()).await? {
        return Err(ApiError::NotFound(NOT_FOUND));
    }
    tracing::info!(country = %name, "country deleted");
    Ok(Json(MessageResponse {
        message: "Country deleted successfully".to_string(),
    }))
}
