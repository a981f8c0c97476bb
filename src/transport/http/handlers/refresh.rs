use crate::transport::http::types::{ApiError, AppState, ErrorBody, RefreshResponse};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    post,
    path = "/countries/refresh",
    responses(
        (status = 200, description = "Countries fetched, enriched and cached", body = RefreshResponse),
        (status = 409, description = "Another refresh is running", body = ErrorBody),
        (status = 503, description = "Country or exchange-rate source unavailable", body = ErrorBody),
        (status = 500, description = "Storage failure, nothing was written", body = ErrorBody)
    )
)]
pub async fn refresh_handler(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let outcome = state.refresh.refresh().await?;
    Ok(Json(RefreshResponse {
        message: "Countries refreshed successfully".to_string(),
        total_countries: outcome.total_countries,
        last_refreshed_at: outcome.last_refreshed_at,
    }))
}
