use crate::domain::model::RefreshStatus;
use crate::transport::http::types::{ApiError, AppState, ErrorBody};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Metadata of the most recent refresh", body = RefreshStatus),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn status_handler(State(state): State<AppState>) -> Result<Json<RefreshStatus>, ApiError> {
    Ok(Json(state.store.status().await?))
}
