use crate::transport::http::types::{ApiError, AppState, ErrorBody};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

#[utoipa::path(
    get,
    path = "/countries/image",
    responses(
        (status = 200, description = "Summary image (SVG), or the JSON summary when no image is cached", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "No summary cached yet", body = ErrorBody)
    )
)]
pub async fn summary_image_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let artifact = state
        .refresh
        .artifacts()
        .read_preferred()
        .await?
        .ok_or(ApiError::NotFound("Summary image not found"))?;
    let content_type = artifact.content_type();
    Ok(([(header::CONTENT_TYPE, content_type)], artifact.into_body()).into_response())
}
