use crate::transport::http::types::ErrorBody;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn index_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Country Currency & Exchange Rate API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /countries/refresh": "Fetch and cache country data",
            "GET /countries": "Get all countries (supports ?region, ?currency, ?sort)",
            "GET /countries/:name": "Get country by name",
            "DELETE /countries/:name": "Delete a country",
            "GET /status": "Get refresh status",
            "GET /countries/image": "Get summary image",
            "GET /health": "Store health check",
            "GET /swagger-ui": "OpenAPI documentation"
        }
    }))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Endpoint not found".to_string(),
            details: None,
        }),
    )
}
