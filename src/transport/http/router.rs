use crate::domain::model::{CountryRecord, RefreshStatus};
use crate::transport::http::handlers::{countries, health, image, index, refresh, status};
use crate::transport::http::types::{AppState, ErrorBody, MessageResponse, RefreshResponse};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        refresh::refresh_handler,
        countries::list_countries_handler,
        countries::get_country_handler,
        countries::delete_country_handler,
        status::status_handler,
        image::summary_image_handler
    ),
    components(schemas(
        CountryRecord,
        RefreshStatus,
        RefreshResponse,
        MessageResponse,
        ErrorBody
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/status", get(status::status_handler))
        .route("/countries", get(countries::list_countries_handler))
        .route("/countries/refresh", post(refresh::refresh_handler))
        // Static segment; matched before the `:name` capture.
        .route("/countries/image", get(image::summary_image_handler))
        .route(
            "/countries/:name",
            get(countries::get_country_handler).delete(countries::delete_country_handler),
        )
        .fallback(index::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
