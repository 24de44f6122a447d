//! REST API server module
//!
//! Exposes job submission, status polling, file reclaim, direct downloads and
//! video metadata over HTTP, plus an SSE stream of job events.

use crate::{Config, JobTracker, Result};
use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Downloads
/// - `GET /api/download?url=&format_id=` - Submit a download job
/// - `GET /api/download-status/:id` - Poll a job
/// - `GET /api/get-file/:id` - Redirect to a ready job's file
/// - `GET /api/direct-download/:video_id/:format_id` - Resolve and redirect without a job
///
/// ## Video
/// - `GET /api/video-info?url=` - Video metadata and formats
///
/// ## System
/// - `GET /api/health` - Health check
/// - `GET /api/openapi.json` - OpenAPI specification
/// - `GET /api/events` - Server-sent events stream
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(tracker: Arc<JobTracker>, config: Arc<Config>) -> Router {
    let state = AppState::new(tracker, config.clone());

    let router = Router::new()
        // Downloads
        .route("/api/download", get(routes::start_download))
        .route("/api/download-status/:id", get(routes::download_status))
        .route("/api/get-file/:id", get(routes::get_file))
        .route(
            "/api/direct-download/:video_id/:format_id",
            get(routes::direct_download),
        )
        // Video
        .route("/api/video-info", get(routes::video_info))
        // System
        .route("/api/health", get(routes::health_check))
        .route("/api/openapi.json", get(routes::openapi_spec))
        .route("/api/events", get(routes::event_stream));

    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin. All methods and headers are
/// allowed.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until the server stops.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vibe_dl::{Config, JobTracker, RapidApiClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let provider = Arc::new(RapidApiClient::new(&config.provider)?);
/// let tracker = Arc::new(JobTracker::new(config.clone(), provider)?);
///
/// vibe_dl::api::start_api_server(tracker, Arc::new(config)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(tracker: Arc<JobTracker>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(tracker, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
