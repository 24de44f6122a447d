//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the vibe-dl REST API
///
/// Served at `/api/openapi.json` and, when enabled, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "vibe-dl REST API",
        version = "0.1.0",
        description = "Asynchronous video download broker: submit a download, poll its state, fetch the file",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::start_download,
        crate::api::routes::download_status,
        crate::api::routes::get_file,
        crate::api::routes::direct_download,

        // Video
        crate::api::routes::video_info,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types
        crate::types::JobId,
        crate::types::JobState,
        crate::types::Job,
        crate::types::Event,

        // Video metadata
        crate::video::VideoInfo,
        crate::video::Thumbnail,
        crate::video::ChannelInfo,
        crate::video::AudioFormat,
        crate::video::VideoFormat,

        // Config types
        crate::config::Config,
        crate::config::ProviderConfig,
        crate::config::RetryConfig,
        crate::config::JobConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // API request/response types
        crate::api::routes::DownloadStarted,
        crate::api::routes::DownloadStatus,
        crate::api::routes::HealthResponse,

        // Error types
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "downloads", description = "Download jobs - Submit, poll and fetch resolved files"),
        (name = "video", description = "Video metadata - Title, channel, thumbnails and available formats"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;
