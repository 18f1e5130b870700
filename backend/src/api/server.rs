//! HTTP Server for the Data Sweeper API.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                                   |
//! |--------|----------------|-----------------------------------------------|
//! | GET    | `/health`      | Health check                                  |
//! | POST   | `/api/upload`  | Upload CSV/XLSX files for preview and cleaning |
//! | POST   | `/api/convert` | Upload one file and download it converted     |
//! | GET    | `/api/logs`    | SSE stream for real-time logs                 |

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::{error_response, FormOptions, UploadResponse};
use crate::config::Settings;
use crate::error::{ServerError, ServerResult, TableError};
use crate::models::UploadedFile;
use crate::parser::SUPPORTED_EXTENSIONS;
use crate::transform::{export_file, process_batch, FileRequest};

/// Build the application router.
pub fn router(settings: &Settings) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_files))
        .route("/api/convert", post(convert_file))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(settings: Settings) -> ServerResult<()> {
    let app = router(&settings);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("🚀 Data Sweeper running on http://localhost:{}", settings.port);
    tracing::info!("   POST /api/upload  - Preview and clean CSV/XLSX files");
    tracing::info!("   POST /api/convert - Convert a file to CSV, Excel or PDF");
    tracing::info!("   GET  /api/logs    - SSE log stream");
    tracing::info!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sweeper",
        "version": env!("CARGO_PKG_VERSION"),
        "inputFormats": SUPPORTED_EXTENSIONS,
        "endpoints": {
            "upload": "POST /api/upload",
            "convert": "POST /api/convert",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged receivers skip what they missed
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: one or more `file` fields plus shared options.
async fn upload_files(multipart: Multipart) -> Result<Json<UploadResponse>, ServerError> {
    let (files, form) = read_multipart(multipart).await?;
    if files.is_empty() {
        return Err(ServerError::BadRequest("No file provided".to_string()));
    }
    let options = form.file_options()?;

    log_info(format!("📥 New upload: {} file(s)", files.len()));

    let requests = files
        .into_iter()
        .map(|file| FileRequest::new(file).with_options(options.clone()))
        .collect();

    Ok(Json(UploadResponse::from_outcomes(process_batch(requests))))
}

/// Convert endpoint: exactly one `file` field, options and a `format`.
async fn convert_file(multipart: Multipart) -> Result<Response, ServerError> {
    let (mut files, form) = read_multipart(multipart).await?;
    let file = match (files.pop(), files.is_empty()) {
        (Some(file), true) => file,
        (None, _) => return Err(ServerError::BadRequest("No file provided".to_string())),
        (Some(_), false) => {
            return Err(ServerError::BadRequest(
                "Convert accepts exactly one file".to_string(),
            ))
        }
    };

    let format = form.output_format()?;
    let request = FileRequest::new(file).with_options(form.file_options()?);
    let artifact = export_file(&request, format)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe(&artifact.suggested_file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// Collect `file` fields as uploads and every other field as a form option.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Vec<UploadedFile>, FormOptions), ServerError> {
    let mut files = Vec::new();
    let mut form = FormOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            files.push(UploadedFile::new(file_name, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            form.set(&name, value);
        }
    }

    Ok((files, form))
}

/// Keep a file name usable inside a quoted header value.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Table(TableError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ServerError::Table(TableError::UnknownColumn(_)) | ServerError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Table(
                TableError::EmptyFile | TableError::Malformed { .. } | TableError::InvalidTable(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Table(TableError::Encoding { .. } | TableError::Io(_))
            | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}
