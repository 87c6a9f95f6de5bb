//! HTTP routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::TryStreamExt;
use mindgrowth_shared::{
    ErrorBody, GenerateRequest, GenerateResponse, SaveRequest, SaveResponse, GENERATE_PATH,
    GENERATE_STREAM_PATH, SAVE_PATH,
};

use crate::app::App;
use crate::use_cases::{GenerationError, RecordSessionError};

const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
const MSG_INVALID_BODY: &str = "Invalid request body";
const MSG_NO_API_KEY: &str = "API key not configured on server";
const MSG_GENERATION_FAILED: &str = "An error occurred processing your request.";
const MSG_SERVER_CONFIG: &str = "Server configuration error.";
const MSG_SAVE_FAILED: &str = "Failed to save data due to a server error.";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route(GENERATE_PATH, post(generate).fallback(method_not_allowed))
        .route(
            GENERATE_STREAM_PATH,
            post(generate_stream).fallback(method_not_allowed),
        )
        .route(SAVE_PATH, post(save).fallback(method_not_allowed))
}

async fn health() -> &'static str {
    "OK"
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// =============================================================================
// Generation
// =============================================================================

async fn generate(
    State(app): State<Arc<App>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;
    let text = app.use_cases.generate.execute(request).await?;
    Ok(Json(GenerateResponse { text }))
}

/// Plain-text body, one write per model chunk.
async fn generate_stream(
    State(app): State<Arc<App>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let chunks = app.use_cases.generate.stream(request).await?;

    let body = Body::from_stream(chunks.inspect_err(|e| {
        tracing::warn!(error = %e, "Generation stream failed mid-response");
    }));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}

// =============================================================================
// Persistence
// =============================================================================

async fn save(
    State(app): State<Arc<App>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(request) = payload?;
    app.use_cases.record_session.execute(request).await?;
    Ok(Json(SaveResponse { success: true }))
}

// =============================================================================
// Errors
// =============================================================================

/// API error type. Bodies are fixed strings; details only go to the log.
#[derive(Debug)]
pub enum ApiError {
    MethodNotAllowed,
    BadRequest(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!(error = %e, "Rejected request body");
        ApiError::BadRequest(MSG_INVALID_BODY)
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::NotConfigured => {
                tracing::error!("Generation requested but API_KEY is not configured");
                ApiError::Internal(MSG_NO_API_KEY)
            }
            GenerationError::EmptyPrompt | GenerationError::EmptyModel => {
                ApiError::BadRequest(MSG_INVALID_BODY)
            }
            GenerationError::Llm(e) => {
                tracing::error!(error = %e, "Text generation failed");
                ApiError::Internal(MSG_GENERATION_FAILED)
            }
        }
    }
}

impl From<RecordSessionError> for ApiError {
    fn from(e: RecordSessionError) -> Self {
        match e {
            RecordSessionError::NotConfigured => {
                tracing::error!("One or more required spreadsheet environment variables are missing");
                ApiError::Internal(MSG_SERVER_CONFIG)
            }
            RecordSessionError::Sheet(e) => {
                tracing::error!(error = %e, "Saving to the spreadsheet failed");
                ApiError::Internal(MSG_SAVE_FAILED)
            }
        }
    }
}
