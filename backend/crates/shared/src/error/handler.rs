//! API error handler
//!
//! The single choke point that turns an [`AppError`] into the uniform JSON
//! envelope:
//!
//! ```json
//! { "success": false,
//!   "error": { "code": "...", "message": "...", "details": {},
//!              "timestamp": "...", "requestId": "...", "path": "..." } }
//! ```
//!
//! Handlers return `AppResult<T>`. `AppError::into_response` parks the error
//! in the response extensions, and [`handle_api_errors`] (installed once on
//! the router) re-renders it with the request's id and path. Handler
//! authors never write their own `match` on failures.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use super::app_error::AppError;
use super::safe::{safe_error_details, safe_error_message};
use crate::env::Environment;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request facts that end up in the envelope and the log record
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub request_id: String,
    pub path: String,
    pub method: String,
}

impl RequestMeta {
    pub fn from_request(req: &Request) -> Self {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            request_id,
            path: req.uri().path().to_string(),
            method: req.method().to_string(),
        }
    }

    fn unknown() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            path: String::new(),
            method: String::new(),
        }
    }
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: String,
    pub request_id: String,
    pub path: String,
}

/// Success body: `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Renders and logs errors according to the deployment environment
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    environment: Environment,
}

impl ErrorHandler {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Build the client envelope for `err`
    pub fn envelope(&self, err: &AppError, meta: &RequestMeta) -> ErrorEnvelope {
        ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: err.code().to_string(),
                message: safe_error_message(err, self.environment),
                details: safe_error_details(err),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                request_id: meta.request_id.clone(),
                path: meta.path.clone(),
            },
        }
    }

    /// Log `err` and render it as an HTTP response
    pub fn handle_api_error(&self, err: &AppError, meta: &RequestMeta) -> Response {
        self.log(err, meta);

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.envelope(err, meta))).into_response();

        if let Some(retry_after) = err.retry_after() {
            let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }

    fn log(&self, err: &AppError, meta: &RequestMeta) {
        let chain = err.source_chain().join(" <- ");
        if err.is_operational() {
            tracing::warn!(
                error_name = err.kind().name(),
                error_code = err.code(),
                error_message = err.message(),
                chain = %chain,
                status = err.status_code(),
                request_id = %meta.request_id,
                path = %meta.path,
                method = %meta.method,
                environment = %self.environment,
                "API error"
            );
        } else {
            tracing::error!(
                error_name = err.kind().name(),
                error_code = err.code(),
                error_message = err.message(),
                chain = %chain,
                status = err.status_code(),
                request_id = %meta.request_id,
                path = %meta.path,
                method = %meta.method,
                environment = %self.environment,
                "Unexpected API error"
            );
        }
    }
}

/// Error parked in response extensions until the middleware renders it
#[derive(Clone)]
struct PendingError(Arc<AppError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Rendered with the strictest policy in case no middleware is
        // installed; `handle_api_errors` replaces it with the real envelope.
        let fallback = ErrorHandler::new(Environment::Production);
        let meta = RequestMeta::unknown();
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(fallback.envelope(&self, &meta))).into_response();
        response.extensions_mut().insert(PendingError(Arc::new(self)));
        response
    }
}

/// Middleware funnelling every handler failure through [`ErrorHandler`]
///
/// Install with
/// `axum::middleware::from_fn_with_state(Arc::new(handler), handle_api_errors)`.
pub async fn handle_api_errors(
    State(handler): State<Arc<ErrorHandler>>,
    req: Request,
    next: Next,
) -> Response {
    let meta = RequestMeta::from_request(&req);
    let mut response = next.run(req).await;

    match response.extensions_mut().remove::<PendingError>() {
        Some(PendingError(err)) => handler.handle_api_error(&err, &meta),
        None => response,
    }
}
