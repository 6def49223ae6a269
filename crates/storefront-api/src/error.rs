//! Maps domain `AppError` to problem-details HTTP responses.
//!
//! The response built here never exposes internals. [`ErrorContext`] rides
//! along in the response extensions so that
//! [`problem_details`](crate::middleware::problem::problem_details) can fill
//! in the request path and, in development, the full error text.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use storefront_core::error::{AppError, ErrorKind};

/// Title used for server errors outside development.
pub const GENERIC_TITLE: &str = "An error occurred.";

/// Content type of every error body.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// RFC 7807 problem details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short summary.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Request path that produced the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Extended explanation, development only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    /// Build the body for an error.
    ///
    /// Client errors always carry their message. Server errors are reduced
    /// to a generic title unless `development` is set.
    pub fn from_context(context: &ErrorContext, development: bool) -> Self {
        let status = status_for(context.kind);
        let (title, detail) = if status.is_client_error() {
            (context.message.clone(), None)
        } else if development {
            (context.message.clone(), Some(context.chain.clone()))
        } else {
            (GENERIC_TITLE.to_string(), None)
        };

        Self {
            problem_type: type_uri(status).to_string(),
            title,
            status: status.as_u16(),
            instance: None,
            detail,
        }
    }

    /// Attach the request path.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(self)).into_response()
    }
}

/// What the problem middleware needs to know about a failed request.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
    /// Message followed by every cause.
    pub chain: String,
}

impl From<&AppError> for ErrorContext {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind,
            message: err.message.clone(),
            chain: err.source_chain(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let context = ErrorContext::from(&self.0);
        let mut response = ProblemDetails::from_context(&context, false).into_response();
        response.extensions_mut().insert(context);
        response
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Database
        | ErrorKind::Internal
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn type_uri(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "https://tools.ietf.org/html/rfc7231#section-6.5.1",
        StatusCode::NOT_FOUND => "https://tools.ietf.org/html/rfc7231#section-6.5.4",
        StatusCode::CONFLICT => "https://tools.ietf.org/html/rfc7231#section-6.5.8",
        StatusCode::SERVICE_UNAVAILABLE => "https://tools.ietf.org/html/rfc7231#section-6.6.4",
        _ => "https://tools.ietf.org/html/rfc7231#section-6.6.1",
    }
}
