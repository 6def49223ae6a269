//! Completes problem-details bodies with request-specific fields.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{ErrorContext, ProblemDetails};
use crate::state::AppState;

/// Rewrites error responses to include the request path and, in the
/// development environment, the error message and cause chain.
pub async fn problem_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let instance = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(context) = response.extensions().get::<ErrorContext>().cloned() else {
        return response;
    };

    let mut rewritten = ProblemDetails::from_context(&context, state.config.is_development())
        .with_instance(instance)
        .into_response();
    rewritten.extensions_mut().insert(context);
    rewritten
}
