//! Typed path parameter extraction.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use storefront_core::error::AppError;

use crate::error::ApiError;

/// A path parameter parsed into `T`, e.g. a typed entity id.
///
/// A segment that does not parse is a 400 problem rather than axum's
/// plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| ApiError(AppError::validation(rejection.body_text())))
    }
}
