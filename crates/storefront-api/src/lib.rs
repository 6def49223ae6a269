//! # storefront-api
//!
//! HTTP API layer for Storefront built on Axum.
//!
//! Provides the customer, product and order REST endpoints, the health
//! check, the OpenAPI document, middleware (request logging, CORS,
//! problem details), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ProblemDetails};
pub use state::AppState;
