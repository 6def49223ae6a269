//! Order use cases, including reference validation.

pub mod service;

pub use service::OrderService;
