//! Customer use cases.

pub mod service;

pub use service::CustomerService;
