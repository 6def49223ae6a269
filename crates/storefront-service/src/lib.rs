//! # storefront-service
//!
//! Business logic service layer for Storefront. Each service composes one
//! or more repositories to implement the CRUD use cases of its entity.
//!
//! Services follow constructor injection: all repositories are provided at
//! construction time via `Arc` references. Failures are logged once, at the
//! service boundary, and returned unchanged.

pub mod customer;
mod failure;
pub mod order;
pub mod product;

pub use customer::CustomerService;
pub use order::OrderService;
pub use product::ProductService;
