//! # storefront-entity
//!
//! Domain entity models for Storefront. Every record struct in this crate
//! maps to one database table row and derives `sqlx::FromRow`; the DTO
//! types are the externally accepted input shapes for create/update
//! operations.
//!
//! JSON field names are camelCase; database column names are PascalCase.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerDto};
pub use order::{Order, OrderDto};
pub use product::Product;
