//! Route handlers organized by domain.

pub mod customer;
pub mod health;
pub mod order;
pub mod product;
