//! Core type definitions used across the Storefront workspace.

pub mod filter;
pub mod id;
pub mod sorting;

pub use filter::{Filter, FilterField, FilterOp, FilterValue};
pub use id::*;
pub use sorting::{SortDirection, SortField};
