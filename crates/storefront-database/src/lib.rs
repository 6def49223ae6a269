//! # storefront-database
//!
//! SQLite connection management, embedded migrations, and the generic
//! [`Repository`] shared by every Storefront entity.
//!
//! Table metadata lives in [`entity`]: each record type implements
//! [`Entity`] once, and the repository, [`Query`] builder and [`Tracked`]
//! wrapper work for all of them.

pub mod connection;
pub mod entity;
pub mod migration;
pub mod query;
pub mod repository;
pub mod tracking;

pub use connection::DatabasePool;
pub use entity::{Entity, Join, NoRelation, OrderRelation, Relation};
pub use migration::run_migrations;
pub use query::Query;
pub use repository::{CustomerRepository, OrderRepository, ProductRepository, Repository};
pub use tracking::Tracked;
