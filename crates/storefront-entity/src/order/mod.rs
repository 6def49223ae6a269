//! Order domain entities.

pub mod model;

pub use model::{Order, OrderDto};
