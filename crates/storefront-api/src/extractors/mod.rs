//! Custom Axum extractors whose rejections render as problem details.

pub mod json;
pub mod path;

pub use json::{ApiJson, ValidatedJson};
pub use path::IdPath;
