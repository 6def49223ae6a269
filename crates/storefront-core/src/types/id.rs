//! Newtype wrappers around store-assigned integer keys.
//!
//! Using distinct types prevents accidentally passing a `ProductId` where a
//! `CustomerId` is expected. Each ID is transparent to serde and sqlx, so it
//! serializes as a bare number and binds as an `INTEGER` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::filter::FilterValue;

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw key value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Return the raw key value.
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Whether the store has assigned this key (keys start at 1).
            pub const fn is_assigned(self) -> bool {
                self.0 > 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl From<$name> for FilterValue {
            fn from(id: $name) -> FilterValue {
                FilterValue::Integer(id.0)
            }
        }
    };
}

define_id!(
    /// Primary key of a customer row.
    CustomerId
);

define_id!(
    /// Primary key of a product row.
    ProductId
);

define_id!(
    /// Primary key of an order row.
    OrderId
);
