//! Customer entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use storefront_core::types::CustomerId;

/// A customer who can place orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Store-assigned identifier.
    #[serde(rename = "customerId")]
    #[sqlx(rename = "CustomerId")]
    #[schema(value_type = i64)]
    pub id: CustomerId,
    /// Given name.
    #[sqlx(rename = "FirstName")]
    pub first_name: String,
    /// Family name.
    #[sqlx(rename = "Surname")]
    pub surname: String,
}

impl Customer {
    /// Build an unsaved customer; the store assigns the id on insert.
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id: CustomerId::default(),
            first_name: first_name.into(),
            surname: surname.into(),
        }
    }

    /// First name and surname separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Input shape for creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerDto {
    /// Given name.
    #[serde(rename = "firstname", alias = "firstName")]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, message = "Surname is required"))]
    pub surname: String,
}

impl CustomerDto {
    /// Create a DTO from its two name parts.
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            surname: surname.into(),
        }
    }
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Customer::new(dto.first_name, dto.surname)
    }
}
