//! Order entity model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use storefront_core::types::{CustomerId, OrderId, ProductId};

use crate::customer::Customer;
use crate::product::Product;

/// An order linking one customer to one product.
///
/// `customer` and `product` are only populated when the order was read with
/// those relations eager-loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier.
    #[sqlx(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: OrderId,
    /// Creation time; the store fills it in when absent at insert.
    #[sqlx(rename = "CreatedOn")]
    pub created_on: Option<NaiveDateTime>,
    /// Referenced customer.
    #[sqlx(rename = "CustomerId")]
    #[schema(value_type = i64)]
    pub customer_id: CustomerId,
    /// Eager-loaded customer.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Referenced product.
    #[sqlx(rename = "ProductId")]
    #[schema(value_type = i64)]
    pub product_id: ProductId,
    /// Eager-loaded product.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl Order {
    /// Build an unsaved order for the given references.
    pub fn new(customer_id: CustomerId, product_id: ProductId) -> Self {
        Self {
            id: OrderId::default(),
            created_on: None,
            customer_id,
            customer: None,
            product_id,
            product: None,
        }
    }

    /// Whether both related records have been loaded.
    pub fn is_hydrated(&self) -> bool {
        self.customer.is_some() && self.product.is_some()
    }
}

/// Input shape for creating or updating an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    /// Customer placing the order.
    #[schema(value_type = i64)]
    pub customer_id: CustomerId,
    /// Product being ordered.
    #[schema(value_type = i64)]
    pub product_id: ProductId,
}

impl OrderDto {
    /// Create a DTO for the given references.
    pub fn new(customer_id: CustomerId, product_id: ProductId) -> Self {
        Self {
            customer_id,
            product_id,
        }
    }
}

impl From<OrderDto> for Order {
    fn from(dto: OrderDto) -> Self {
        Order::new(dto.customer_id, dto.product_id)
    }
}
