//! Product entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use storefront_core::types::ProductId;

/// A product that can be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    /// Store-assigned identifier.
    #[serde(rename = "productId")]
    #[sqlx(rename = "ProductId")]
    #[schema(value_type = i64)]
    pub id: ProductId,
    /// Free-text product description.
    #[serde(rename = "productDescription")]
    #[sqlx(rename = "ProductDescription")]
    pub description: String,
}

impl Product {
    /// Build an unsaved product; the store assigns the id on insert.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: ProductId::default(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_json_shape() {
        let product = Product {
            id: ProductId(2),
            description: "mobile phone".to_string(),
        };
        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "productId": 2, "productDescription": "mobile phone" })
        );
    }
}
