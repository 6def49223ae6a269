//! Product CRUD.

use std::sync::Arc;

use tracing::{info, instrument};
use validator::ValidateLength;

use storefront_core::error::AppError;
use storefront_core::result::AppResult;
use storefront_core::types::ProductId;
use storefront_database::{ProductRepository, Tracked};
use storefront_entity::Product;

use crate::failure::LogFailure;

const COMPONENT: &str = "ProductService";

/// Product use cases over the product repository.
#[derive(Debug, Clone)]
pub struct ProductService {
    /// Product repository.
    products: Arc<ProductRepository>,
}

impl ProductService {
    /// Creates a new product service.
    pub fn new(products: Arc<ProductRepository>) -> Self {
        Self { products }
    }

    /// Lists every product.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.products
            .list_all()
            .await
            .log_failure(COMPONENT, "list_products")
    }

    /// Gets a product, or `None` when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> AppResult<Option<Product>> {
        self.products
            .get_by_id(id)
            .await
            .map(|found| found.map(Tracked::into_inner))
            .log_failure(COMPONENT, "get_product")
    }

    /// Creates a product from its description.
    #[instrument(skip(self))]
    pub async fn add_product(&self, description: String) -> AppResult<Product> {
        let product = self
            .insert(description)
            .await
            .log_failure(COMPONENT, "add_product")?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replaces a product's description.
    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, description: String) -> AppResult<Product> {
        self.apply_update(id, description)
            .await
            .log_failure(COMPONENT, "update_product")
    }

    /// Deletes a product and, by cascade, every order for it.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> AppResult<()> {
        self.remove(id).await.log_failure(COMPONENT, "delete_product")
    }

    async fn insert(&self, description: String) -> AppResult<Product> {
        let description = required(description)?;
        self.products.add(&Product::new(description)).await
    }

    async fn apply_update(&self, id: ProductId, description: String) -> AppResult<Product> {
        let description = required(description)?;
        let mut product = self.load(id).await?;
        product.description = description;
        self.products.update(&mut product).await?;
        Ok(product.into_inner())
    }

    async fn remove(&self, id: ProductId) -> AppResult<()> {
        let product = self.load(id).await?;
        self.products.delete(&product).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    async fn load(&self, id: ProductId) -> AppResult<Tracked<Product>> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }
}

/// Descriptions must hold at least one non-blank character.
fn required(description: String) -> AppResult<String> {
    if !description.trim().validate_length(Some(1), None, None) {
        return Err(AppError::validation("Product description is required"));
    }
    Ok(description)
}
