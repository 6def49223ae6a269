//! Order CRUD with reference validation.
//!
//! An order may only point at a customer and a product that exist. Both
//! references are checked before anything is written; the check and the
//! write are separate statements, so a concurrent delete of the referenced
//! row can still slip in between (the foreign key then rejects the write).

use std::sync::Arc;

use tracing::{info, instrument};

use storefront_core::error::AppError;
use storefront_core::result::AppResult;
use storefront_core::types::{Filter, OrderId};
use storefront_database::{
    CustomerRepository, Entity, OrderRelation, OrderRepository, ProductRepository,
};
use storefront_entity::{Customer, Order, OrderDto, Product};

use crate::failure::LogFailure;

const COMPONENT: &str = "OrderService";

/// Order use cases over the order, customer and product repositories.
#[derive(Debug, Clone)]
pub struct OrderService {
    /// Order repository.
    orders: Arc<OrderRepository>,
    /// Customer repository, for reference checks.
    customers: Arc<CustomerRepository>,
    /// Product repository, for reference checks.
    products: Arc<ProductRepository>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(
        orders: Arc<OrderRepository>,
        customers: Arc<CustomerRepository>,
        products: Arc<ProductRepository>,
    ) -> Self {
        Self {
            orders,
            customers,
            products,
        }
    }

    /// Lists every order with its customer and product loaded.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        self.orders
            .get_all_readonly(&OrderRelation::ALL)
            .await
            .log_failure(COMPONENT, "list_orders")
    }

    /// Gets an order with its customer and product loaded.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> AppResult<Option<Order>> {
        self.hydrated(id).await.log_failure(COMPONENT, "get_order")
    }

    /// Creates an order after checking both references exist.
    #[instrument(skip(self))]
    pub async fn add_order(&self, dto: OrderDto) -> AppResult<Order> {
        let order = self
            .insert(dto)
            .await
            .log_failure(COMPONENT, "add_order")?;
        info!(order_id = %order.id, "Order created");
        Ok(order)
    }

    /// Re-points an order at another customer and product.
    ///
    /// References are checked first; an unknown order id is then a
    /// not-found error.
    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, dto: OrderDto) -> AppResult<Order> {
        self.apply_update(id, dto)
            .await
            .log_failure(COMPONENT, "update_order")
    }

    /// Deletes an order.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> AppResult<()> {
        self.remove(id).await.log_failure(COMPONENT, "delete_order")
    }

    async fn ensure_references(&self, dto: &OrderDto) -> AppResult<()> {
        let customer_exists = self
            .customers
            .exists_by_predicate(Filter::eq(Customer::PRIMARY_KEY, dto.customer_id))
            .await?;
        let product_exists = self
            .products
            .exists_by_predicate(Filter::eq(Product::PRIMARY_KEY, dto.product_id))
            .await?;

        match (customer_exists, product_exists) {
            (true, true) => Ok(()),
            (false, true) => Err(AppError::validation(format!(
                "Customer {} does not exist",
                dto.customer_id
            ))),
            (true, false) => Err(AppError::validation(format!(
                "Product {} does not exist",
                dto.product_id
            ))),
            (false, false) => Err(AppError::validation(format!(
                "Customer {} and product {} do not exist",
                dto.customer_id, dto.product_id
            ))),
        }
    }

    async fn insert(&self, dto: OrderDto) -> AppResult<Order> {
        self.ensure_references(&dto).await?;
        let stored = self.orders.add(&Order::from(dto)).await?;
        Ok(self.hydrated(stored.id).await?.unwrap_or(stored))
    }

    async fn apply_update(&self, id: OrderId, dto: OrderDto) -> AppResult<Order> {
        self.ensure_references(&dto).await?;
        let mut order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        order.customer_id = dto.customer_id;
        order.product_id = dto.product_id;
        self.orders.update(&mut order).await?;
        Ok(self.hydrated(id).await?.unwrap_or_else(|| order.into_inner()))
    }

    async fn remove(&self, id: OrderId) -> AppResult<()> {
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        self.orders.delete(&order).await?;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }

    async fn hydrated(&self, id: OrderId) -> AppResult<Option<Order>> {
        let found = self
            .orders
            .find_by_readonly(Filter::eq(Order::PRIMARY_KEY, id), &OrderRelation::ALL)
            .await?;
        Ok(found.into_iter().next())
    }
}

fn not_found(id: OrderId) -> AppError {
    AppError::not_found(format!("Order {id} not found"))
}

#[cfg(test)]
mod tests {
    use storefront_core::error::ErrorKind;
    use storefront_core::types::{CustomerId, ProductId};

    use crate::test_support::services;

    use super::*;

    #[tokio::test]
    async fn test_orders_are_hydrated() {
        let svc = services().await.orders;

        let all = svc.list_orders().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(Order::is_hydrated));

        let order = svc.get_order(OrderId(3)).await.unwrap().unwrap();
        assert_eq!(order.customer.unwrap().first_name, "Donna");
        assert_eq!(order.product.unwrap().description, "tablet");

        assert!(svc.get_order(OrderId(30)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_order_with_existing_references() {
        let svc = services().await.orders;
        let order = svc
            .add_order(OrderDto::new(CustomerId(1), ProductId(1)))
            .await
            .unwrap();
        assert_eq!(order.id, OrderId(4));
        assert_eq!(order.customer_id, CustomerId(1));
        assert_eq!(order.product_id, ProductId(1));
        assert!(order.created_on.is_some());
        assert!(order.is_hydrated());
    }

    #[tokio::test]
    async fn test_add_order_with_unknown_customer_writes_nothing() {
        let svc = services().await.orders;
        let err = svc
            .add_order(OrderDto::new(CustomerId(99), ProductId(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Customer 99"));
        assert_eq!(svc.list_orders().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_add_order_with_unknown_product_writes_nothing() {
        let svc = services().await.orders;
        let err = svc
            .add_order(OrderDto::new(CustomerId(1), ProductId(99)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(svc.list_orders().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_order() {
        let svc = services().await.orders;
        let order = svc
            .update_order(OrderId(1), OrderDto::new(CustomerId(3), ProductId(3)))
            .await
            .unwrap();
        assert_eq!(order.customer_id, CustomerId(3));
        assert_eq!(order.customer.unwrap().surname, "Conner");
        assert_eq!(order.product.unwrap().description, "tablet");
    }

    #[tokio::test]
    async fn test_update_checks_references_before_lookup() {
        let svc = services().await.orders;
        let err = svc
            .update_order(OrderId(77), OrderDto::new(CustomerId(99), ProductId(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = svc
            .update_order(OrderId(77), OrderDto::new(CustomerId(1), ProductId(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_order() {
        let svc = services().await.orders;
        svc.delete_order(OrderId(2)).await.unwrap();
        assert!(svc.get_order(OrderId(2)).await.unwrap().is_none());
        let err = svc.delete_order(OrderId(2)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
