//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use storefront_core::config::AppConfig;
use storefront_database::{DatabasePool, Repository};
use storefront_service::{CustomerService, OrderService, ProductService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// SQLite connection pool
    pub db: DatabasePool,
    /// Customer service
    pub customer_service: Arc<CustomerService>,
    /// Product service
    pub product_service: Arc<ProductService>,
    /// Order service
    pub order_service: Arc<OrderService>,
}

impl AppState {
    /// Construct repositories and services over `db`.
    pub fn new(config: AppConfig, db: DatabasePool) -> Self {
        let customer_repo = Arc::new(Repository::new(db.pool().clone()));
        let product_repo = Arc::new(Repository::new(db.pool().clone()));
        let order_repo = Arc::new(Repository::new(db.pool().clone()));

        let customer_service = Arc::new(CustomerService::new(Arc::clone(&customer_repo)));
        let product_service = Arc::new(ProductService::new(Arc::clone(&product_repo)));
        let order_service = Arc::new(OrderService::new(
            order_repo,
            customer_repo,
            product_repo,
        ));

        Self {
            config: Arc::new(config),
            db,
            customer_service,
            product_service,
            order_service,
        }
    }
}
