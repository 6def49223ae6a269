//! Customer CRUD.

use std::sync::Arc;

use tracing::{info, instrument};

use storefront_core::error::AppError;
use storefront_core::result::AppResult;
use storefront_core::types::CustomerId;
use storefront_database::{CustomerRepository, Tracked};
use storefront_entity::{Customer, CustomerDto};

use crate::failure::LogFailure;

const COMPONENT: &str = "CustomerService";

/// Customer use cases over the customer repository.
#[derive(Debug, Clone)]
pub struct CustomerService {
    /// Customer repository.
    customers: Arc<CustomerRepository>,
}

impl CustomerService {
    /// Creates a new customer service.
    pub fn new(customers: Arc<CustomerRepository>) -> Self {
        Self { customers }
    }

    /// Lists every customer.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        self.customers
            .list_all()
            .await
            .log_failure(COMPONENT, "list_customers")
    }

    /// Gets a customer, or `None` when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> AppResult<Option<Customer>> {
        self.customers
            .get_by_id(id)
            .await
            .map(|found| found.map(Tracked::into_inner))
            .log_failure(COMPONENT, "get_customer")
    }

    /// Creates a customer and returns it with its assigned id.
    #[instrument(skip(self, dto))]
    pub async fn add_customer(&self, dto: CustomerDto) -> AppResult<Customer> {
        let customer = self
            .customers
            .add(&Customer::from(dto))
            .await
            .log_failure(COMPONENT, "add_customer")?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Overwrites a customer's names.
    ///
    /// An unknown id is a not-found error, never a `None`.
    #[instrument(skip(self, dto))]
    pub async fn update_customer(&self, id: CustomerId, dto: CustomerDto) -> AppResult<Customer> {
        self.apply_update(id, dto)
            .await
            .log_failure(COMPONENT, "update_customer")
    }

    /// Deletes a customer and, by cascade, its orders.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> AppResult<()> {
        self.remove(id)
            .await
            .log_failure(COMPONENT, "delete_customer")
    }

    async fn apply_update(&self, id: CustomerId, dto: CustomerDto) -> AppResult<Customer> {
        let mut customer = self.load(id).await?;
        customer.first_name = dto.first_name;
        customer.surname = dto.surname;
        self.customers.update(&mut customer).await?;
        Ok(customer.into_inner())
    }

    async fn remove(&self, id: CustomerId) -> AppResult<()> {
        let customer = self.load(id).await?;
        self.customers.delete(&customer).await?;
        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    async fn load(&self, id: CustomerId) -> AppResult<Tracked<Customer>> {
        self.customers
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Customer {id} not found")))
    }
}
