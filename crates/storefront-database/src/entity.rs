//! Table metadata binding record types to their SQL tables.
//!
//! The generic [`Repository`](crate::Repository) knows nothing about any
//! concrete entity; everything it needs (table, key, writable columns,
//! eager-loadable relations) comes from the [`Entity`] implementation.

use std::fmt;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use storefront_core::error::AppError;
use storefront_core::result::AppResult;
use storefront_core::types::{CustomerId, FilterValue, OrderId, ProductId};
use storefront_entity::{Customer, Order, Product};

/// How a related table is joined onto its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    /// Relation name, used as the column alias prefix.
    pub name: &'static str,
    /// Related table.
    pub table: &'static str,
    /// Primary key of the related table.
    pub primary_key: &'static str,
    /// Column on the owning table that references `primary_key`.
    pub foreign_key: &'static str,
    /// Columns selected from the related table.
    pub columns: &'static [&'static str],
}

impl Join {
    /// Alias prefix for this relation's columns (`customer__FirstName`).
    pub fn prefix(&self) -> String {
        format!("{}__", self.name)
    }
}

/// An eager-loadable relation of some entity.
pub trait Relation: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Join description for this relation.
    fn join(&self) -> Join;
}

/// Relation type for entities that have nothing to eager-load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRelation {}

impl Relation for NoRelation {
    fn join(&self) -> Join {
        match *self {}
    }
}

/// Relations an [`Order`] can eager-load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderRelation {
    /// The ordering customer.
    Customer,
    /// The ordered product.
    Product,
}

impl OrderRelation {
    /// Every relation, for fully hydrated reads.
    pub const ALL: [OrderRelation; 2] = [OrderRelation::Customer, OrderRelation::Product];
}

impl Relation for OrderRelation {
    fn join(&self) -> Join {
        match self {
            Self::Customer => Join {
                name: "customer",
                table: Customer::TABLE,
                primary_key: Customer::PRIMARY_KEY,
                foreign_key: "CustomerId",
                columns: Customer::COLUMNS,
            },
            Self::Product => Join {
                name: "product",
                table: Product::TABLE,
                primary_key: Product::PRIMARY_KEY,
                foreign_key: "ProductId",
                columns: Product::COLUMNS,
            },
        }
    }
}

/// A record type persisted in one table.
pub trait Entity:
    for<'r> FromRow<'r, SqliteRow> + Clone + fmt::Debug + PartialEq + Send + Sync + Unpin + 'static
{
    /// Primary key type.
    type Id: Copy + fmt::Display + Into<FilterValue> + Send + Sync + 'static;
    /// Relations that can be eager-loaded alongside this entity.
    type Relation: Relation;

    /// Human-readable entity name used in error messages.
    const NAME: &'static str;
    /// Table name.
    const TABLE: &'static str;
    /// Primary key column.
    const PRIMARY_KEY: &'static str;
    /// Every column of the table, primary key first.
    const COLUMNS: &'static [&'static str];

    /// The entity's primary key value.
    fn id(&self) -> Self::Id;

    /// Writable column values. The primary key is never included; optional
    /// columns left unset are omitted so the store applies its default.
    fn values(&self) -> Vec<(&'static str, FilterValue)>;

    /// Hydrate a related record from aliased columns of a joined row.
    fn attach(
        &mut self,
        relation: Self::Relation,
        row: &SqliteRow,
        prefix: &str,
    ) -> Result<(), sqlx::Error>;
}

/// Resolve a caller-supplied field name to the entity's canonical column.
pub(crate) fn resolve_column<E: Entity>(name: &str) -> AppResult<&'static str> {
    E::COLUMNS
        .iter()
        .copied()
        .find(|column| column.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            AppError::validation(format!("Unknown column '{name}' for {}", E::NAME))
        })
}

fn aliased(prefix: &str, column: &str) -> String {
    format!("{prefix}{column}")
}

impl Entity for Customer {
    type Id = CustomerId;
    type Relation = NoRelation;

    const NAME: &'static str = "Customer";
    const TABLE: &'static str = "Customers";
    const PRIMARY_KEY: &'static str = "CustomerId";
    const COLUMNS: &'static [&'static str] = &["CustomerId", "FirstName", "Surname"];

    fn id(&self) -> CustomerId {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("FirstName", self.first_name.clone().into()),
            ("Surname", self.surname.clone().into()),
        ]
    }

    fn attach(&mut self, relation: NoRelation, _: &SqliteRow, _: &str) -> Result<(), sqlx::Error> {
        match relation {}
    }
}

impl Entity for Product {
    type Id = ProductId;
    type Relation = NoRelation;

    const NAME: &'static str = "Product";
    const TABLE: &'static str = "Products";
    const PRIMARY_KEY: &'static str = "ProductId";
    const COLUMNS: &'static [&'static str] = &["ProductId", "ProductDescription"];

    fn id(&self) -> ProductId {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        vec![("ProductDescription", self.description.clone().into())]
    }

    fn attach(&mut self, relation: NoRelation, _: &SqliteRow, _: &str) -> Result<(), sqlx::Error> {
        match relation {}
    }
}

impl Entity for Order {
    type Id = OrderId;
    type Relation = OrderRelation;

    const NAME: &'static str = "Order";
    const TABLE: &'static str = "Orders";
    const PRIMARY_KEY: &'static str = "Id";
    const COLUMNS: &'static [&'static str] = &["Id", "CreatedOn", "CustomerId", "ProductId"];

    fn id(&self) -> OrderId {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        let mut values = Vec::with_capacity(3);
        if let Some(created_on) = self.created_on {
            values.push(("CreatedOn", created_on.into()));
        }
        values.push(("CustomerId", self.customer_id.into()));
        values.push(("ProductId", self.product_id.into()));
        values
    }

    fn attach(
        &mut self,
        relation: OrderRelation,
        row: &SqliteRow,
        prefix: &str,
    ) -> Result<(), sqlx::Error> {
        match relation {
            OrderRelation::Customer => {
                let key: Option<CustomerId> =
                    row.try_get(aliased(prefix, "CustomerId").as_str())?;
                self.customer = match key {
                    Some(id) => Some(Customer {
                        id,
                        first_name: row.try_get(aliased(prefix, "FirstName").as_str())?,
                        surname: row.try_get(aliased(prefix, "Surname").as_str())?,
                    }),
                    None => None,
                };
            }
            OrderRelation::Product => {
                let key: Option<ProductId> = row.try_get(aliased(prefix, "ProductId").as_str())?;
                self.product = match key {
                    Some(id) => Some(Product {
                        id,
                        description: row
                            .try_get(aliased(prefix, "ProductDescription").as_str())?,
                    }),
                    None => None,
                };
            }
        }
        Ok(())
    }
}
