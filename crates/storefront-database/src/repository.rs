//! Generic repository shared by every entity.

use std::marker::PhantomData;

use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::QueryBuilder;
use tracing::debug;

use storefront_core::error::{AppError, ErrorKind};
use storefront_core::result::AppResult;
use storefront_core::types::{Filter, FilterValue};
use storefront_entity::{Customer, Order, Product};

use crate::entity::Entity;
use crate::query::{push_value, Query};
use crate::tracking::Tracked;

/// Repository for customers.
pub type CustomerRepository = Repository<Customer>;
/// Repository for products.
pub type ProductRepository = Repository<Product>;
/// Repository for orders.
pub type OrderRepository = Repository<Order>;

/// Data access for one entity table.
///
/// Reads come in two flavours: tracked reads return [`Tracked`] values that
/// can be mutated and handed back to [`update`](Self::update); read-only
/// reads return plain entities. Every sqlx failure surfaces as an
/// [`ErrorKind::Database`] error carrying the original cause.
#[derive(Debug, Clone)]
pub struct Repository<E: Entity> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Repository<E> {
    /// Create a new repository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// An unmaterialized query over every row, for further composition.
    pub fn get_all(&self) -> Query<E> {
        Query::new(self.pool.clone())
    }

    /// Find an entity by primary key.
    pub async fn get_by_id(&self, id: E::Id) -> AppResult<Option<Tracked<E>>> {
        let entity = self
            .get_all()
            .filter(Filter::eq(E::PRIMARY_KEY, id))
            .fetch_optional()
            .await?;
        Ok(entity.map(Tracked::loaded))
    }

    /// First entity matching `filter`, in primary key order.
    pub async fn get_single_by_predicate(&self, filter: Filter) -> AppResult<Option<Tracked<E>>> {
        let entity = self.get_all().filter(filter).fetch_optional().await?;
        Ok(entity.map(Tracked::loaded))
    }

    /// Every entity matching `filter`, tracked, with `includes` eager-loaded.
    pub async fn find_by(
        &self,
        filter: Filter,
        includes: &[E::Relation],
    ) -> AppResult<Vec<Tracked<E>>> {
        let entities = self.find_by_readonly(filter, includes).await?;
        Ok(entities.into_iter().map(Tracked::loaded).collect())
    }

    /// Every entity matching `filter`, untracked, with `includes` eager-loaded.
    pub async fn find_by_readonly(
        &self,
        filter: Filter,
        includes: &[E::Relation],
    ) -> AppResult<Vec<E>> {
        self.get_all()
            .filter(filter)
            .include(includes)
            .fetch_all()
            .await
    }

    /// Every row of the table.
    pub async fn list_all(&self) -> AppResult<Vec<E>> {
        self.get_all().fetch_all().await
    }

    /// Every row of the table with `includes` eager-loaded.
    pub async fn get_all_readonly(&self, includes: &[E::Relation]) -> AppResult<Vec<E>> {
        self.get_all().include(includes).fetch_all().await
    }

    /// Whether any row matches `filter`.
    pub async fn exists_by_predicate(&self, filter: Filter) -> AppResult<bool> {
        self.get_all().filter(filter).exists().await
    }

    /// Project the integer `column` of every row matching `filter`.
    pub async fn numeric_field_by(&self, column: &str, filter: Filter) -> AppResult<Vec<i64>> {
        self.get_all().filter(filter).pluck_i64(column).await
    }

    /// Insert a new row and return it as stored, with its generated key.
    pub async fn add(&self, entity: &E) -> AppResult<E> {
        let mut conn = self.pool.acquire().await.map_err(|e| Self::error("add", e))?;
        let stored = Self::insert(&mut conn, entity).await?;
        debug!(entity = E::NAME, id = %stored.id(), "Inserted row");
        Ok(stored)
    }

    /// Insert several rows in one transaction.
    pub async fn add_range(&self, entities: &[E]) -> AppResult<Vec<E>> {
        let mut tx = self.pool.begin().await.map_err(|e| Self::error("add", e))?;
        let mut stored = Vec::with_capacity(entities.len());
        for entity in entities {
            stored.push(Self::insert(&mut tx, entity).await?);
        }
        tx.commit().await.map_err(|e| Self::error("add", e))?;
        debug!(entity = E::NAME, count = stored.len(), "Inserted rows");
        Ok(stored)
    }

    /// Persist changes to a tracked entity.
    ///
    /// Nothing is written when the entity is unchanged. A key with no
    /// matching row is a not-found error; rows are never created here.
    pub async fn update(&self, tracked: &mut Tracked<E>) -> AppResult<()> {
        if !tracked.is_modified() {
            return Ok(());
        }
        let mut conn = self.pool.acquire().await.map_err(|e| Self::error("update", e))?;
        Self::update_row(&mut conn, &**tracked).await?;
        tracked.mark_clean();
        debug!(entity = E::NAME, id = %tracked.id(), "Updated row");
        Ok(())
    }

    /// Persist changes to several tracked entities in one transaction.
    pub async fn update_range(&self, tracked: &mut [Tracked<E>]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| Self::error("update", e))?;
        for item in tracked.iter() {
            if item.is_modified() {
                Self::update_row(&mut tx, &**item).await?;
            }
        }
        tx.commit().await.map_err(|e| Self::error("update", e))?;
        for item in tracked.iter_mut() {
            item.mark_clean();
        }
        Ok(())
    }

    /// Delete the row backing `entity`.
    pub async fn delete(&self, entity: &E) -> AppResult<()> {
        let mut conn = self.pool.acquire().await.map_err(|e| Self::error("delete", e))?;
        Self::delete_row(&mut conn, entity).await?;
        debug!(entity = E::NAME, id = %entity.id(), "Deleted row");
        Ok(())
    }

    /// Delete several rows in one transaction.
    pub async fn delete_range(&self, entities: &[E]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| Self::error("delete", e))?;
        for entity in entities {
            Self::delete_row(&mut tx, entity).await?;
        }
        tx.commit().await.map_err(|e| Self::error("delete", e))?;
        Ok(())
    }

    async fn insert(conn: &mut SqliteConnection, entity: &E) -> AppResult<E> {
        let values = entity.values();
        let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO \"{}\"", E::TABLE));
        if values.is_empty() {
            builder.push(" DEFAULT VALUES");
        } else {
            let columns: Vec<String> = values.iter().map(|(c, _)| format!("\"{c}\"")).collect();
            builder.push(format!(" ({}) VALUES (", columns.join(", ")));
            for (index, (_, value)) in values.iter().enumerate() {
                if index > 0 {
                    builder.push(", ");
                }
                push_value(&mut builder, value)?;
            }
            builder.push(")");
        }
        builder.push(" RETURNING *");

        builder
            .build_query_as::<E>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| Self::error("add", e))
    }

    async fn update_row(conn: &mut SqliteConnection, entity: &E) -> AppResult<()> {
        let values = entity.values();
        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE \"{}\" SET ", E::TABLE));
        for (index, (column, value)) in values.iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            builder.push(format!("\"{column}\" = "));
            push_value(&mut builder, value)?;
        }
        Self::push_key_match(&mut builder, entity)?;

        let result = builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| Self::error("update", e))?;
        if result.rows_affected() == 0 {
            return Err(Self::missing(entity));
        }
        Ok(())
    }

    async fn delete_row(conn: &mut SqliteConnection, entity: &E) -> AppResult<()> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("DELETE FROM \"{}\"", E::TABLE));
        Self::push_key_match(&mut builder, entity)?;

        let result = builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| Self::error("delete", e))?;
        if result.rows_affected() == 0 {
            return Err(Self::missing(entity));
        }
        Ok(())
    }

    fn push_key_match(builder: &mut QueryBuilder<'_, Sqlite>, entity: &E) -> AppResult<()> {
        builder.push(format!(" WHERE \"{}\" = ", E::PRIMARY_KEY));
        let key: FilterValue = entity.id().into();
        push_value(builder, &key)
    }

    fn missing(entity: &E) -> AppError {
        AppError::not_found(format!("{} {} not found", E::NAME, entity.id()))
    }

    fn error(action: &str, err: sqlx::Error) -> AppError {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to {action} {}", E::NAME),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::types::{CustomerId, FilterField, OrderId, ProductId};

    use super::*;
    use crate::entity::OrderRelation;
    use crate::test_support::seeded_pool;
    use crate::DatabasePool;

    fn customers(db: &DatabasePool) -> CustomerRepository {
        Repository::new(db.pool().clone())
    }

    fn orders(db: &DatabasePool) -> OrderRepository {
        Repository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_get_by_id_found_and_absent() {
        let db = seeded_pool().await;
        let repo = customers(&db);

        let john = repo.get_by_id(CustomerId(1)).await.expect("get").expect("present");
        assert_eq!(john.first_name, "John");
        assert_eq!(john.surname, "Smith");

        assert!(repo.get_by_id(CustomerId(42)).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_add_assigns_next_key() {
        let db = seeded_pool().await;
        let repo = customers(&db);

        let stored = repo.add(&Customer::new("Test", "User")).await.expect("add");
        assert_eq!(stored.id, CustomerId(4));
        assert_eq!(stored.first_name, "Test");
        assert_eq!(repo.list_all().await.expect("list").len(), 4);
    }

    #[tokio::test]
    async fn test_add_order_defaults_created_on() {
        let db = seeded_pool().await;
        let stored = orders(&db)
            .add(&Order::new(CustomerId(3), ProductId(1)))
            .await
            .expect("add");
        assert_eq!(stored.id, OrderId(4));
        assert!(stored.created_on.is_some());
        assert!(stored.customer.is_none());
    }

    #[tokio::test]
    async fn test_add_order_with_dangling_reference_fails() {
        let db = seeded_pool().await;
        let err = orders(&db)
            .add(&Order::new(CustomerId(99), ProductId(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_add_range_rolls_back_on_failure() {
        let db = seeded_pool().await;
        let repo = orders(&db);
        let batch = vec![
            Order::new(CustomerId(1), ProductId(3)),
            Order::new(CustomerId(1), ProductId(99)),
        ];
        assert!(repo.add_range(&batch).await.is_err());
        assert_eq!(repo.list_all().await.expect("list").len(), 3);

        let stored = repo
            .add_range(&[Order::new(CustomerId(3), ProductId(3))])
            .await
            .expect("add range");
        assert_eq!(stored.len(), 1);
        assert_eq!(repo.list_all().await.expect("list").len(), 4);
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let db = seeded_pool().await;
        let repo = customers(&db);

        let mut donna = repo.get_by_id(CustomerId(2)).await.expect("get").expect("present");
        donna.surname = "Jones".to_string();
        repo.update(&mut donna).await.expect("update");
        assert!(!donna.is_modified());

        let reloaded = repo.get_by_id(CustomerId(2)).await.expect("get").expect("present");
        assert_eq!(reloaded.surname, "Jones");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = seeded_pool().await;
        let repo = customers(&db);
        let mut ghost = Tracked::attach(Customer {
            id: CustomerId(77),
            first_name: "No".to_string(),
            surname: "Body".to_string(),
        });
        let err = repo.update(&mut ghost).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(repo.list_all().await.expect("list").len(), 3);
    }

    #[tokio::test]
    async fn test_update_range() {
        let db = seeded_pool().await;
        let repo = customers(&db);
        let mut smiths = repo
            .find_by(Filter::eq("Surname", "Smith"), &[])
            .await
            .expect("find");
        for smith in smiths.iter_mut() {
            smith.surname = "Smythe".to_string();
        }
        repo.update_range(&mut smiths).await.expect("update range");
        assert!(smiths.iter().all(|s| !s.is_modified()));
        let renamed = repo
            .find_by_readonly(Filter::eq("Surname", "Smythe"), &[])
            .await
            .expect("find");
        assert_eq!(renamed.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_orders() {
        let db = seeded_pool().await;
        let repo = customers(&db);
        let john = repo.get_by_id(CustomerId(1)).await.expect("get").expect("present");
        repo.delete(&john).await.expect("delete");

        assert!(repo.get_by_id(CustomerId(1)).await.expect("get").is_none());
        let remaining = orders(&db).list_all().await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].customer_id, CustomerId(2));

        let err = repo.delete(&john).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_range() {
        let db = seeded_pool().await;
        let repo = orders(&db);
        let johns = repo
            .find_by_readonly(Filter::eq("CustomerId", CustomerId(1)), &[])
            .await
            .expect("find");
        repo.delete_range(&johns).await.expect("delete range");
        assert_eq!(repo.list_all().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_exists_by_predicate() {
        let db = seeded_pool().await;
        let repo = customers(&db);
        let present = repo
            .exists_by_predicate(Filter::eq("CustomerId", CustomerId(3)))
            .await
            .expect("exists");
        let absent = repo
            .exists_by_predicate(Filter::eq("CustomerId", CustomerId(99)))
            .await
            .expect("exists");
        assert!(present);
        assert!(!absent);
    }

    #[tokio::test]
    async fn test_get_single_by_predicate() {
        let db = seeded_pool().await;
        let found = customers(&db)
            .get_single_by_predicate(Filter::eq("Surname", "Smith"))
            .await
            .expect("get")
            .expect("present");
        assert_eq!(found.id, CustomerId(1));
    }

    #[tokio::test]
    async fn test_get_all_readonly_hydrates() {
        let db = seeded_pool().await;
        let all = orders(&db)
            .get_all_readonly(&OrderRelation::ALL)
            .await
            .expect("list");
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(Order::is_hydrated));
        assert_eq!(
            all[2].customer.as_ref().map(|c| c.first_name.as_str()),
            Some("Donna")
        );
    }

    #[tokio::test]
    async fn test_numeric_field_by() {
        let db = seeded_pool().await;
        let ids = orders(&db)
            .numeric_field_by("Id", Filter::by(FilterField::is_in("ProductId", vec![2_i64, 3])))
            .await
            .expect("project");
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_unknown_column_is_validation_error() {
        let db = seeded_pool().await;
        let err = customers(&db)
            .exists_by_predicate(Filter::eq("Email", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
