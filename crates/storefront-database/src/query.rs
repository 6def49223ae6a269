//! Composable, unmaterialized queries over one entity table.
//!
//! A [`Query`] collects a [`Filter`], eager-load relations, ordering and a
//! row limit, and only touches the database when one of the fetch methods
//! runs. Every value is bound as a parameter; column names are checked
//! against the entity's column list before any SQL is built.

use std::marker::PhantomData;

use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use sqlx::QueryBuilder;

use storefront_core::error::{AppError, ErrorKind};
use storefront_core::result::AppResult;
use storefront_core::types::{Filter, FilterField, FilterOp, FilterValue, SortField};

use crate::entity::{resolve_column, Entity, Relation};

/// Alias of the queried table in generated SQL.
const ROOT: &str = "t";

/// A lazily executed query over entity `E`.
#[derive(Debug, Clone)]
pub struct Query<E: Entity> {
    pool: SqlitePool,
    filter: Filter,
    includes: Vec<E::Relation>,
    order: Vec<SortField>,
    limit: Option<i64>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Query<E> {
    /// A query matching every row.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            filter: Filter::all(),
            includes: Vec::new(),
            order: Vec::new(),
            limit: None,
            _entity: PhantomData,
        }
    }

    /// Narrow the query with additional conditions.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = self.filter.merge(filter);
        self
    }

    /// Add a single condition.
    pub fn and(mut self, field: FilterField) -> Self {
        self.filter = self.filter.and(field);
        self
    }

    /// Eager-load related records.
    pub fn include(mut self, relations: &[E::Relation]) -> Self {
        for relation in relations {
            if !self.includes.contains(relation) {
                self.includes.push(*relation);
            }
        }
        self
    }

    /// Append an ordering term. Without any, rows come back by primary key.
    pub fn order_by(mut self, sort: SortField) -> Self {
        self.order.push(sort);
        self
    }

    /// Cap the number of rows returned.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Materialize every matching row.
    pub async fn fetch_all(self) -> AppResult<Vec<E>> {
        let mut builder = self.select()?;
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error::<E>("list", e))?;
        rows.iter().map(|row| self.hydrate(row)).collect()
    }

    /// Materialize the first matching row, if any.
    pub async fn fetch_optional(self) -> AppResult<Option<E>> {
        let query = self.limit(1);
        let mut builder = query.select()?;
        let row = builder
            .build()
            .fetch_optional(&query.pool)
            .await
            .map_err(|e| query_error::<E>("fetch", e))?;
        row.as_ref().map(|row| query.hydrate(row)).transpose()
    }

    /// Number of matching rows.
    pub async fn count(self) -> AppResult<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        push_table::<E>(&mut builder);
        push_where::<E>(&mut builder, &self.filter)?;
        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error::<E>("count", e))
    }

    /// Whether at least one row matches.
    pub async fn exists(self) -> AppResult<bool> {
        Ok(self.count().await? > 0)
    }

    /// Project one integer column of every matching row.
    pub async fn pluck_i64(self, column: &str) -> AppResult<Vec<i64>> {
        let column = resolve_column::<E>(column)?;
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(qualified(ROOT, column)).push(" FROM ");
        push_table::<E>(&mut builder);
        push_where::<E>(&mut builder, &self.filter)?;
        push_order::<E>(&mut builder, &self.order)?;
        push_limit(&mut builder, self.limit);
        builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error::<E>("project", e))
    }

    fn select(&self) -> AppResult<QueryBuilder<'static, Sqlite>> {
        let mut builder = QueryBuilder::new(format!("SELECT {ROOT}.*"));
        for (index, relation) in self.includes.iter().enumerate() {
            let join = relation.join();
            let alias = join_alias(index);
            let prefix = join.prefix();
            for column in join.columns {
                builder
                    .push(", ")
                    .push(qualified(&alias, column))
                    .push(format!(" AS \"{prefix}{column}\""));
            }
        }
        builder.push(" FROM ");
        push_table::<E>(&mut builder);
        for (index, relation) in self.includes.iter().enumerate() {
            let join = relation.join();
            let alias = join_alias(index);
            builder.push(format!(
                " LEFT JOIN \"{table}\" AS {alias} ON {pk} = {fk}",
                table = join.table,
                pk = qualified(&alias, join.primary_key),
                fk = qualified(ROOT, join.foreign_key),
            ));
        }
        push_where::<E>(&mut builder, &self.filter)?;
        push_order::<E>(&mut builder, &self.order)?;
        push_limit(&mut builder, self.limit);
        Ok(builder)
    }

    fn hydrate(&self, row: &SqliteRow) -> AppResult<E> {
        let mut entity = E::from_row(row).map_err(|e| query_error::<E>("decode", e))?;
        for relation in &self.includes {
            let prefix = relation.join().prefix();
            entity
                .attach(*relation, row, &prefix)
                .map_err(|e| query_error::<E>("decode related", e))?;
        }
        Ok(entity)
    }
}

fn query_error<E: Entity>(action: &str, err: sqlx::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Database,
        format!("Failed to {action} {} rows", E::NAME),
        err,
    )
}

fn join_alias(index: usize) -> String {
    format!("j{index}")
}

fn qualified(alias: &str, column: &str) -> String {
    format!("{alias}.\"{column}\"")
}

fn push_table<E: Entity>(builder: &mut QueryBuilder<'_, Sqlite>) {
    builder.push(format!("\"{}\" AS {ROOT}", E::TABLE));
}

/// Render `filter` as a `WHERE` clause on the root table.
pub(crate) fn push_where<E: Entity>(
    builder: &mut QueryBuilder<'_, Sqlite>,
    filter: &Filter,
) -> AppResult<()> {
    if filter.is_empty() {
        return Ok(());
    }
    builder.push(" WHERE ");
    for (index, field) in filter.fields().iter().enumerate() {
        if index > 0 {
            builder.push(" AND ");
        }
        let column = qualified(ROOT, resolve_column::<E>(&field.field)?);
        if field.op.is_unary() {
            builder.push(format!("{column} {}", field.op.as_sql()));
            continue;
        }
        match field.op {
            FilterOp::ILike => {
                builder.push(format!("LOWER({column}) LIKE LOWER("));
                push_value(builder, &field.value)?;
                builder.push(")");
            }
            FilterOp::In => push_in(builder, &column, &field.value)?,
            op => {
                builder.push(format!("{column} {} ", op.as_sql()));
                push_value(builder, &field.value)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &FilterValue) -> AppResult<()> {
    match value {
        FilterValue::Integer(v) => {
            builder.push_bind(*v);
        }
        FilterValue::Float(v) => {
            builder.push_bind(*v);
        }
        FilterValue::Boolean(v) => {
            builder.push_bind(*v);
        }
        FilterValue::Timestamp(v) => {
            builder.push_bind(*v);
        }
        FilterValue::String(v) => {
            builder.push_bind(v.clone());
        }
        FilterValue::Null => {
            builder.push_bind(None::<i64>);
        }
        FilterValue::IntegerList(_) | FilterValue::StringList(_) => {
            return Err(AppError::validation(
                "List values are only valid with the IN operator",
            ));
        }
    }
    Ok(())
}

fn push_in(
    builder: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    value: &FilterValue,
) -> AppResult<()> {
    let len = match value {
        FilterValue::IntegerList(values) => values.len(),
        FilterValue::StringList(values) => values.len(),
        _ => {
            return Err(AppError::validation(
                "The IN operator requires a list value",
            ));
        }
    };
    if len == 0 {
        builder.push("1 = 0");
        return Ok(());
    }

    builder.push(format!("{column} IN ("));
    let mut separated = builder.separated(", ");
    match value {
        FilterValue::IntegerList(values) => {
            for v in values {
                separated.push_bind(*v);
            }
        }
        FilterValue::StringList(values) => {
            for v in values {
                separated.push_bind(v.clone());
            }
        }
        _ => {}
    }
    separated.push_unseparated(")");
    Ok(())
}

fn push_order<E: Entity>(
    builder: &mut QueryBuilder<'_, Sqlite>,
    order: &[SortField],
) -> AppResult<()> {
    builder.push(" ORDER BY ");
    for sort in order {
        let column = resolve_column::<E>(&sort.column)?;
        builder.push(format!(
            "{} {}, ",
            qualified(ROOT, column),
            sort.direction.as_sql()
        ));
    }
    builder.push(format!("{} ASC", qualified(ROOT, E::PRIMARY_KEY)));
    Ok(())
}

fn push_limit(builder: &mut QueryBuilder<'_, Sqlite>, limit: Option<i64>) {
    if let Some(limit) = limit {
        builder.push(" LIMIT ").push_bind(limit);
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::types::{CustomerId, SortField};
    use storefront_entity::{Customer, Order, Product};

    use super::*;
    use crate::entity::OrderRelation;
    use crate::test_support::seeded_pool;

    #[tokio::test]
    async fn test_select_sql_with_joins() {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").expect("lazy pool");
        let query = Query::<Order>::new(pool)
            .include(&[OrderRelation::Customer])
            .filter(Filter::eq("CustomerId", 1_i64));
        let builder = query.select().expect("select");
        let sql = builder.sql();
        assert!(sql.starts_with("SELECT t.*, j0.\"CustomerId\" AS \"customer__CustomerId\""));
        assert!(sql.contains("FROM \"Orders\" AS t LEFT JOIN \"Customers\" AS j0"));
        assert!(sql.contains("ON j0.\"CustomerId\" = t.\"CustomerId\""));
        assert!(sql.contains("WHERE t.\"CustomerId\" = ?"));
        assert!(sql.ends_with("ORDER BY t.\"Id\" ASC"));
    }

    #[tokio::test]
    async fn test_unknown_column_is_rejected_before_sql() {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").expect("lazy pool");
        let err = Query::<Customer>::new(pool)
            .filter(Filter::eq("Email", "a@b.c"))
            .select()
            .err()
            .expect("unknown column rejected");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_filter_and_order() {
        let db = seeded_pool().await;
        let customers = Query::<Customer>::new(db.pool().clone())
            .filter(Filter::eq("Surname", "Smith"))
            .order_by(SortField::desc("FirstName"))
            .fetch_all()
            .await
            .expect("fetch");
        let names: Vec<&str> = customers.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["John", "Donna"]);
    }

    #[tokio::test]
    async fn test_ilike_matches_case_insensitively() {
        let db = seeded_pool().await;
        let products = Query::<Product>::new(db.pool().clone())
            .and(FilterField::ilike("ProductDescription", "%PHONE%"))
            .fetch_all()
            .await
            .expect("fetch");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].description, "mobile phone");
    }

    #[tokio::test]
    async fn test_in_filter_and_empty_list() {
        let db = seeded_pool().await;
        let some = Query::<Customer>::new(db.pool().clone())
            .and(FilterField::is_in("CustomerId", vec![1_i64, 3]))
            .count()
            .await
            .expect("count");
        assert_eq!(some, 2);

        let none = Query::<Customer>::new(db.pool().clone())
            .and(FilterField::is_in("CustomerId", Vec::<i64>::new()))
            .count()
            .await
            .expect("count");
        assert_eq!(none, 0);
    }

    #[tokio::test]
    async fn test_null_checks_bind_no_value() {
        let db = seeded_pool().await;
        let undated = Query::<Order>::new(db.pool().clone())
            .and(FilterField::is_null("CreatedOn"))
            .count()
            .await
            .expect("count");
        assert_eq!(undated, 0);

        let query = Query::<Order>::new(db.pool().clone()).and(FilterField::is_null("CreatedOn"));
        let builder = query.select().expect("select");
        let sql = builder.sql();
        assert!(sql.ends_with("WHERE t.\"CreatedOn\" IS NULL ORDER BY t.\"Id\" ASC"), "{sql}");
    }

    #[tokio::test]
    async fn test_include_hydrates_relations() {
        let db = seeded_pool().await;
        let orders = Query::<Order>::new(db.pool().clone())
            .include(&OrderRelation::ALL)
            .filter(Filter::eq("CustomerId", CustomerId(1)))
            .fetch_all()
            .await
            .expect("fetch");
        assert_eq!(orders.len(), 2);
        for order in &orders {
            assert!(order.is_hydrated());
            assert_eq!(order.customer.as_ref().map(|c| c.id), Some(CustomerId(1)));
            assert!(order.created_on.is_some());
        }
        assert_eq!(
            orders[1].product.as_ref().map(|p| p.description.as_str()),
            Some("mobile phone")
        );
    }

    #[tokio::test]
    async fn test_limit_and_fetch_optional() {
        let db = seeded_pool().await;
        let first = Query::<Product>::new(db.pool().clone())
            .order_by(SortField::desc("ProductId"))
            .fetch_optional()
            .await
            .expect("fetch");
        assert_eq!(first.map(|p| p.description), Some("tablet".to_string()));

        let two = Query::<Product>::new(db.pool().clone())
            .limit(2)
            .fetch_all()
            .await
            .expect("fetch");
        assert_eq!(two.len(), 2);
    }

    #[tokio::test]
    async fn test_pluck_projects_column() {
        let db = seeded_pool().await;
        let product_ids = Query::<Order>::new(db.pool().clone())
            .filter(Filter::eq("CustomerId", 1_i64))
            .pluck_i64("ProductId")
            .await
            .expect("pluck");
        assert_eq!(product_ids, vec![1, 2]);
    }
}
