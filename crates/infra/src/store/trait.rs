use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockkeep_products::FieldSet;
use stockkeep_products::contract::{self, columns};

use crate::cursor::Row;

/// Row filter: a SQL predicate with positional `?` placeholders plus its
/// arguments, applied as `WHERE {clause}`.
///
/// The clause is trusted caller input, exactly like a sort order; only column
/// names in projections and field sets are checked against the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<String>,
}

impl Selection {
    /// Every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(clause: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            clause: Some(clause.into()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A predicate without arguments.
    pub fn filter(clause: impl Into<String>) -> Self {
        Self {
            clause: Some(clause.into()),
            args: Vec::new(),
        }
    }

    /// `uuid = ?` with `value` as the only argument.
    pub fn uuid_eq(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::new(format!("{} = ?", columns::UUID), [value])
    }
}

/// Backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    #[error("write has no columns")]
    EmptyWrite,

    #[error("could not decode column {column:?}: {reason}")]
    Decode { column: String, reason: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Reject any column name the contract does not define.
///
/// Column names end up inside SQL text, so this must run before building a
/// statement.
pub fn ensure_known_columns<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), StoreError> {
    for name in names {
        if !contract::is_known_column(name) {
            return Err(StoreError::UnknownColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Single-table relational store.
///
/// No method validates field values; that is the gateway's job. Each call
/// maps to exactly one statement.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// `SELECT {projection} ... WHERE {selection} ORDER BY {sort_order}`.
    ///
    /// `None` projection means every column in table order.
    async fn query(
        &self,
        projection: Option<&[String]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError>;

    /// Insert one row; returns the store-assigned `_id`.
    async fn insert(&self, values: &FieldSet) -> Result<i64, StoreError>;

    /// Returns the number of rows changed.
    async fn update(&self, values: &FieldSet, selection: &Selection) -> Result<u64, StoreError>;

    /// Returns the number of rows removed.
    async fn delete(&self, selection: &Selection) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn query(
        &self,
        projection: Option<&[String]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError> {
        (**self).query(projection, selection, sort_order).await
    }

    async fn insert(&self, values: &FieldSet) -> Result<i64, StoreError> {
        (**self).insert(values).await
    }

    async fn update(&self, values: &FieldSet, selection: &Selection) -> Result<u64, StoreError> {
        (**self).update(values, selection).await
    }

    async fn delete(&self, selection: &Selection) -> Result<u64, StoreError> {
        (**self).delete(selection).await
    }
}
