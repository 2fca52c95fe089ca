//! SQLite-backed product store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, SqlitePool, TypeInfo, ValueRef};

use stockkeep_products::contract::{ALL_COLUMNS, TABLE_NAME};
use stockkeep_products::{FieldSet, FieldValue};

use super::r#trait::{ProductStore, Selection, StoreError, ensure_known_columns};
use crate::config::ProviderConfig;
use crate::cursor::Row;

/// `_id` is `AUTOINCREMENT` so a deleted row's id is never handed out again.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        _id            INTEGER PRIMARY KEY AUTOINCREMENT,
        uuid           TEXT NOT NULL UNIQUE,
        title          TEXT NOT NULL,
        price          TEXT NOT NULL DEFAULT '0.00',
        quantity       INTEGER NOT NULL DEFAULT 1,
        supplier_name  TEXT NULL,
        supplier_email TEXT NOT NULL
    )
"#;

/// Product store on an `sqlx` SQLite pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

impl SqliteProductStore {
    /// Open (creating if needed) the database named by `config` and make sure
    /// the `products` table exists.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, StoreError> {
        let options =
            SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let pool_options = if config.is_in_memory() {
            // Every connection to `:memory:` is a separate database; pin one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::debug!(url = %config.database_url, "opened product database");

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the `products` table if absent.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q FieldValue) -> SqliteQuery<'q> {
    match value {
        FieldValue::Null => query.bind(None::<String>),
        FieldValue::Integer(v) => query.bind(*v),
        FieldValue::Real(v) => query.bind(*v),
        FieldValue::Text(v) => query.bind(v.as_str()),
    }
}

fn bind_selection<'q>(mut query: SqliteQuery<'q>, selection: &'q Selection) -> SqliteQuery<'q> {
    for arg in &selection.args {
        query = query.bind(arg.as_str());
    }
    query
}

fn push_where(sql: &mut String, selection: &Selection) {
    if let Some(clause) = selection.clause.as_deref().filter(|c| !c.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row, StoreError> {
    let mut values = Vec::with_capacity(row.columns().len());

    for column in row.columns() {
        let name = column.name();
        let idx = column.ordinal();

        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            FieldValue::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "INTEGER" | "BOOLEAN" => FieldValue::Integer(row.try_get::<i64, _>(idx)?),
                "REAL" => FieldValue::Real(row.try_get::<f64, _>(idx)?),
                "TEXT" => FieldValue::Text(row.try_get::<String, _>(idx)?),
                other => {
                    return Err(StoreError::Decode {
                        column: name.to_string(),
                        reason: format!("unsupported storage class {other}"),
                    });
                }
            }
        };

        values.push((name.to_string(), value));
    }

    Ok(Row::new(values))
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn query(
        &self,
        projection: Option<&[String]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError> {
        let columns = match projection {
            Some(cols) if !cols.is_empty() => {
                ensure_known_columns(cols.iter().map(String::as_str))?;
                cols.join(", ")
            }
            _ => ALL_COLUMNS.join(", "),
        };

        let mut sql = format!("SELECT {columns} FROM {TABLE_NAME}");
        push_where(&mut sql, selection);
        if let Some(order) = sort_order.filter(|o| !o.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let rows = bind_selection(sqlx::query(&sql), selection)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_row).collect()
    }

    async fn insert(&self, values: &FieldSet) -> Result<i64, StoreError> {
        if values.is_empty() {
            return Err(StoreError::EmptyWrite);
        }
        ensure_known_columns(values.keys())?;

        let names: Vec<&str> = values.keys().collect();
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders})",
            names.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in values.iter() {
            query = bind_value(query, value);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, values: &FieldSet, selection: &Selection) -> Result<u64, StoreError> {
        if values.is_empty() {
            return Err(StoreError::EmptyWrite);
        }
        ensure_known_columns(values.keys())?;

        let assignments = values
            .keys()
            .map(|name| format!("{name} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {TABLE_NAME} SET {assignments}");
        push_where(&mut sql, selection);

        let mut query = sqlx::query(&sql);
        for (_, value) in values.iter() {
            query = bind_value(query, value);
        }
        let result = bind_selection(query, selection)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, selection: &Selection) -> Result<u64, StoreError> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        push_where(&mut sql, selection);

        let result = bind_selection(sqlx::query(&sql), selection)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
