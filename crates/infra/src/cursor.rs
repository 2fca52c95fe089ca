//! Query results.

use std::collections::VecDeque;

use stockkeep_core::DomainResult;
use stockkeep_events::{ChangeNotification, Subscription};
use stockkeep_products::{FieldSet, FieldValue, Product};

use crate::locator::Locator;

/// One result row: column values in projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new(values: Vec<(String, FieldValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(FieldValue::as_text)
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(FieldValue::as_integer)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn to_field_set(&self) -> FieldSet {
        self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Rebuild the record this row was read from.
    pub fn to_product(&self) -> DomainResult<Product> {
        Product::from_fields(&self.to_field_set())
    }
}

/// Forward-only sequence of rows returned by a query.
///
/// The cursor stays registered for change notifications on the locator it was
/// queried with; [`Cursor::is_stale`] turns true once a write affecting that
/// locator is published, telling the holder to re-query.
#[derive(Debug)]
pub struct Cursor {
    locator: Locator,
    columns: Vec<String>,
    rows: VecDeque<Row>,
    watch: Option<Subscription<ChangeNotification>>,
    stale: bool,
}

impl Cursor {
    pub fn new(
        locator: Locator,
        columns: Vec<String>,
        rows: Vec<Row>,
        watch: Option<Subscription<ChangeNotification>>,
    ) -> Self {
        Self {
            locator,
            columns,
            rows: rows.into(),
            watch,
            stale: false,
        }
    }

    /// Locator this cursor watches for changes.
    pub fn notification_locator(&self) -> &Locator {
        &self.locator
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a change affecting this cursor's locator has been published
    /// since the query ran. Once stale, always stale.
    ///
    /// Going stale releases the subscription; nothing further is queued for
    /// this cursor.
    pub fn is_stale(&mut self) -> bool {
        if let Some(watch) = &self.watch {
            let watched = self.locator.to_string();
            if watch.drain().iter().any(|change| change.affects(&watched)) {
                self.stale = true;
                self.watch = None;
            }
        }
        self.stale
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}
