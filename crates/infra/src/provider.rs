//! Store gateway: the single entry point for reading and writing products.
//!
//! Every call goes through the same pipeline:
//!
//! ```text
//! locator
//!   ↓
//! 1. Classify against the routing table (collection / item / unrecognized)
//!   ↓
//! 2. Validate and normalize the field set (writes only)
//!   ↓
//! 3. Run exactly one store statement (writes hold the writer lock)
//!   ↓
//! 4. Publish one change notification if anything changed
//! ```
//!
//! An item locator always replaces the caller's selection with `uuid = ?`.
//! The gateway keeps no state between calls apart from its collaborators.

use std::sync::Arc;

use tokio::sync::Mutex;

use stockkeep_events::{ChangeBus, ChangeNotification};
use stockkeep_products::contract::{self, ALL_COLUMNS};
use stockkeep_products::{
    FieldSet, UpdateCheck, normalize_insert, normalize_update, validate_insert, validate_update,
};

use crate::cursor::Cursor;
use crate::error::{ProviderError, ProviderResult};
use crate::locator::{Locator, LocatorMatch, LocatorMatcher, item_argument};
use crate::messages::{DefaultMessages, MessageKey, MessageProvider, Operation};
use crate::store::{ProductStore, Selection};

/// Read arguments for [`ProductProvider::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    /// Columns to return; `None` returns every column in table order.
    pub projection: Option<Vec<String>>,
    /// Row filter. Ignored for item locators.
    pub selection: Selection,
    /// Raw `ORDER BY` fragment.
    pub sort_order: Option<String>,
}

impl QueryArgs {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }
}

/// CRUD gateway over a [`ProductStore`], publishing to a [`ChangeBus`].
pub struct ProductProvider<S, B> {
    store: S,
    bus: B,
    messages: Arc<dyn MessageProvider>,
    matcher: LocatorMatcher,
    write_lock: Mutex<()>,
}

impl<S, B> ProductProvider<S, B>
where
    S: ProductStore,
    B: ChangeBus<ChangeNotification>,
{
    pub fn new(
        store: S,
        bus: B,
        messages: Arc<dyn MessageProvider>,
        authority: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bus,
            messages,
            matcher: LocatorMatcher::new(authority),
            write_lock: Mutex::new(()),
        }
    }

    /// Gateway using the built-in English wording.
    pub fn with_default_messages(store: S, bus: B, authority: impl Into<String>) -> Self {
        Self::new(store, bus, Arc::new(DefaultMessages), authority)
    }

    pub fn authority(&self) -> &str {
        self.matcher.authority()
    }

    /// `content://{authority}/products` for this gateway.
    pub fn collection_locator(&self) -> Locator {
        Locator::collection(self.authority())
    }

    /// `content://{authority}/products/{token}` for this gateway.
    pub fn item_locator(&self, token: impl Into<String>) -> Locator {
        Locator::item(self.authority(), token)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn classify(&self, locator: &Locator) -> LocatorMatch {
        self.matcher.classify(locator)
    }

    /// MIME-style type of what `locator` addresses.
    pub fn content_type(&self, locator: &Locator) -> ProviderResult<String> {
        match self.classify(locator) {
            LocatorMatch::Collection => Ok(contract::list_content_type(self.authority())),
            LocatorMatch::Item(_) => Ok(contract::item_content_type(self.authority())),
            LocatorMatch::Unrecognized => Err(self.unknown(Operation::ContentType, locator)),
        }
    }

    /// Read rows addressed by `locator`.
    ///
    /// The returned cursor watches `locator`; it subscribes before the read so
    /// a write racing the read can only make it stale, never go unnoticed.
    pub async fn query(&self, locator: &Locator, args: QueryArgs) -> ProviderResult<Cursor> {
        let matched = self.classify(locator);
        tracing::debug!(%locator, ?matched, "query");

        let selection = match matched {
            LocatorMatch::Collection => args.selection,
            LocatorMatch::Item(token) => Selection::uuid_eq(item_argument(&token)),
            LocatorMatch::Unrecognized => return Err(self.unknown(Operation::Query, locator)),
        };

        let watch = self.bus.subscribe();
        let rows = self
            .store
            .query(
                args.projection.as_deref(),
                &selection,
                args.sort_order.as_deref(),
            )
            .await?;

        let columns = match args.projection {
            Some(cols) if !cols.is_empty() => cols,
            _ => ALL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        };

        Ok(Cursor::new(locator.clone(), columns, rows, Some(watch)))
    }

    /// Create one record under the collection locator.
    ///
    /// Returns the new record's locator (collection plus store-assigned `_id`),
    /// or `None` when the store refused the row. Validation failures are errors.
    pub async fn insert(&self, locator: &Locator, values: FieldSet) -> ProviderResult<Option<Locator>> {
        let matched = self.classify(locator);
        tracing::debug!(%locator, ?matched, "insert");

        if matched != LocatorMatch::Collection {
            return Err(self.unknown(Operation::Insert, locator));
        }

        if let Err(err) = validate_insert(&values) {
            return Err(self.rejected(Operation::Insert, locator, err));
        }

        let mut values = values;
        normalize_insert(&mut values);

        let inserted = {
            let _guard = self.write_lock.lock().await;
            self.store.insert(&values).await
        };

        match inserted {
            Ok(id) => {
                let created = locator.with_appended_id(id);
                tracing::debug!(%created, "inserted product");
                self.notify_change(locator);
                Ok(Some(created))
            }
            Err(err) => {
                tracing::error!(
                    %locator,
                    error = %err,
                    "{} {locator}",
                    self.messages.message(MessageKey::InsertFailed)
                );
                Ok(None)
            }
        }
    }

    /// Remove the rows addressed by `locator`; returns how many went.
    pub async fn delete(&self, locator: &Locator, selection: Selection) -> ProviderResult<u64> {
        let matched = self.classify(locator);
        tracing::debug!(%locator, ?matched, "delete");

        let selection = self.resolve_selection(Operation::Delete, locator, matched, selection)?;

        let deleted = {
            let _guard = self.write_lock.lock().await;
            self.store.delete(&selection).await?
        };

        if deleted > 0 {
            self.notify_change(locator);
        }
        Ok(deleted)
    }

    /// Change columns of the rows addressed by `locator`; returns how many
    /// changed.
    ///
    /// An empty field set, or one left empty after normalization, changes
    /// nothing and never reaches the store.
    pub async fn update(
        &self,
        locator: &Locator,
        values: FieldSet,
        selection: Selection,
    ) -> ProviderResult<u64> {
        let matched = self.classify(locator);
        tracing::debug!(%locator, ?matched, "update");

        let selection = self.resolve_selection(Operation::Update, locator, matched, selection)?;

        match validate_update(&values) {
            Ok(UpdateCheck::NoOp) => return Ok(0),
            Ok(UpdateCheck::Proceed) => {}
            Err(err) => return Err(self.rejected(Operation::Update, locator, err)),
        }

        let mut values = values;
        if normalize_update(&mut values) == UpdateCheck::NoOp {
            tracing::debug!(%locator, "nothing left to update");
            return Ok(0);
        }

        let updated = {
            let _guard = self.write_lock.lock().await;
            self.store.update(&values, &selection).await?
        };

        if updated > 0 {
            self.notify_change(locator);
        }
        Ok(updated)
    }

    /// Publish a change for `locator`. Failure is logged, never returned.
    fn notify_change(&self, locator: &Locator) {
        if let Err(err) = self.bus.publish(ChangeNotification::new(locator.to_string())) {
            tracing::warn!(
                %locator,
                error = ?err,
                "{} {locator}",
                self.messages.message(MessageKey::NotificationFailed)
            );
        }
    }

    fn resolve_selection(
        &self,
        operation: Operation,
        locator: &Locator,
        matched: LocatorMatch,
        selection: Selection,
    ) -> ProviderResult<Selection> {
        match matched {
            LocatorMatch::Collection => Ok(selection),
            LocatorMatch::Item(token) => Ok(Selection::uuid_eq(item_argument(&token))),
            LocatorMatch::Unrecognized => Err(self.unknown(operation, locator)),
        }
    }

    fn unknown(&self, operation: Operation, locator: &Locator) -> ProviderError {
        let err = ProviderError::UnknownLocator {
            operation,
            locator: locator.to_string(),
        };
        tracing::warn!(%operation, "{}", err.describe(operation, self.messages.as_ref()));
        err
    }

    fn rejected(
        &self,
        operation: Operation,
        locator: &Locator,
        err: stockkeep_products::ValidationError,
    ) -> ProviderError {
        let err = ProviderError::from(err);
        tracing::warn!(%locator, "{}", err.describe(operation, self.messages.as_ref()));
        err
    }
}

impl<S, B> core::fmt::Debug for ProductProvider<S, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductProvider")
            .field("authority", &self.matcher.authority())
            .finish_non_exhaustive()
    }
}
