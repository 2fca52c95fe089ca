//! Integration tests for the full gateway pipeline.
//!
//! Tests: Locator → Validation → SqliteProductStore → ChangeBus → Cursor
//!
//! Verifies:
//! - Writes are validated before the store is touched
//! - Item locators address one record by uuid
//! - Notifications are published once per effective write, never for no-ops

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use stockkeep_core::Entity;
    use stockkeep_events::{ChangeBus, ChangeNotification, InMemoryChangeBus, Subscription};
    use stockkeep_products::{FieldSet, FieldValue, Product, ValidationError};

    use crate::config::ProviderConfig;
    use crate::cursor::Row;
    use crate::error::ProviderError;
    use crate::locator::Locator;
    use crate::messages::Operation;
    use crate::provider::{ProductProvider, QueryArgs};
    use crate::store::{ProductStore, Selection, SqliteProductStore, StoreError};

    /// Store wrapper that counts every call reaching the backend.
    struct CountingStore {
        inner: SqliteProductStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ProductStore for CountingStore {
        async fn query(
            &self,
            projection: Option<&[String]>,
            selection: &Selection,
            sort_order: Option<&str>,
        ) -> Result<Vec<Row>, StoreError> {
            self.hit();
            self.inner.query(projection, selection, sort_order).await
        }

        async fn insert(&self, values: &FieldSet) -> Result<i64, StoreError> {
            self.hit();
            self.inner.insert(values).await
        }

        async fn update(&self, values: &FieldSet, selection: &Selection) -> Result<u64, StoreError> {
            self.hit();
            self.inner.update(values, selection).await
        }

        async fn delete(&self, selection: &Selection) -> Result<u64, StoreError> {
            self.hit();
            self.inner.delete(selection).await
        }
    }

    /// Bus wrapper that counts publishes.
    #[derive(Default)]
    struct CountingBus {
        inner: InMemoryChangeBus<ChangeNotification>,
        published: AtomicUsize,
    }

    impl CountingBus {
        fn published(&self) -> usize {
            self.published.load(Ordering::SeqCst)
        }
    }

    impl ChangeBus<ChangeNotification> for CountingBus {
        type Error = <InMemoryChangeBus<ChangeNotification> as ChangeBus<ChangeNotification>>::Error;

        fn publish(&self, message: ChangeNotification) -> Result<(), Self::Error> {
            self.published.fetch_add(1, Ordering::SeqCst);
            self.inner.publish(message)
        }

        fn subscribe(&self) -> Subscription<ChangeNotification> {
            self.inner.subscribe()
        }
    }

    /// Bus whose publish always fails.
    #[derive(Default)]
    struct FailingBus {
        inner: InMemoryChangeBus<ChangeNotification>,
    }

    impl ChangeBus<ChangeNotification> for FailingBus {
        type Error = &'static str;

        fn publish(&self, _message: ChangeNotification) -> Result<(), Self::Error> {
            Err("bus offline")
        }

        fn subscribe(&self) -> Subscription<ChangeNotification> {
            self.inner.subscribe()
        }
    }

    type TestProvider = ProductProvider<CountingStore, CountingBus>;

    const AUTH: &str = "com.example.android.stockkeepingassistant";

    async fn store() -> SqliteProductStore {
        SqliteProductStore::connect(&ProviderConfig::default())
            .await
            .unwrap()
    }

    async fn setup() -> TestProvider {
        let store = CountingStore {
            inner: store().await,
            calls: AtomicUsize::new(0),
        };
        ProductProvider::with_default_messages(store, CountingBus::default(), AUTH)
    }

    fn widget(uuid: &str) -> FieldSet {
        FieldSet::new()
            .with("uuid", uuid)
            .with("title", "Widget")
            .with("quantity", 5i64)
            .with("price", "3")
            .with("supplier_name", "Acme")
            .with("supplier_email", "a@acme.test")
    }

    async fn fetch(p: &TestProvider, uuid: &str) -> Option<Row> {
        p.query(&p.item_locator(uuid), QueryArgs::all())
            .await
            .unwrap()
            .next()
    }

    #[tokio::test]
    async fn widget_lifecycle() {
        let p = setup().await;
        let products = p.collection_locator();

        let created = p.insert(&products, widget("u1")).await.unwrap();
        let created = created.expect("row inserted");
        assert_eq!(created.segments()[0], "products");
        assert!(created.last_segment().is_some_and(|id| id.parse::<i64>().is_ok()));

        let row = fetch(&p, "u1").await.expect("u1 stored");
        assert_eq!(row.text("price").as_deref(), Some("3.00"));
        assert_eq!(row.integer("quantity"), Some(5));

        let err = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("quantity", -1i64),
                Selection::all(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Validation(ValidationError::InvalidQuantity)
        ));
        let row = fetch(&p, "u1").await.unwrap();
        assert_eq!(row.integer("quantity"), Some(5));

        let deleted = p.delete(&p.item_locator("u1"), Selection::all()).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(fetch(&p, "u1").await.is_none());
    }

    #[tokio::test]
    async fn insert_then_query_returns_same_record() {
        let p = setup().await;
        let mut product = Product::new();
        product.set_title("Gadget");
        product.set_quantity(12);
        product.set_price("9.5".parse().unwrap()).unwrap();
        product.set_supplier_name("Globex");
        product.set_supplier_email("orders@globex.test");

        p.insert(&p.collection_locator(), product.to_field_set())
            .await
            .unwrap()
            .unwrap();

        let row = fetch(&p, &product.id().to_string()).await.unwrap();
        let stored = row.to_product().unwrap();
        assert_eq!(stored, product);
        assert!(stored.is_same_record(&product));
        assert_eq!(stored.price().to_string(), "9.50");
    }

    #[tokio::test]
    async fn empty_update_touches_nothing() {
        let p = setup().await;
        let count = p
            .update(&p.collection_locator(), FieldSet::new(), Selection::all())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(p.store().calls(), 0);
        assert_eq!(p.bus().published(), 0);
    }

    #[tokio::test]
    async fn invalid_insert_never_reaches_store() {
        let p = setup().await;
        let mut fields = widget("u1");
        fields.remove("title");

        let err = p.insert(&p.collection_locator(), fields).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation(ValidationError::MissingTitle)));
        assert_eq!(p.store().calls(), 0);
        assert_eq!(p.bus().published(), 0);
    }

    #[tokio::test]
    async fn notifications_only_for_effective_writes() {
        let p = setup().await;
        let products = p.collection_locator();

        p.insert(&products, widget("u1")).await.unwrap().unwrap();
        assert_eq!(p.bus().published(), 1);

        let missing = p.item_locator("nope");
        assert_eq!(p.delete(&missing, Selection::all()).await.unwrap(), 0);
        let changed = p
            .update(&missing, FieldSet::new().with("title", "x"), Selection::all())
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(p.bus().published(), 1);

        let changed = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("title", "Widget II"),
                Selection::all(),
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(p.bus().published(), 2);

        assert_eq!(p.delete(&products, Selection::all()).await.unwrap(), 1);
        assert_eq!(p.bus().published(), 3);
    }

    #[tokio::test]
    async fn unknown_locators_are_rejected_for_every_operation() {
        let p = setup().await;
        let bad = Locator::parse(&format!("content://{AUTH}/suppliers"));

        let is_unknown = |err: ProviderError, expected: Operation| {
            matches!(err, ProviderError::UnknownLocator { operation, .. } if operation == expected)
        };

        assert!(is_unknown(
            p.query(&bad, QueryArgs::all()).await.unwrap_err(),
            Operation::Query
        ));
        assert!(is_unknown(
            p.insert(&bad, widget("u1")).await.unwrap_err(),
            Operation::Insert
        ));
        assert!(is_unknown(
            p.update(&bad, FieldSet::new().with("title", "x"), Selection::all())
                .await
                .unwrap_err(),
            Operation::Update
        ));
        assert!(is_unknown(
            p.delete(&bad, Selection::all()).await.unwrap_err(),
            Operation::Delete
        ));
        assert!(is_unknown(p.content_type(&bad).unwrap_err(), Operation::ContentType));

        assert_eq!(p.store().calls(), 0);
        assert_eq!(p.bus().published(), 0);
    }

    #[tokio::test]
    async fn insert_on_item_locator_is_unknown() {
        let p = setup().await;
        let err = p
            .insert(&p.item_locator("u1"), widget("u1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::UnknownLocator { operation: Operation::Insert, .. }
        ));
    }

    /// Regression: updating the price to zero keeps the stored price.
    #[tokio::test]
    async fn zero_price_update_keeps_stored_price() {
        let p = setup().await;
        p.insert(&p.collection_locator(), widget("u1")).await.unwrap();
        let calls_before = p.store().calls();

        let changed = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("price", "0"),
                Selection::all(),
            )
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(p.store().calls(), calls_before);

        let changed = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("price", "0.00").with("quantity", 8i64),
                Selection::all(),
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let row = fetch(&p, "u1").await.unwrap();
        assert_eq!(row.text("price").as_deref(), Some("3.00"));
        assert_eq!(row.integer("quantity"), Some(8));
    }

    #[tokio::test]
    async fn non_zero_price_update_is_normalized() {
        let p = setup().await;
        p.insert(&p.collection_locator(), widget("u1")).await.unwrap();

        p.update(
            &p.item_locator("u1"),
            FieldSet::new().with("price", "4.005"),
            Selection::all(),
        )
        .await
        .unwrap();

        let row = fetch(&p, "u1").await.unwrap();
        assert_eq!(row.text("price").as_deref(), Some("4.01"));
    }

    /// Known limitation: update validation stops at the first present field.
    #[tokio::test]
    async fn update_only_checks_first_present_field() {
        let p = setup().await;
        p.insert(&p.collection_locator(), widget("u1")).await.unwrap();

        let changed = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("title", "Widget").with("quantity", -1i64),
                Selection::all(),
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let row = fetch(&p, "u1").await.unwrap();
        assert_eq!(row.integer("quantity"), Some(-1));
    }

    #[tokio::test]
    async fn update_cannot_change_identity() {
        let p = setup().await;
        p.insert(&p.collection_locator(), widget("u1")).await.unwrap();

        let changed = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("uuid", "u2").with("title", "Renamed"),
                Selection::all(),
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert!(fetch(&p, "u2").await.is_none());
        let row = fetch(&p, "u1").await.unwrap();
        assert_eq!(row.text("title").as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn duplicate_uuid_insert_fails_softly() {
        let p = setup().await;
        let products = p.collection_locator();
        assert!(p.insert(&products, widget("u1")).await.unwrap().is_some());

        let second = p.insert(&products, widget("u1")).await.unwrap();
        assert!(second.is_none());
        assert_eq!(p.bus().published(), 1);
    }

    #[tokio::test]
    async fn collection_query_filters_and_sorts() {
        let p = setup().await;
        let products = p.collection_locator();
        for (uuid, title, qty) in [("a", "Bolt", 40i64), ("b", "Anchor", 2), ("c", "Cable", 9)] {
            let fields = widget(uuid).with("title", title).with("quantity", qty);
            p.insert(&products, fields).await.unwrap().unwrap();
        }

        let args = QueryArgs::all()
            .with_projection(["title", "quantity"])
            .with_selection(Selection::new("quantity > ?", ["5"]))
            .with_sort_order("title ASC");
        let cursor = p.query(&products, args).await.unwrap();
        assert_eq!(cursor.columns(), ["title".to_string(), "quantity".to_string()]);

        let titles: Vec<String> = cursor.filter_map(|row| row.text("title")).collect();
        assert_eq!(titles, vec!["Bolt", "Cable"]);
    }

    #[tokio::test]
    async fn item_query_ignores_caller_selection() {
        let p = setup().await;
        let products = p.collection_locator();
        p.insert(&products, widget("u1")).await.unwrap();
        p.insert(&products, widget("u2")).await.unwrap();

        let args = QueryArgs::all().with_selection(Selection::filter("1 = 0"));
        let rows: Vec<Row> = p.query(&p.item_locator("u2"), args).await.unwrap().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("uuid").as_deref(), Some("u2"));
    }

    #[tokio::test]
    async fn numeric_item_tokens_use_natural_form() {
        let p = setup().await;
        p.insert(&p.collection_locator(), widget("7")).await.unwrap();

        let row = fetch(&p, "007").await.expect("007 addresses uuid 7");
        assert_eq!(row.text("uuid").as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn cursors_go_stale_after_related_writes() {
        let p = setup().await;
        let products = p.collection_locator();
        p.insert(&products, widget("u1")).await.unwrap();

        let mut list = p.query(&products, QueryArgs::all()).await.unwrap();
        let mut item = p.query(&p.item_locator("u1"), QueryArgs::all()).await.unwrap();
        assert!(!list.is_stale());
        assert!(!item.is_stale());

        p.update(
            &p.item_locator("u1"),
            FieldSet::new().with("title", "Changed"),
            Selection::all(),
        )
        .await
        .unwrap();

        assert!(item.is_stale());
        assert!(list.is_stale());
    }

    #[tokio::test]
    async fn failed_notification_does_not_fail_write() {
        let p = ProductProvider::with_default_messages(store().await, FailingBus::default(), AUTH);
        let products = p.collection_locator();

        let created = p.insert(&products, widget("u1")).await.unwrap();
        assert!(created.is_some());
        assert_eq!(p.delete(&products, Selection::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_column_insert_fails_softly() {
        let p = setup().await;
        let fields = widget("u1").with("photo", FieldValue::from("IMG_1.jpg"));
        assert!(p.insert(&p.collection_locator(), fields).await.unwrap().is_none());
        assert_eq!(p.bus().published(), 0);
    }

    #[tokio::test]
    async fn price_rounding_to_zero_is_still_written() {
        let p = setup().await;
        p.insert(&p.collection_locator(), widget("u1")).await.unwrap();

        let changed = p
            .update(
                &p.item_locator("u1"),
                FieldSet::new().with("price", "0.004"),
                Selection::all(),
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let row = fetch(&p, "u1").await.unwrap();
        assert_eq!(row.text("price").as_deref(), Some("0.00"));
    }

    #[tokio::test]
    async fn price_without_room_for_cents_is_rejected() {
        let p = setup().await;
        let fields = widget("u1").with("price", "9999999999999999999999999999");

        let err = p.insert(&p.collection_locator(), fields).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation(ValidationError::MissingPrice)));
        assert_eq!(p.store().calls(), 0);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use stockkeep_core::Decimal;

        fn runtime() -> tokio::runtime::Runtime {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// Property: any valid record reads back exactly as it was inserted.
            #[test]
            fn inserted_records_read_back_unchanged(
                title in "[A-Za-z0-9][A-Za-z0-9 ]{0,23}",
                quantity in 0u32..1_000_000,
                cents in 0i64..100_000_000,
                scale in 0u32..4,
                supplier in "[A-Za-z][A-Za-z ]{0,15}",
                email in "[a-z]{1,8}@[a-z]{1,8}\\.test",
            ) {
                let mut product = Product::new();
                product.set_title(title);
                product.set_quantity(quantity);
                product.set_price(Decimal::new(cents, scale)).unwrap();
                product.set_supplier_name(supplier);
                product.set_supplier_email(email);

                let stored = runtime().block_on(async {
                    let p = setup().await;
                    let created = p
                        .insert(&p.collection_locator(), product.to_field_set())
                        .await
                        .unwrap();
                    assert!(created.is_some());
                    fetch(&p, &product.id().to_string()).await
                });

                let stored = stored.expect("inserted record is queryable").to_product().unwrap();
                prop_assert_eq!(stored, product);
            }
        }
    }
}
