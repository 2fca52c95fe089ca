//! Command implementations. Each command opens the configured store, runs one
//! gateway call and prints the result to stdout.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};

use stockkeep_core::Entity;
use stockkeep_events::{ChangeNotification, InMemoryChangeBus};
use stockkeep_infra::{
    Cursor, DefaultMessages, Locator, MessageProvider, Operation, ProductProvider, ProviderConfig,
    ProviderError, QueryArgs, Selection, SqliteProductStore,
};
use stockkeep_products::contract::columns;
use stockkeep_products::{FieldSet, FieldValue, Product};

use crate::args::Command;

type Provider = ProductProvider<SqliteProductStore, InMemoryChangeBus<ChangeNotification>>;

async fn open(config: &ProviderConfig, messages: Arc<dyn MessageProvider>) -> Result<Provider> {
    let store = SqliteProductStore::connect(config)
        .await
        .with_context(|| format!("failed to open {}", config.database_url))?;
    Ok(ProductProvider::new(
        store,
        InMemoryChangeBus::new(),
        messages,
        config.authority.clone(),
    ))
}

pub async fn run(config: &ProviderConfig, command: Command) -> Result<()> {
    let messages: Arc<dyn MessageProvider> = Arc::new(DefaultMessages);
    let provider = open(config, messages.clone()).await?;
    let explain = |op: Operation| {
        let messages = messages.clone();
        move |err: ProviderError| anyhow!(err.describe(op, messages.as_ref()))
    };

    match command {
        Command::List { min_quantity, sort } => {
            let mut args = QueryArgs::all().with_sort_order(sort);
            if let Some(min) = min_quantity {
                args = args.with_selection(Selection::new(
                    format!("{} >= ?", columns::QUANTITY),
                    [min.to_string()],
                ));
            }
            let cursor = provider
                .query(&provider.collection_locator(), args)
                .await
                .map_err(explain(Operation::Query))?;
            print_rows(cursor)?;
        }

        Command::Show { uuid } => {
            let mut cursor = provider
                .query(&provider.item_locator(uuid.as_str()), QueryArgs::all())
                .await
                .map_err(explain(Operation::Query))?;
            let Some(row) = cursor.next() else {
                bail!("no product with uuid {uuid}");
            };
            let product = row
                .to_product()
                .with_context(|| format!("stored product {uuid} is malformed"))?;
            println!("{}", serde_json::to_string_pretty(&row.to_field_set())?);
            println!("photo: {}", product.photo_filename());
        }

        Command::Add {
            title,
            price,
            quantity,
            supplier_name,
            supplier_email,
        } => {
            let product = Product::new();
            let fields = FieldSet::new()
                .with(columns::UUID, product.id().to_string())
                .with(columns::TITLE, title)
                .with(columns::PRICE, price)
                .with(columns::QUANTITY, quantity)
                .with(columns::SUPPLIER_NAME, supplier_name)
                .with(columns::SUPPLIER_EMAIL, supplier_email);

            let created = provider
                .insert(&provider.collection_locator(), fields)
                .await
                .map_err(explain(Operation::Insert))?;
            match created {
                Some(locator) => println!("{} {locator}", product.id()),
                None => bail!(
                    "{} {}",
                    messages.message(stockkeep_infra::MessageKey::InsertFailed),
                    provider.collection_locator()
                ),
            }
        }

        Command::Set { uuid, field, value } => {
            let value = match field.as_str() {
                columns::QUANTITY => value
                    .trim()
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .unwrap_or(FieldValue::Text(value)),
                _ => FieldValue::Text(value),
            };
            let changed = provider
                .update(
                    &provider.item_locator(uuid.as_str()),
                    FieldSet::new().with(field, value),
                    Selection::all(),
                )
                .await
                .map_err(explain(Operation::Update))?;
            println!("{changed} updated");
        }

        Command::Remove { uuid } => {
            let removed = provider
                .delete(&provider.item_locator(uuid.as_str()), Selection::all())
                .await
                .map_err(explain(Operation::Delete))?;
            println!("{removed} removed");
        }

        Command::Type { locator } => {
            let content_type = provider
                .content_type(&Locator::parse(&locator))
                .map_err(explain(Operation::ContentType))?;
            println!("{content_type}");
        }
    }

    Ok(())
}

fn print_rows(cursor: Cursor) -> Result<()> {
    for row in cursor {
        println!("{}", serde_json::to_string(&row.to_field_set())?);
    }
    Ok(())
}
