//! Infrastructure layer: locator routing, the SQLite store, and the gateway
//! that ties them to validation and change notifications.

pub mod config;
pub mod cursor;
pub mod error;
pub mod locator;
pub mod messages;
pub mod provider;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::ProviderConfig;
pub use cursor::{Cursor, Row};
pub use error::{ProviderError, ProviderResult};
pub use locator::{Locator, LocatorMatch, LocatorMatcher};
pub use messages::{DefaultMessages, MessageKey, MessageProvider, Operation};
pub use provider::{ProductProvider, QueryArgs};
pub use store::{ProductStore, Selection, SqliteProductStore, StoreError};
