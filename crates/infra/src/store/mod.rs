//! Relational backend boundary.
//!
//! The gateway talks to a [`ProductStore`]; [`SqliteProductStore`] is the
//! embedded implementation. Every call is a single statement.

pub mod sqlite;
pub mod r#trait;

pub use r#trait::{ProductStore, Selection, StoreError};
pub use sqlite::SqliteProductStore;
