//! Human-readable text for log entries and error descriptions.
//!
//! The gateway never hard-codes user-facing wording; it asks an injected
//! [`MessageProvider`], so an application can supply localized text.

use std::borrow::Cow;

use stockkeep_products::ValidationError;

/// Gateway operation, used to pick wording and to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Delete,
    ContentType,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Operation::Query => "query",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ContentType => "content type",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Locator did not match a known shape for the operation.
    UnknownLocator(Operation),
    /// Store refused a row that passed validation.
    InsertFailed,
    /// Publishing a change notification failed.
    NotificationFailed,
    /// A write was rejected by validation.
    Rejected(Operation, ValidationError),
}

/// Message lookup collaborator.
pub trait MessageProvider: Send + Sync {
    fn message(&self, key: MessageKey) -> Cow<'static, str>;
}

/// Built-in English catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageProvider for DefaultMessages {
    fn message(&self, key: MessageKey) -> Cow<'static, str> {
        let text = match key {
            MessageKey::UnknownLocator(Operation::Query) => "Cannot query unknown locator",
            MessageKey::UnknownLocator(Operation::Insert) => "Insertion is not supported for",
            MessageKey::UnknownLocator(Operation::Update) => "Update is not supported for",
            MessageKey::UnknownLocator(Operation::Delete) => "Deletion is not supported for",
            MessageKey::UnknownLocator(Operation::ContentType) => "Unknown content type for",
            MessageKey::InsertFailed => "Failed to insert row for",
            MessageKey::NotificationFailed => "Failed to publish change notification for",
            MessageKey::Rejected(op, err) => return Cow::Owned(rejection(op, err)),
        };
        Cow::Borrowed(text)
    }
}

fn rejection(op: Operation, err: ValidationError) -> String {
    let verb = match op {
        Operation::Update => "Updated product",
        _ => "Product",
    };
    let need = match err {
        ValidationError::MissingIdentity => "an identity",
        ValidationError::MissingTitle => "a name",
        ValidationError::InvalidQuantity => "a valid quantity",
        ValidationError::MissingPrice => "a price",
        ValidationError::MissingSupplier => "a supplier",
        ValidationError::MissingSupplierContact => "a supplier contact email",
    };
    format!("{verb} requires {need}")
}

impl<M> MessageProvider for std::sync::Arc<M>
where
    M: MessageProvider + ?Sized,
{
    fn message(&self, key: MessageKey) -> Cow<'static, str> {
        (**self).message(key)
    }
}
