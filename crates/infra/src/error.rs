use thiserror::Error;

use stockkeep_products::ValidationError;

use crate::messages::{MessageKey, MessageProvider, Operation};
use crate::store::StoreError;

/// Gateway failure.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The locator does not address anything this gateway serves, or addresses
    /// it in a shape the operation does not accept.
    #[error("{operation} not supported for {locator}")]
    UnknownLocator {
        operation: Operation,
        locator: String,
    },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ProviderError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ProviderError::Validation(_))
    }

    /// Wording for this error from `messages`.
    ///
    /// `operation` picks between insert and update wording for validation
    /// failures; the other variants carry enough context on their own.
    pub fn describe(&self, operation: Operation, messages: &dyn MessageProvider) -> String {
        match self {
            ProviderError::UnknownLocator { operation, locator } => {
                format!("{} {locator}", messages.message(MessageKey::UnknownLocator(*operation)))
            }
            ProviderError::Validation(err) => {
                messages.message(MessageKey::Rejected(operation, *err)).into_owned()
            }
            ProviderError::Store(err) => err.to_string(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
