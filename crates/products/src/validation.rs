//! Write-path rules applied before any insert or update reaches the store.
//!
//! Insert checks every required column in a fixed order and reports the first
//! violation. Update checks only the first mutable column present in the set
//! (title, quantity, price, supplier name, supplier email); any column after
//! it goes unchecked. That single-branch policy is long-standing behaviour and
//! callers rely on its exact error ordering, so it is kept as is.

use stockkeep_core::{Decimal, Price};
use thiserror::Error;

use crate::contract::columns;
use crate::fields::{FieldSet, FieldValue};

/// A write was rejected before touching the store.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("record has no identity (uuid missing or empty)")]
    MissingIdentity,

    #[error("record requires a title")]
    MissingTitle,

    #[error("record requires a non-negative quantity")]
    InvalidQuantity,

    #[error("record requires a price")]
    MissingPrice,

    #[error("record requires a supplier name")]
    MissingSupplier,

    #[error("record requires a supplier contact email")]
    MissingSupplierContact,
}

/// Outcome of update validation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCheck {
    /// Nothing to write; the update affects zero rows without touching the store.
    NoOp,
    Proceed,
}

fn has_text(fields: &FieldSet, key: &str) -> bool {
    fields.text(key).is_some_and(|v| !v.is_empty())
}

fn has_count(fields: &FieldSet, key: &str) -> bool {
    fields.integer(key).is_some_and(|q| q >= 0)
}

fn has_price(fields: &FieldSet, key: &str) -> bool {
    fields
        .text(key)
        .is_some_and(|v| !v.trim().is_empty() && Price::parse(&v).is_ok())
}

fn check(ok: bool, err: ValidationError) -> Result<(), ValidationError> {
    if ok { Ok(()) } else { Err(err) }
}

/// Create-path rules. First violation wins.
pub fn validate_insert(fields: &FieldSet) -> Result<(), ValidationError> {
    check(has_text(fields, columns::UUID), ValidationError::MissingIdentity)?;
    check(has_text(fields, columns::TITLE), ValidationError::MissingTitle)?;
    check(has_count(fields, columns::QUANTITY), ValidationError::InvalidQuantity)?;
    check(has_price(fields, columns::PRICE), ValidationError::MissingPrice)?;
    check(has_text(fields, columns::SUPPLIER_NAME), ValidationError::MissingSupplier)?;
    check(
        has_text(fields, columns::SUPPLIER_EMAIL),
        ValidationError::MissingSupplierContact,
    )?;
    Ok(())
}

/// Update-path rules.
///
/// An empty set is a [`UpdateCheck::NoOp`], not an error. Otherwise only the
/// first mutable column present is validated.
pub fn validate_update(fields: &FieldSet) -> Result<UpdateCheck, ValidationError> {
    if fields.is_empty() {
        return Ok(UpdateCheck::NoOp);
    }

    if fields.contains_key(columns::TITLE) {
        check(has_text(fields, columns::TITLE), ValidationError::MissingTitle)?;
    } else if fields.contains_key(columns::QUANTITY) {
        check(has_count(fields, columns::QUANTITY), ValidationError::InvalidQuantity)?;
    } else if fields.contains_key(columns::PRICE) {
        check(has_price(fields, columns::PRICE), ValidationError::MissingPrice)?;
    } else if fields.contains_key(columns::SUPPLIER_NAME) {
        check(has_text(fields, columns::SUPPLIER_NAME), ValidationError::MissingSupplier)?;
    } else if fields.contains_key(columns::SUPPLIER_EMAIL) {
        check(
            has_text(fields, columns::SUPPLIER_EMAIL),
            ValidationError::MissingSupplierContact,
        )?;
    }

    Ok(UpdateCheck::Proceed)
}

/// Canonicalise a validated insert set: price rendered with two decimals.
pub fn normalize_insert(fields: &mut FieldSet) {
    normalize_price(fields);
}

/// Canonicalise a validated update set before it is written.
///
/// Identity columns are dropped (a record's identity never changes), and an
/// exactly-zero price is dropped so the stored price is kept. A non-zero price
/// that merely rounds to `0.00` is written.
/// Returns [`UpdateCheck::NoOp`] when nothing is left to write.
pub fn normalize_update(fields: &mut FieldSet) -> UpdateCheck {
    fields.remove(columns::ID);
    fields.remove(columns::UUID);

    let zero_price = fields
        .text(columns::PRICE)
        .and_then(|p| p.trim().parse::<Decimal>().ok())
        .is_some_and(|p| p.is_zero());
    if zero_price {
        fields.remove(columns::PRICE);
    }
    normalize_price(fields);

    if fields.is_empty() {
        UpdateCheck::NoOp
    } else {
        UpdateCheck::Proceed
    }
}

// Unparsable prices are left untouched; only an unchecked update column can get here.
fn normalize_price(fields: &mut FieldSet) {
    let normalized = fields
        .text(columns::PRICE)
        .and_then(|p| Price::parse(&p).ok());
    if let Some(price) = normalized {
        fields.put(columns::PRICE, FieldValue::from(price));
    }
}
