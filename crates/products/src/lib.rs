//! Products domain module.
//!
//! This crate contains the stock-keeping record, the table contract and the
//! write-path rules, implemented purely as deterministic domain logic (no IO,
//! no storage, no routing).

pub mod contract;
pub mod fields;
pub mod product;
pub mod validation;

pub use fields::{FieldSet, FieldValue};
pub use product::Product;
pub use validation::{
    UpdateCheck, ValidationError, normalize_insert, normalize_update, validate_insert,
    validate_update,
};
