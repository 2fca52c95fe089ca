use stockkeep_core::{Decimal, DomainError, DomainResult, Entity, Price, ProductUuid};

use crate::contract::columns;
use crate::fields::FieldSet;

/// One stock-keeping record as the client holds it.
///
/// A `Product` is built client-side with a fresh [`ProductUuid`] before it is
/// ever written; the store never assigns this identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductUuid,
    title: String,
    quantity: u32,
    price: Price,
    supplier_name: Option<String>,
    supplier_email: String,
}

impl Product {
    /// New record with a random identity.
    pub fn new() -> Self {
        Self::with_id(ProductUuid::new())
    }

    /// New record with the given identity, quantity 1 and price `0.00`.
    pub fn with_id(id: ProductUuid) -> Self {
        Self {
            id,
            title: String::new(),
            quantity: 1,
            price: Price::zero(),
            supplier_name: None,
            supplier_email: String::new(),
        }
    }

    /// File name of the record's photo: `IMG_{id}.jpg`.
    pub fn photo_filename(&self) -> String {
        format!("IMG_{}.jpg", self.id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Set the price, normalized to two decimals.
    ///
    /// An exactly-zero amount is ignored and the previous price is kept; any
    /// other amount is stored rounded, even when it rounds to `0.00`.
    pub fn set_price(&mut self, amount: Decimal) -> DomainResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        self.price = Price::new(amount)?;
        Ok(())
    }

    pub fn supplier_name(&self) -> Option<&str> {
        self.supplier_name.as_deref()
    }

    pub fn set_supplier_name(&mut self, supplier_name: impl Into<String>) {
        self.supplier_name = Some(supplier_name.into());
    }

    pub fn supplier_email(&self) -> &str {
        &self.supplier_email
    }

    pub fn set_supplier_email(&mut self, supplier_email: impl Into<String>) {
        self.supplier_email = supplier_email.into();
    }

    /// Field set for inserting this record.
    pub fn to_field_set(&self) -> FieldSet {
        FieldSet::new()
            .with(columns::UUID, self.id.to_string())
            .with(columns::TITLE, self.title.as_str())
            .with(columns::QUANTITY, self.quantity)
            .with(columns::PRICE, self.price)
            .with(columns::SUPPLIER_NAME, self.supplier_name.clone())
            .with(columns::SUPPLIER_EMAIL, self.supplier_email.as_str())
    }

    /// Rebuild a record from stored column values.
    ///
    /// `uuid` is required; missing optional columns fall back to the
    /// construction defaults.
    pub fn from_fields(fields: &FieldSet) -> DomainResult<Self> {
        let id = fields
            .text(columns::UUID)
            .ok_or_else(|| DomainError::invalid_id("record has no uuid"))?
            .parse::<ProductUuid>()?;

        let mut product = Self::with_id(id);

        if let Some(title) = fields.text(columns::TITLE) {
            product.title = title;
        }
        if let Some(raw) = fields.get(columns::QUANTITY).filter(|v| !v.is_null()) {
            let quantity = raw
                .as_integer()
                .and_then(|q| u32::try_from(q).ok())
                .ok_or_else(|| {
                    DomainError::validation(format!("stored quantity {raw:?} is not a count"))
                })?;
            product.quantity = quantity;
        }
        if let Some(price) = fields.text(columns::PRICE) {
            product.price = Price::parse(&price)?;
        }
        product.supplier_name = fields.text(columns::SUPPLIER_NAME);
        if let Some(email) = fields.text(columns::SUPPLIER_EMAIL) {
            product.supplier_email = email;
        }

        Ok(product)
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Product {
    type Id = ProductUuid;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
