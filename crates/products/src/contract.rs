//! Static contract of the products collection: names shared by the router,
//! the validator and the store.

/// Default authority the provider answers for.
pub const CONTENT_AUTHORITY: &str = "com.example.android.stockkeepingassistant";

/// Scheme prefix of fully-qualified locators (`content://...`).
pub const CONTENT_SCHEME: &str = "content";

/// Path segment addressing the products collection.
pub const PATH_PRODUCTS: &str = "products";

/// Backing table.
pub const TABLE_NAME: &str = "products";

/// Content-type prefix for a collection result.
pub const LIST_TYPE_PREFIX: &str = "vnd.stockkeep.dir";

/// Content-type prefix for a single-item result.
pub const ITEM_TYPE_PREFIX: &str = "vnd.stockkeep.item";

/// Column names of the `products` table.
pub mod columns {
    /// Store-assigned surrogate key.
    pub const ID: &str = "_id";
    /// Client-assigned identity, used for item lookups.
    pub const UUID: &str = "uuid";
    pub const TITLE: &str = "title";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const SUPPLIER_NAME: &str = "supplier_name";
    pub const SUPPLIER_EMAIL: &str = "supplier_email";
}

/// Every column, in table order.
pub const ALL_COLUMNS: [&str; 7] = [
    columns::ID,
    columns::UUID,
    columns::TITLE,
    columns::PRICE,
    columns::QUANTITY,
    columns::SUPPLIER_NAME,
    columns::SUPPLIER_EMAIL,
];

/// Columns a caller may change after creation.
pub const MUTABLE_COLUMNS: [&str; 5] = [
    columns::TITLE,
    columns::QUANTITY,
    columns::PRICE,
    columns::SUPPLIER_NAME,
    columns::SUPPLIER_EMAIL,
];

pub fn is_known_column(name: &str) -> bool {
    ALL_COLUMNS.contains(&name)
}

/// `vnd.stockkeep.dir/{authority}/products`
pub fn list_content_type(authority: &str) -> String {
    format!("{LIST_TYPE_PREFIX}/{authority}/{PATH_PRODUCTS}")
}

/// `vnd.stockkeep.item/{authority}/products`
pub fn item_content_type(authority: &str) -> String {
    format!("{ITEM_TYPE_PREFIX}/{authority}/{PATH_PRODUCTS}")
}
