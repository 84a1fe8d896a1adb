//! Shared parameter vocabulary and typed model objects
//!
//! Parameter names used by more than one backend live here; names only a
//! single backend understands stay in that backend's module.

use std::fmt;

/// Custom event parameters
pub mod event {
    pub const EVENT_ID: &str = "eventId";
    pub const EVENT_NAME: &str = "eventName";
}

/// Screen view parameters
pub mod screen {
    pub const SCREEN_NAME: &str = "screenName";
}

/// Cart and purchase parameters
pub mod transaction {
    pub const TRANSACTION_ID: &str = "transactionId";
    pub const TRANSACTION_CURRENCY_CODE: &str = "transactionCurrencyCode";
    pub const TRANSACTION_TOTAL: &str = "transactionTotal";
    pub const TRANSACTION_PRODUCTS: &str = "transactionProducts";
}

/// User identification parameters
pub mod user {
    pub const USER_ID: &str = "userId";
    pub const USER_FACEBOOK_ID: &str = "userFacebookId";
    pub const USER_GOOGLE_ID: &str = "userGoogleId";
}

/// Field names of a line item encoded as a nested map
pub mod item {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const CATEGORY: &str = "category";
    pub const CURRENCY_CODE: &str = "currencyCode";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
}

/// A product entry in a cart or purchase.
///
/// All six fields are required. Hosts push a `LineItem` wrapped in a
/// [`Handle`](crate::bag::Handle), or as a nested map carrying the six
/// fields listed in [`item`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub category: String,
    /// ISO 4217 code (EUR, USD, ...)
    pub currency_code: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        currency_code: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            currency_code: currency_code.into(),
            price,
            quantity,
        }
    }

    /// Price must be a finite, non-negative number.
    pub fn is_well_formed(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Item: id: {}, name: {}, category: {}, currencyCode: {}, price: {}, quantity: {}}}",
            self.id, self.name, self.category, self.currency_code, self.price, self.quantity
        )
    }
}
