use std::fmt;

use bigdecimal::BigDecimal;

/// Number of fraction digits every stored price carries.
pub const PRICE_SCALE: i64 = 2;

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
}

impl Product {
    /// Price rendered with exactly two fraction digits, e.g. `"150.00"`.
    pub fn price_text(&self) -> String {
        format_price(&self.price)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} руб.", self.name, self.price_text())
    }
}

/// Validated field values for inserting or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: BigDecimal) -> Self {
        Self {
            name: name.into(),
            price: price.with_scale(PRICE_SCALE),
        }
    }
}

pub fn format_price(price: &BigDecimal) -> String {
    price.with_scale(PRICE_SCALE).to_string()
}
