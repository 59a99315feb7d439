use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};

use super::product::{format_price, Product, PRICE_SCALE};
use super::table::Table;

/// Where an order stands. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Waiting,
    Ready,
    Paid,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [OrderStatus::Waiting, OrderStatus::Ready, OrderStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Waiting => "waiting",
            OrderStatus::Ready => "ready",
            OrderStatus::Paid => "paid",
        }
    }

    /// Human-readable label shown on the order pages.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Waiting => "В ожидании",
            OrderStatus::Ready => "Готово",
            OrderStatus::Paid => "Оплачено",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// An order with its table and products resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub table: Table,
    pub products: Vec<Product>,
    pub total_price: BigDecimal,
    pub status: OrderStatus,
    pub archived: bool,
}

impl Order {
    pub fn total_price_text(&self) -> String {
        format_price(&self.total_price)
    }
}

/// Validated input shared by the create and update flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub table_id: i64,
    pub product_ids: Vec<i64>,
    pub status: OrderStatus,
}

/// Sum of the given prices at price scale. An empty set totals zero.
pub fn total_price<'a, I>(prices: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    prices
        .into_iter()
        .fold(BigDecimal::zero(), |acc, price| acc + price)
        .with_scale(PRICE_SCALE)
}
