use bigdecimal::{BigDecimal, Zero};
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::{Product, PRICE_SCALE};
use crate::domain::table::Table;
use crate::schema::{dining_tables, order_products, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = dining_tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableRow {
    pub id: i64,
    pub number: i32,
    pub is_occupied: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = dining_tables)]
pub struct NewTableRow {
    pub number: i32,
}

impl From<TableRow> for Table {
    fn from(row: TableRow) -> Self {
        Table {
            id: row.id,
            number: row.number,
            is_occupied: row.is_occupied,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub price: BigDecimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price.with_scale(PRICE_SCALE),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub table_id: i64,
    pub total_price: Option<BigDecimal>,
    pub status: String,
    pub archived: bool,
}

impl OrderRow {
    /// Assembles the domain order from this row and its already-loaded relations.
    pub fn into_order(self, table: TableRow, products: Vec<Product>) -> Result<Order, DomainError> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e: crate::domain::order::UnknownStatus| DomainError::Internal(e.to_string()))?;
        Ok(Order {
            id: self.id,
            table: table.into(),
            products,
            total_price: self
                .total_price
                .unwrap_or_else(BigDecimal::zero)
                .with_scale(PRICE_SCALE),
            status,
            archived: self.archived,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub table_id: i64,
    pub status: String,
    pub total_price: Option<BigDecimal>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub table_id: i64,
    pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_products)]
pub struct OrderProductRow {
    pub order_id: i64,
    pub product_id: i64,
}
