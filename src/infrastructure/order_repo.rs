use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{total_price, Order, OrderDraft};
use crate::domain::ports::OrderRepository;
use crate::domain::product::Product;
use crate::schema::{dining_tables, order_products, orders, products};

use super::models::{
    NewOrderRow, OrderChangeset, OrderProductRow, OrderRow, ProductRow, TableRow,
};

/// Recomputes and stores the total of one order from its linked products.
pub(crate) fn refresh_total(conn: &mut PgConnection, order_id: i64) -> QueryResult<BigDecimal> {
    let prices: Vec<BigDecimal> = order_products::table
        .inner_join(products::table)
        .filter(order_products::order_id.eq(order_id))
        .select(products::price)
        .load(conn)?;

    let total = total_price(&prices);
    diesel::update(orders::table.find(order_id))
        .set(orders::total_price.eq(Some(total.clone())))
        .execute(conn)?;
    Ok(total)
}

fn link_products(conn: &mut PgConnection, order_id: i64, product_ids: &[i64]) -> QueryResult<usize> {
    let mut ids = product_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let links: Vec<OrderProductRow> = ids
        .into_iter()
        .map(|product_id| OrderProductRow {
            order_id,
            product_id,
        })
        .collect();
    diesel::insert_into(order_products::table)
        .values(&links)
        .execute(conn)
}

/// Loads products for every order in `rows` with one query and assembles them.
fn assemble(
    conn: &mut PgConnection,
    rows: Vec<(OrderRow, TableRow)>,
) -> Result<Vec<Order>, DomainError> {
    let ids: Vec<i64> = rows.iter().map(|(order, _)| order.id).collect();

    let links: Vec<(i64, ProductRow)> = order_products::table
        .inner_join(products::table)
        .filter(order_products::order_id.eq_any(&ids))
        .order((products::name.asc(), products::id.asc()))
        .select((order_products::order_id, ProductRow::as_select()))
        .load(conn)?;

    let mut by_order: HashMap<i64, Vec<Product>> = HashMap::new();
    for (order_id, product) in links {
        by_order.entry(order_id).or_default().push(product.into());
    }

    rows.into_iter()
        .map(|(order, table)| {
            let products = by_order.remove(&order.id).unwrap_or_default();
            order.into_order(table, products)
        })
        .collect()
}

fn load_one(conn: &mut PgConnection, id: i64) -> Result<Option<Order>, DomainError> {
    let row = orders::table
        .inner_join(dining_tables::table)
        .filter(orders::id.eq(id))
        .select((OrderRow::as_select(), TableRow::as_select()))
        .first::<(OrderRow, TableRow)>(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![row])?.pop())
}

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order to obtain its id
            let order_id: i64 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    table_id: draft.table_id,
                    status: draft.status.as_str().to_string(),
                    total_price: Some(total_price(std::iter::empty())),
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 2. Link the products
            link_products(conn, order_id, &draft.product_ids)?;

            // 3. Store the total of what was linked
            let total = refresh_total(conn, order_id)?;
            log::info!(
                "Created order {} for table id {} ({} product(s), total {})",
                order_id,
                draft.table_id,
                draft.product_ids.len(),
                total
            );

            load_one(conn, order_id)?.ok_or(DomainError::NotFound)
        })
    }

    fn update(&self, id: i64, draft: OrderDraft) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(orders::table.find(id))
                .set(&OrderChangeset {
                    table_id: draft.table_id,
                    status: draft.status.as_str().to_string(),
                })
                .execute(conn)?;
            if updated == 0 {
                return Ok(None);
            }

            diesel::delete(order_products::table.filter(order_products::order_id.eq(id)))
                .execute(conn)?;
            link_products(conn, id, &draft.product_ids)?;
            let total = refresh_total(conn, id)?;
            log::info!("Updated order {} (status {}, total {})", id, draft.status, total);

            load_one(conn, id)
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        load_one(&mut conn, id)
    }

    fn list_active(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = orders::table
                .inner_join(dining_tables::table)
                .filter(orders::archived.eq(false))
                .order(orders::id.asc())
                .select((OrderRow::as_select(), TableRow::as_select()))
                .load::<(OrderRow, TableRow)>(conn)?;

            assemble(conn, rows)
        })
    }

    fn archive(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.find(id))
            .set(orders::archived.eq(true))
            .execute(&mut conn)?;
        if updated > 0 {
            log::info!("Archived order {}", id);
        }
        Ok(updated > 0)
    }
}
