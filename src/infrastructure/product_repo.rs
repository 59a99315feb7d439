use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{ListResult, ProductRepository};
use crate::domain::product::{NewProduct, Product};
use crate::schema::{order_products, products};

use super::models::{NewProductRow, ProductRow};
use super::order_repo::refresh_total;

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_row(product: NewProduct) -> NewProductRow {
    NewProductRow {
        name: product.name,
        price: product.price,
    }
}

/// Ids of every order currently linked to `product_id`.
fn orders_holding(conn: &mut PgConnection, product_id: i64) -> QueryResult<Vec<i64>> {
    order_products::table
        .filter(order_products::product_id.eq(product_id))
        .select(order_products::order_id)
        .load(conn)
}

impl ProductRepository for DieselProductRepository {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .select(ProductRow::as_select())
            .order((products::name.asc(), products::id.asc()))
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_page(&self, offset: i64, limit: i64) -> Result<ListResult<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = products::table.count().get_result(conn)?;

            let rows = products::table
                .select(ProductRow::as_select())
                .order((products::name.asc(), products::id.asc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows.into_iter().map(Product::from).collect(),
                total,
            })
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&to_row(product))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;

        log::info!("Created product '{}' (id {})", row.name, row.id);
        Ok(row.into())
    }

    fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::update(products::table.find(id))
                .set(&to_row(product))
                .returning(ProductRow::as_returning())
                .get_result(conn)
                .optional()?;

            let Some(row) = row else {
                return Ok(None);
            };

            let affected = orders_holding(conn, id)?;
            for order_id in &affected {
                refresh_total(conn, *order_id)?;
            }

            log::info!(
                "Updated product '{}' (id {}), re-totalled {} order(s)",
                row.name,
                row.id,
                affected.len()
            );
            Ok(Some(row.into()))
        })
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let affected = orders_holding(conn, id)?;

            // Links go with the product through ON DELETE CASCADE.
            let deleted = diesel::delete(products::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Ok(false);
            }

            for order_id in &affected {
                refresh_total(conn, *order_id)?;
            }

            log::info!(
                "Deleted product id {}, re-totalled {} order(s)",
                id,
                affected.len()
            );
            Ok(true)
        })
    }

    fn get_or_create(&self, product: NewProduct) -> Result<(Product, bool), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let existing = products::table
                .filter(products::name.eq(&product.name))
                .filter(products::price.eq(&product.price))
                .select(ProductRow::as_select())
                .first(conn)
                .optional()?;

            if let Some(row) = existing {
                return Ok((row.into(), false));
            }

            let row = diesel::insert_into(products::table)
                .values(&to_row(product))
                .returning(ProductRow::as_returning())
                .get_result(conn)?;

            log::info!("Created product '{}' (id {})", row.name, row.id);
            Ok((row.into(), true))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::DieselProductRepository;
    use crate::domain::order::{OrderDraft, OrderStatus};
    use crate::domain::ports::{OrderRepository, ProductRepository, TableRepository};
    use crate::domain::product::NewProduct;
    use crate::infrastructure::test_db::setup_db;
    use crate::infrastructure::{DieselOrderRepository, DieselTableRepository};

    fn product(name: &str, price: &str) -> NewProduct {
        NewProduct::new(name, BigDecimal::from_str(price).expect("valid decimal"))
    }

    #[tokio::test]
    async fn list_page_orders_by_name_and_counts_all() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        repo.create(product("Чай", "100.00")).expect("create failed");
        repo.create(product("Кофе", "150.00")).expect("create failed");
        repo.create(product("Борщ", "300.00")).expect("create failed");

        let page = repo.list_page(0, 2).expect("list failed");
        assert_eq!(page.total, 3);
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Борщ", "Кофе"]);
    }

    #[tokio::test]
    async fn price_change_and_delete_retotal_orders() {
        let (_container, pool) = setup_db().await;
        let tables = DieselTableRepository::new(pool.clone());
        let products = DieselProductRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool);

        let (table, _) = tables.get_or_create(1).expect("table failed");
        let tea = products.create(product("Чай", "100.00")).expect("create failed");
        let coffee = products.create(product("Кофе", "150.00")).expect("create failed");
        let order = orders
            .create(OrderDraft {
                table_id: table.id,
                product_ids: vec![tea.id, coffee.id],
                status: OrderStatus::Waiting,
            })
            .expect("order failed");
        assert_eq!(order.total_price_text(), "250.00");

        products
            .update(tea.id, product("Чай", "120.00"))
            .expect("update failed")
            .expect("product should exist");
        let order = orders.find_by_id(order.id).expect("find failed").expect("order");
        assert_eq!(order.total_price_text(), "270.00");

        assert!(products.delete(coffee.id).expect("delete failed"));
        let order = orders.find_by_id(order.id).expect("find failed").expect("order");
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.total_price_text(), "120.00");
    }

    #[tokio::test]
    async fn get_or_create_matches_name_and_price() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        let (_, created) = repo.get_or_create(product("Борщ", "300.00")).expect("seed failed");
        assert!(created);
        let (_, created) = repo.get_or_create(product("Борщ", "300.00")).expect("seed failed");
        assert!(!created);
        let (_, created) = repo.get_or_create(product("Борщ", "320.00")).expect("seed failed");
        assert!(created);
    }
}
