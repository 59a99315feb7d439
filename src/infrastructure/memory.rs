//! Process-local repositories backed by a mutex-guarded map set.
//!
//! Mirrors the relational adapter closely enough for handler tests: unique
//! table numbers, name ordering for products, cascading deletes and totals
//! recomputed on every association or price change.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::order::{total_price, Order, OrderDraft, OrderStatus};
use crate::domain::ports::{ListResult, OrderRepository, ProductRepository, TableRepository};
use crate::domain::product::{NewProduct, Product};
use crate::domain::table::Table;

#[derive(Debug, Clone)]
struct OrderRecord {
    table_id: i64,
    product_ids: Vec<i64>,
    total_price: BigDecimal,
    status: OrderStatus,
    archived: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    tables: BTreeMap<i64, Table>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, OrderRecord>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn sorted_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        products
    }

    fn retotal(&mut self, order_id: i64) {
        let products = &self.products;
        if let Some(record) = self.orders.get_mut(&order_id) {
            let prices: Vec<&BigDecimal> = record
                .product_ids
                .iter()
                .filter_map(|id| products.get(id).map(|p| &p.price))
                .collect();
            record.total_price = total_price(prices);
        }
    }

    fn check_references(&self, draft: &OrderDraft) -> Result<(), DomainError> {
        if !self.tables.contains_key(&draft.table_id) {
            return Err(DomainError::InvalidInput(format!(
                "table {} does not exist",
                draft.table_id
            )));
        }
        if let Some(missing) = draft
            .product_ids
            .iter()
            .find(|id| !self.products.contains_key(*id))
        {
            return Err(DomainError::InvalidInput(format!(
                "product {} does not exist",
                missing
            )));
        }
        Ok(())
    }

    fn materialise(&self, id: i64, record: &OrderRecord) -> Result<Order, DomainError> {
        let table = self
            .tables
            .get(&record.table_id)
            .cloned()
            .ok_or_else(|| DomainError::Internal(format!("order {} lost its table", id)))?;
        let mut products: Vec<Product> = record
            .product_ids
            .iter()
            .filter_map(|pid| self.products.get(pid).cloned())
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Order {
            id,
            table,
            products,
            total_price: record.total_price.clone(),
            status: record.status,
            archived: record.archived,
        })
    }
}

fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
    }

    /// Seeds a table with an explicit occupancy flag.
    pub fn insert_table(&self, number: i32, is_occupied: bool) -> Result<Table, DomainError> {
        let mut state = self.lock()?;
        if state.tables.values().any(|t| t.number == number) {
            return Err(DomainError::InvalidInput(format!(
                "table number {} already exists",
                number
            )));
        }
        let id = state.allocate_id();
        let table = Table {
            id,
            number,
            is_occupied,
        };
        state.tables.insert(id, table.clone());
        Ok(table)
    }
}

impl TableRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Table>, DomainError> {
        let state = self.lock()?;
        let mut tables: Vec<Table> = state.tables.values().cloned().collect();
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    fn get_or_create(&self, number: i32) -> Result<(Table, bool), DomainError> {
        let mut state = self.lock()?;
        if let Some(existing) = state.tables.values().find(|t| t.number == number) {
            return Ok((existing.clone(), false));
        }
        let id = state.allocate_id();
        let table = Table {
            id,
            number,
            is_occupied: false,
        };
        state.tables.insert(id, table.clone());
        Ok((table, true))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        if state.tables.remove(&id).is_none() {
            return Ok(false);
        }
        state.orders.retain(|_, record| record.table_id != id);
        Ok(true)
    }
}

impl ProductRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.lock()?.sorted_products())
    }

    fn list_page(&self, offset: i64, limit: i64) -> Result<ListResult<Product>, DomainError> {
        let products = self.lock()?.sorted_products();
        let total = i64::try_from(products.len())
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(ListResult {
            items: products.into_iter().skip(skip).take(take).collect(),
            total,
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut state = self.lock()?;
        let id = state.allocate_id();
        let product = Product {
            id,
            name: product.name,
            price: product.price,
        };
        state.products.insert(id, product.clone());
        Ok(product)
    }

    fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, DomainError> {
        let mut state = self.lock()?;
        let Some(stored) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        stored.name = product.name;
        stored.price = product.price;
        let updated = stored.clone();

        let affected: Vec<i64> = state
            .orders
            .iter()
            .filter(|(_, record)| record.product_ids.contains(&id))
            .map(|(order_id, _)| *order_id)
            .collect();
        for order_id in affected {
            state.retotal(order_id);
        }
        Ok(Some(updated))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        if state.products.remove(&id).is_none() {
            return Ok(false);
        }
        let mut affected = Vec::new();
        for (order_id, record) in state.orders.iter_mut() {
            if record.product_ids.contains(&id) {
                record.product_ids.retain(|pid| *pid != id);
                affected.push(*order_id);
            }
        }
        for order_id in affected {
            state.retotal(order_id);
        }
        Ok(true)
    }

    fn get_or_create(&self, product: NewProduct) -> Result<(Product, bool), DomainError> {
        let mut state = self.lock()?;
        if let Some(existing) = state
            .products
            .values()
            .find(|p| p.name == product.name && p.price == product.price)
        {
            return Ok((existing.clone(), false));
        }
        let id = state.allocate_id();
        let created = Product {
            id,
            name: product.name,
            price: product.price,
        };
        state.products.insert(id, created.clone());
        Ok((created, true))
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let mut state = self.lock()?;
        state.check_references(&draft)?;

        let id = state.allocate_id();
        state.orders.insert(
            id,
            OrderRecord {
                table_id: draft.table_id,
                product_ids: unique_ids(&draft.product_ids),
                total_price: total_price(std::iter::empty()),
                status: draft.status,
                archived: false,
            },
        );
        state.retotal(id);

        let record = state.orders.get(&id).cloned().ok_or(DomainError::NotFound)?;
        state.materialise(id, &record)
    }

    fn update(&self, id: i64, draft: OrderDraft) -> Result<Option<Order>, DomainError> {
        let mut state = self.lock()?;
        if !state.orders.contains_key(&id) {
            return Ok(None);
        }
        state.check_references(&draft)?;

        if let Some(record) = state.orders.get_mut(&id) {
            record.table_id = draft.table_id;
            record.product_ids = unique_ids(&draft.product_ids);
            record.status = draft.status;
        }
        state.retotal(id);

        let record = state.orders.get(&id).cloned().ok_or(DomainError::NotFound)?;
        state.materialise(id, &record).map(Some)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Order>, DomainError> {
        let state = self.lock()?;
        state
            .orders
            .get(&id)
            .map(|record| state.materialise(id, record))
            .transpose()
    }

    fn list_active(&self) -> Result<Vec<Order>, DomainError> {
        let state = self.lock()?;
        state
            .orders
            .iter()
            .filter(|(_, record)| !record.archived)
            .map(|(id, record)| state.materialise(*id, record))
            .collect()
    }

    fn archive(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        match state.orders.get_mut(&id) {
            Some(record) => {
                record.archived = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::{fixture, rstest};

    use super::*;

    fn price(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    struct Seeded {
        store: InMemoryStore,
        table: Table,
        coffee: Product,
        tea: Product,
    }

    #[fixture]
    fn seeded() -> Seeded {
        let store = InMemoryStore::new();
        let table = store.insert_table(1, true).expect("table");
        let coffee = ProductRepository::create(&store, NewProduct::new("Кофе", price("150.00")))
            .expect("coffee");
        let tea =
            ProductRepository::create(&store, NewProduct::new("Чай", price("100.00"))).expect("tea");
        Seeded {
            store,
            table,
            coffee,
            tea,
        }
    }

    fn draft(seeded: &Seeded, product_ids: Vec<i64>) -> OrderDraft {
        OrderDraft {
            table_id: seeded.table.id,
            product_ids,
            status: OrderStatus::Waiting,
        }
    }

    #[rstest]
    fn create_totals_the_linked_products(seeded: Seeded) {
        let order = OrderRepository::create(
            &seeded.store,
            draft(&seeded, vec![seeded.tea.id, seeded.coffee.id]),
        )
        .expect("create");

        assert_eq!(order.total_price, price("250.00"));
        let names: Vec<&str> = order.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Кофе", "Чай"]);
    }

    #[rstest]
    fn create_rejects_unknown_table(seeded: Seeded) {
        let mut bad = draft(&seeded, vec![seeded.tea.id]);
        bad.table_id = 4242;
        let err = OrderRepository::create(&seeded.store, bad).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[rstest]
    fn product_delete_retotals_orders(seeded: Seeded) {
        let order = OrderRepository::create(
            &seeded.store,
            draft(&seeded, vec![seeded.tea.id, seeded.coffee.id]),
        )
        .expect("create");

        assert!(ProductRepository::delete(&seeded.store, seeded.coffee.id).expect("delete"));

        let order = OrderRepository::find_by_id(&seeded.store, order.id)
            .expect("find")
            .expect("order");
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.total_price, price("100.00"));
    }

    #[rstest]
    fn table_delete_cascades(seeded: Seeded) {
        let order = OrderRepository::create(&seeded.store, draft(&seeded, vec![seeded.tea.id]))
            .expect("create");

        assert!(TableRepository::delete(&seeded.store, seeded.table.id).expect("delete"));
        assert!(OrderRepository::find_by_id(&seeded.store, order.id)
            .expect("find")
            .is_none());
    }

    #[rstest]
    fn list_page_slices_in_name_order(seeded: Seeded) {
        let page = seeded.store.list_page(1, 10).expect("page");
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Чай");
    }
}
