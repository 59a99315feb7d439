use super::errors::DomainError;
use super::order::{Order, OrderDraft};
use super::product::{NewProduct, Product};
use super::table::Table;

/// One page of a larger result set together with the size of the whole set.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}

pub trait TableRepository: Send + Sync + 'static {
    /// All tables ordered by number.
    fn list(&self) -> Result<Vec<Table>, DomainError>;
    /// Returns the table with `number`, inserting it first if needed.
    /// The flag is `true` when the table was inserted.
    fn get_or_create(&self, number: i32) -> Result<(Table, bool), DomainError>;
    /// Removes the table together with every order placed at it.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    /// All products ordered by name.
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn list_page(&self, offset: i64, limit: i64) -> Result<ListResult<Product>, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Replaces name and price and re-totals every order holding the product.
    fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, DomainError>;
    /// Deletes the product and re-totals the orders it was removed from.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
    /// Matches on both name and price.
    fn get_or_create(&self, product: NewProduct) -> Result<(Product, bool), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Inserts the order, links its products and stores the computed total.
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError>;
    /// Rewrites table, status and product set, then recomputes the total.
    fn update(&self, id: i64, draft: OrderDraft) -> Result<Option<Order>, DomainError>;
    /// Looks up an order whether or not it is archived.
    fn find_by_id(&self, id: i64) -> Result<Option<Order>, DomainError>;
    /// Orders that have not been archived, oldest first.
    fn list_active(&self) -> Result<Vec<Order>, DomainError>;
    /// Flags the order as archived. Returns `false` if it does not exist.
    fn archive(&self, id: i64) -> Result<bool, DomainError>;
}
