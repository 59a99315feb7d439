//! Idempotent loaders for the starter dining room and menu.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, TableRepository};
use crate::domain::product::NewProduct;

pub const TABLE_NUMBERS: std::ops::RangeInclusive<i32> = 1..=20;

pub const STARTER_MENU: [(&str, &str); 6] = [
    ("Пицца Маргарита", "450.00"),
    ("Пицца Пепперони", "500.00"),
    ("Салат Цезарь", "350.00"),
    ("Борщ", "300.00"),
    ("Чай", "100.00"),
    ("Кофе", "150.00"),
];

/// What a loader did with one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(String),
    AlreadyExists(String),
}

impl SeedOutcome {
    fn new(created: bool, label: String) -> Self {
        if created {
            SeedOutcome::Created(label)
        } else {
            SeedOutcome::AlreadyExists(label)
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SeedOutcome::Created(_))
    }
}

/// Console lines a loader prints around its outcomes.
#[derive(Debug, Clone, Copy)]
pub struct Transcript {
    pub start: &'static str,
    created: &'static str,
    existing: &'static str,
    done: &'static str,
}

pub const TABLES_TRANSCRIPT: Transcript = Transcript {
    start: "Creating tables...",
    created: "Created table",
    existing: "Table already exists",
    done: "Tables loaded successfully!",
};

pub const PRODUCTS_TRANSCRIPT: Transcript = Transcript {
    start: "Creating products...",
    created: "Created product",
    existing: "Product already exists",
    done: "Products loaded successfully!",
};

impl Transcript {
    /// One line per outcome followed by the closing line.
    pub fn report(&self, outcomes: &[SeedOutcome]) -> Vec<String> {
        outcomes
            .iter()
            .map(|outcome| match outcome {
                SeedOutcome::Created(label) => format!("{}: {}", self.created, label),
                SeedOutcome::AlreadyExists(label) => format!("{}: {}", self.existing, label),
            })
            .chain(std::iter::once(self.done.to_string()))
            .collect()
    }
}

pub fn load_tables(repo: &dyn TableRepository) -> Result<Vec<SeedOutcome>, DomainError> {
    TABLE_NUMBERS
        .map(|number| {
            let (table, created) = repo.get_or_create(number)?;
            log::info!("table {} created={}", table.number, created);
            Ok(SeedOutcome::new(created, table.number.to_string()))
        })
        .collect()
}

pub fn load_products(repo: &dyn ProductRepository) -> Result<Vec<SeedOutcome>, DomainError> {
    STARTER_MENU
        .iter()
        .map(|(name, price)| {
            let price = BigDecimal::from_str(price)
                .map_err(|e| DomainError::Internal(format!("bad menu price {}: {}", price, e)))?;
            let (product, created) = repo.get_or_create(NewProduct::new(*name, price))?;
            log::info!("product '{}' created={}", product.name, created);
            Ok(SeedOutcome::new(created, product.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryStore;

    #[test]
    fn load_tables_creates_twenty_then_nothing() {
        let store = InMemoryStore::new();

        let first = load_tables(&store).expect("first run");
        assert_eq!(first.len(), 20);
        assert!(first.iter().all(SeedOutcome::is_created));
        assert_eq!(first[0], SeedOutcome::Created("1".to_string()));

        let second = load_tables(&store).expect("second run");
        assert!(second.iter().all(|o| !o.is_created()));
        assert_eq!(TableRepository::list(&store).expect("list").len(), 20);
    }

    #[test]
    fn load_products_skips_existing_items() {
        let store = InMemoryStore::new();
        ProductRepository::create(
            &store,
            NewProduct::new("Борщ", BigDecimal::from_str("300.00").expect("valid decimal")),
        )
        .expect("pre-existing product");

        let outcomes = load_products(&store).expect("seed");
        assert_eq!(outcomes.len(), STARTER_MENU.len());
        assert_eq!(outcomes[3], SeedOutcome::AlreadyExists("Борщ".to_string()));
        assert_eq!(outcomes.iter().filter(|o| o.is_created()).count(), 5);

        let names: Vec<String> = ProductRepository::list(&store)
            .expect("list")
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("Борщ"));
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn transcripts_announce_then_report_each_item() {
        assert_eq!(TABLES_TRANSCRIPT.start, "Creating tables...");
        assert_eq!(PRODUCTS_TRANSCRIPT.start, "Creating products...");

        let lines = TABLES_TRANSCRIPT.report(&[
            SeedOutcome::Created("1".to_string()),
            SeedOutcome::AlreadyExists("2".to_string()),
        ]);
        assert_eq!(
            lines,
            [
                "Created table: 1",
                "Table already exists: 2",
                "Tables loaded successfully!",
            ]
        );

        let lines = PRODUCTS_TRANSCRIPT.report(&[SeedOutcome::Created("Чай".to_string())]);
        assert_eq!(lines, ["Created product: Чай", "Products loaded successfully!"]);
    }
}
