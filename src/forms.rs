use crate::domain::order::{Order, OrderDraft, OrderStatus};
use crate::domain::product::Product;
use crate::domain::table::Table;
use crate::validation::{FieldErrors, REQUIRED};

const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Raw values of the order create/update form, as submitted.
///
/// Values are kept as strings so an invalid submission can be rendered
/// back exactly as the user sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub table_number: Option<String>,
    pub products: Vec<String>,
    pub status: Option<String>,
}

impl OrderForm {
    /// Blank form with the default status preselected.
    pub fn initial() -> Self {
        Self {
            status: Some(OrderStatus::default().as_str().to_string()),
            ..Self::default()
        }
    }

    /// Form pre-filled from a stored order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            table_number: Some(order.table.id.to_string()),
            products: order.products.iter().map(|p| p.id.to_string()).collect(),
            status: Some(order.status.as_str().to_string()),
        }
    }

    /// Parses an `application/x-www-form-urlencoded` body. `products` may repeat.
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "table_number" => form.table_number = Some(value.into_owned()),
                "products" => form.products.push(value.into_owned()),
                "status" => form.status = Some(value.into_owned()),
                _ => {}
            }
        }
        form
    }

    /// Validates against the tables and products that can currently be chosen.
    pub fn clean(&self, tables: &[Table], products: &[Product]) -> Result<OrderDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let table_id = match non_blank(self.table_number.as_deref()) {
            None => {
                errors.add("table_number", REQUIRED);
                None
            }
            Some(raw) => {
                let found = raw
                    .parse::<i64>()
                    .ok()
                    .filter(|id| tables.iter().any(|t| t.id == *id));
                if found.is_none() {
                    errors.add("table_number", INVALID_CHOICE);
                }
                found
            }
        };

        let submitted: Vec<&str> = self
            .products
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect();
        let mut product_ids = Vec::with_capacity(submitted.len());
        if submitted.is_empty() {
            errors.add("products", REQUIRED);
        }
        for raw in submitted {
            match raw.parse::<i64>() {
                Err(_) => errors.add("products", format!("“{}” is not a valid value.", raw)),
                Ok(id) if !products.iter().any(|p| p.id == id) => errors.add(
                    "products",
                    format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        id
                    ),
                ),
                Ok(id) => product_ids.push(id),
            }
        }

        let status = match non_blank(self.status.as_deref()) {
            None => {
                errors.add("status", REQUIRED);
                None
            }
            Some(raw) => match raw.parse::<OrderStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add(
                        "status",
                        format!(
                            "Select a valid choice. {} is not one of the available choices.",
                            raw
                        ),
                    );
                    None
                }
            },
        };

        match (table_id, status) {
            (Some(table_id), Some(status)) => errors.into_result(OrderDraft {
                table_id,
                product_ids,
                status,
            }),
            _ => Err(errors),
        }
    }

    pub fn has_table(&self, id: i64) -> bool {
        self.table_number.as_deref().map(str::trim) == Some(id.to_string().as_str())
    }

    pub fn has_product(&self, id: i64) -> bool {
        let id = id.to_string();
        self.products.iter().any(|p| p.trim() == id)
    }

    pub fn has_status(&self, status: &str) -> bool {
        self.status.as_deref().map(str::trim) == Some(status)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use rstest::{fixture, rstest};

    use super::*;

    struct Choices {
        tables: Vec<Table>,
        products: Vec<Product>,
    }

    #[fixture]
    fn choices() -> Choices {
        Choices {
            tables: vec![Table {
                id: 1,
                number: 1,
                is_occupied: true,
            }],
            products: vec![
                Product {
                    id: 2,
                    name: "Маргарита".to_string(),
                    price: BigDecimal::from_str("500.00").expect("valid decimal"),
                },
                Product {
                    id: 3,
                    name: "Чай".to_string(),
                    price: BigDecimal::from_str("100.00").expect("valid decimal"),
                },
            ],
        }
    }

    #[rstest]
    fn parse_collects_repeated_products() {
        let form = OrderForm::parse(b"table_number=1&products=2&products=3&status=ready");
        assert_eq!(form.table_number.as_deref(), Some("1"));
        assert_eq!(form.products, vec!["2".to_string(), "3".to_string()]);
        assert_eq!(form.status.as_deref(), Some("ready"));
    }

    #[rstest]
    fn clean_accepts_a_valid_submission(choices: Choices) {
        let form = OrderForm::parse(b"table_number=1&products=2&products=3&status=paid");
        let draft = form.clean(&choices.tables, &choices.products).expect("valid form");
        assert_eq!(
            draft,
            OrderDraft {
                table_id: 1,
                product_ids: vec![2, 3],
                status: OrderStatus::Paid,
            }
        );
    }

    #[rstest]
    fn clean_requires_every_field(choices: Choices) {
        let errors = OrderForm::default()
            .clean(&choices.tables, &choices.products)
            .unwrap_err();
        assert_eq!(errors.get("table_number"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("products"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("status"), [REQUIRED.to_string()]);
    }

    #[rstest]
    fn clean_rejects_unknown_choices(choices: Choices) {
        let form = OrderForm::parse(b"table_number=9&products=2&products=77&products=x&status=lost");
        let errors = form.clean(&choices.tables, &choices.products).unwrap_err();
        assert_eq!(errors.get("table_number"), [INVALID_CHOICE.to_string()]);
        assert_eq!(
            errors.get("products"),
            [
                "Select a valid choice. 77 is not one of the available choices.".to_string(),
                "“x” is not a valid value.".to_string(),
            ]
        );
        assert_eq!(
            errors.get("status"),
            ["Select a valid choice. lost is not one of the available choices.".to_string()]
        );
    }

    #[rstest]
    fn initial_form_preselects_waiting() {
        let form = OrderForm::initial();
        assert!(form.has_status("waiting"));
        assert!(!form.has_table(1));
        assert!(!form.has_product(2));
    }
}
