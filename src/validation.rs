//! Field-level validation shared by the order form and the product API.
//!
//! The HTML pages and the JSON API report problems with the same messages.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::Value;

use crate::domain::product::{NewProduct, Product, PRICE_SCALE};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_NUMBER: &str = "A valid number is required.";

pub const NAME_MAX_CHARS: usize = 255;
pub const PRICE_MAX_DIGITS: u64 = 10;

/// Messages keyed by the field they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Checks a product name: present, not null, a string, not blank and within
/// the column width.
pub fn clean_name(raw: Option<&Value>, errors: &mut FieldErrors) -> Option<String> {
    let raw = match raw {
        None => {
            errors.add("name", REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add("name", NULL);
            return None;
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add("name", INVALID_STRING);
            return None;
        }
    };
    let name = raw.trim();
    if name.is_empty() {
        errors.add("name", BLANK);
        return None;
    }
    if name.chars().count() > NAME_MAX_CHARS {
        errors.add(
            "name",
            format!("Ensure this field has no more than {} characters.", NAME_MAX_CHARS),
        );
        return None;
    }
    Some(name.to_string())
}

/// Checks a price given as a JSON string or number against `NUMERIC(10, 2)`.
pub fn clean_price(raw: Option<&Value>, errors: &mut FieldErrors) -> Option<BigDecimal> {
    let text = match raw {
        None => {
            errors.add("price", REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add("price", NULL);
            return None;
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add("price", INVALID_NUMBER);
            return None;
        }
    };
    if text.is_empty() {
        errors.add("price", INVALID_NUMBER);
        return None;
    }
    let Ok(price) = BigDecimal::from_str(&text) else {
        errors.add("price", INVALID_NUMBER);
        return None;
    };

    if let Some(message) = precision_error(&price) {
        errors.add("price", message);
        return None;
    }
    Some(price.with_scale(PRICE_SCALE))
}

/// Digit-budget check for a decimal as written, trailing zeros included.
fn precision_error(price: &BigDecimal) -> Option<String> {
    let (digits, scale) = price.as_bigint_and_exponent();
    let digit_count = digits.magnitude().to_string().len() as u64;

    let (whole, decimals) = if scale <= 0 {
        (digit_count + scale.unsigned_abs(), 0)
    } else if scale.unsigned_abs() > digit_count {
        (0, scale.unsigned_abs())
    } else {
        (digit_count - scale.unsigned_abs(), scale.unsigned_abs())
    };
    let total = whole + decimals;
    let max_decimals = PRICE_SCALE.unsigned_abs();
    let max_whole = PRICE_MAX_DIGITS - max_decimals;

    if total > PRICE_MAX_DIGITS {
        Some(format!(
            "Ensure that there are no more than {} digits in total.",
            PRICE_MAX_DIGITS
        ))
    } else if decimals > max_decimals {
        Some(format!(
            "Ensure that there are no more than {} decimal places.",
            max_decimals
        ))
    } else if whole > max_whole {
        Some(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            max_whole
        ))
    } else {
        None
    }
}

/// Full validation of a product body. Both fields must be present.
pub fn clean_product(name: Option<&Value>, price: Option<&Value>) -> Result<NewProduct, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = clean_name(name, &mut errors);
    let price = clean_price(price, &mut errors);
    match (name, price) {
        (Some(name), Some(price)) => errors.into_result(NewProduct::new(name, price)),
        _ => Err(errors),
    }
}

/// Partial validation: absent fields keep the stored values, explicit nulls
/// are rejected.
pub fn clean_product_patch(
    current: &Product,
    name: Option<&Value>,
    price: Option<&Value>,
) -> Result<NewProduct, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = match name {
        Some(raw) => clean_name(Some(raw), &mut errors),
        None => Some(current.name.clone()),
    };
    let price = match price {
        Some(raw) => clean_price(Some(raw), &mut errors),
        None => Some(current.price.clone()),
    };
    match (name, price) {
        (Some(name), Some(price)) => errors.into_result(NewProduct::new(name, price)),
        _ => Err(errors),
    }
}
