//! Server-rendered order pages.

use askama::Template;

use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::Product;
use crate::domain::table::Table;
use crate::forms::OrderForm;
use crate::validation::FieldErrors;

#[derive(Template)]
#[template(path = "order_list.html")]
pub struct OrderListPage<'a> {
    pub order_list: &'a [Order],
}

#[derive(Template)]
#[template(path = "order_detail.html")]
pub struct OrderDetailPage<'a> {
    pub order_details: &'a Order,
}

/// Choices and submitted values shared by the create and update forms.
pub struct OrderFormContext<'a> {
    pub form: &'a OrderForm,
    pub errors: &'a FieldErrors,
    pub tables: &'a [Table],
    pub products: &'a [Product],
    pub statuses: [OrderStatus; 3],
}

impl<'a> OrderFormContext<'a> {
    pub fn new(
        form: &'a OrderForm,
        errors: &'a FieldErrors,
        tables: &'a [Table],
        products: &'a [Product],
    ) -> Self {
        Self {
            form,
            errors,
            tables,
            products,
            statuses: OrderStatus::ALL,
        }
    }
}

#[derive(Template)]
#[template(path = "order_create_form.html")]
pub struct OrderCreatePage<'a> {
    pub ctx: OrderFormContext<'a>,
}

#[derive(Template)]
#[template(path = "order_update.html")]
pub struct OrderUpdatePage<'a> {
    pub order_update: &'a Order,
    pub ctx: OrderFormContext<'a>,
}

#[derive(Template)]
#[template(path = "order_delete.html")]
pub struct OrderDeletePage<'a> {
    pub order_delete: &'a Order,
}
