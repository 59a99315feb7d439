use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::domain::order::Order;
use crate::domain::product::Product;
use crate::domain::table::Table;
use crate::errors::AppError;
use crate::forms::OrderForm;
use crate::pages::{
    OrderCreatePage, OrderDeletePage, OrderDetailPage, OrderFormContext, OrderListPage,
    OrderUpdatePage,
};
use crate::state::Repositories;
use crate::validation::FieldErrors;

use super::{redirect_to, render};

/// Tables and products the order form offers.
async fn load_choices(repos: &Repositories) -> Result<(Vec<Table>, Vec<Product>), AppError> {
    let tables = repos.tables.clone();
    let products = repos.products.clone();
    let choices = web::block(move || Ok::<_, AppError>((tables.list()?, products.list()?))).await??;
    Ok(choices)
}

async fn load_order(repos: &Repositories, id: i64) -> Result<Order, AppError> {
    let orders = repos.orders.clone();
    web::block(move || orders.find_by_id(id))
        .await??
        .ok_or(AppError::NotFound)
}

/// GET /orders/list/
///
/// Every order that has not been archived.
pub async fn order_list(repos: web::Data<Repositories>) -> Result<HttpResponse, AppError> {
    let orders = repos.orders.clone();
    let order_list = web::block(move || orders.list_active()).await??;

    render(StatusCode::OK, &OrderListPage {
        order_list: &order_list,
    })
}

/// GET /orders/create/
pub async fn order_create_form(repos: web::Data<Repositories>) -> Result<HttpResponse, AppError> {
    let (tables, products) = load_choices(&repos).await?;
    let form = OrderForm::initial();
    let errors = FieldErrors::new();

    render(StatusCode::OK, &OrderCreatePage {
        ctx: OrderFormContext::new(&form, &errors, &tables, &products),
    })
}

/// POST /orders/create/
///
/// The order row is written first, then its products are linked and the
/// total stored, all in one transaction inside the repository.
pub async fn order_create(
    req: HttpRequest,
    repos: web::Data<Repositories>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let form = OrderForm::parse(&body);
    let (tables, products) = load_choices(&repos).await?;

    let draft = match form.clean(&tables, &products) {
        Ok(draft) => draft,
        Err(errors) => {
            log::debug!("rejected order form: {:?}", errors);
            return render(StatusCode::BAD_REQUEST, &OrderCreatePage {
                ctx: OrderFormContext::new(&form, &errors, &tables, &products),
            });
        }
    };

    let orders = repos.orders.clone();
    let order = web::block(move || orders.create(draft)).await??;
    log::info!("order {} placed at {}", order.id, order.table);

    redirect_to(&req, "order_list")
}

/// GET /orders/{id}/
///
/// Archived orders are still shown here.
pub async fn order_detail(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let order = load_order(&repos, path.into_inner()).await?;

    render(StatusCode::OK, &OrderDetailPage {
        order_details: &order,
    })
}

/// GET /orders/{id}/update/
pub async fn order_update_form(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let order = load_order(&repos, path.into_inner()).await?;
    let (tables, products) = load_choices(&repos).await?;
    let form = OrderForm::from_order(&order);
    let errors = FieldErrors::new();

    render(StatusCode::OK, &OrderUpdatePage {
        order_update: &order,
        ctx: OrderFormContext::new(&form, &errors, &tables, &products),
    })
}

/// POST /orders/{id}/update/
pub async fn order_update(
    req: HttpRequest,
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = load_order(&repos, id).await?;
    let form = OrderForm::parse(&body);
    let (tables, products) = load_choices(&repos).await?;

    let draft = match form.clean(&tables, &products) {
        Ok(draft) => draft,
        Err(errors) => {
            return render(StatusCode::BAD_REQUEST, &OrderUpdatePage {
                order_update: &order,
                ctx: OrderFormContext::new(&form, &errors, &tables, &products),
            });
        }
    };

    let orders = repos.orders.clone();
    web::block(move || orders.update(id, draft))
        .await??
        .ok_or(AppError::NotFound)?;

    redirect_to(&req, "order_list")
}

/// GET /orders/{id}/delete/
pub async fn order_delete_form(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let order = load_order(&repos, path.into_inner()).await?;

    render(StatusCode::OK, &OrderDeletePage {
        order_delete: &order,
    })
}

/// POST /orders/{id}/delete/
///
/// Archives rather than deletes; the row stays reachable by id.
pub async fn order_delete(
    req: HttpRequest,
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let orders = repos.orders.clone();
    let archived = web::block(move || orders.archive(id)).await??;
    if !archived {
        return Err(AppError::NotFound);
    }

    redirect_to(&req, "order_list")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders/create/")
            .name("order_create")
            .route(web::get().to(order_create_form))
            .route(web::post().to(order_create)),
    )
    .service(
        web::resource("/orders/list/")
            .name("order_list")
            .route(web::get().to(order_list)),
    )
    .service(
        web::resource("/orders/{id}/")
            .name("order_detail")
            .route(web::get().to(order_detail)),
    )
    .service(
        web::resource("/orders/{id}/update/")
            .name("order_update")
            .route(web::get().to(order_update_form))
            .route(web::post().to(order_update)),
    )
    .service(
        web::resource("/orders/{id}/delete/")
            .name("order_delete")
            .route(web::get().to(order_delete_form))
            .route(web::post().to(order_delete)),
    );
}
