use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::ApiSettings;
use crate::domain::product::Product;
use crate::errors::AppError;
use crate::state::Repositories;
use crate::validation::{clean_product, clean_product_patch};

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Product body for create, replace and partial update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "Кофе")]
    pub name: Option<Value>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "150.00".
    /// Plain JSON numbers are accepted as well.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "150.00")]
    pub price: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub name: String,
    #[schema(example = "150.00")]
    pub price: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let price = product.price_text();
        Self {
            name: product.name,
            price,
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    /// Page number (1-based). Defaults to 1.
    pub page: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<ProductResponse>,
}

fn invalid_page() -> AppError {
    AppError::NotFoundDetail("Invalid page.".to_string())
}

/// Parses `?page=`; a missing value means the first page.
fn requested_page(raw: Option<&str>) -> Result<i64, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(value) => value
            .parse::<i64>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(invalid_page),
    }
}

/// Number of pages needed for `count` items; an empty set still has one page.
fn page_count(count: i64, page_size: i64) -> i64 {
    ((count + page_size - 1) / page_size).max(1)
}

/// Absolute URL of the list endpoint for `page`; page 1 carries no query.
fn page_url(req: &HttpRequest, page: i64) -> Result<String, AppError> {
    let mut url = req.url_for_static("product-list")?;
    if page > 1 {
        url.query_pairs_mut().append_pair("page", &page.to_string());
    }
    Ok(url.to_string())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products/
///
/// Products ordered by name, one page at a time.
#[utoipa::path(
    get,
    path = "/api/products/",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
    ),
    responses(
        (status = 200, description = "Page of products", body = ProductPage),
        (status = 404, description = "Invalid page"),
    ),
    tag = "products"
)]
pub async fn list_products(
    req: HttpRequest,
    repos: web::Data<Repositories>,
    settings: web::Data<ApiSettings>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let page = requested_page(query.page.as_deref())?;
    let page_size = settings.page_size.max(1);
    let offset = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
        .ok_or_else(invalid_page)?;

    let products = repos.products.clone();
    let result = web::block(move || products.list_page(offset, page_size)).await??;

    let last = page_count(result.total, page_size);
    if page > last {
        return Err(invalid_page());
    }

    let body = ProductPage {
        count: result.total,
        next: if page < last {
            Some(page_url(&req, page + 1)?)
        } else {
            None
        },
        previous: if page > 1 {
            Some(page_url(&req, page - 1)?)
        } else {
            None
        },
        results: result.items.into_iter().map(ProductResponse::from).collect(),
    };
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/products/
#[utoipa::path(
    post,
    path = "/api/products/",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Field errors"),
    ),
    tag = "products"
)]
pub async fn create_product(
    repos: web::Data<Repositories>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let new_product = clean_product(body.name.as_ref(), body.price.as_ref())?;

    let products = repos.products.clone();
    let product = web::block(move || products.create(new_product)).await??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// GET /api/products/{id}/
#[utoipa::path(
    get,
    path = "/api/products/{id}/",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let products = repos.products.clone();
    let product = web::block(move || products.find_by_id(id))
        .await??
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PUT /api/products/{id}/
///
/// Replaces both fields. Orders holding the product are re-totalled.
#[utoipa::path(
    put,
    path = "/api/products/{id}/",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Field errors"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let products = repos.products.clone();
    if web::block(move || products.find_by_id(id)).await??.is_none() {
        return Err(AppError::NotFound);
    }

    let body = body.into_inner();
    let replacement = clean_product(body.name.as_ref(), body.price.as_ref())?;

    let products = repos.products.clone();
    let product = web::block(move || products.update(id, replacement))
        .await??
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PATCH /api/products/{id}/
#[utoipa::path(
    patch,
    path = "/api/products/{id}/",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Field errors"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn partial_update_product(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let products = repos.products.clone();
    let current = web::block(move || products.find_by_id(id))
        .await??
        .ok_or(AppError::NotFound)?;

    let body = body.into_inner();
    let patched = clean_product_patch(&current, body.name.as_ref(), body.price.as_ref())?;

    let products = repos.products.clone();
    let product = web::block(move || products.update(id, patched))
        .await??
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /api/products/{id}/
///
/// The product leaves every order it was in; those orders are re-totalled.
#[utoipa::path(
    delete,
    path = "/api/products/{id}/",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    repos: web::Data<Repositories>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let products = repos.products.clone();
    let deleted = web::block(move || products.delete(id)).await??;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Answers malformed JSON bodies with a 400 and a readable reason.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("JSON parse error - {}", err)).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/products/")
            .name("product-list")
            .app_data(json_config())
            .route(web::get().to(list_products))
            .route(web::post().to(create_product)),
    )
    .service(
        web::resource("/api/products/{id}/")
            .name("product-detail")
            .app_data(json_config())
            .route(web::get().to(get_product))
            .route(web::put().to(update_product))
            .route(web::patch().to(partial_update_product))
            .route(web::delete().to(delete_product)),
    );
}
