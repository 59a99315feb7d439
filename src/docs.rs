//! OpenAPI document for the product API.
//!
//! Served as JSON at `/api/openapi.json` and browsable through Swagger UI at
//! `/api/docs/`. The order pages are HTML and stay out of the document.

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::products::{ListProductsParams, ProductPage, ProductRequest, ProductResponse};

/// Body of every non-validation error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Not found.")]
    pub detail: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cafe orders API",
        description = "Menu management for the cafe order system."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::partial_update_product,
        crate::handlers::products::delete_product,
    ),
    components(schemas(
        ProductRequest,
        ProductResponse,
        ProductPage,
        ListProductsParams,
        ErrorBody
    )),
    tags(
        (name = "products", description = "Menu items and their prices")
    )
)]
pub struct ApiDoc;
