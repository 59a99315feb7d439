pub mod orders;
pub mod products;

use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use askama::Template;

use crate::errors::AppError;

/// Renders `page` as an HTML response with the given status.
pub(crate) fn render<T: Template>(status: StatusCode, page: &T) -> Result<HttpResponse, AppError> {
    let body = page.render()?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

/// 302 to the path of a named route that takes no parameters.
pub(crate) fn redirect_to(req: &HttpRequest, route: &str) -> Result<HttpResponse, AppError> {
    let url = req.url_for_static(route)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.path()))
        .finish())
}
