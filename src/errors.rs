use actix_web::error::{BlockingError, UrlGenerationError};
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found.")]
    NotFound,

    /// A 404 with its own explanation, e.g. a page past the end of a list.
    #[error("{0}")]
    NotFoundDetail(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid input")]
    Validation(FieldErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<BlockingError> for AppError {
    fn from(e: BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal(format!("template rendering failed: {}", e))
    }
}

impl From<UrlGenerationError> for AppError {
    fn from(e: UrlGenerationError) -> Self {
        AppError::Internal(format!("url generation failed: {}", e))
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "detail": self.to_string()
            })),
            AppError::NotFoundDetail(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "detail": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "detail": msg
            })),
            AppError::Validation(errors) => HttpResponse::BadRequest().json(errors),
            AppError::Internal(msg) => {
                log::error!("request failed: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "detail": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_detail_keeps_its_message() {
        let err = AppError::NotFoundDetail("Invalid page.".to_string());
        assert_eq!(err.to_string(), "Invalid page.");
        assert_eq!(err.error_response().status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_found_display() {
        assert_eq!(AppError::NotFound.to_string(), "Not found.");
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[test]
    fn domain_invalid_input_maps_to_bad_request() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(ref msg) if msg == "bad value"));
        assert_eq!(
            app_err.error_response().status(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn validation_error_lists_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        let resp = AppError::from(errors).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let bytes = to_bytes(resp.into_body()).await.expect("body bytes");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body, serde_json::json!({ "name": ["This field is required."] }));
    }

    #[actix_web::test]
    async fn internal_error_body_is_redacted() {
        let resp = AppError::Internal("password=hunter2".to_string()).error_response();
        let bytes = to_bytes(resp.into_body()).await.expect("body bytes");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body, serde_json::json!({ "detail": "Internal server error" }));
    }
}
