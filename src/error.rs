use std::collections::BTreeMap;

use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web,
};
use derive_more::Display;
use serde::Serialize;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failure a request can end in. Business-rule conflicts (duplicate
/// check-in, duplicate email) are plain `BadRequest`s, not a separate kind.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Validation failed")]
    Validation(Vec<FieldError>),
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "{}", _0)]
    Unauthorized(String),
    #[display(fmt = "{}", _0)]
    Forbidden(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
    #[display(fmt = "Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        error!(error = %e, "Database error");
        ApiError::Database(e)
    }
}

impl From<csv::Error> for ApiError {
    fn from(e: csv::Error) -> Self {
        error!(error = %e, "CSV export failed");
        ApiError::Internal(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => {
                let mut fields: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for e in errors {
                    fields
                        .entry(e.field.as_str())
                        .or_default()
                        .push(e.message.as_str());
                }
                json!({ "message": self.to_string(), "errors": fields })
            }
            _ => json!({ "message": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Collects field-level problems so a request reports all of them at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
        self
    }

    pub fn required(&mut self, value: &str, field: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, &format!("{} is required", field))
    }

    pub fn finish(&mut self) -> ApiResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ApiError::field("body", err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        ApiError::field("query", err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        ApiError::field("path", err.to_string()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::field("a", "b").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn validation_errors_are_grouped_by_field() {
        let err = Validator::new()
            .required("", "email")
            .check(false, "password", "password must be at least 6 characters")
            .check(false, "email", "email is not a valid address")
            .finish()
            .unwrap_err();

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["message"], "Validation failed");
        assert_eq!(value["errors"]["email"].as_array().unwrap().len(), 2);
        assert_eq!(value["errors"]["password"][0], "password must be at least 6 characters");
    }

    #[actix_web::test]
    async fn internal_details_are_not_leaked() {
        let err = ApiError::Internal("secret detail".into());
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"message":"Internal Server Error"}"#);
    }

    #[test]
    fn validator_passes_when_everything_checks_out() {
        assert!(Validator::new().required("x", "title").finish().is_ok());
    }
}
