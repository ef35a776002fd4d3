use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::debug;

fn reject(req: ServiceRequest, message: &str) -> ServiceResponse<BoxBody> {
    debug!(path = %req.path(), reason = message, "Rejected unauthenticated request");
    req.into_response(ApiError::Unauthorized(message.to_string()).error_response())
}

/// Verifies the bearer token and stores the caller as an `AuthUser` extension.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("App config missing".into()))?;

    let header_value = match req.headers().get("Authorization").map(|h| h.to_str()) {
        Some(Ok(value)) => value.to_string(),
        Some(Err(_)) => return Ok(reject(req, "Invalid Authorization header encoding")),
        None => return Ok(reject(req, "Missing Authorization header")),
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return Ok(reject(req, "Authorization header must start with Bearer")),
    };

    let claims = match verify_token(token, &config) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "Token verification failed");
            return Ok(reject(req, "Invalid or expired token"));
        }
    };

    req.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
        email: claims.sub,
        role: claims.role,
        employee_id: claims.employee_id,
    });

    next.call(req).await
}
