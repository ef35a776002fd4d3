use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::auth::{jwt::generate_token, password::verify_password};
use crate::config::Config;
use crate::error::{ApiError, ApiResult, Validator};
use crate::model::full_name;
use crate::model::role::Role;
use crate::model::user::{LoginRequest, LoginResponse, UserCredentials};
use crate::service::now;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized(INVALID_CREDENTIALS.into())
}

/// Missing user, inactive account and wrong password all get the same 401,
/// so account state is not disclosed.
fn authenticate(user: Option<UserCredentials>, password: &str) -> ApiResult<UserCredentials> {
    let Some(user) = user else {
        info!("Invalid credentials: user not found");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        info!(user_id = user.id, "Invalid credentials: account inactive");
        return Err(invalid_credentials());
    }

    if let Err(e) = verify_password(password, &user.password_hash) {
        info!(user_id = user.id, error = %e, "Invalid credentials: password mismatch");
        return Err(invalid_credentials());
    }

    Ok(user)
}

#[instrument(name = "auth_login", skip(pool, config, req), fields(email = %req.email))]
pub async fn login(pool: &MySqlPool, config: &Config, req: LoginRequest) -> ApiResult<LoginResponse> {
    Validator::new()
        .required(&req.email, "email")
        .required(&req.password, "password")
        .finish()?;

    debug!("Fetching user from database");

    let user = sqlx::query_as::<_, UserCredentials>(
        r#"
        SELECT u.id, u.email, u.password_hash, r.name AS role_name, u.is_active,
               e.id AS employee_id, e.first_name, e.last_name
        FROM users u
        JOIN roles r ON r.id = u.role_id
        LEFT JOIN employees e ON e.user_id = u.id
        WHERE u.email = ?
        "#,
    )
    .bind(req.email.trim())
    .fetch_optional(pool)
    .await?;

    let user = authenticate(user, &req.password)?;

    let role: Role = user.role_name.parse().map_err(|_| {
        error!(user_id = user.id, role = %user.role_name, "Unknown role in roles table");
        ApiError::Internal(format!("unknown role {}", user.role_name))
    })?;

    let token = generate_token(user.id, &user.email, role, user.employee_id, config).map_err(|e| {
        error!(error = %e, "Failed to sign token");
        ApiError::Internal(e.to_string())
    })?;

    if let Err(e) = sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
        .bind(now())
        .bind(user.id)
        .execute(pool)
        .await
    {
        // not fatal for the login itself
        error!(error = %e, "Failed to update last_login");
    }

    info!(user_id = user.id, %role, "Login successful");

    Ok(LoginResponse {
        token,
        user_id: user.id,
        email: user.email,
        role,
        employee_id: user.employee_id,
        full_name: user
            .first_name
            .zip(user.last_name)
            .map(|(first, last)| full_name(&first, &last)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    fn credentials(password: &str, is_active: bool) -> UserCredentials {
        UserCredentials {
            id: 7,
            email: "jane.doe@company.com".into(),
            password_hash: hash_password(password).unwrap(),
            role_name: "Employee".into(),
            is_active,
            employee_id: Some(5),
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
        }
    }

    fn assert_invalid_credentials(result: ApiResult<UserCredentials>) {
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[test]
    fn active_user_with_right_password_passes() {
        let user = authenticate(Some(credentials("secret1", true)), "secret1").unwrap();
        assert_eq!(user.id, 7);
    }

    #[test]
    fn inactive_account_is_refused_even_with_right_password() {
        assert_invalid_credentials(authenticate(Some(credentials("secret1", false)), "secret1"));
    }

    #[test]
    fn wrong_password_is_refused() {
        assert_invalid_credentials(authenticate(Some(credentials("secret1", true)), "secret2"));
    }

    #[test]
    fn unknown_user_is_refused() {
        assert_invalid_credentials(authenticate(None, "secret1"));
    }
}
