use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Login identity joined with its role name and (optional) employee profile.
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub role_name: String,
    pub is_active: bool,
    pub employee_id: Option<u64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@soms.local")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: u64,
    pub email: String,
    pub role: Role,
    pub employee_id: Option<u64>,
    pub full_name: Option<String>,
}
