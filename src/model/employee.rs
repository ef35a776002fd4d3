use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::full_name;

/// An employee row joined with its login identity, role and department.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub user_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub department_id: Option<u64>,
    pub department_name: Option<String>,
    pub position: Option<String>,
    pub join_date: NaiveDate,
    pub profile_picture: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub role_name: String,
    pub is_active: bool,
}

/// The editable part of an employee profile.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EmployeeProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub department_id: Option<u64>,
    pub position: Option<String>,
    pub profile_picture: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "employeeId": 5,
    "userId": 7,
    "firstName": "Jane",
    "lastName": "Doe",
    "fullName": "Jane Doe",
    "phoneNumber": "+8801712345678",
    "departmentId": 2,
    "departmentName": "Engineering",
    "position": "Backend Engineer",
    "joinDate": "2024-01-01",
    "profilePicture": null,
    "address": null,
    "email": "jane.doe@company.com",
    "role": "Employee",
    "isActive": true
}))]
pub struct EmployeeDto {
    pub employee_id: u64,
    pub user_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub department_id: Option<u64>,
    pub department_name: Option<String>,
    pub position: Option<String>,
    pub join_date: NaiveDate,
    pub profile_picture: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

impl From<EmployeeRow> for EmployeeDto {
    fn from(row: EmployeeRow) -> Self {
        Self {
            full_name: full_name(&row.first_name, &row.last_name),
            employee_id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            department_id: row.department_id,
            department_name: row.department_name,
            position: row.position,
            join_date: row.join_date,
            profile_picture: row.profile_picture,
            address: row.address,
            email: row.email,
            role: row.role_name,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    pub phone_number: Option<String>,
    pub department_id: Option<u64>,
    pub position: Option<String>,
    #[schema(example = "2026-01-01")]
    pub join_date: NaiveDate,
    pub address: Option<String>,
    /// Role id, defaults to Employee (3)
    #[serde(default = "default_role_id")]
    #[schema(example = 3)]
    pub role_id: u8,
}

fn default_role_id() -> u8 {
    3
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub department_id: Option<u64>,
    pub position: Option<String>,
    pub profile_picture: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateEmployee {
    pub fn apply(&self, current: EmployeeProfile) -> EmployeeProfile {
        EmployeeProfile {
            first_name: self.first_name.clone().unwrap_or(current.first_name),
            last_name: self.last_name.clone().unwrap_or(current.last_name),
            phone_number: self.phone_number.clone().or(current.phone_number),
            department_id: self.department_id.or(current.department_id),
            position: self.position.clone().or(current.position),
            profile_picture: self.profile_picture.clone().or(current.profile_picture),
            address: self.address.clone().or(current.address),
        }
    }
}
