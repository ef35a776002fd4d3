use crate::auth::auth::AuthUser;
use crate::model::employee::{CreateEmployee, EmployeeDto, UpdateEmployee};
use crate::service::employee;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee and login created", body = EmployeeDto),
        (status = 400, description = "Validation failed or email taken", body = Object, example = json!({
            "message": "Email already exists"
        })),
        (status = 403, description = "HR/Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let created = employee::create(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [EmployeeDto]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(employee::list(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = EmployeeDto),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(employee::get(pool.get_ref(), path.into_inner()).await?))
}

/// Update Employee (partial)
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated employee", body = EmployeeDto),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let updated = employee::update(pool.get_ref(), path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 400, description = "Employee still referenced by tasks or meetings"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    employee::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted successfully" })))
}
