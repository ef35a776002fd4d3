use crate::model::department::Department;
use crate::service::department;
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments by name", body = [Department]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn list_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(department::list(pool.get_ref()).await?))
}
