use crate::auth::auth::AuthUser;
use crate::model::task::{CreateTask, TaskDto, TaskStatus, UpdateTask, UpdateTaskStatus};
use crate::service::task;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskQuery {
    /// Assignee or assigner
    pub employee_id: Option<u64>,
    #[param(value_type = Option<String>, example = "In Progress")]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OverdueQuery {
    /// Assignee
    pub employee_id: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskQuery),
    responses(
        (status = 200, description = "Tasks, newest first", body = [TaskDto]),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn list_tasks(
    pool: web::Data<MySqlPool>,
    query: web::Query<TaskQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(task::list(pool.get_ref(), query.employee_id, query.status).await?))
}

#[utoipa::path(
    get,
    path = "/api/tasks/my-tasks",
    responses(
        (status = 200, description = "Tasks assigned to the caller", body = [TaskDto]),
        (status = 403, description = "No employee profile")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn my_tasks(auth: AuthUser, pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;
    Ok(HttpResponse::Ok().json(task::my_tasks(pool.get_ref(), employee_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/tasks/overdue",
    params(OverdueQuery),
    responses(
        (status = 200, description = "Open tasks past their due date", body = [TaskDto]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn overdue_tasks(
    pool: web::Data<MySqlPool>,
    query: web::Query<OverdueQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(task::overdue(pool.get_ref(), query.employee_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = u64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = TaskDto),
        (status = 404, description = "Task not found")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn get_task(pool: web::Data<MySqlPool>, path: web::Path<u64>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(task::get(pool.get_ref(), path.into_inner()).await?))
}

/// Create Task; it starts `Pending` whatever the body says
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = TaskDto),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "HR/Admin only, or no employee profile")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTask>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let assigned_by = auth.require_employee_id()?;

    let created = task::create(pool.get_ref(), payload.into_inner(), assigned_by).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = u64, Path, description = "Task id")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Updated task", body = TaskDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Task not found")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateTask>,
) -> actix_web::Result<impl Responder> {
    let updated = task::update(pool.get_ref(), path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}/status",
    params(("id" = u64, Path, description = "Task id")),
    request_body = UpdateTaskStatus,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Task status updated successfully"
        })),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Task not found")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn update_task_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateTaskStatus>,
) -> actix_web::Result<impl Responder> {
    task::update_status(pool.get_ref(), path.into_inner(), payload.status).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task status updated successfully" })))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = u64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted", body = Object, example = json!({
            "message": "Task deleted successfully"
        })),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Task not found")
    ),
    tag = "Task",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    task::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
