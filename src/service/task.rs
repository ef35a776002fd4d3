use sqlx::{MySql, MySqlPool, Transaction};
use tracing::info;

use crate::db::is_missing_reference;
use crate::error::{ApiError, ApiResult, Validator};
use crate::model::task::{CreateTask, Task, TaskDto, TaskStatus, TaskView, UpdateTask};
use crate::service::now;
use crate::utils::sql_filter::SqlFilter;

const SELECT_TASK: &str = r#"
    SELECT t.id, t.title, t.description, t.assigned_to, t.assigned_by, t.status, t.priority,
           t.start_date, t.due_date, t.completed_date, t.created_at, t.updated_at,
           a.first_name AS assignee_first_name, a.last_name AS assignee_last_name,
           b.first_name AS assigner_first_name, b.last_name AS assigner_last_name
    FROM tasks t
    JOIN employees a ON a.id = t.assigned_to
    JOIN employees b ON b.id = t.assigned_by
"#;

pub(crate) async fn fetch_views(
    pool: &MySqlPool,
    filter: SqlFilter,
    order: &str,
) -> ApiResult<Vec<TaskView>> {
    let sql = format!("{}{} ORDER BY {}", SELECT_TASK, filter.where_clause(), order);
    let views = filter
        .bind(sqlx::query_as::<_, TaskView>(&sql))
        .fetch_all(pool)
        .await?;
    Ok(views)
}

fn to_dtos(views: Vec<TaskView>) -> Vec<TaskDto> {
    views.into_iter().map(TaskDto::from).collect()
}

/// Tasks touching the employee (assignee or assigner), optionally one status; newest first.
pub async fn list(
    pool: &MySqlPool,
    employee_id: Option<u64>,
    status: Option<TaskStatus>,
) -> ApiResult<Vec<TaskDto>> {
    let mut filter = SqlFilter::new();
    if let Some(id) = employee_id {
        filter.and("(t.assigned_to = ? OR t.assigned_by = ?)", [id, id]);
    }
    filter.and_opt("t.status = ?", status.map(|s| s.to_string()));

    Ok(to_dtos(fetch_views(pool, filter, "t.created_at DESC").await?))
}

pub async fn my_tasks(pool: &MySqlPool, employee_id: u64) -> ApiResult<Vec<TaskDto>> {
    let mut filter = SqlFilter::new();
    filter.and("t.assigned_to = ?", [employee_id]);

    Ok(to_dtos(fetch_views(pool, filter, "t.created_at DESC").await?))
}

/// Open tasks whose due date has passed; `Task::is_overdue` is the same predicate.
pub async fn overdue(pool: &MySqlPool, employee_id: Option<u64>) -> ApiResult<Vec<TaskDto>> {
    let mut filter = SqlFilter::new();
    filter
        .and("t.due_date < ?", [now()])
        .and(
            "t.status IN (?, ?)",
            [TaskStatus::Pending.to_string(), TaskStatus::InProgress.to_string()],
        )
        .and_opt("t.assigned_to = ?", employee_id);

    Ok(to_dtos(fetch_views(pool, filter, "t.due_date ASC").await?))
}

pub async fn get(pool: &MySqlPool, id: u64) -> ApiResult<TaskDto> {
    let mut filter = SqlFilter::new();
    filter.and("t.id = ?", [id]);

    fetch_views(pool, filter, "t.id")
        .await?
        .pop()
        .map(TaskDto::from)
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

fn unknown_assignee(e: sqlx::Error) -> ApiError {
    if is_missing_reference(&e) {
        ApiError::field("assignedTo", "Employee does not exist")
    } else {
        e.into()
    }
}

/// New tasks always start `Pending`.
pub async fn create(pool: &MySqlPool, dto: CreateTask, assigned_by: u64) -> ApiResult<TaskDto> {
    Validator::new().required(&dto.title, "title").finish()?;

    let now = now();
    let id = sqlx::query(
        r#"
        INSERT INTO tasks
            (title, description, assigned_to, assigned_by, status, priority,
             start_date, due_date, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(dto.title.trim())
    .bind(&dto.description)
    .bind(dto.assigned_to)
    .bind(assigned_by)
    .bind(TaskStatus::Pending.to_string())
    .bind(dto.priority.to_string())
    .bind(dto.start_date)
    .bind(dto.due_date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(unknown_assignee)?
    .last_insert_id();

    info!(task_id = id, assigned_to = dto.assigned_to, assigned_by, "Task created");
    get(pool, id).await
}

async fn lock_task(tx: &mut Transaction<'_, MySql>, id: u64) -> ApiResult<Task> {
    sqlx::query_as::<_, Task>(
        r#"
        SELECT id, title, description, assigned_to, assigned_by, status, priority,
               start_date, due_date, completed_date, created_at, updated_at
        FROM tasks
        WHERE id = ?
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Task not found"))
}

async fn store_task(tx: &mut Transaction<'_, MySql>, task: &Task) -> ApiResult<()> {
    sqlx::query(
        r#"
        UPDATE tasks
        SET title = ?, description = ?, assigned_to = ?, status = ?, priority = ?,
            start_date = ?, due_date = ?, completed_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.assigned_to)
    .bind(task.status.to_string())
    .bind(task.priority.to_string())
    .bind(task.start_date)
    .bind(task.due_date)
    .bind(task.completed_date)
    .bind(task.updated_at)
    .bind(task.id)
    .execute(&mut **tx)
    .await
    .map_err(unknown_assignee)?;
    Ok(())
}

pub async fn update(pool: &MySqlPool, id: u64, dto: UpdateTask) -> ApiResult<TaskDto> {
    let mut tx = pool.begin().await?;

    let mut task = lock_task(&mut tx, id).await?;
    task.apply(&dto, now());
    store_task(&mut tx, &task).await?;

    tx.commit().await?;

    info!(task_id = id, status = %task.status, "Task updated");
    get(pool, id).await
}

pub async fn update_status(pool: &MySqlPool, id: u64, status: TaskStatus) -> ApiResult<()> {
    let mut tx = pool.begin().await?;

    let mut task = lock_task(&mut tx, id).await?;
    task.set_status(status, now());
    store_task(&mut tx, &task).await?;

    tx.commit().await?;

    info!(task_id = id, %status, "Task status updated");
    Ok(())
}

pub async fn delete(pool: &MySqlPool, id: u64) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Task not found"));
    }

    info!(task_id = id, "Task deleted");
    Ok(())
}
