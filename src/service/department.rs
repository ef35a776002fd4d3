use sqlx::MySqlPool;

use crate::error::ApiResult;
use crate::model::department::Department;

pub async fn list(pool: &MySqlPool) -> ApiResult<Vec<Department>> {
    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, created_at FROM departments ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(departments)
}
