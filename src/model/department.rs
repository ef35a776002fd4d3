use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Engineering")]
    pub name: String,
    pub created_at: NaiveDateTime,
}
