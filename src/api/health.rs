use crate::db;
use crate::service::now;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::warn;

/// Liveness; always 200, with the database state in the body.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok",
            "database": "up",
            "timestamp": "2026-03-02T10:00:00"
        }))
    ),
    tag = "Health"
)]
pub async fn health(pool: web::Data<MySqlPool>) -> impl Responder {
    let database = match db::ping(pool.get_ref()).await {
        Ok(()) => "up",
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database");
            "down"
        }
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "database": database,
        "timestamp": now(),
    }))
}
