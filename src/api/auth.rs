use crate::config::Config;
use crate::model::user::{LoginRequest, LoginResponse};
use crate::service::auth;
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token and caller profile", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password", body = Object, example = json!({
            "message": "Invalid email or password"
        })),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> actix_web::Result<impl Responder> {
    let response = auth::login(pool.get_ref(), config.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
