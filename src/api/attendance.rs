use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::{AttendanceDto, CheckIn, CheckOut};
use crate::model::report::OptionalDateRangeQuery;
use crate::service::attendance;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use sqlx::MySqlPool;

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    request_body = CheckIn,
    responses(
        (status = 200, description = "Checked in", body = AttendanceDto),
        (status = 400, description = "Already checked in today or invalid employee", body = Object, example = json!({
            "message": "Already checked in today or invalid employee"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Employees may only check themselves in"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckIn>,
) -> actix_web::Result<impl Responder> {
    auth.require_self_or_hr(payload.employee_id)?;

    let record = attendance::check_in(pool.get_ref(), &config.attendance, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkout",
    request_body = CheckOut,
    responses(
        (status = 200, description = "Checked out", body = AttendanceDto),
        (status = 400, description = "No open check-in today", body = Object, example = json!({
            "message": "Attendance not found or already checked out"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Employees may only check themselves out"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckOut>,
) -> actix_web::Result<impl Responder> {
    auth.require_self_or_hr(payload.employee_id)?;

    let record = attendance::check_out(pool.get_ref(), &config.attendance, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's records, earliest first", body = [AttendanceDto]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(attendance::today(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/attendance/date/{date}",
    params(("date" = NaiveDate, Path, description = "Calendar date", example = "2026-03-02")),
    responses(
        (status = 200, description = "Records for the date, earliest first", body = [AttendanceDto]),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn by_date(
    pool: web::Data<MySqlPool>,
    path: web::Path<NaiveDate>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(attendance::by_date(pool.get_ref(), path.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/attendance/employee/{id}",
    params(
        ("id" = u64, Path, description = "Employee id"),
        OptionalDateRangeQuery
    ),
    responses(
        (status = 200, description = "Employee history, newest first", body = [AttendanceDto]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn by_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<OptionalDateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    let records = attendance::by_employee(
        pool.get_ref(),
        path.into_inner(),
        query.start_date,
        query.end_date,
    )
    .await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance id")),
    responses(
        (status = 200, description = "Attendance record", body = AttendanceDto),
        (status = 404, description = "Attendance record not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn by_id(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(attendance::by_id(pool.get_ref(), path.into_inner()).await?))
}
