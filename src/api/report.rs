use crate::auth::auth::AuthUser;
use crate::model::report::{
    AttendanceReportRow, DailyAttendanceRow, DateRangeQuery, EmployeePerformanceRow,
    OptionalDateRangeQuery, TaskAnalytics,
};
use crate::service::report::{self, DateRange};
use crate::service::now;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;
use tracing::instrument;

fn csv_attachment(file_name: String, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body)
}

fn range_of(query: &DateRangeQuery) -> Result<DateRange, crate::error::ApiError> {
    DateRange::new(query.start_date, query.end_date)
}

fn range_suffix(range: &DateRange) -> String {
    format!("{}_{}", range.start.format("%Y%m%d"), range.end.format("%Y%m%d"))
}

#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Per-employee attendance summary", body = [AttendanceReportRow]),
        (status = 400, description = "Missing or reversed dates"),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_attendance", skip_all)]
pub async fn attendance_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let range = range_of(&query)?;
    Ok(HttpResponse::Ok().json(report::attendance_report(pool.get_ref(), &range, query.department_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/attendance/export",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Attendance summary as CSV", content_type = "text/csv", body = String),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_attendance_export", skip_all)]
pub async fn export_attendance_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let range = range_of(&query)?;
    let rows = report::attendance_report(pool.get_ref(), &range, query.department_id).await?;
    Ok(csv_attachment(
        format!("AttendanceReport_{}.csv", range_suffix(&range)),
        report::attendance_csv(&rows)?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports/tasks",
    params(OptionalDateRangeQuery),
    responses(
        (status = 200, description = "Task counts, rates and per-assignee breakdown", body = TaskAnalytics),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_tasks", skip_all)]
pub async fn task_analytics(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<OptionalDateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let analytics = report::task_analytics(pool.get_ref(), query.start_date, query.end_date).await?;
    Ok(HttpResponse::Ok().json(analytics))
}

#[utoipa::path(
    get,
    path = "/api/reports/tasks/export",
    params(OptionalDateRangeQuery),
    responses(
        (status = 200, description = "Per-assignee task breakdown as CSV", content_type = "text/csv", body = String),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_tasks_export", skip_all)]
pub async fn export_task_analytics(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<OptionalDateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let analytics = report::task_analytics(pool.get_ref(), query.start_date, query.end_date).await?;
    Ok(csv_attachment(
        format!("TaskAnalytics_{}.csv", now().format("%Y%m%d%H%M%S")),
        report::task_csv(&analytics)?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports/daily-attendance",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "One row per date with check-ins", body = [DailyAttendanceRow]),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_daily_attendance", skip_all)]
pub async fn daily_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let range = range_of(&query)?;
    Ok(HttpResponse::Ok().json(report::daily_attendance(pool.get_ref(), &range).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/daily-attendance/export",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Daily attendance as CSV", content_type = "text/csv", body = String),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_daily_attendance_export", skip_all)]
pub async fn export_daily_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let range = range_of(&query)?;
    let rows = report::daily_attendance(pool.get_ref(), &range).await?;
    Ok(csv_attachment(
        format!("DailyAttendance_{}.csv", range_suffix(&range)),
        report::daily_attendance_csv(&rows)?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports/employee-performance",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Attendance, task and meeting figures per employee", body = [EmployeePerformanceRow]),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_employee_performance", skip_all)]
pub async fn employee_performance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let range = range_of(&query)?;
    Ok(HttpResponse::Ok().json(report::employee_performance(pool.get_ref(), &range).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/employee-performance/export",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Employee performance as CSV", content_type = "text/csv", body = String),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
#[instrument(name = "report_employee_performance_export", skip_all)]
pub async fn export_employee_performance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let range = range_of(&query)?;
    let rows = report::employee_performance(pool.get_ref(), &range).await?;
    Ok(csv_attachment(
        format!("EmployeePerformance_{}.csv", range_suffix(&range)),
        report::performance_csv(&rows)?,
    ))
}
