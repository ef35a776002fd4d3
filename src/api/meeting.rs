use crate::auth::auth::AuthUser;
use crate::model::meeting::{CreateMeeting, MeetingDto, UpdateAttendeeStatus, UpdateMeeting};
use crate::service::meeting;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MeetingQuery {
    /// Meetings this employee created or is invited to
    pub employee_id: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/meetings",
    params(MeetingQuery),
    responses(
        (status = 200, description = "Meetings, latest schedule first", body = [MeetingDto]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn list_meetings(
    pool: web::Data<MySqlPool>,
    query: web::Query<MeetingQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(meeting::list(pool.get_ref(), query.employee_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/meetings/upcoming",
    responses(
        (status = 200, description = "Caller's meetings from now on, soonest first", body = [MeetingDto]),
        (status = 403, description = "No employee profile")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn upcoming_meetings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;
    Ok(HttpResponse::Ok().json(meeting::upcoming(pool.get_ref(), employee_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/meetings/my-meetings",
    responses(
        (status = 200, description = "Meetings the caller created or is invited to", body = [MeetingDto]),
        (status = 403, description = "No employee profile")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn my_meetings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;
    Ok(HttpResponse::Ok().json(meeting::list(pool.get_ref(), Some(employee_id)).await?))
}

#[utoipa::path(
    get,
    path = "/api/meetings/{id}",
    params(("id" = u64, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Meeting with attendees", body = MeetingDto),
        (status = 404, description = "Meeting not found")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn get_meeting(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(meeting::get(pool.get_ref(), path.into_inner()).await?))
}

#[utoipa::path(
    post,
    path = "/api/meetings",
    request_body = CreateMeeting,
    responses(
        (status = 201, description = "Meeting created, attendees invited", body = MeetingDto),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "HR/Admin only, or no employee profile")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn create_meeting(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateMeeting>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let created_by = auth.require_employee_id()?;

    let created = meeting::create(pool.get_ref(), payload.into_inner(), created_by).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/api/meetings/{id}",
    params(("id" = u64, Path, description = "Meeting id")),
    request_body = UpdateMeeting,
    responses(
        (status = 200, description = "Updated meeting", body = MeetingDto),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Meeting not found")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn update_meeting(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateMeeting>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let updated = meeting::update(pool.get_ref(), path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    params(("id" = u64, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Meeting deleted", body = Object, example = json!({
            "message": "Meeting deleted successfully"
        })),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Meeting not found")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn delete_meeting(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    meeting::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Meeting deleted successfully" })))
}

/// Caller answers their own invitation
#[utoipa::path(
    put,
    path = "/api/meetings/{id}/status",
    params(("id" = u64, Path, description = "Meeting id")),
    request_body = UpdateAttendeeStatus,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Status updated successfully"
        })),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "No employee profile"),
        (status = 404, description = "Meeting or attendee not found")
    ),
    tag = "Meeting",
    security(("bearer_auth" = []))
)]
pub async fn update_attendee_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAttendeeStatus>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    meeting::update_attendee_status(pool.get_ref(), path.into_inner(), employee_id, payload.status).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Status updated successfully" })))
}
