use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::info;

use crate::db::is_missing_reference;
use crate::error::{ApiError, ApiResult, Validator};
use crate::model::meeting::{
    AttendeeStatus, AttendeeView, CreateMeeting, MeetingDto, MeetingView, UpdateMeeting,
    unique_attendees,
};
use crate::service::now;
use crate::utils::sql_filter::SqlFilter;

const SELECT_MEETING: &str = r#"
    SELECT m.id, m.title, m.description, m.meeting_date, m.duration, m.location,
           m.created_by, m.created_at,
           c.first_name AS creator_first_name, c.last_name AS creator_last_name
    FROM meetings m
    JOIN employees c ON c.id = m.created_by
"#;

const SELECT_ATTENDEES: &str = r#"
    SELECT ma.meeting_id, ma.employee_id, e.first_name, e.last_name, ma.status
    FROM meeting_attendees ma
    JOIN employees e ON e.id = ma.employee_id
"#;

const INVOLVES_EMPLOYEE: &str = r#"(m.created_by = ? OR EXISTS (
    SELECT 1 FROM meeting_attendees x WHERE x.meeting_id = m.id AND x.employee_id = ?))"#;

/// Pairs each meeting with its attendees, keeping the meetings' order.
fn assemble(meetings: Vec<MeetingView>, attendees: Vec<AttendeeView>) -> Vec<MeetingDto> {
    let mut by_meeting: HashMap<u64, Vec<AttendeeView>> = HashMap::new();
    for attendee in attendees {
        by_meeting.entry(attendee.meeting_id).or_default().push(attendee);
    }

    meetings
        .into_iter()
        .map(|m| {
            let attendees = by_meeting.remove(&m.id).unwrap_or_default();
            MeetingDto::from_view(m, attendees)
        })
        .collect()
}

async fn with_attendees(pool: &MySqlPool, meetings: Vec<MeetingView>) -> ApiResult<Vec<MeetingDto>> {
    if meetings.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; meetings.len()].join(", ");
    let sql = format!(
        "{} WHERE ma.meeting_id IN ({}) ORDER BY ma.meeting_id, e.first_name, e.last_name",
        SELECT_ATTENDEES, placeholders
    );

    let mut query = sqlx::query_as::<_, AttendeeView>(&sql);
    for m in &meetings {
        query = query.bind(m.id);
    }
    let attendees = query.fetch_all(pool).await?;

    Ok(assemble(meetings, attendees))
}

async fn fetch_views(pool: &MySqlPool, filter: SqlFilter, order: &str) -> ApiResult<Vec<MeetingView>> {
    let sql = format!("{}{} ORDER BY {}", SELECT_MEETING, filter.where_clause(), order);
    let views = filter
        .bind(sqlx::query_as::<_, MeetingView>(&sql))
        .fetch_all(pool)
        .await?;
    Ok(views)
}

/// All meetings, or those the employee created or is invited to; newest schedule first.
pub async fn list(pool: &MySqlPool, employee_id: Option<u64>) -> ApiResult<Vec<MeetingDto>> {
    let mut filter = SqlFilter::new();
    if let Some(id) = employee_id {
        filter.and(INVOLVES_EMPLOYEE, [id, id]);
    }

    let views = fetch_views(pool, filter, "m.meeting_date DESC").await?;
    with_attendees(pool, views).await
}

pub async fn upcoming(pool: &MySqlPool, employee_id: u64) -> ApiResult<Vec<MeetingDto>> {
    let mut filter = SqlFilter::new();
    filter
        .and("m.meeting_date >= ?", [now()])
        .and(INVOLVES_EMPLOYEE, [employee_id, employee_id]);

    let views = fetch_views(pool, filter, "m.meeting_date ASC").await?;
    with_attendees(pool, views).await
}

pub async fn get(pool: &MySqlPool, id: u64) -> ApiResult<MeetingDto> {
    let mut filter = SqlFilter::new();
    filter.and("m.id = ?", [id]);

    let views = fetch_views(pool, filter, "m.id").await?;
    if views.is_empty() {
        return Err(ApiError::not_found("Meeting not found"));
    }

    with_attendees(pool, views)
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found("Meeting not found"))
}

async fn insert_attendees(
    tx: &mut Transaction<'_, MySql>,
    meeting_id: u64,
    employee_ids: &[u64],
) -> ApiResult<()> {
    for employee_id in unique_attendees(employee_ids) {
        let inserted = sqlx::query(
            "INSERT INTO meeting_attendees (meeting_id, employee_id, status) VALUES (?, ?, ?)",
        )
        .bind(meeting_id)
        .bind(employee_id)
        .bind(AttendeeStatus::Invited.to_string())
        .execute(&mut **tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_missing_reference(&e) => {
                return Err(ApiError::field(
                    "attendeeIds",
                    format!("Employee {} does not exist", employee_id),
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn validate_schedule(title: Option<&str>, duration: Option<i32>) -> ApiResult<()> {
    Validator::new()
        .check(title.is_none_or(|t| !t.trim().is_empty()), "title", "title is required")
        .check(duration.is_none_or(|d| d > 0), "duration", "duration must be a positive number of minutes")
        .finish()
}

/// Inserts the meeting and its `Invited` attendees in one transaction.
pub async fn create(pool: &MySqlPool, dto: CreateMeeting, created_by: u64) -> ApiResult<MeetingDto> {
    validate_schedule(Some(&dto.title), Some(dto.duration))?;

    let mut tx = pool.begin().await?;

    let meeting_id = sqlx::query(
        r#"
        INSERT INTO meetings (title, description, meeting_date, duration, location, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(dto.title.trim())
    .bind(&dto.description)
    .bind(dto.meeting_date)
    .bind(dto.duration)
    .bind(&dto.location)
    .bind(created_by)
    .bind(now())
    .execute(&mut *tx)
    .await?
    .last_insert_id();

    insert_attendees(&mut tx, meeting_id, &dto.attendee_ids).await?;
    tx.commit().await?;

    info!(meeting_id, created_by, attendees = dto.attendee_ids.len(), "Meeting created");
    get(pool, meeting_id).await
}

#[derive(sqlx::FromRow)]
struct MeetingRow {
    title: String,
    description: Option<String>,
    meeting_date: NaiveDateTime,
    duration: i32,
    location: Option<String>,
}

/// Partial update; a supplied attendee list replaces the previous one.
pub async fn update(pool: &MySqlPool, id: u64, dto: UpdateMeeting) -> ApiResult<MeetingDto> {
    validate_schedule(dto.title.as_deref(), dto.duration)?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, MeetingRow>(
        "SELECT title, description, meeting_date, duration, location FROM meetings WHERE id = ? FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    sqlx::query(
        r#"
        UPDATE meetings
        SET title = ?, description = ?, meeting_date = ?, duration = ?, location = ?
        WHERE id = ?
        "#,
    )
    .bind(dto.title.as_deref().map(str::trim).unwrap_or(&current.title))
    .bind(dto.description.as_ref().or(current.description.as_ref()))
    .bind(dto.meeting_date.unwrap_or(current.meeting_date))
    .bind(dto.duration.unwrap_or(current.duration))
    .bind(dto.location.as_ref().or(current.location.as_ref()))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(attendee_ids) = &dto.attendee_ids {
        sqlx::query("DELETE FROM meeting_attendees WHERE meeting_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_attendees(&mut tx, id, attendee_ids).await?;
    }

    tx.commit().await?;

    info!(meeting_id = id, "Meeting updated");
    get(pool, id).await
}

pub async fn update_attendee_status(
    pool: &MySqlPool,
    meeting_id: u64,
    employee_id: u64,
    status: AttendeeStatus,
) -> ApiResult<()> {
    // Checked first: MySQL reports zero affected rows when the status is unchanged.
    let invited: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM meeting_attendees WHERE meeting_id = ? AND employee_id = ?)",
    )
    .bind(meeting_id)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    if invited == 0 {
        return Err(ApiError::not_found("Meeting or attendee not found"));
    }

    sqlx::query("UPDATE meeting_attendees SET status = ? WHERE meeting_id = ? AND employee_id = ?")
        .bind(status.to_string())
        .bind(meeting_id)
        .bind(employee_id)
        .execute(pool)
        .await?;

    info!(meeting_id, employee_id, %status, "Attendee status updated");
    Ok(())
}

pub async fn delete(pool: &MySqlPool, id: u64) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM meetings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Meeting not found"));
    }

    info!(meeting_id = id, "Meeting deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn view(id: u64) -> MeetingView {
        let at = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        MeetingView {
            id,
            title: format!("Meeting {}", id),
            description: None,
            meeting_date: at,
            duration: 30,
            location: None,
            created_by: 1,
            created_at: at,
            creator_first_name: "Ada".into(),
            creator_last_name: "Admin".into(),
        }
    }

    fn attendee(meeting_id: u64, employee_id: u64) -> AttendeeView {
        AttendeeView {
            meeting_id,
            employee_id,
            first_name: "E".into(),
            last_name: employee_id.to_string(),
            status: AttendeeStatus::Invited,
        }
    }

    #[test]
    fn attendees_land_on_their_own_meeting() {
        let dtos = assemble(
            vec![view(2), view(1)],
            vec![attendee(1, 5), attendee(2, 6), attendee(1, 7)],
        );

        assert_eq!(dtos[0].meeting_id, 2);
        assert_eq!(dtos[0].attendees.len(), 1);
        assert_eq!(dtos[1].attendees.iter().map(|a| a.employee_id).collect::<Vec<_>>(), [5, 7]);
    }

    #[test]
    fn meeting_without_attendees_has_an_empty_list() {
        let dtos = assemble(vec![view(3)], vec![]);
        assert!(dtos[0].attendees.is_empty());
    }

    #[test]
    fn schedule_validation() {
        assert!(validate_schedule(Some("Standup"), Some(15)).is_ok());
        assert!(validate_schedule(None, None).is_ok());
        assert!(validate_schedule(Some("  "), Some(15)).is_err());
        assert!(validate_schedule(Some("Standup"), Some(0)).is_err());
    }
}
