use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::MySqlPool;
use tracing::{debug, info};

use crate::db::{ER_DUP_ENTRY, ER_NO_REFERENCED_ROW, mysql_error_number};
use crate::error::{ApiError, ApiResult};
use crate::model::attendance::{
    Attendance, AttendanceDto, AttendanceStatus, AttendanceView, CheckIn, CheckOut,
};
use crate::service::{day_bounds, now};
use crate::utils::checkin_lock;
use crate::utils::sql_filter::SqlFilter;

const ALREADY_CHECKED_IN: &str = "Already checked in today or invalid employee";
const NOT_CHECKED_IN: &str = "Attendance not found or already checked out";

const SELECT_ATTENDANCE: &str = r#"
    SELECT a.id, a.employee_id, a.check_in_time, a.check_out_time,
           a.check_in_location, a.check_out_location, a.status, a.notes,
           e.first_name, e.last_name
    FROM attendance a
    JOIN employees e ON e.id = a.employee_id
"#;

/// How check-in and check-out times translate into a status tag.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendancePolicy {
    pub late_after: NaiveTime,
    pub half_day_hours: f64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_after: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or(NaiveTime::MIN),
            half_day_hours: 4.0,
        }
    }
}

impl AttendancePolicy {
    pub fn check_in_status(&self, check_in: NaiveDateTime) -> AttendanceStatus {
        if check_in.time() > self.late_after {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }

    pub fn check_out_status(
        &self,
        current: AttendanceStatus,
        check_in: NaiveDateTime,
        check_out: NaiveDateTime,
    ) -> AttendanceStatus {
        let worked_hours = (check_out - check_in).num_seconds() as f64 / 3600.0;
        if worked_hours < self.half_day_hours {
            AttendanceStatus::HalfDay
        } else {
            current
        }
    }
}

fn refuse_if_open(open_today: bool) -> ApiResult<()> {
    if open_today {
        Err(ApiError::bad_request(ALREADY_CHECKED_IN))
    } else {
        Ok(())
    }
}

/// Insert failures that mean "already checked in": the unique open-day key,
/// or an employee id with no row behind it.
fn insert_refusal(error_number: Option<u16>) -> Option<ApiError> {
    matches!(error_number, Some(ER_DUP_ENTRY | ER_NO_REFERENCED_ROW))
        .then(|| ApiError::bad_request(ALREADY_CHECKED_IN))
}

pub async fn check_in(
    pool: &MySqlPool,
    policy: &AttendancePolicy,
    dto: CheckIn,
) -> ApiResult<AttendanceDto> {
    let _guard = checkin_lock::lock_employee(dto.employee_id).await;

    let now = now();
    let (day_start, day_end) = day_bounds(now.date(), now.date())?;

    let open: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM attendance
            WHERE employee_id = ? AND check_out_time IS NULL
              AND check_in_time >= ? AND check_in_time < ?
        )
        "#,
    )
    .bind(dto.employee_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_one(pool)
    .await?;

    if let Err(refused) = refuse_if_open(open != 0) {
        debug!(employee_id = dto.employee_id, "Duplicate check-in refused");
        return Err(refused);
    }

    let status = policy.check_in_status(now);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, check_in_time, check_in_location, status, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(dto.employee_id)
    .bind(now)
    .bind(&dto.check_in_location)
    .bind(status.to_string())
    .bind(&dto.notes)
    .execute(pool)
    .await;

    let id = match result {
        Ok(done) => done.last_insert_id(),
        Err(e) => match insert_refusal(mysql_error_number(&e)) {
            Some(refused) => {
                debug!(employee_id = dto.employee_id, error = %e, "Check-in rejected by database");
                return Err(refused);
            }
            None => return Err(e.into()),
        },
    };

    info!(employee_id = dto.employee_id, attendance_id = id, %status, "Checked in");
    by_id(pool, id).await
}

pub async fn check_out(
    pool: &MySqlPool,
    policy: &AttendancePolicy,
    dto: CheckOut,
) -> ApiResult<AttendanceDto> {
    let _guard = checkin_lock::lock_employee(dto.employee_id).await;

    let now = now();
    let (day_start, day_end) = day_bounds(now.date(), now.date())?;

    let mut tx = pool.begin().await?;

    let open = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, check_in_time, check_out_time,
               check_in_location, check_out_location, status, notes
        FROM attendance
        WHERE employee_id = ? AND check_out_time IS NULL
          AND check_in_time >= ? AND check_in_time < ?
        ORDER BY check_in_time DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(dto.employee_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(record) = open else {
        return Err(ApiError::bad_request(NOT_CHECKED_IN));
    };

    let status = policy.check_out_status(record.status, record.check_in_time, now);
    let notes = dto
        .notes
        .filter(|n| !n.trim().is_empty())
        .or(record.notes);

    sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = ?, check_out_location = ?, status = ?, notes = ?
        WHERE id = ?
        "#,
    )
    .bind(now)
    .bind(&dto.check_out_location)
    .bind(status.to_string())
    .bind(notes)
    .bind(record.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(employee_id = dto.employee_id, attendance_id = record.id, %status, "Checked out");
    by_id(pool, record.id).await
}

pub async fn by_id(pool: &MySqlPool, id: u64) -> ApiResult<AttendanceDto> {
    let sql = format!("{} WHERE a.id = ?", SELECT_ATTENDANCE);

    sqlx::query_as::<_, AttendanceView>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(AttendanceDto::from)
        .ok_or_else(|| ApiError::not_found("Attendance record not found"))
}

pub async fn today(pool: &MySqlPool) -> ApiResult<Vec<AttendanceDto>> {
    by_date(pool, now().date()).await
}

pub async fn by_date(pool: &MySqlPool, date: NaiveDate) -> ApiResult<Vec<AttendanceDto>> {
    let (start, end) = day_bounds(date, date)?;
    let sql = format!(
        "{} WHERE a.check_in_time >= ? AND a.check_in_time < ? ORDER BY a.check_in_time ASC",
        SELECT_ATTENDANCE
    );

    let rows = sqlx::query_as::<_, AttendanceView>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(AttendanceDto::from).collect())
}

/// Employee history, newest first; either bound may be omitted.
pub async fn by_employee(
    pool: &MySqlPool,
    employee_id: u64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ApiResult<Vec<AttendanceDto>> {
    let from = start.map(|d| day_bounds(d, d)).transpose()?.map(|(from, _)| from);
    let until = end.map(|d| day_bounds(d, d)).transpose()?.map(|(_, until)| until);

    let mut filter = SqlFilter::new();
    filter
        .and("a.employee_id = ?", [employee_id])
        .and_opt("a.check_in_time >= ?", from)
        .and_opt("a.check_in_time < ?", until);

    let sql = format!(
        "{}{} ORDER BY a.check_in_time DESC",
        SELECT_ATTENDANCE,
        filter.where_clause()
    );

    let rows = filter
        .bind(sqlx::query_as::<_, AttendanceView>(&sql))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(AttendanceDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn check_in_after_threshold_is_late() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.check_in_status(at(8, 55)), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(at(9, 15)), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(at(9, 16)), AttendanceStatus::Late);
    }

    #[test]
    fn short_day_becomes_half_day() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Late, at(9, 30), at(12, 0)),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Late, at(9, 30), at(17, 30)),
            AttendanceStatus::Late
        );
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Present, at(9, 0), at(13, 0)),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn second_check_in_same_day_is_refused() {
        assert!(refuse_if_open(false).is_ok());

        let err = refuse_if_open(true).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Already checked in today or invalid employee");
    }

    #[test]
    fn open_day_key_and_unknown_employee_refuse_check_in() {
        for number in [ER_DUP_ENTRY, ER_NO_REFERENCED_ROW] {
            let err = insert_refusal(Some(number)).unwrap();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), ALREADY_CHECKED_IN);
        }
    }

    #[test]
    fn other_insert_failures_stay_database_errors() {
        assert!(insert_refusal(Some(1205)).is_none());
        assert!(insert_refusal(None).is_none());
    }
}
