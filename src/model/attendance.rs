use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::full_name;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Late,
    #[serde(rename = "Half-Day")]
    #[strum(serialize = "Half-Day")]
    HalfDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,
    pub check_in_time: NaiveDateTime,
    pub check_out_time: Option<NaiveDateTime>,
    pub check_in_location: Option<String>,
    pub check_out_location: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

impl Attendance {
    /// Worked time, present only once the record is closed.
    pub fn work_duration(&self) -> Option<Duration> {
        self.check_out_time.map(|out| out - self.check_in_time)
    }
}

/// An attendance row joined with the employee's name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceView {
    #[sqlx(flatten)]
    pub record: Attendance,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDto {
    #[schema(example = 42)]
    pub attendance_id: u64,
    #[schema(example = 5)]
    pub employee_id: u64,
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    pub check_in_time: NaiveDateTime,
    pub check_out_time: Option<NaiveDateTime>,
    pub check_in_location: Option<String>,
    pub check_out_location: Option<String>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    /// `HH:MM:SS`, null while checked in
    #[schema(example = "08:30:00")]
    pub work_duration: Option<String>,
}

impl From<AttendanceView> for AttendanceDto {
    fn from(view: AttendanceView) -> Self {
        let work_duration = view.record.work_duration().map(format_duration);
        let record = view.record;

        Self {
            attendance_id: record.id,
            employee_id: record.employee_id,
            employee_name: full_name(&view.first_name, &view.last_name),
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            check_in_location: record.check_in_location,
            check_out_location: record.check_out_location,
            status: record.status,
            notes: record.notes,
            work_duration,
        }
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    #[schema(example = 5)]
    pub employee_id: u64,
    #[schema(example = "Gate-A")]
    pub check_in_location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    #[schema(example = 5)]
    pub employee_id: u64,
    #[schema(example = "Gate-B")]
    pub check_out_location: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn view(check_out: Option<NaiveDateTime>) -> AttendanceView {
        AttendanceView {
            record: Attendance {
                id: 1,
                employee_id: 5,
                check_in_time: at(9, 0, 0),
                check_out_time: check_out,
                check_in_location: Some("Gate-A".into()),
                check_out_location: None,
                status: AttendanceStatus::Present,
                notes: None,
            },
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn open_record_has_no_work_duration() {
        let dto = AttendanceDto::from(view(None));
        assert_eq!(dto.check_out_time, None);
        assert_eq!(dto.work_duration, None);
        assert_eq!(dto.employee_name, "Jane Doe");
    }

    #[test]
    fn closed_record_reports_worked_time() {
        let dto = AttendanceDto::from(view(Some(at(17, 30, 15))));
        assert_eq!(dto.work_duration.as_deref(), Some("08:30:15"));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let value = serde_json::to_value(AttendanceDto::from(view(None))).unwrap();
        assert!(value.get("checkOutTime").unwrap().is_null());
        assert!(value.get("workDuration").unwrap().is_null());
        assert_eq!(value["checkInLocation"], "Gate-A");
    }

    #[test]
    fn half_day_keeps_its_hyphen() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "Half-Day");
        assert_eq!(
            AttendanceStatus::try_from("Half-Day".to_string()).unwrap(),
            AttendanceStatus::HalfDay
        );
        assert!(AttendanceStatus::try_from("Absent".to_string()).is_err());
    }
}
