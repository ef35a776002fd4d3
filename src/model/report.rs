use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::AttendanceStatus;
use crate::model::task::TaskStatus;

/// Inclusive calendar-date range query.
#[derive(Debug, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    #[param(example = "2026-03-01")]
    pub start_date: NaiveDate,
    #[param(example = "2026-03-31")]
    pub end_date: NaiveDate,
    /// Only used by the attendance report
    pub department_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OptionalDateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Employee columns the reports need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportEmployee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub department_name: Option<String>,
    pub join_date: NaiveDate,
}

/// One attendance row as the reports see it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceSample {
    pub employee_id: u64,
    pub check_in_time: NaiveDateTime,
    pub check_out_time: Option<NaiveDateTime>,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskSample {
    pub assigned_to: u64,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReportRow {
    pub employee_id: u64,
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    pub total_days: u32,
    pub present_days: u32,
    pub late_days: u32,
    pub absent_days: u32,
    pub half_days: u32,
    #[schema(example = 90.0)]
    pub attendance_percentage: f64,
    pub total_hours_worked: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskByEmployee {
    pub employee_id: u64,
    pub employee_name: String,
    pub assigned_tasks: u32,
    pub completed_tasks: u32,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalytics {
    pub total_tasks: u32,
    pub pending_tasks: u32,
    pub in_progress_tasks: u32,
    pub completed_tasks: u32,
    pub cancelled_tasks: u32,
    pub completion_rate: f64,
    pub overdue_tasks: u32,
    pub tasks_by_employee: Vec<TaskByEmployee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendanceRow {
    pub date: NaiveDate,
    pub total_employees: u32,
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
    pub absent: u32,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePerformanceRow {
    pub employee_id: u64,
    pub employee_name: String,
    pub department: String,
    pub attendance_rate: f64,
    pub tasks_assigned: u32,
    pub tasks_completed: u32,
    pub task_completion_rate: f64,
    pub meetings_attended: u32,
}
