//! Summary statistics over a date range. Rows are fetched with plain selects and
//! aggregated in memory by the `build_*` functions, which hold all the rules.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::model::attendance::AttendanceStatus;
use crate::model::full_name;
use crate::model::report::{
    AttendanceReportRow, AttendanceSample, DailyAttendanceRow, EmployeePerformanceRow,
    ReportEmployee, TaskAnalytics, TaskByEmployee, TaskSample,
};
use crate::model::task::{TaskStatus, TaskView};
use crate::service::{day_bounds, now, task};
use crate::utils::sql_filter::SqlFilter;

const NO_DEPARTMENT: &str = "N/A";

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ApiResult<Self> {
        if end < start {
            return Err(ApiError::field("endDate", "endDate must not be before startDate"));
        }
        if end.succ_opt().is_none() {
            return Err(ApiError::field("endDate", "endDate is out of range"));
        }
        Ok(Self { start, end })
    }

    pub fn days(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The part of the range on or after `date`, if any.
    pub fn clipped_from(&self, date: NaiveDate) -> Option<Self> {
        let start = self.start.max(date);
        (start <= self.end).then_some(Self { start, end: self.end })
    }

    pub fn bounds(&self) -> ApiResult<(NaiveDateTime, NaiveDateTime)> {
        day_bounds(self.start, self.end)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage in [0, 100], 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2((f64::from(part) / f64::from(whole) * 100.0).min(100.0))
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTally {
    present: u32,
    late: u32,
    half_day: u32,
}

impl DayTally {
    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
        }
    }

    fn days(&self) -> u32 {
        self.present + self.late + self.half_day
    }
}

/// A day counts once, tagged with the status of its first check-in.
fn first_per_day<'a>(
    records: impl IntoIterator<Item = &'a AttendanceSample>,
) -> BTreeMap<NaiveDate, &'a AttendanceSample> {
    let mut days: BTreeMap<NaiveDate, &AttendanceSample> = BTreeMap::new();
    for record in records {
        days.entry(record.check_in_time.date())
            .and_modify(|first| {
                if record.check_in_time < first.check_in_time {
                    *first = record;
                }
            })
            .or_insert(record);
    }
    days
}

fn group_by_employee(records: &[AttendanceSample]) -> HashMap<u64, Vec<&AttendanceSample>> {
    let mut grouped: HashMap<u64, Vec<&AttendanceSample>> = HashMap::new();
    for record in records {
        grouped.entry(record.employee_id).or_default().push(record);
    }
    grouped
}

/// Per-employee attendance over the part of `range` after their join date.
struct EmployeeAttendance {
    total_days: u32,
    tally: DayTally,
    hours: f64,
}

impl EmployeeAttendance {
    fn collect(range: &DateRange, join_date: NaiveDate, records: &[&AttendanceSample]) -> Self {
        let Some(effective) = range.clipped_from(join_date) else {
            return Self { total_days: 0, tally: DayTally::default(), hours: 0.0 };
        };

        let in_range: Vec<&AttendanceSample> = records
            .iter()
            .copied()
            .filter(|r| effective.contains(r.check_in_time.date()))
            .collect();

        let mut tally = DayTally::default();
        for first in first_per_day(in_range.iter().copied()).values() {
            tally.add(first.status);
        }

        let seconds: i64 = in_range
            .iter()
            .filter_map(|r| r.check_out_time.map(|out| (out - r.check_in_time).num_seconds()))
            .sum();

        Self {
            total_days: effective.days(),
            tally,
            hours: round2(seconds as f64 / 3600.0),
        }
    }

    fn percentage(&self) -> f64 {
        percentage(self.tally.days(), self.total_days)
    }
}

pub fn build_attendance_report(
    range: &DateRange,
    employees: &[ReportEmployee],
    records: &[AttendanceSample],
) -> Vec<AttendanceReportRow> {
    let grouped = group_by_employee(records);

    employees
        .iter()
        .map(|emp| {
            let rows = grouped.get(&emp.id).map(Vec::as_slice).unwrap_or(&[]);
            let stats = EmployeeAttendance::collect(range, emp.join_date, rows);

            AttendanceReportRow {
                employee_id: emp.id,
                employee_name: full_name(&emp.first_name, &emp.last_name),
                department: emp.department_name.clone().unwrap_or_else(|| NO_DEPARTMENT.into()),
                total_days: stats.total_days,
                present_days: stats.tally.present,
                late_days: stats.tally.late,
                absent_days: stats.total_days.saturating_sub(stats.tally.days()),
                half_days: stats.tally.half_day,
                attendance_percentage: stats.percentage(),
                total_hours_worked: stats.hours,
            }
        })
        .collect()
}

pub fn build_task_analytics(tasks: &[TaskView], now: NaiveDateTime) -> TaskAnalytics {
    let by_status = |status: TaskStatus| count(tasks.iter().filter(|t| t.task.status == status).count());

    let mut per_employee: BTreeMap<u64, TaskByEmployee> = BTreeMap::new();
    for view in tasks {
        let entry = per_employee
            .entry(view.task.assigned_to)
            .or_insert_with(|| TaskByEmployee {
                employee_id: view.task.assigned_to,
                employee_name: view.assignee_name(),
                assigned_tasks: 0,
                completed_tasks: 0,
                completion_rate: 0.0,
            });
        entry.assigned_tasks += 1;
        if view.task.status == TaskStatus::Completed {
            entry.completed_tasks += 1;
        }
    }

    let tasks_by_employee = per_employee
        .into_values()
        .map(|mut e| {
            e.completion_rate = percentage(e.completed_tasks, e.assigned_tasks);
            e
        })
        .collect();

    let total_tasks = count(tasks.len());
    let completed_tasks = by_status(TaskStatus::Completed);

    TaskAnalytics {
        total_tasks,
        pending_tasks: by_status(TaskStatus::Pending),
        in_progress_tasks: by_status(TaskStatus::InProgress),
        completed_tasks,
        cancelled_tasks: by_status(TaskStatus::Cancelled),
        completion_rate: percentage(completed_tasks, total_tasks),
        overdue_tasks: count(tasks.iter().filter(|t| t.task.is_overdue(now)).count()),
        tasks_by_employee,
    }
}

/// One row per date that has at least one check-in, ascending.
pub fn build_daily_attendance(total_employees: u32, records: &[AttendanceSample]) -> Vec<DailyAttendanceRow> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&AttendanceSample>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.check_in_time.date()).or_default().push(record);
    }

    by_date
        .into_iter()
        .map(|(date, rows)| {
            let mut first_per_employee: HashMap<u64, &AttendanceSample> = HashMap::new();
            for record in rows {
                first_per_employee
                    .entry(record.employee_id)
                    .and_modify(|first| {
                        if record.check_in_time < first.check_in_time {
                            *first = record;
                        }
                    })
                    .or_insert(record);
            }

            let mut tally = DayTally::default();
            for first in first_per_employee.values() {
                tally.add(first.status);
            }
            let attended = tally.days();

            DailyAttendanceRow {
                date,
                total_employees,
                present: tally.present,
                late: tally.late,
                half_day: tally.half_day,
                absent: total_employees.saturating_sub(attended),
                attendance_rate: percentage(attended, total_employees),
            }
        })
        .collect()
}

pub fn build_employee_performance(
    range: &DateRange,
    employees: &[ReportEmployee],
    records: &[AttendanceSample],
    tasks: &[TaskSample],
    meetings_attended: &HashMap<u64, u32>,
) -> Vec<EmployeePerformanceRow> {
    let grouped = group_by_employee(records);

    employees
        .iter()
        .map(|emp| {
            let rows = grouped.get(&emp.id).map(Vec::as_slice).unwrap_or(&[]);
            let attendance = EmployeeAttendance::collect(range, emp.join_date, rows);

            let assigned: Vec<&TaskSample> = tasks.iter().filter(|t| t.assigned_to == emp.id).collect();
            let tasks_assigned = count(assigned.len());
            let tasks_completed = count(
                assigned
                    .iter()
                    .filter(|t| t.status == TaskStatus::Completed)
                    .count(),
            );

            EmployeePerformanceRow {
                employee_id: emp.id,
                employee_name: full_name(&emp.first_name, &emp.last_name),
                department: emp.department_name.clone().unwrap_or_else(|| NO_DEPARTMENT.into()),
                attendance_rate: attendance.percentage(),
                tasks_assigned,
                tasks_completed,
                task_completion_rate: percentage(tasks_completed, tasks_assigned),
                meetings_attended: meetings_attended.get(&emp.id).copied().unwrap_or(0),
            }
        })
        .collect()
}

async fn fetch_employees(pool: &MySqlPool, department_id: Option<u64>) -> ApiResult<Vec<ReportEmployee>> {
    let mut filter = SqlFilter::new();
    filter.and_opt("e.department_id = ?", department_id);

    let sql = format!(
        r#"
        SELECT e.id, e.first_name, e.last_name, d.name AS department_name, e.join_date
        FROM employees e
        LEFT JOIN departments d ON d.id = e.department_id{}
        ORDER BY e.id
        "#,
        filter.where_clause()
    );

    Ok(filter
        .bind(sqlx::query_as::<_, ReportEmployee>(&sql))
        .fetch_all(pool)
        .await?)
}

async fn fetch_attendance(
    pool: &MySqlPool,
    range: &DateRange,
    department_id: Option<u64>,
) -> ApiResult<Vec<AttendanceSample>> {
    let (start, end) = range.bounds()?;
    let mut filter = SqlFilter::new();
    filter
        .and("a.check_in_time >= ?", [start])
        .and("a.check_in_time < ?", [end])
        .and_opt("e.department_id = ?", department_id);

    let sql = format!(
        r#"
        SELECT a.employee_id, a.check_in_time, a.check_out_time, a.status
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id{}
        ORDER BY a.check_in_time
        "#,
        filter.where_clause()
    );

    Ok(filter
        .bind(sqlx::query_as::<_, AttendanceSample>(&sql))
        .fetch_all(pool)
        .await?)
}

pub async fn attendance_report(
    pool: &MySqlPool,
    range: &DateRange,
    department_id: Option<u64>,
) -> ApiResult<Vec<AttendanceReportRow>> {
    let employees = fetch_employees(pool, department_id).await?;
    let records = fetch_attendance(pool, range, department_id).await?;

    debug!(employees = employees.len(), records = records.len(), "Building attendance report");
    Ok(build_attendance_report(range, &employees, &records))
}

/// Task analytics over tasks created within the optional bounds.
pub async fn task_analytics(
    pool: &MySqlPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ApiResult<TaskAnalytics> {
    if let (Some(start), Some(end)) = (start, end) {
        DateRange::new(start, end)?;
    }

    let from = start.map(|d| day_bounds(d, d)).transpose()?.map(|(from, _)| from);
    let until = end.map(|d| day_bounds(d, d)).transpose()?.map(|(_, until)| until);

    let mut filter = SqlFilter::new();
    filter
        .and_opt("t.created_at >= ?", from)
        .and_opt("t.created_at < ?", until);

    let tasks = task::fetch_views(pool, filter, "t.assigned_to, t.id").await?;

    debug!(tasks = tasks.len(), "Building task analytics");
    Ok(build_task_analytics(&tasks, now()))
}

pub async fn daily_attendance(pool: &MySqlPool, range: &DateRange) -> ApiResult<Vec<DailyAttendanceRow>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    let records = fetch_attendance(pool, range, None).await?;

    Ok(build_daily_attendance(
        u32::try_from(total).unwrap_or(0),
        &records,
    ))
}

pub async fn employee_performance(
    pool: &MySqlPool,
    range: &DateRange,
) -> ApiResult<Vec<EmployeePerformanceRow>> {
    let (start, end) = range.bounds()?;

    let employees = fetch_employees(pool, None).await?;
    let records = fetch_attendance(pool, range, None).await?;

    let tasks = sqlx::query_as::<_, TaskSample>(
        "SELECT assigned_to, status FROM tasks WHERE created_at >= ? AND created_at < ?",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let attended = sqlx::query_as::<_, (u64, i64)>(
        r#"
        SELECT ma.employee_id, COUNT(*)
        FROM meeting_attendees ma
        JOIN meetings m ON m.id = ma.meeting_id
        WHERE ma.status = 'Attended' AND m.meeting_date >= ? AND m.meeting_date < ?
        GROUP BY ma.employee_id
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(employee_id, n)| (employee_id, u32::try_from(n).unwrap_or(0)))
    .collect();

    Ok(build_employee_performance(range, &employees, &records, &tasks, &attended))
}

fn to_csv<const N: usize>(header: [&str; N], rows: impl IntoIterator<Item = [String; N]>) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))
}

fn num(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn attendance_csv(rows: &[AttendanceReportRow]) -> ApiResult<String> {
    to_csv(
        [
            "Employee ID", "Employee Name", "Department", "Total Days", "Present", "Late",
            "Absent", "Half-Day", "Attendance %", "Total Hours",
        ],
        rows.iter().map(|r| {
            [
                r.employee_id.to_string(),
                r.employee_name.clone(),
                r.department.clone(),
                r.total_days.to_string(),
                r.present_days.to_string(),
                r.late_days.to_string(),
                r.absent_days.to_string(),
                r.half_days.to_string(),
                num(r.attendance_percentage),
                num(r.total_hours_worked),
            ]
        }),
    )
}

pub fn task_csv(analytics: &TaskAnalytics) -> ApiResult<String> {
    to_csv(
        ["Employee ID", "Employee Name", "Assigned Tasks", "Completed Tasks", "Completion Rate %"],
        analytics.tasks_by_employee.iter().map(|e| {
            [
                e.employee_id.to_string(),
                e.employee_name.clone(),
                e.assigned_tasks.to_string(),
                e.completed_tasks.to_string(),
                num(e.completion_rate),
            ]
        }),
    )
}

pub fn daily_attendance_csv(rows: &[DailyAttendanceRow]) -> ApiResult<String> {
    to_csv(
        ["Date", "Total Employees", "Present", "Late", "Half-Day", "Absent", "Attendance Rate %"],
        rows.iter().map(|r| {
            [
                r.date.to_string(),
                r.total_employees.to_string(),
                r.present.to_string(),
                r.late.to_string(),
                r.half_day.to_string(),
                r.absent.to_string(),
                num(r.attendance_rate),
            ]
        }),
    )
}

pub fn performance_csv(rows: &[EmployeePerformanceRow]) -> ApiResult<String> {
    to_csv(
        [
            "Employee ID", "Employee Name", "Department", "Attendance Rate %", "Tasks Assigned",
            "Tasks Completed", "Task Completion Rate %", "Meetings Attended",
        ],
        rows.iter().map(|r| {
            [
                r.employee_id.to_string(),
                r.employee_name.clone(),
                r.department.clone(),
                num(r.attendance_rate),
                r.tasks_assigned.to_string(),
                r.tasks_completed.to_string(),
                num(r.task_completion_rate),
                r.meetings_attended.to_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Task, TaskPriority};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
        day.and_hms_opt(hour, 0, 0).unwrap()
    }

    fn employee(id: u64, joined: NaiveDate) -> ReportEmployee {
        ReportEmployee {
            id,
            first_name: "Emp".into(),
            last_name: id.to_string(),
            department_name: None,
            join_date: joined,
        }
    }

    fn worked(employee_id: u64, day: NaiveDate, status: AttendanceStatus) -> AttendanceSample {
        AttendanceSample {
            employee_id,
            check_in_time: at(day, 9),
            check_out_time: Some(at(day, 17)),
            status,
        }
    }

    fn march(range_days: u32) -> DateRange {
        DateRange::new(date(3, 1), date(3, range_days)).unwrap()
    }

    #[test]
    fn eighteen_of_twenty_days_is_ninety_percent() {
        let range = march(20);
        let records: Vec<_> = (1..=18)
            .map(|d| {
                let status = if d <= 15 { AttendanceStatus::Present } else { AttendanceStatus::Late };
                worked(1, date(3, d), status)
            })
            .collect();

        let report = build_attendance_report(&range, &[employee(1, date(1, 1))], &records);
        let row = &report[0];

        assert_eq!(row.total_days, 20);
        assert_eq!(row.present_days, 15);
        assert_eq!(row.late_days, 3);
        assert_eq!(row.absent_days, 2);
        assert_eq!(row.attendance_percentage, 90.0);
        assert_eq!(row.total_hours_worked, 144.0);
        assert_eq!(row.department, "N/A");
    }

    #[test]
    fn range_starts_at_the_join_date() {
        let range = march(31);
        let records = vec![worked(1, date(3, 22), AttendanceStatus::Present)];

        let report = build_attendance_report(&range, &[employee(1, date(3, 22))], &records);

        assert_eq!(report[0].total_days, 10);
        assert_eq!(report[0].absent_days, 9);
        assert_eq!(report[0].attendance_percentage, 10.0);
    }

    #[test]
    fn employee_joining_after_the_range_has_nothing_to_report() {
        let report = build_attendance_report(&march(31), &[employee(1, date(4, 2))], &[]);

        assert_eq!(report[0].total_days, 0);
        assert_eq!(report[0].absent_days, 0);
        assert_eq!(report[0].attendance_percentage, 0.0);
    }

    #[test]
    fn several_check_ins_on_one_day_count_once() {
        let day = date(3, 2);
        let records = vec![
            AttendanceSample {
                employee_id: 1,
                check_in_time: at(day, 14),
                check_out_time: None,
                status: AttendanceStatus::Late,
            },
            AttendanceSample {
                employee_id: 1,
                check_in_time: at(day, 8),
                check_out_time: Some(at(day, 12)),
                status: AttendanceStatus::Present,
            },
        ];

        let report = build_attendance_report(&march(2), &[employee(1, date(1, 1))], &records);

        assert_eq!(report[0].present_days, 1);
        assert_eq!(report[0].late_days, 0);
        assert_eq!(report[0].absent_days, 1);
        assert_eq!(report[0].attendance_percentage, 50.0);
        // open record contributes no hours
        assert_eq!(report[0].total_hours_worked, 4.0);
    }

    #[test]
    fn percentages_stay_in_bounds_and_round() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(5, 4), 100.0);
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(DateRange::new(date(3, 5), date(3, 4)).is_err());
        assert_eq!(DateRange::new(date(3, 5), date(3, 5)).unwrap().days(), 1);
    }

    #[test]
    fn range_ending_on_last_representable_date_is_rejected() {
        let err = DateRange::new(date(3, 1), NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    fn task_view(assigned_to: u64, status: TaskStatus, due: Option<NaiveDateTime>) -> TaskView {
        let created = at(date(3, 1), 9);
        TaskView {
            task: Task {
                id: 0,
                title: "t".into(),
                description: None,
                assigned_to,
                assigned_by: 99,
                status,
                priority: TaskPriority::Medium,
                start_date: None,
                due_date: due,
                completed_date: None,
                created_at: created,
                updated_at: created,
            },
            assignee_first_name: "Emp".into(),
            assignee_last_name: assigned_to.to_string(),
            assigner_first_name: "Boss".into(),
            assigner_last_name: "Person".into(),
        }
    }

    #[test]
    fn task_analytics_counts_and_rates() {
        let now = at(date(3, 10), 12);
        let past = Some(at(date(3, 5), 17));
        let tasks = vec![
            task_view(1, TaskStatus::Completed, past),
            task_view(1, TaskStatus::Pending, past),
            task_view(1, TaskStatus::InProgress, None),
            task_view(2, TaskStatus::Cancelled, past),
        ];

        let analytics = build_task_analytics(&tasks, now);

        assert_eq!(analytics.total_tasks, 4);
        assert_eq!(analytics.completed_tasks, 1);
        assert_eq!(analytics.pending_tasks, 1);
        assert_eq!(analytics.in_progress_tasks, 1);
        assert_eq!(analytics.cancelled_tasks, 1);
        assert_eq!(analytics.completion_rate, 25.0);
        assert_eq!(analytics.overdue_tasks, 1);

        let first = &analytics.tasks_by_employee[0];
        assert_eq!((first.employee_id, first.assigned_tasks, first.completed_tasks), (1, 3, 1));
        assert_eq!(first.completion_rate, 33.33);
        assert_eq!(analytics.tasks_by_employee[1].completion_rate, 0.0);
    }

    #[test]
    fn empty_task_set_has_zero_rates() {
        let analytics = build_task_analytics(&[], at(date(3, 1), 9));
        assert_eq!(analytics, TaskAnalytics::default());
    }

    #[test]
    fn daily_rows_are_sorted_and_absence_never_underflows() {
        let records = vec![
            worked(1, date(3, 3), AttendanceStatus::Late),
            worked(1, date(3, 2), AttendanceStatus::Present),
            worked(2, date(3, 2), AttendanceStatus::HalfDay),
            worked(3, date(3, 2), AttendanceStatus::Present),
        ];

        let rows = build_daily_attendance(2, &records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(3, 2));
        assert_eq!((rows[0].present, rows[0].half_day, rows[0].absent), (2, 1, 0));
        assert_eq!(rows[0].attendance_rate, 100.0);
        assert_eq!((rows[1].late, rows[1].absent), (1, 1));
        assert_eq!(rows[1].attendance_rate, 50.0);
    }

    #[test]
    fn performance_combines_attendance_tasks_and_meetings() {
        let range = march(10);
        let records: Vec<_> = (1..=5).map(|d| worked(1, date(3, d), AttendanceStatus::Present)).collect();
        let tasks = vec![
            TaskSample { assigned_to: 1, status: TaskStatus::Completed },
            TaskSample { assigned_to: 1, status: TaskStatus::Pending },
            TaskSample { assigned_to: 2, status: TaskStatus::Completed },
        ];
        let meetings = HashMap::from([(1, 3)]);

        let rows = build_employee_performance(
            &range,
            &[employee(1, date(1, 1)), employee(2, date(1, 1))],
            &records,
            &tasks,
            &meetings,
        );

        assert_eq!(rows[0].attendance_rate, 50.0);
        assert_eq!((rows[0].tasks_assigned, rows[0].tasks_completed), (2, 1));
        assert_eq!(rows[0].task_completion_rate, 50.0);
        assert_eq!(rows[0].meetings_attended, 3);
        assert_eq!(rows[1].attendance_rate, 0.0);
        assert_eq!(rows[1].task_completion_rate, 100.0);
        assert_eq!(rows[1].meetings_attended, 0);
    }

    #[test]
    fn csv_quotes_text_with_commas_and_quotes() {
        let row = AttendanceReportRow {
            employee_id: 7,
            employee_name: "Doe, \"JD\" Jane".into(),
            department: "R&D".into(),
            total_days: 20,
            present_days: 15,
            late_days: 3,
            absent_days: 2,
            half_days: 0,
            attendance_percentage: 90.0,
            total_hours_worked: 144.5,
        };

        let csv = attendance_csv(&[row]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Employee ID,Employee Name,Department,Total Days,Present,Late,Absent,Half-Day,Attendance %,Total Hours"
        );
        assert_eq!(lines[1], r#"7,"Doe, ""JD"" Jane",R&D,20,15,3,2,0,90.00,144.50"#);
    }

    #[test]
    fn empty_export_still_has_a_header() {
        let csv = task_csv(&TaskAnalytics::default()).unwrap();
        assert_eq!(csv, "Employee ID,Employee Name,Assigned Tasks,Completed Tasks,Completion Rate %\n");
    }
}
