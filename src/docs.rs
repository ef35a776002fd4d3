use crate::model::attendance::{AttendanceDto, AttendanceStatus, CheckIn, CheckOut};
use crate::model::department::Department;
use crate::model::employee::{CreateEmployee, EmployeeDto, UpdateEmployee};
use crate::model::meeting::{
    AttendeeStatus, CreateMeeting, MeetingAttendeeDto, MeetingDto, UpdateAttendeeStatus, UpdateMeeting,
};
use crate::model::report::{
    AttendanceReportRow, DailyAttendanceRow, EmployeePerformanceRow, TaskAnalytics, TaskByEmployee,
};
use crate::model::role::Role;
use crate::model::task::{CreateTask, TaskDto, TaskPriority, TaskStatus, UpdateTask, UpdateTaskStatus};
use crate::model::user::{LoginRequest, LoginResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staff Operations Management API",
        version = "1.0.0",
        description = r#"
## Staff Operations Management System (SOMS)

Back office for day-to-day staff operations.

### Key Features
- **Attendance**: daily check-in and check-out with on-time, late and half-day classification
- **Employees**: profiles, departments and login accounts
- **Meetings**: scheduling, invitations and attendee responses
- **Tasks**: assignment, progress tracking and overdue lists
- **Reports**: attendance, task and performance summaries, each exportable as CSV

### Security
Everything except `/api/health` and `/api/auth/login` needs a **JWT Bearer** token.
Writes on employees, meetings and tasks, and all reports, are limited to **HR** and **Admin**;
deleting an employee is **Admin** only.
"#,
    ),
    paths(
        crate::api::health::health,
        crate::api::auth::login,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::by_date,
        crate::api::attendance::by_employee,
        crate::api::attendance::by_id,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::department::list_departments,

        crate::api::meeting::list_meetings,
        crate::api::meeting::upcoming_meetings,
        crate::api::meeting::my_meetings,
        crate::api::meeting::get_meeting,
        crate::api::meeting::create_meeting,
        crate::api::meeting::update_meeting,
        crate::api::meeting::delete_meeting,
        crate::api::meeting::update_attendee_status,

        crate::api::task::list_tasks,
        crate::api::task::my_tasks,
        crate::api::task::overdue_tasks,
        crate::api::task::get_task,
        crate::api::task::create_task,
        crate::api::task::update_task,
        crate::api::task::update_task_status,
        crate::api::task::delete_task,

        crate::api::report::attendance_report,
        crate::api::report::export_attendance_report,
        crate::api::report::task_analytics,
        crate::api::report::export_task_analytics,
        crate::api::report::daily_attendance,
        crate::api::report::export_daily_attendance,
        crate::api::report::employee_performance,
        crate::api::report::export_employee_performance
    ),
    components(
        schemas(
            Role,
            LoginRequest,
            LoginResponse,
            AttendanceStatus,
            AttendanceDto,
            CheckIn,
            CheckOut,
            Department,
            CreateEmployee,
            UpdateEmployee,
            EmployeeDto,
            AttendeeStatus,
            MeetingAttendeeDto,
            MeetingDto,
            CreateMeeting,
            UpdateMeeting,
            UpdateAttendeeStatus,
            TaskStatus,
            TaskPriority,
            TaskDto,
            CreateTask,
            UpdateTask,
            UpdateTaskStatus,
            AttendanceReportRow,
            TaskByEmployee,
            TaskAnalytics,
            DailyAttendanceRow,
            EmployeePerformanceRow
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Login and token issue"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department lookup"),
        (name = "Meeting", description = "Meeting management APIs"),
        (name = "Task", description = "Task management APIs"),
        (name = "Report", description = "Reports and CSV exports"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/auth/login",
            "/api/attendance/checkin",
            "/api/attendance/employee/{id}",
            "/api/employees/{id}",
            "/api/departments",
            "/api/meetings/{id}/status",
            "/api/tasks/overdue",
            "/api/reports/employee-performance/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
