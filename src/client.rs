//! Typed HTTP client for the REST surface.
//!
//! There is no ambient login state: `login` hands back a [`Session`] and every
//! authenticated call takes one.

use std::time::Duration;

use derive_more::Display;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::attendance::{AttendanceDto, CheckIn, CheckOut};
use crate::model::department::Department;
use crate::model::employee::{CreateEmployee, EmployeeDto, UpdateEmployee};
use crate::model::meeting::{CreateMeeting, MeetingDto, UpdateAttendeeStatus};
use crate::model::report::{
    AttendanceReportRow, DailyAttendanceRow, DateRangeQuery, EmployeePerformanceRow,
    OptionalDateRangeQuery, TaskAnalytics,
};
use crate::model::task::{CreateTask, TaskDto, TaskStatus, UpdateTask, UpdateTaskStatus};
use crate::model::user::{LoginRequest, LoginResponse};

#[derive(Debug, Display)]
pub enum ClientError {
    #[display(fmt = "request failed: {}", _0)]
    Transport(reqwest::Error),
    #[display(fmt = "{}: {}", status, message)]
    Api { status: StatusCode, message: String },
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The caller's token and who it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: LoginResponse,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match session {
            Some(s) => builder.bearer_auth(&s.token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> ClientResult<reqwest::Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        Err(ClientError::Api { status, message })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
        Ok(Self::send(builder).await?.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ClientResult<T> {
        Self::json(self.request(Method::GET, path, Some(session))).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        Self::json(self.request(Method::GET, path, Some(session)).query(query)).await
    }

    async fn with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        session: &Session,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        Self::json(self.request(method, path, Some(session)).json(body)).await
    }

    async fn get_text<Q: Serialize>(&self, session: &Session, path: &str, query: &Q) -> ClientResult<String> {
        Ok(Self::send(self.request(Method::GET, path, Some(session)).query(query))
            .await?
            .text()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let user: LoginResponse = Self::json(self.request(Method::POST, "/auth/login", None).json(&body)).await?;
        Ok(Session {
            token: user.token.clone(),
            user,
        })
    }

    pub async fn health(&self) -> ClientResult<Value> {
        Self::json(self.request(Method::GET, "/health", None)).await
    }

    // attendance

    pub async fn check_in(&self, session: &Session, body: &CheckIn) -> ClientResult<AttendanceDto> {
        self.with_body(Method::POST, session, "/attendance/checkin", body).await
    }

    pub async fn check_out(&self, session: &Session, body: &CheckOut) -> ClientResult<AttendanceDto> {
        self.with_body(Method::POST, session, "/attendance/checkout", body).await
    }

    pub async fn today_attendance(&self, session: &Session) -> ClientResult<Vec<AttendanceDto>> {
        self.get(session, "/attendance/today").await
    }

    pub async fn attendance_for_employee(
        &self,
        session: &Session,
        employee_id: u64,
        range: &OptionalDateRangeQuery,
    ) -> ClientResult<Vec<AttendanceDto>> {
        self.get_query(session, &format!("/attendance/employee/{employee_id}"), range).await
    }

    // employees

    pub async fn list_employees(&self, session: &Session) -> ClientResult<Vec<EmployeeDto>> {
        self.get(session, "/employees").await
    }

    pub async fn get_employee(&self, session: &Session, id: u64) -> ClientResult<EmployeeDto> {
        self.get(session, &format!("/employees/{id}")).await
    }

    pub async fn create_employee(&self, session: &Session, body: &CreateEmployee) -> ClientResult<EmployeeDto> {
        self.with_body(Method::POST, session, "/employees", body).await
    }

    pub async fn update_employee(
        &self,
        session: &Session,
        id: u64,
        body: &UpdateEmployee,
    ) -> ClientResult<EmployeeDto> {
        self.with_body(Method::PUT, session, &format!("/employees/{id}"), body).await
    }

    pub async fn delete_employee(&self, session: &Session, id: u64) -> ClientResult<()> {
        Self::send(self.request(Method::DELETE, &format!("/employees/{id}"), Some(session))).await?;
        Ok(())
    }

    pub async fn list_departments(&self, session: &Session) -> ClientResult<Vec<Department>> {
        self.get(session, "/departments").await
    }

    // meetings

    pub async fn my_meetings(&self, session: &Session) -> ClientResult<Vec<MeetingDto>> {
        self.get(session, "/meetings/my-meetings").await
    }

    pub async fn upcoming_meetings(&self, session: &Session) -> ClientResult<Vec<MeetingDto>> {
        self.get(session, "/meetings/upcoming").await
    }

    pub async fn create_meeting(&self, session: &Session, body: &CreateMeeting) -> ClientResult<MeetingDto> {
        self.with_body(Method::POST, session, "/meetings", body).await
    }

    pub async fn respond_to_meeting(
        &self,
        session: &Session,
        meeting_id: u64,
        body: &UpdateAttendeeStatus,
    ) -> ClientResult<Value> {
        self.with_body(Method::PUT, session, &format!("/meetings/{meeting_id}/status"), body)
            .await
    }

    // tasks

    pub async fn my_tasks(&self, session: &Session) -> ClientResult<Vec<TaskDto>> {
        self.get(session, "/tasks/my-tasks").await
    }

    pub async fn overdue_tasks(&self, session: &Session) -> ClientResult<Vec<TaskDto>> {
        self.get(session, "/tasks/overdue").await
    }

    pub async fn create_task(&self, session: &Session, body: &CreateTask) -> ClientResult<TaskDto> {
        self.with_body(Method::POST, session, "/tasks", body).await
    }

    pub async fn update_task(&self, session: &Session, id: u64, body: &UpdateTask) -> ClientResult<TaskDto> {
        self.with_body(Method::PUT, session, &format!("/tasks/{id}"), body).await
    }

    pub async fn update_task_status(&self, session: &Session, id: u64, status: TaskStatus) -> ClientResult<Value> {
        self.with_body(Method::PUT, session, &format!("/tasks/{id}/status"), &UpdateTaskStatus { status })
            .await
    }

    // reports

    pub async fn attendance_report(
        &self,
        session: &Session,
        range: &DateRangeQuery,
    ) -> ClientResult<Vec<AttendanceReportRow>> {
        self.get_query(session, "/reports/attendance", range).await
    }

    pub async fn task_analytics(
        &self,
        session: &Session,
        range: &OptionalDateRangeQuery,
    ) -> ClientResult<TaskAnalytics> {
        self.get_query(session, "/reports/tasks", range).await
    }

    pub async fn daily_attendance(
        &self,
        session: &Session,
        range: &DateRangeQuery,
    ) -> ClientResult<Vec<DailyAttendanceRow>> {
        self.get_query(session, "/reports/daily-attendance", range).await
    }

    pub async fn employee_performance(
        &self,
        session: &Session,
        range: &DateRangeQuery,
    ) -> ClientResult<Vec<EmployeePerformanceRow>> {
        self.get_query(session, "/reports/employee-performance", range).await
    }

    /// Raw CSV of any `/reports/.../export` endpoint, e.g. `"attendance"`.
    pub async fn export_report<Q: Serialize>(
        &self,
        session: &Session,
        report: &str,
        range: &Q,
    ) -> ClientResult<String> {
        self.get_text(session, &format!("/reports/{report}/export"), range).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8080/api/");
        assert_eq!(client.url("/tasks"), "http://localhost:8080/api/tasks");
    }

    #[test]
    fn api_error_shows_status_and_message() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "Already checked in today".into(),
        };
        assert_eq!(err.to_string(), "400 Bad Request: Already checked in today");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = ApiClient::new("http://127.0.0.1:1/api");
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
