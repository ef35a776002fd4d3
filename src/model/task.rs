use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::full_name;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Only work that is still open can become overdue.
    pub fn is_open(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: u64,
    pub assigned_by: u64,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub completed_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Task {
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < now)
    }

    /// Moves the task to `status`; `Completed` stamps the completion time.
    pub fn set_status(&mut self, status: TaskStatus, now: NaiveDateTime) {
        self.status = status;
        if status == TaskStatus::Completed {
            self.completed_date = Some(now);
        }
        self.updated_at = now;
    }

    pub fn apply(&mut self, update: &UpdateTask, now: NaiveDateTime) {
        if let Some(title) = update.title.as_deref().filter(|t| !t.trim().is_empty()) {
            self.title = title.to_string();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(assigned_to) = update.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(start) = update.start_date {
            self.start_date = Some(start);
        }
        if let Some(due) = update.due_date {
            self.due_date = Some(due);
        }
        match update.status {
            Some(status) => self.set_status(status, now),
            None => self.updated_at = now,
        }
    }
}

/// A task row joined with assignee and assigner names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskView {
    #[sqlx(flatten)]
    pub task: Task,
    pub assignee_first_name: String,
    pub assignee_last_name: String,
    pub assigner_first_name: String,
    pub assigner_last_name: String,
}

impl TaskView {
    pub fn assignee_name(&self) -> String {
        full_name(&self.assignee_first_name, &self.assignee_last_name)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub task_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: u64,
    pub assigned_to_name: String,
    pub assigned_by: u64,
    pub assigned_by_name: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub completed_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TaskView> for TaskDto {
    fn from(view: TaskView) -> Self {
        let assigned_to_name = view.assignee_name();
        let assigned_by_name = full_name(&view.assigner_first_name, &view.assigner_last_name);
        let task = view.task;

        Self {
            task_id: task.id,
            title: task.title,
            description: task.description,
            assigned_to: task.assigned_to,
            assigned_to_name,
            assigned_by: task.assigned_by,
            assigned_by_name,
            status: task.status,
            priority: task.priority,
            start_date: task.start_date,
            due_date: task.due_date,
            completed_date: task.completed_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Create payload. There is deliberately no status field: new tasks are `Pending`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[schema(example = "Prepare quarterly report")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = 5)]
    pub assigned_to: u64,
    #[serde(default)]
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<u64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTaskStatus {
    #[schema(example = "In Progress")]
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn task(status: TaskStatus, due: Option<NaiveDateTime>) -> Task {
        Task {
            id: 1,
            title: "Write docs".into(),
            description: None,
            assigned_to: 5,
            assigned_by: 1,
            status,
            priority: TaskPriority::Medium,
            start_date: None,
            due_date: due,
            completed_date: None,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    #[test]
    fn completing_stamps_completion_time() {
        let mut t = task(TaskStatus::InProgress, None);
        t.set_status(TaskStatus::Completed, at(3, 12));
        assert_eq!(t.completed_date, Some(at(3, 12)));
        assert_eq!(t.updated_at, at(3, 12));
    }

    #[test]
    fn other_statuses_leave_completion_time_alone() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Cancelled] {
            let mut t = task(TaskStatus::Pending, None);
            t.set_status(status, at(3, 12));
            assert_eq!(t.completed_date, None, "{status}");
        }

        let mut reopened = task(TaskStatus::Completed, None);
        reopened.completed_date = Some(at(2, 8));
        reopened.set_status(TaskStatus::InProgress, at(3, 12));
        assert_eq!(reopened.completed_date, Some(at(2, 8)));
    }

    #[test]
    fn update_refreshes_timestamp_even_without_changes() {
        let mut t = task(TaskStatus::Pending, None);
        t.apply(&UpdateTask::default(), at(4, 10));
        assert_eq!(t.updated_at, at(4, 10));
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn update_with_completed_status_goes_through_set_status() {
        let mut t = task(TaskStatus::Pending, None);
        let update = UpdateTask {
            title: Some("   ".into()),
            status: Some(TaskStatus::Completed),
            priority: Some(TaskPriority::Urgent),
            ..Default::default()
        };
        t.apply(&update, at(5, 16));

        assert_eq!(t.title, "Write docs");
        assert_eq!(t.priority, TaskPriority::Urgent);
        assert_eq!(t.completed_date, Some(at(5, 16)));
    }

    #[test]
    fn only_open_tasks_are_overdue() {
        let now = at(10, 9);
        assert!(task(TaskStatus::Pending, Some(at(9, 9))).is_overdue(now));
        assert!(task(TaskStatus::InProgress, Some(at(9, 9))).is_overdue(now));
        assert!(!task(TaskStatus::Completed, Some(at(9, 9))).is_overdue(now));
        assert!(!task(TaskStatus::Cancelled, Some(at(9, 9))).is_overdue(now));
        assert!(!task(TaskStatus::Pending, Some(at(11, 9))).is_overdue(now));
        assert!(!task(TaskStatus::Pending, None).is_overdue(now));
    }

    #[test]
    fn create_payload_ignores_status() {
        let body = r#"{"title":"T","assignedTo":5,"status":"Completed"}"#;
        let create: CreateTask = serde_json::from_str(body).unwrap();
        assert_eq!(create.priority, TaskPriority::Medium);
    }

    #[test]
    fn status_names_round_trip_through_the_column() {
        assert_eq!(TaskStatus::InProgress.as_ref(), "In Progress");
        assert_eq!(
            TaskStatus::try_from("In Progress".to_string()).unwrap(),
            TaskStatus::InProgress
        );
        assert!(serde_json::from_str::<UpdateTaskStatus>(r#"{"status":"Done"}"#).is_err());
    }
}
