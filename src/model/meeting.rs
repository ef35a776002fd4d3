use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::full_name;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum AttendeeStatus {
    #[default]
    Invited,
    Accepted,
    Declined,
    Attended,
}

/// A meeting row joined with its creator's name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeetingView {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub meeting_date: NaiveDateTime,
    pub duration: i32,
    pub location: Option<String>,
    pub created_by: u64,
    pub created_at: NaiveDateTime,
    pub creator_first_name: String,
    pub creator_last_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendeeView {
    pub meeting_id: u64,
    pub employee_id: u64,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "String")]
    pub status: AttendeeStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAttendeeDto {
    pub employee_id: u64,
    pub employee_name: String,
    pub status: AttendeeStatus,
}

impl From<AttendeeView> for MeetingAttendeeDto {
    fn from(view: AttendeeView) -> Self {
        Self {
            employee_id: view.employee_id,
            employee_name: full_name(&view.first_name, &view.last_name),
            status: view.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDto {
    pub meeting_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub meeting_date: NaiveDateTime,
    /// Minutes
    pub duration: i32,
    pub location: Option<String>,
    pub created_by: u64,
    pub created_by_name: String,
    pub created_at: NaiveDateTime,
    pub attendees: Vec<MeetingAttendeeDto>,
}

impl MeetingDto {
    pub fn from_view(view: MeetingView, attendees: Vec<AttendeeView>) -> Self {
        Self {
            meeting_id: view.id,
            created_by_name: full_name(&view.creator_first_name, &view.creator_last_name),
            title: view.title,
            description: view.description,
            meeting_date: view.meeting_date,
            duration: view.duration,
            location: view.location,
            created_by: view.created_by,
            created_at: view.created_at,
            attendees: attendees.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeeting {
    #[schema(example = "Sprint planning")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2026-03-02T10:00:00")]
    pub meeting_date: NaiveDateTime,
    #[schema(example = 60)]
    pub duration: i32,
    pub location: Option<String>,
    #[serde(default)]
    #[schema(example = json!([2, 3]))]
    pub attendee_ids: Vec<u64>,
}

/// Partial update. A present `attendeeIds` replaces the whole attendee set.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeeting {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meeting_date: Option<NaiveDateTime>,
    pub duration: Option<i32>,
    pub location: Option<String>,
    pub attendee_ids: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateAttendeeStatus {
    #[schema(example = "Accepted")]
    pub status: AttendeeStatus,
}

/// Drops repeated ids while keeping the first occurrence order.
pub fn unique_attendees(ids: &[u64]) -> Vec<u64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendee_status_is_a_closed_set() {
        let ok: UpdateAttendeeStatus = serde_json::from_str(r#"{"status":"Attended"}"#).unwrap();
        assert_eq!(ok.status, AttendeeStatus::Attended);
        assert!(serde_json::from_str::<UpdateAttendeeStatus>(r#"{"status":"Maybe"}"#).is_err());
    }

    #[test]
    fn duplicate_attendees_are_collapsed() {
        assert_eq!(unique_attendees(&[3, 2, 3, 7, 2]), vec![3, 2, 7]);
    }

    #[test]
    fn new_meeting_lists_invited_attendees() {
        let view = MeetingView {
            id: 1,
            title: "Sync".into(),
            description: None,
            meeting_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            duration: 30,
            location: None,
            created_by: 1,
            created_at: chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            creator_first_name: "Ada".into(),
            creator_last_name: "Admin".into(),
        };
        let attendees = [2u64, 3]
            .iter()
            .map(|id| AttendeeView {
                meeting_id: 1,
                employee_id: *id,
                first_name: "E".into(),
                last_name: id.to_string(),
                status: AttendeeStatus::default(),
            })
            .collect();

        let dto = MeetingDto::from_view(view, attendees);

        assert_eq!(dto.created_by_name, "Ada Admin");
        assert_eq!(dto.attendees.len(), 2);
        assert!(dto.attendees.iter().all(|a| a.status == AttendeeStatus::Invited));
    }
}
