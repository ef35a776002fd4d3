use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum Role {
    Admin,
    #[serde(rename = "HR")]
    #[strum(serialize = "HR")]
    Hr,
    #[default]
    Employee,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Primary key in the `roles` table.
    pub fn id(self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::Hr => 2,
            Role::Employee => 3,
        }
    }

    pub fn is_hr_or_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_match_the_roles_table() {
        assert_eq!(Role::Hr.to_string(), "HR");
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::from_id(Role::Employee.id()), Some(Role::Employee));
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn role_serializes_as_its_name() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"HR\"");
    }
}
