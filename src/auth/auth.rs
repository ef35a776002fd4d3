use crate::error::{ApiError, ApiResult};
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// The authenticated caller, placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into())),
        )
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> ApiResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin only".into()))
        }
    }

    pub fn require_hr_or_admin(&self) -> ApiResult<()> {
        if self.role.is_hr_or_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("HR/Admin only".into()))
        }
    }

    /// The caller's own employee id, for "my" queries and authored records.
    pub fn require_employee_id(&self) -> ApiResult<u64> {
        self.employee_id
            .ok_or_else(|| ApiError::Forbidden("No employee profile".into()))
    }

    /// Employees may only act on their own attendance; HR and Admin on anyone's.
    pub fn require_self_or_hr(&self, employee_id: u64) -> ApiResult<()> {
        if self.role.is_hr_or_admin() || self.employee_id == Some(employee_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("You can only record your own attendance".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 1,
            email: "u@company.com".into(),
            role,
            employee_id,
        }
    }

    #[test]
    fn role_gates() {
        assert!(user(Role::Admin, None).require_admin().is_ok());
        assert!(user(Role::Hr, None).require_admin().is_err());
        assert!(user(Role::Hr, None).require_hr_or_admin().is_ok());
        assert!(user(Role::Employee, Some(3)).require_hr_or_admin().is_err());
    }

    #[test]
    fn employees_only_act_for_themselves() {
        let me = user(Role::Employee, Some(3));
        assert!(me.require_self_or_hr(3).is_ok());
        assert!(me.require_self_or_hr(4).is_err());
        assert!(user(Role::Hr, Some(9)).require_self_or_hr(4).is_ok());
    }

    #[test]
    fn missing_employee_profile_is_forbidden() {
        let err = user(Role::Admin, None).require_employee_id().unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
