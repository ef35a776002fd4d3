use sqlx::MySqlPool;
use tracing::{error, info, warn};

use crate::auth::password::hash_password;
use crate::db::{is_duplicate_entry, is_missing_reference, is_still_referenced};
use crate::error::{ApiError, ApiResult, Validator};
use crate::model::employee::{
    CreateEmployee, EmployeeDto, EmployeeProfile, EmployeeRow, UpdateEmployee,
};
use crate::model::role::Role;
use crate::utils::email_filter;

const EMAIL_TAKEN: &str = "Email already exists";
const STILL_REFERENCED: &str =
    "Employee is referenced by tasks or meetings; reassign them before deleting";

const SELECT_EMPLOYEE: &str = r#"
    SELECT e.id, e.user_id, e.first_name, e.last_name, e.phone_number,
           e.department_id, d.name AS department_name, e.position, e.join_date,
           e.profile_picture, e.address, u.email, r.name AS role_name, u.is_active
    FROM employees e
    JOIN users u ON u.id = e.user_id
    JOIN roles r ON r.id = u.role_id
    LEFT JOIN departments d ON d.id = e.department_id
"#;

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(' '),
        None => false,
    }
}

fn validate_create(dto: &CreateEmployee) -> ApiResult<()> {
    Validator::new()
        .required(&dto.email, "email")
        .check(
            dto.email.trim().is_empty() || looks_like_email(dto.email.trim()),
            "email",
            "email is not a valid address",
        )
        .check(
            dto.password.chars().count() >= 6,
            "password",
            "password must be at least 6 characters",
        )
        .required(&dto.first_name, "firstName")
        .required(&dto.last_name, "lastName")
        .check(Role::from_id(dto.role_id).is_some(), "roleId", "roleId must be 1, 2 or 3")
        .finish()
}

fn validate_update(dto: &UpdateEmployee) -> ApiResult<()> {
    let not_blank = |v: &Option<String>| v.as_deref().is_none_or(|s| !s.trim().is_empty());

    Validator::new()
        .check(not_blank(&dto.first_name), "firstName", "firstName must not be empty")
        .check(not_blank(&dto.last_name), "lastName", "lastName must not be empty")
        .finish()
}

pub async fn list(pool: &MySqlPool) -> ApiResult<Vec<EmployeeDto>> {
    let sql = format!("{} ORDER BY e.id", SELECT_EMPLOYEE);
    let rows = sqlx::query_as::<_, EmployeeRow>(&sql).fetch_all(pool).await?;

    Ok(rows.into_iter().map(EmployeeDto::from).collect())
}

pub async fn get(pool: &MySqlPool, id: u64) -> ApiResult<EmployeeDto> {
    let sql = format!("{} WHERE e.id = ?", SELECT_EMPLOYEE);

    sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(EmployeeDto::from)
        .ok_or_else(|| ApiError::not_found("Employee not found"))
}

/// Creates the login and the profile together; neither exists without the other.
pub async fn create(pool: &MySqlPool, dto: CreateEmployee) -> ApiResult<EmployeeDto> {
    validate_create(&dto)?;

    let email = dto.email.trim().to_lowercase();

    if !email_filter::is_email_available(pool, &email).await? {
        return Err(ApiError::bad_request(EMAIL_TAKEN));
    }

    let password_hash = hash_password(&dto.password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::Internal(e.to_string())
    })?;

    let mut tx = pool.begin().await?;

    let user = sqlx::query(
        "INSERT INTO users (email, password_hash, role_id, is_active) VALUES (?, ?, ?, TRUE)",
    )
    .bind(&email)
    .bind(password_hash)
    .bind(dto.role_id)
    .execute(&mut *tx)
    .await;

    let user_id = match user {
        Ok(done) => done.last_insert_id(),
        Err(e) if is_duplicate_entry(&e) => {
            email_filter::insert(&email);
            return Err(ApiError::bad_request(EMAIL_TAKEN));
        }
        Err(e) => return Err(e.into()),
    };

    let employee = sqlx::query(
        r#"
        INSERT INTO employees
            (user_id, first_name, last_name, phone_number, department_id, position, join_date, address)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(dto.first_name.trim())
    .bind(dto.last_name.trim())
    .bind(&dto.phone_number)
    .bind(dto.department_id)
    .bind(&dto.position)
    .bind(dto.join_date)
    .bind(&dto.address)
    .execute(&mut *tx)
    .await;

    let employee_id = match employee {
        Ok(done) => done.last_insert_id(),
        Err(e) if is_missing_reference(&e) => {
            return Err(ApiError::field("departmentId", "Department does not exist"));
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    email_filter::insert(&email);

    info!(employee_id, user_id, "Employee created");
    get(pool, employee_id).await
}

#[derive(sqlx::FromRow)]
struct LockedProfile {
    user_id: u64,
    #[sqlx(flatten)]
    profile: EmployeeProfile,
}

/// Partial update of the profile and the login's active flag.
pub async fn update(pool: &MySqlPool, id: u64, dto: UpdateEmployee) -> ApiResult<EmployeeDto> {
    validate_update(&dto)?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, LockedProfile>(
        r#"
        SELECT user_id, first_name, last_name, phone_number, department_id,
               position, profile_picture, address
        FROM employees
        WHERE id = ?
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    let next = dto.apply(current.profile);

    let updated = sqlx::query(
        r#"
        UPDATE employees
        SET first_name = ?, last_name = ?, phone_number = ?, department_id = ?,
            position = ?, profile_picture = ?, address = ?
        WHERE id = ?
        "#,
    )
    .bind(next.first_name.trim())
    .bind(next.last_name.trim())
    .bind(&next.phone_number)
    .bind(next.department_id)
    .bind(&next.position)
    .bind(&next.profile_picture)
    .bind(&next.address)
    .bind(id)
    .execute(&mut *tx)
    .await;

    match updated {
        Ok(_) => {}
        Err(e) if is_missing_reference(&e) => {
            return Err(ApiError::field("departmentId", "Department does not exist"));
        }
        Err(e) => return Err(e.into()),
    }

    if let Some(is_active) = dto.is_active {
        sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(current.user_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(employee_id = id, "Employee updated");
    get(pool, id).await
}

/// Removes the login; the profile row goes with it through the cascade.
pub async fn delete(pool: &MySqlPool, id: u64) -> ApiResult<()> {
    let mut tx = pool.begin().await?;

    let (user_id, email) = sqlx::query_as::<_, (u64, String)>(
        r#"
        SELECT u.id, u.email
        FROM employees e
        JOIN users u ON u.id = e.user_id
        WHERE e.id = ?
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    let referenced: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM tasks WHERE assigned_to = ? OR assigned_by = ?)
            OR EXISTS(SELECT 1 FROM meetings WHERE created_by = ?)
        "#,
    )
    .bind(id)
    .bind(id)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if referenced != 0 {
        return Err(ApiError::bad_request(STILL_REFERENCED));
    }

    match sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await
    {
        Ok(_) => {}
        Err(e) if is_still_referenced(&e) => {
            warn!(employee_id = id, "Delete raced with a new reference");
            return Err(ApiError::bad_request(STILL_REFERENCED));
        }
        Err(e) => return Err(e.into()),
    }

    tx.commit().await?;
    email_filter::remove(&email);

    info!(employee_id = id, user_id, "Employee deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_dto() -> CreateEmployee {
        CreateEmployee {
            email: "jane.doe@company.com".into(),
            password: "secret123".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone_number: None,
            department_id: Some(1),
            position: None,
            join_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            address: None,
            role_id: 3,
        }
    }

    #[test]
    fn valid_create_passes() {
        assert!(validate_create(&create_dto()).is_ok());
    }

    #[test]
    fn create_reports_every_bad_field() {
        let dto = CreateEmployee {
            email: "not-an-email".into(),
            password: "123".into(),
            first_name: " ".into(),
            role_id: 7,
            ..create_dto()
        };

        let Err(ApiError::Validation(errors)) = validate_create(&dto) else {
            panic!("expected validation errors");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "password", "firstName", "roleId"]);
    }

    #[test]
    fn update_rejects_blank_names_but_allows_absent_ones() {
        assert!(validate_update(&UpdateEmployee::default()).is_ok());

        let blank = UpdateEmployee {
            first_name: Some("".into()),
            ..Default::default()
        };
        assert!(validate_update(&blank).is_err());
    }

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("a b@c.d"));
    }
}
