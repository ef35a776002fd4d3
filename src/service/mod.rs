use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ApiError, ApiResult};

pub mod attendance;
pub mod auth;
pub mod department;
pub mod employee;
pub mod meeting;
pub mod report;
pub mod task;

/// Server-local wall clock; DATETIME columns carry no zone.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Half-open `[day 00:00, next day 00:00)` bounds, so the column stays index-friendly.
/// The last representable date has no next day and is rejected.
pub fn day_bounds(first: NaiveDate, last: NaiveDate) -> ApiResult<(NaiveDateTime, NaiveDateTime)> {
    let next = last
        .succ_opt()
        .ok_or_else(|| ApiError::field("date", "date is out of range"))?;
    Ok((first.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_whole_days() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let (start, end) = day_bounds(d, d).unwrap();
        assert_eq!(start.to_string(), "2026-02-28 00:00:00");
        assert_eq!(end.to_string(), "2026-03-01 00:00:00");
    }

    #[test]
    fn last_representable_date_is_rejected() {
        let err = day_bounds(NaiveDate::MIN, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
