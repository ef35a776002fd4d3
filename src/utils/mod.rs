pub mod checkin_lock;
pub mod email_filter;
pub mod sql_filter;
