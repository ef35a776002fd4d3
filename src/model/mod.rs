pub mod attendance;
pub mod department;
pub mod employee;
pub mod meeting;
pub mod report;
pub mod role;
pub mod task;
pub mod user;

/// Status columns are stored as VARCHAR; rows decode them through `TryFrom<String>`
/// so an unknown value surfaces as a decode error instead of a silent default.
macro_rules! string_column {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = strum::ParseError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )*
    };
}

string_column!(
    attendance::AttendanceStatus,
    meeting::AttendeeStatus,
    task::TaskStatus,
    task::TaskPriority,
);

/// "First Last", the display name used by every projection.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}
