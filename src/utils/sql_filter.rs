use chrono::NaiveDateTime;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::QueryAs;

/// SQL bindable value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    U64(u64),
    String(String),
    DateTime(NaiveDateTime),
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        SqlValue::U64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

/// AND-joined WHERE conditions collected from optional query parameters,
/// with their values kept in placeholder order.
#[derive(Debug, Default)]
pub struct SqlFilter {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `condition` must contain one `?` per value.
    pub fn and<I>(&mut self, condition: &str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        self.conditions.push(condition.to_string());
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn and_opt<V: Into<SqlValue>>(&mut self, condition: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.and(condition, [v]);
        }
        self
    }

    /// Empty, or ` WHERE a AND b`.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn bind<'q, O>(
        self,
        mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    ) -> QueryAs<'q, MySql, O, MySqlArguments> {
        for value in self.values {
            query = match value {
                SqlValue::U64(v) => query.bind(v),
                SqlValue::String(v) => query.bind(v),
                SqlValue::DateTime(v) => query.bind(v),
            };
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_conditions_means_no_where_clause() {
        assert_eq!(SqlFilter::new().where_clause(), "");
    }

    #[test]
    fn conditions_are_and_joined_and_values_keep_order() {
        let mut filter = SqlFilter::new();
        filter
            .and("(t.assigned_to = ? OR t.assigned_by = ?)", [7u64, 7u64])
            .and_opt("t.status = ?", Some("Pending"))
            .and_opt::<u64>("t.id = ?", None);

        assert_eq!(
            filter.where_clause(),
            " WHERE (t.assigned_to = ? OR t.assigned_by = ?) AND t.status = ?"
        );
        assert_eq!(
            filter.values,
            vec![SqlValue::U64(7), SqlValue::U64(7), SqlValue::String("Pending".into())]
        );
    }
}
