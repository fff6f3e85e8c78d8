use tokio_postgres::{Row, types::ToSql};

// Type aliases for PostgreSQL parameter types
pub type PgParam = dyn ToSql + Sync;

pub fn first_row_or_not_found<T, E, F>(
    rows: &[Row], mapper: F, not_found_error: E,
) -> Result<T, E>
where
    F: FnOnce(&Row) -> T,
{
    rows.first().map(mapper).ok_or(not_found_error)
}

pub fn create_param_refs<T: ToSql + Sync + 'static>(params: &[T]) -> Vec<&PgParam> {
    params.iter().map(|p| p as &PgParam).collect()
}

/// Accumulates `WHERE` conditions for the filters a caller actually
/// supplied. Absent or empty values add no constraint.
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<String>,
}

impl WhereClause {
    pub fn new() -> Self { Self::default() }

    /// `column = $n`
    pub fn eq(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(value) = supplied(value) {
            self.params.push(value.to_string());
            self.conditions
                .push(format!("{} = ${}", column, self.params.len()));
        }
        self
    }

    /// Case-sensitive substring match.
    pub fn contains(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(value) = supplied(value) {
            self.params.push(value.to_string());
            self.conditions.push(format!(
                "strpos({}, ${}) > 0",
                column,
                self.params.len()
            ));
        }
        self
    }

    /// Renders `base [WHERE ...] order_by` and the matching parameters.
    pub fn build(self, base: &str, order_by: &str) -> (String, Vec<String>) {
        let mut sql = base.to_string();
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !order_by.is_empty() {
            sql.push(' ');
            sql.push_str(order_by);
        }
        (sql, self.params)
    }
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
