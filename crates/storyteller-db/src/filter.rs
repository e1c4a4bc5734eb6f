//! Conjunctive equality filters for list queries.

use rusqlite::types::Value;

/// Ordered list of `column = value` predicates joined with `AND`.
///
/// Columns are `&'static str` so only names written in this crate can end up
/// in SQL text; values are always bound as numbered parameters.
#[derive(Debug, Default, Clone)]
pub struct Filter {
    predicates: Vec<(&'static str, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push((column, value.into()));
        self
    }

    /// Adds the predicate only when a value is present.
    pub fn eq_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// `""` for an empty filter, otherwise `" WHERE a = ?1 AND b = ?2"`.
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }

        let conditions: Vec<String> = self
            .predicates
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect();

        format!(" WHERE {}", conditions.join(" AND "))
    }

    /// Parameter values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.predicates.iter().map(|(_, value)| value)
    }
}
