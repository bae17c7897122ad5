//! Incremental WHERE-clause assembly for the raw-SQL aggregation path.
//!
//! Every pushed predicate takes the next positional parameter slot, so the
//! rendered clause text and the bind-value order cannot drift apart no
//! matter which optional filters a caller supplies.

use sea_orm::{DbBackend, Value};

/// Ordered conjunction of positional-parameter predicates.
#[derive(Debug)]
pub(crate) struct FilterBuilder {
    backend: DbBackend,
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl FilterBuilder {
    pub(crate) fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            clauses: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Placeholder for the next value slot: `$N` on Postgres, `?` elsewhere.
    fn next_placeholder(&self) -> String {
        match self.backend {
            DbBackend::Postgres => format!("${}", self.values.len() + 1),
            _ => "?".to_string(),
        }
    }

    /// Adds `column = value`.
    pub(crate) fn equals(&mut self, column: &str, value: impl Into<Value>) {
        let clause = format!("{column} = {}", self.next_placeholder());
        self.clauses.push(clause);
        self.values.push(value.into());
    }

    /// Adds `column BETWEEN low AND high`, inclusive on both ends.
    pub(crate) fn between(&mut self, column: &str, low: impl Into<Value>, high: impl Into<Value>) {
        let low_slot = self.next_placeholder();
        self.values.push(low.into());
        let high_slot = self.next_placeholder();
        self.values.push(high.into());
        self.clauses
            .push(format!("{column} BETWEEN {low_slot} AND {high_slot}"));
    }

    /// Rendered `WHERE ...` fragment, empty when nothing was pushed.
    pub(crate) fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Bind values in slot order.
    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}
