use std::fmt::Display;

use crate::types::{SqlValue, ValueMap};

/// Structured clauses for `select` and `update`.
///
/// Every clause is SQL text that is interpolated with [`vars`](Self::vars)
/// (and the connection placeholders) before the statement is assembled.
/// `group` only applies to SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub where_: Option<String>,
    pub vars: ValueMap,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub group: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WHERE condition, e.g. `"id = {id}"`.
    pub fn where_(mut self, condition: impl Into<String>) -> Self {
        self.where_ = Some(condition.into());
        self
    }

    /// Adds one `{name}` variable.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.vars.set(name, value);
        self
    }

    pub fn vars(mut self, vars: ValueMap) -> Self {
        self.vars = vars;
        self
    }

    /// Row limit; accepts a count or engine-specific text such as `"10 OFFSET 20"`.
    pub fn limit(mut self, limit: impl Display) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}
