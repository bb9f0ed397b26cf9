//! Assembly of SELECT / INSERT / UPDATE text.
//!
//! Builders receive clauses that have already been interpolated and values
//! that they encode themselves, so their output is final SQL and must not be
//! interpolated again.

mod insert;
mod select;
mod update;

pub use insert::build_insert;
pub use select::build_select;
pub use update::build_update;

/// Interpolated clause text, ready to splice into a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clauses {
    pub where_: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub group: Option<String>,
}

fn push_clause(sql: &mut String, keyword: &str, clause: Option<&str>) {
    if let Some(text) = clause.map(str::trim).filter(|t| !t.is_empty()) {
        sql.push(' ');
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(text);
    }
}
