use crate::builders::{push_clause, Clauses};
use crate::error::{DbalError, Result};
use crate::sql::{encode, Dialect};
use crate::types::ValueMap;

/// Builds `UPDATE <table> SET <col = value, ...> [WHERE] [ORDER BY] [LIMIT]`.
///
/// PostgreSQL has no `UPDATE ... LIMIT` or `UPDATE ... ORDER BY`; there a
/// limited update selects its rows in a `ctid` subquery and an unlimited one
/// drops the ordering. `clauses.group` is ignored.
pub fn build_update(
    dialect: Dialect,
    table: &str,
    data: &ValueMap,
    clauses: &Clauses,
) -> Result<String> {
    if data.is_empty() {
        return Err(DbalError::InvalidStatement(
            "UPDATE needs at least one column".to_string(),
        ));
    }

    let table = dialect.quote_identifier(table);
    let assignments = data
        .iter()
        .map(|(column, value)| {
            Ok(format!(
                "{} = {}",
                dialect.quote_identifier(column),
                encode(value, dialect)?
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));

    let has_limit = clauses
        .limit
        .as_deref()
        .is_some_and(|l| !l.trim().is_empty());

    if has_limit && !dialect.supports_update_limit() {
        let mut subquery = format!("SELECT ctid FROM {}", table);
        push_clause(&mut subquery, "WHERE", clauses.where_.as_deref());
        push_clause(&mut subquery, "ORDER BY", clauses.order.as_deref());
        push_clause(&mut subquery, "LIMIT", clauses.limit.as_deref());
        sql.push_str(" WHERE ctid IN (");
        sql.push_str(&subquery);
        sql.push(')');
    } else {
        push_clause(&mut sql, "WHERE", clauses.where_.as_deref());
        if dialect.supports_update_limit() {
            push_clause(&mut sql, "ORDER BY", clauses.order.as_deref());
            push_clause(&mut sql, "LIMIT", clauses.limit.as_deref());
        }
    }

    Ok(sql)
}
