use crate::builders::{push_clause, Clauses};
use crate::sql::Dialect;

/// Builds `SELECT <columns> FROM <table> [WHERE] [GROUP BY] [ORDER BY] [LIMIT]`.
///
/// `table` is the full (prefixed) table name and is quoted for `dialect`;
/// `columns` is spliced as given, with an empty list meaning `*`.
pub fn build_select(dialect: Dialect, table: &str, columns: &str, clauses: &Clauses) -> String {
    let mut sql = String::with_capacity(128);

    // SELECT clause
    sql.push_str("SELECT ");
    let columns = columns.trim();
    sql.push_str(if columns.is_empty() { "*" } else { columns });

    // FROM clause
    sql.push_str(" FROM ");
    sql.push_str(&dialect.quote_identifier(table));

    push_clause(&mut sql, "WHERE", clauses.where_.as_deref());
    push_clause(&mut sql, "GROUP BY", clauses.group.as_deref());
    push_clause(&mut sql, "ORDER BY", clauses.order.as_deref());
    push_clause(&mut sql, "LIMIT", clauses.limit.as_deref());

    sql
}
