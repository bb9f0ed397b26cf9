use crate::error::Result;
use crate::sql::{encode, Dialect};
use crate::types::ValueMap;

/// Builds `INSERT INTO <table> (<columns>) VALUES (<values>)`.
///
/// An empty `data` inserts a row of defaults.
pub fn build_insert(dialect: Dialect, table: &str, data: &ValueMap) -> Result<String> {
    let table = dialect.quote_identifier(table);

    if data.is_empty() {
        return Ok(match dialect {
            Dialect::MySql => format!("INSERT INTO {} () VALUES ()", table),
            Dialect::Postgres => format!("INSERT INTO {} DEFAULT VALUES", table),
        });
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (column, value) in data.iter() {
        columns.push(dialect.quote_identifier(column));
        values.push(encode(value, dialect)?);
    }

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        values.join(", ")
    ))
}
