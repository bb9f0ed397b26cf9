use crate::error::{DbalError, Result};
use crate::sql::Dialect;
use crate::types::SqlValue;

/// Format used for date/time literals.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encodes a value as a SQL literal for `dialect`.
///
/// Text and sequences are quoted. Booleans take the dialect's literal
/// ([`Dialect::bool_literal`]), numbers pass through unquoted and date/times
/// are quoted in [`DATETIME_FORMAT`].
/// `Null`, non-finite floats and sequences containing nulls or nested
/// sequences are rejected with [`DbalError::UnencodableValue`].
pub fn encode(value: &SqlValue, dialect: Dialect) -> Result<String> {
    match value {
        SqlValue::Text(s) => Ok(dialect.quote_literal(s)),
        SqlValue::Bool(b) => Ok(dialect.bool_literal(*b).to_string()),
        SqlValue::Int(i) => Ok(i.to_string()),
        SqlValue::Float(f) => encode_float(*f),
        SqlValue::DateTime(dt) => Ok(format!("'{}'", dt.format(DATETIME_FORMAT))),
        SqlValue::Sequence(items) => {
            let parts = items
                .iter()
                .map(|item| sequence_element(item, dialect))
                .collect::<Result<Vec<_>>>()?;
            Ok(dialect.quote_literal(&parts.join(",")))
        }
        SqlValue::Null => Err(unencodable(value)),
    }
}

fn encode_float(f: f64) -> Result<String> {
    if f.is_finite() {
        Ok(f.to_string())
    } else {
        Err(DbalError::UnencodableValue(format!("float ({})", f)))
    }
}

fn sequence_element(value: &SqlValue, dialect: Dialect) -> Result<String> {
    match value {
        SqlValue::Text(s) => Ok(s.clone()),
        SqlValue::Bool(b) => Ok(dialect.bool_literal(*b).to_ascii_lowercase()),
        SqlValue::Int(i) => Ok(i.to_string()),
        SqlValue::Float(f) => encode_float(*f),
        SqlValue::DateTime(dt) => Ok(dt.format(DATETIME_FORMAT).to_string()),
        SqlValue::Null | SqlValue::Sequence(_) => Err(DbalError::UnencodableValue(format!(
            "{} inside a sequence",
            value.type_name()
        ))),
    }
}

fn unencodable(value: &SqlValue) -> DbalError {
    DbalError::UnencodableValue(value.type_name().to_string())
}
