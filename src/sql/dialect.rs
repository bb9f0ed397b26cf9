/// Engine-specific SQL text rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// MySQL/MariaDB: backslash escapes in literals, backtick identifiers.
    MySql,
    /// PostgreSQL with `standard_conforming_strings`: doubled quotes only.
    Postgres,
}

impl Dialect {
    /// Quotes a string as a SQL literal.
    pub fn quote_literal(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        match self {
            Dialect::MySql => {
                for ch in value.chars() {
                    match ch {
                        '\0' => out.push_str("\\0"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '"' => out.push_str("\\\""),
                        '\x1a' => out.push_str("\\Z"),
                        c => out.push(c),
                    }
                }
            }
            Dialect::Postgres => {
                for ch in value.chars() {
                    if ch == '\'' {
                        out.push('\'');
                    }
                    out.push(ch);
                }
            }
        }
        out.push('\'');
        out
    }

    /// Quotes a table or column identifier.
    pub fn quote_identifier(&self, ident: &str) -> String {
        let quote = match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        };
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(quote);
        for ch in ident.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }

    /// Boolean literal: `1`/`0` on MySQL, `TRUE`/`FALSE` on PostgreSQL.
    pub fn bool_literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (Dialect::MySql, true) => "1",
            (Dialect::MySql, false) => "0",
            (Dialect::Postgres, true) => "TRUE",
            (Dialect::Postgres, false) => "FALSE",
        }
    }

    /// Whether `UPDATE ... LIMIT n` is accepted natively.
    pub fn supports_update_limit(&self) -> bool {
        matches!(self, Dialect::MySql)
    }
}
