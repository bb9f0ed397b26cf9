use crate::sql::Dialect;

#[derive(Clone, PartialEq)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    LineComment,
    BlockComment,
    DollarQuoted(String),
}

/// Splits a SQL script into single statements on `;`.
///
/// Semicolons inside quoted strings, quoted identifiers, comments and (for
/// PostgreSQL) dollar-quoted bodies do not split. Comments stay attached to
/// the statement they precede; pieces that hold nothing but whitespace and
/// comments are dropped. Returned statements are trimmed and carry no
/// trailing `;`.
pub fn split_statements(script: &str, dialect: Dialect) -> Vec<String> {
    let bytes = script.as_bytes();
    let mut statements = Vec::new();
    let mut state = State::Normal;
    let mut start = 0;
    let mut has_code = false;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b';' => {
                    if has_code {
                        statements.push(script[start..idx].trim().to_string());
                    }
                    start = idx + 1;
                    has_code = false;
                }
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'#' if dialect == Dialect::MySql => state = State::LineComment,
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    // MySQL runs `/*! ... */` as code
                    if bytes.get(idx + 2) == Some(&b'!') {
                        has_code = true;
                    }
                    state = State::BlockComment;
                    idx += 1;
                }
                b'\'' => {
                    has_code = true;
                    state = State::SingleQuoted;
                }
                b'"' => {
                    has_code = true;
                    state = State::DoubleQuoted;
                }
                b'`' if dialect == Dialect::MySql => {
                    has_code = true;
                    state = State::Backticked;
                }
                b'$' if dialect == Dialect::Postgres => {
                    has_code = true;
                    if let Some((tag, end)) = dollar_tag(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = end;
                    }
                }
                b if b.is_ascii_whitespace() => {}
                _ => has_code = true,
            },
            State::SingleQuoted | State::DoubleQuoted => {
                let close = if state == State::SingleQuoted { b'\'' } else { b'"' };
                if b == b'\\' && dialect == Dialect::MySql {
                    idx += 1;
                } else if b == close {
                    state = State::Normal;
                }
            }
            State::Backticked => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = State::Normal;
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && closes_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    if has_code {
        statements.push(script[start..].trim().to_string());
    }
    statements
}

/// Recognizes `$tag$` starting at `start`; returns the tag and the index of
/// the closing `$`.
fn dollar_tag(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }
    if idx < bytes.len() {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn closes_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len() && &bytes[idx + 1..end] == tag.as_bytes() && bytes[end] == b'$'
}
