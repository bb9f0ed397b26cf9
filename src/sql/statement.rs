/// Whether a statement can generate an insert id: its first keyword is
/// `INSERT` or `REPLACE`.
pub fn is_insert(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    keyword.eq_ignore_ascii_case("insert") || keyword.eq_ignore_ascii_case("replace")
}

/// Table named by an `INSERT [INTO] <table> ...` statement, exactly as
/// written (quotes and schema qualification included).
pub fn insert_target(sql: &str) -> Option<&str> {
    let rest = strip_keyword(sql.trim_start(), "insert")?.trim_start();
    let rest = match strip_keyword(rest, "into") {
        Some(after) => after.trim_start(),
        None => rest,
    };

    let mut quoted = false;
    let end = rest
        .char_indices()
        .find(|&(_, c)| {
            if c == '"' || c == '`' {
                quoted = !quoted;
                return false;
            }
            !quoted && (c.is_whitespace() || c == '(')
        })
        .map_or(rest.len(), |(i, _)| i);

    let target = &rest[..end];
    (!target.is_empty()).then_some(target)
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}
