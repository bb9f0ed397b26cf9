use crate::config::ConnectionParams;
use crate::error::Result;
use crate::sql::{encode, Dialect};
use crate::types::ValueMap;

/// Substitutes `<HOST>`, `<USER>`, `<DATABASE>`, `<PREFIX>` and, when `vars`
/// is given, one `{name}` placeholder per variable.
///
/// Substitution is a single literal pass: at each position the longest
/// matching placeholder wins and replaced text is never scanned again, so a
/// variable value containing `{other}` stays as written. Placeholders with
/// no replacement are left verbatim. The only failure is a variable that
/// cannot be encoded.
pub fn interpolate(
    template: &str,
    conn: &ConnectionParams,
    vars: Option<&ValueMap>,
    dialect: Dialect,
) -> Result<String> {
    let mut replacements: Vec<(String, String)> = vec![
        ("<HOST>".to_string(), conn.host.clone()),
        ("<USER>".to_string(), conn.user.clone()),
        ("<DATABASE>".to_string(), conn.database.clone()),
        ("<PREFIX>".to_string(), conn.prefix.clone()),
    ];
    if let Some(vars) = vars {
        for (name, value) in vars.iter() {
            replacements.push((format!("{{{}}}", name), encode(value, dialect)?));
        }
    }

    Ok(replace_all(template, &replacements))
}

fn replace_all(template: &str, replacements: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(&['<', '{'][..]) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let hit = replacements
            .iter()
            .filter(|(key, _)| tail.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len());
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                // '<' and '{' are single-byte
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
