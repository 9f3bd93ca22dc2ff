// SQL text helpers shared by the repository ports

const LIKE_ESCAPE: char = '\\';

/// Escapes LIKE wildcards so `value` only ever matches itself.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}

/// `%value%` pattern for a substring match.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

/// True for names that can be safely interpolated into SQL between backticks.
pub fn is_sql_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
