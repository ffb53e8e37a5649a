//! Variable naming conventions.
//!
//! Names are case-insensitive. A trailing `$` marks a string variable and
//! a leading `_` marks a variable local to the innermost scope frame.

pub fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

pub fn is_string(name: &str) -> bool {
    name.ends_with('$')
}

pub fn is_local(name: &str) -> bool {
    name.starts_with('_')
}

pub fn is_legal(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    let body = name.strip_suffix('$').unwrap_or(name);
    body.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && body.chars().any(|c| c.is_ascii_alphabetic())
}
