use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;

/// ## Runtime value
///
/// Every value is a number or a string. A raw literal that is quoted
/// is a string; an unquoted literal that parses as a number is a
/// number; anything else is a string.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Number(f64),
    Text(String),
}

impl Default for Val {
    fn default() -> Self {
        Val::Number(0.0)
    }
}

/// Longest text a value may hold, in bytes.
pub const MAX_STRING: usize = u16::max_value() as usize;

impl Val {
    /// Text that fits in a value, or STRING TOO LONG.
    pub fn checked_text(s: String) -> Result<Val, Error> {
        if s.len() > MAX_STRING {
            return Err(error!(StringTooLong));
        }
        Ok(Val::Text(s))
    }

    pub fn from_literal(s: &str) -> Val {
        let t = s.trim();
        if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
            return Val::Text(t[1..t.len() - 1].to_string());
        }
        let numeric = t.chars().any(|c| c.is_ascii_digit())
            && t.chars().all(|c| c.is_ascii_digit() || ".+-eE".contains(c));
        match t.parse::<f64>() {
            Ok(n) if numeric => Val::Number(n),
            _ => Val::Text(s.to_string()),
        }
    }

    /// `0` or `""` depending on the name's `$` suffix.
    pub fn default_for(name: &str) -> Val {
        if name.ends_with('$') {
            Val::Text(String::new())
        } else {
            Val::Number(0.0)
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Val::Text(_))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Number(n) => *n != 0.0,
            Val::Text(s) => !s.is_empty(),
        }
    }

    pub fn from_bool(b: bool) -> Val {
        Val::Number(if b { 1.0 } else { 0.0 })
    }

    pub fn number(&self) -> Result<f64, Error> {
        match self {
            Val::Number(n) => Ok(*n),
            Val::Text(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn text(&self) -> Result<&str, Error> {
        match self {
            Val::Text(s) => Ok(s),
            Val::Number(_) => Err(error!(TypeMismatch)),
        }
    }

    /// Identifier a quoted string literal is known by. Ordering of two
    /// strings compares these, not the characters.
    pub fn token_id(s: &str) -> u64 {
        s.chars()
            .enumerate()
            .map(|(i, c)| (i as u64 + 1) * c as u64)
            .sum()
    }

    /// Text form used by the evaluator: strings keep their quotes.
    pub fn render(&self) -> String {
        match self {
            Val::Number(n) => format_number(*n),
            Val::Text(s) => format!("\"{}\"", s),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Number(n) => write!(f, "{}", format_number(*n)),
            Val::Text(s) => write!(f, "{}", s),
        }
    }
}

impl TryFrom<&Val> for i64 {
    type Error = Error;

    fn try_from(val: &Val) -> Result<Self, Self::Error> {
        let n = val.number()?;
        if n.fract() != 0.0 {
            return Err(error!(IllegalFunctionCall; "INTEGER REQUIRED"));
        }
        if n.abs() > i64::max_value() as f64 {
            return Err(error!(Overflow));
        }
        Ok(n as i64)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Number(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Text(s.to_string())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_literal() {
        assert_eq!(Val::from_literal("42"), Val::Number(42.0));
        assert_eq!(Val::from_literal("\"42\""), Val::Text("42".into()));
        assert_eq!(Val::from_literal("hello"), Val::Text("hello".into()));
        assert_eq!(Val::from_literal(""), Val::Text("".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Val::Number(15.0).to_string(), "15");
        assert_eq!(Val::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Val::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Val::Text("a".into()).render(), "\"a\"");
    }

    #[test]
    fn test_token_id() {
        assert_eq!(Val::token_id("ab"), 97 + 2 * 98);
        assert_ne!(Val::token_id("ab"), Val::token_id("ba"));
    }
}
