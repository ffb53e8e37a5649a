use super::{Session, Val};
use chrono::Local;

/// ## Environment catalog
///
/// Read-only pseudo-variables describing the session. They are resolved
/// when looked up and never live in variable memory.

#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    pub session: &'a Session,
    pub rows: u16,
    pub cols: u16,
    pub fg: u8,
    pub bg: u8,
    pub key: Option<char>,
    pub ticks: u128,
}

const NAMES: &[&str] = &[
    "USERNAME$",
    "USERID",
    "SESSIONID",
    "ROWS",
    "COLS",
    "FG",
    "BG",
    "DATE$",
    "TIME$",
    "TICKS",
    "INKEY$",
];

impl<'a> Catalog<'a> {
    pub fn is_reserved(name: &str) -> bool {
        NAMES.iter().any(|n| n.eq_ignore_ascii_case(name.trim()))
    }

    pub fn get(&self, name: &str) -> Option<Val> {
        let val = match name.trim().to_ascii_uppercase().as_str() {
            "USERNAME$" => Val::Text(self.session.username.clone()),
            "USERID" => Val::Number(self.session.user_id as f64),
            "SESSIONID" => Val::Number(self.session.session_id as f64),
            "ROWS" => Val::Number(self.rows as f64),
            "COLS" => Val::Number(self.cols as f64),
            "FG" => Val::Number(self.fg as f64),
            "BG" => Val::Number(self.bg as f64),
            "DATE$" => Val::Text(Local::now().format("%Y-%m-%d").to_string()),
            "TIME$" => Val::Text(Local::now().format("%H:%M:%S").to_string()),
            "TICKS" => Val::Number(self.ticks as f64),
            "INKEY$" => Val::Text(self.key.map(String::from).unwrap_or_default()),
            _ => return None,
        };
        Some(val)
    }
}
