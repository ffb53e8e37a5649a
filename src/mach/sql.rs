use super::files::sanitize;
use crate::error;
use crate::lang::Error;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, Error>;

/// ## Relational store behind `@`, `SQL` and the state statements
///
/// Every call names the program's database file. Saved state is a list
/// of `(name, value)` pairs where values are in evaluator text form.

pub trait Database: Send {
    fn query(&mut self, path: &Path, sql: &str) -> Result<Vec<Vec<String>>>;
    fn save_state(&mut self, path: &Path, state: &str, vars: &[(String, String)]) -> Result<()>;
    fn load_state(&mut self, path: &Path, state: &str) -> Result<Vec<(String, String)>>;
    fn clear_state(&mut self, path: &Path, state: &str) -> Result<()>;
    fn states(&mut self, path: &Path) -> Result<Vec<String>>;
}

/// The database used when the host supplies none.
#[derive(Debug, Default)]
pub struct Unavailable;

impl Unavailable {
    fn fail<T>() -> Result<T> {
        Err(error!(DatabaseError; "NO DATABASE"))
    }
}

impl Database for Unavailable {
    fn query(&mut self, _: &Path, _: &str) -> Result<Vec<Vec<String>>> {
        Unavailable::fail()
    }
    fn save_state(&mut self, _: &Path, _: &str, _: &[(String, String)]) -> Result<()> {
        Unavailable::fail()
    }
    fn load_state(&mut self, _: &Path, _: &str) -> Result<Vec<(String, String)>> {
        Unavailable::fail()
    }
    fn clear_state(&mut self, _: &Path, _: &str) -> Result<()> {
        Unavailable::fail()
    }
    fn states(&mut self, _: &Path) -> Result<Vec<String>> {
        Unavailable::fail()
    }
}

/// `DB$` must already be a clean file name.
pub fn database_path(root: &Path, name: Option<&str>) -> Result<PathBuf> {
    let name = name.unwrap_or_default();
    match sanitize(name) {
        Ok(clean) if clean == name => Ok(root.join(clean)),
        _ => Err(error!(BadFileName; "ILLEGAL DATABASE FILENAME")),
    }
}
