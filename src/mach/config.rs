use std::path::PathBuf;
use std::time::Duration;

/// Who is running the program. Supplied by the board session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub username: String,
    pub user_id: i64,
    pub session_id: i64,
}

/// ## Runtime limits and locations

#[derive(Debug, Clone)]
pub struct Config {
    /// Ceiling for one top-level expression evaluation.
    pub expression_timeout: Duration,
    pub run_limit: Duration,
    pub script_run_limit: Duration,
    /// Unattended mode. INPUT and GET do nothing and interrupts are ignored.
    pub script: bool,
    pub wait_limit: Duration,
    pub file_root: PathBuf,
    pub max_fn_depth: usize,
    pub session: Session,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            expression_timeout: Duration::from_secs(10),
            run_limit: Duration::from_secs(30 * 60),
            script_run_limit: Duration::from_secs(60),
            script: false,
            wait_limit: Duration::from_secs(10),
            file_root: PathBuf::from("."),
            max_fn_depth: 64,
            session: Session::default(),
        }
    }
}

impl Config {
    pub fn run_limit(&self) -> Duration {
        if self.script {
            self.script_run_limit
        } else {
            self.run_limit
        }
    }
}
