//! # BASIC
//!
//! The bulletin board's BASIC at a terminal.
//!

use basic::mach::{Config, Session};
use basic::term::{self, Options};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(about, version)]
struct Args {
    /// Program to load, a `.bas` listing or a packed program
    file: Option<PathBuf>,
    /// Run FILE unattended: no input, short time limit
    #[arg(long)]
    script: bool,
    /// Directory for data files, programs and databases
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Word list for ISWORD and GETWORD, one word per line
    #[arg(long)]
    words: Option<PathBuf>,
    /// Seconds one expression may take
    #[arg(long, default_value_t = 10)]
    timeout: u64,
    /// Seconds a run may take
    #[arg(long)]
    run_limit: Option<u64>,
    #[arg(long, default_value = "SYSOP")]
    user: String,
    #[arg(long, default_value_t = 1)]
    user_id: i64,
}

fn main() {
    let args = Args::parse();
    let mut config = Config {
        expression_timeout: Duration::from_secs(args.timeout),
        script: args.script,
        file_root: args.root,
        session: Session {
            username: args.user,
            user_id: args.user_id,
            session_id: std::process::id() as i64,
        },
        ..Config::default()
    };
    if let Some(secs) = args.run_limit {
        if config.script {
            config.script_run_limit = Duration::from_secs(secs);
        } else {
            config.run_limit = Duration::from_secs(secs);
        }
    }
    term::main(Options {
        config,
        file: args.file,
        words: args.words,
    });
}
