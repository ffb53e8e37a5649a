#![allow(dead_code)]
use basic::mach::{Config, Event, Runtime};
use std::path::PathBuf;

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        match &event {
            Event::Stopped => {
                break;
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    s.push_str(&format!("?{}\n", error));
                }
            }
            Event::Warning(w) => {
                s.push_str(&format!("?WARNING: {}\n", w));
            }
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
            Event::Print(ps) => {
                s.push_str(&ps);
            }
            Event::Input(ps, _) => {
                s.push_str(&ps);
                break;
            }
            Event::List(ls) => {
                s.push_str(&format!("{}\n", ls));
            }
            Event::Cls | Event::Color(..) | Event::Locate(..) => {}
        }
        match event {
            Event::Running => prev_running = true,
            _ => prev_running = false,
        }
    }
    s.trim_end_matches("READY.\n").to_string()
}

/// Enter every line then RUN.
pub fn run_program(runtime: &mut Runtime, lines: &[&str]) -> String {
    for line in lines {
        runtime.enter(line);
    }
    runtime.enter("RUN");
    exec(runtime)
}

/// A fresh directory under the system temp dir for file tests.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("basic-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn runtime_in(dir: PathBuf) -> Runtime {
    Runtime::new(Config {
        file_root: dir,
        ..Config::default()
    })
}
