extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
extern crate mortal;
use crate::lang::Error;
use crate::mach::{persist, Config, Event, Listing, Runtime, WordList};
use ansi_term::{Colour, Style};
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Signal, Terminal};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What the command line asked for.
#[derive(Debug, Default)]
pub struct Options {
    pub config: Config,
    pub file: Option<PathBuf>,
    pub words: Option<PathBuf>,
}

pub fn main(options: Options) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", error);
    }
    let script = options.config.script;
    let mut runtime = match setup(options) {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("{}", Style::new().bold().paint(format!("?{}", error)));
            std::process::exit(1);
        }
    };
    let result = if script {
        script_loop(&mut runtime)
    } else {
        main_loop(&mut runtime, interrupted)
    };
    if let Err(error) = result {
        eprintln!("{}", error);
    }
}

fn setup(options: Options) -> Result<Runtime, Error> {
    let script = options.config.script;
    let mut runtime = Runtime::new(options.config);
    if let Some(path) = &options.words {
        runtime.set_words(Arc::new(WordList::load(path)?));
    }
    if let Some(path) = &options.file {
        runtime.set_listing(persist::load(path)?);
        runtime.set_program_path(&path.to_string_lossy());
        if script {
            runtime.enter("RUN");
        }
    }
    if let Ok(terminal) = mortal::Terminal::new() {
        if let Ok(size) = terminal.size() {
            runtime.set_size(clamp(size.lines), clamp(size.columns));
        }
    }
    Ok(runtime)
}

fn clamp(n: usize) -> u16 {
    n.min(u16::max_value() as usize) as u16
}

/// Unattended run. Output goes to stdout, nothing is read.
fn script_loop(runtime: &mut Runtime) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    loop {
        match runtime.execute(5000) {
            Event::Stopped | Event::Input(..) => break,
            Event::Errors(errors) => {
                for error in errors.iter() {
                    eprintln!("?{}", error);
                }
            }
            Event::Warning(s) => eprintln!("?WARNING: {}", s),
            Event::Print(s) => out.write_all(s.as_bytes())?,
            Event::List(s) => writeln!(out, "{}", s)?,
            Event::Running | Event::Cls | Event::Color(..) | Event::Locate(..) => {}
        }
    }
    out.flush()
}

fn main_loop(runtime: &mut Runtime, interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let command = Interface::new("BASIC")?;
    let input = Interface::new("Input")?;
    input.set_report_signal(Signal::Interrupt, true);
    command.write_fmt(format_args!("READY.\n"))?;
    let mut keys = Keys::new();

    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        };
        let event = runtime.execute(5000);
        if event != Event::Running {
            keys.release()?;
        }
        match event {
            Event::Stopped => {
                let saved_completer = command.completer();
                command.set_completer(Arc::new(LineCompleter::new(runtime.get_listing())));
                let string = match command.read_line()? {
                    ReadResult::Input(string) => string,
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
                command.set_completer(saved_completer);
                if runtime.enter(&string) {
                    command.add_history_unique(string);
                }
            }
            Event::Input(prompt, _) => {
                input.set_prompt(&prompt)?;
                match input.read_line()? {
                    ReadResult::Input(string) => {
                        if runtime.enter(&string) {
                            input.add_history_unique(string);
                        }
                    }
                    ReadResult::Signal(Signal::Interrupt) => {
                        input.set_buffer("")?;
                        input.lock_reader().cancel_read_line()?;
                        runtime.interrupt();
                        runtime.enter("");
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    command.write_fmt(format_args!(
                        "{}\n",
                        Style::new().bold().paint(format!("?{}", error))
                    ))?;
                }
            }
            Event::Warning(s) => {
                command.write_fmt(format_args!("?WARNING: {}\n", s))?;
            }
            Event::Running => {
                if let Some(key) = keys.poll()? {
                    runtime.press_key(key);
                }
            }
            Event::Print(s) => {
                command.write_fmt(format_args!("{}", s))?;
            }
            Event::List(s) => {
                command.write_fmt(format_args!("{}\n", s))?;
            }
            Event::Cls => {
                command.write_fmt(format_args!("\x1b[2J\x1b[H"))?;
            }
            Event::Color(fg, bg) => {
                let style = Style::new().fg(Colour::Fixed(fg)).on(Colour::Fixed(bg));
                command.write_fmt(format_args!("{}", style.prefix()))?;
            }
            Event::Locate(row, col) => {
                command.write_fmt(format_args!("\x1b[{};{}H", row, col))?;
            }
        }
    }
    Ok(())
}

/// Single keys typed while a program runs, for INKEY$. The terminal is
/// raw only between `poll` and `release` so line editing and output
/// behave normally.
struct Keys {
    terminal: Option<mortal::Terminal>,
    state: Option<mortal::PrepareState>,
}

impl Keys {
    fn new() -> Keys {
        Keys {
            terminal: mortal::Terminal::new().ok(),
            state: None,
        }
    }

    fn poll(&mut self) -> std::io::Result<Option<char>> {
        let terminal = match &self.terminal {
            Some(terminal) => terminal,
            None => return Ok(None),
        };
        if self.state.is_none() {
            let config = mortal::PrepareConfig {
                block_signals: false,
                ..mortal::PrepareConfig::default()
            };
            self.state = Some(terminal.prepare(config)?);
        }
        Ok(match terminal.read_event(Some(Duration::from_millis(0)))? {
            Some(mortal::Event::Key(mortal::Key::Char(c))) => Some(c),
            Some(mortal::Event::Key(mortal::Key::Enter)) => Some('\r'),
            _ => None,
        })
    }

    fn release(&mut self) -> std::io::Result<()> {
        if let (Some(terminal), Some(state)) = (&self.terminal, self.state.take()) {
            terminal.restore(state)?;
        }
        Ok(())
    }
}

/// Tab after a line number brings the line back for editing.
struct LineCompleter {
    listing: Listing,
}

impl LineCompleter {
    fn new(listing: Listing) -> LineCompleter {
        LineCompleter { listing }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let num = prompter.buffer().trim().parse().ok()?;
        let line = self.listing.get(num)?;
        let mut comp = Completion::simple(line.to_string());
        comp.suffix = linefeed::complete::Suffix::None;
        Some(vec![comp])
    }
}
