use super::{
    sql, Catalog, Config, Database, Environment, Evaluator, Files, Listing, Registry, Val,
    WordList,
};
use crate::error;
use crate::lang::{Error, Line, Pointer};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

mod editor;
mod exec;

type Result<T> = std::result::Result<T, Error>;

/// ## Events for the front end
///
/// `execute` returns one of these at a time. The front end prints,
/// prompts or redraws, then calls `execute` again.

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Waiting for a line of input. The flag asks for a single key.
    Input(String, bool),
    Errors(Arc<Vec<Error>>),
    Warning(String),
    Print(String),
    List(String),
    Cls,
    Color(u8, u8),
    Locate(u16, u16),
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Stopped,
    Running,
    Input(InputRequest),
}

#[derive(Debug, Clone, PartialEq)]
struct InputRequest {
    prompt: String,
    targets: Vec<String>,
    key: bool,
}

/// ## Program instance
///
/// One per session. Owns its listing, variables and open files
/// exclusively; the registry is the only thing shared between
/// instances.

pub struct Runtime {
    listing: Listing,
    direct: Line,
    dirty: bool,
    env: Environment,
    config: Config,
    words: Arc<WordList>,
    files: Files,
    database: Box<dyn Database>,
    registry: Registry,
    program_path: String,
    instance: Option<u64>,
    events: VecDeque<Event>,
    state: State,
    pc: Option<Pointer>,
    run_started: Instant,
    interrupted: bool,
    key: Option<char>,
    rows: u16,
    cols: u16,
    fg: u8,
    bg: u8,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        Runtime::with_registry(config, Registry::new())
    }

    pub fn with_registry(config: Config, registry: Registry) -> Runtime {
        Runtime {
            listing: Listing::default(),
            direct: Line::with_number(None, ""),
            dirty: true,
            env: Environment::new(),
            files: Files::new(&config.file_root),
            config,
            words: Arc::new(WordList::default()),
            database: Box::new(sql::Unavailable),
            registry,
            program_path: String::new(),
            instance: None,
            events: VecDeque::new(),
            state: State::Stopped,
            pc: None,
            run_started: Instant::now(),
            interrupted: false,
            key: None,
            rows: 24,
            cols: 80,
            fg: 7,
            bg: 0,
        }
    }

    pub fn set_words(&mut self, words: Arc<WordList>) {
        self.words = words;
    }

    pub fn set_database(&mut self, database: Box<dyn Database>) {
        self.database = database;
    }

    /// The name other instances of the same program are found by.
    pub fn set_program_path(&mut self, path: &str) {
        self.program_path = path.to_string();
    }

    pub fn set_size(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
    }

    /// A key pressed while the program runs. Read with INKEY$.
    pub fn press_key(&mut self, key: char) {
        self.key = Some(key);
    }

    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_listing(&self) -> Listing {
        self.listing.clone()
    }

    pub fn set_listing(&mut self, listing: Listing) {
        self.stop();
        self.listing = listing;
        self.dirty = true;
    }

    pub fn is_running(&self) -> bool {
        self.state != State::Stopped
    }

    /// Current value of a variable as the program would see it.
    pub fn var(&self, name: &str) -> Option<Val> {
        self.env.get(name).cloned()
    }

    /// Evaluate text the way statement operands are evaluated: a
    /// separator list rendered to one line with strings quoted.
    pub fn evaluate_text(&self, text: &str) -> Result<String> {
        self.evaluate(|e| e.text(text))
    }

    /// Accepts a program line, an immediate statement, or the answer to
    /// a pending INPUT. Returns true when the text belongs in history.
    pub fn enter(&mut self, string: &str) -> bool {
        if let State::Input(request) = &self.state {
            let request = request.clone();
            self.state = State::Running;
            if let Err(e) = self.answer(&request, string) {
                self.halt_with(e);
            }
            return !request.key;
        }
        let line = Line::new(string);
        if !line.is_direct() {
            self.listing.insert(line);
            self.dirty = true;
            return true;
        }
        if line.is_empty() {
            return false;
        }
        self.direct = line;
        self.pc = Some(Pointer::direct(0));
        self.state = State::Running;
        self.run_started = Instant::now();
        if self.dirty {
            self.index();
        }
        true
    }

    /// Run until something needs the front end's attention or `cycles`
    /// statements have executed.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.events.pop_front() {
            return event;
        }
        match &self.state {
            State::Stopped => return Event::Stopped,
            State::Input(request) => return Event::Input(request.prompt.clone(), request.key),
            State::Running => {}
        }
        for _ in 0..cycles {
            if self.interrupted {
                self.interrupted = false;
                if !self.config.script {
                    let e = error!(Break).in_pointer(self.pc);
                    self.halt_with(e);
                    break;
                }
            }
            if self.run_started.elapsed() >= self.config.run_limit() {
                let e = error!(TimeLimitExceeded).in_pointer(self.pc);
                self.halt_with(e);
                break;
            }
            let pc = match self.pc {
                Some(pc) => pc,
                None => {
                    self.stop();
                    break;
                }
            };
            let statement = match self.statement(pc) {
                Some(statement) => statement.to_string(),
                None => {
                    self.stop();
                    break;
                }
            };
            self.pc = self.next_pointer(pc);
            let result = match self.receive_shared() {
                Ok(()) => self.dispatch(pc, &statement),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                self.halt_with(e.in_pointer(Some(pc)));
            }
            if !self.events.is_empty() || self.state != State::Running {
                break;
            }
        }
        match self.events.pop_front() {
            Some(event) => event,
            None => match &self.state {
                State::Stopped => Event::Stopped,
                State::Input(request) => Event::Input(request.prompt.clone(), request.key),
                State::Running => Event::Running,
            },
        }
    }

    // *** Addressing across the direct line and the listing

    fn statement(&self, pc: Pointer) -> Option<&str> {
        if pc.is_direct() {
            self.direct.statements().get(pc.statement).map(|s| s.as_str())
        } else {
            self.listing.statement(pc)
        }
    }

    fn next_pointer(&self, pc: Pointer) -> Option<Pointer> {
        if pc.is_direct() {
            let next = Pointer::direct(pc.statement + 1);
            if next.statement < self.direct.statements().len() {
                Some(next)
            } else {
                None
            }
        } else {
            self.listing.next(pc)
        }
    }

    /// Values other instances of this program SHAREd since the last
    /// statement.
    fn receive_shared(&mut self) -> Result<()> {
        if let Some(id) = self.instance {
            for (name, val) in self.registry.drain(id) {
                self.env.globals_mut().store(&name, val)?;
            }
        }
        Ok(())
    }

    // *** Halting

    fn stop(&mut self) {
        let was_running = self.state != State::Stopped;
        self.state = State::Stopped;
        self.pc = None;
        if let Some(id) = self.instance.take() {
            self.registry.unregister(id);
        }
        if was_running && !self.config.script {
            self.events.push_back(Event::Print("READY.\n".to_string()));
        }
    }

    fn halt_with(&mut self, error: Error) {
        self.events.push_back(Event::Errors(Arc::new(vec![error])));
        self.stop();
    }

    fn warn(&mut self, message: String) {
        self.events.push_back(Event::Warning(message));
    }

    fn output(&mut self, s: String) {
        if let Some(Event::Print(last)) = self.events.back_mut() {
            last.push_str(&s);
        } else {
            self.events.push_back(Event::Print(s));
        }
    }

    /// Rebuild the label table and DATA pool from the listing. Label
    /// warnings are reported once per edit.
    fn index(&mut self) {
        let (labels, warnings) = self.listing.labels();
        self.env.set_labels(labels);
        self.env.set_data(self.listing.data());
        if self.dirty {
            for warning in warnings {
                self.warn(warning);
            }
        }
        self.dirty = false;
    }

    // *** Evaluation

    fn catalog(&self) -> Catalog<'_> {
        Catalog {
            session: &self.config.session,
            rows: self.rows,
            cols: self.cols,
            fg: self.fg,
            bg: self.bg,
            key: self.key,
            ticks: self.env.ticks(),
        }
    }

    fn evaluate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Evaluator) -> Result<T>,
    {
        let catalog = self.catalog();
        let mut evaluator = Evaluator::new(&self.env, &catalog, &self.words, &self.config);
        f(&mut evaluator)
    }

    fn expression(&self, text: &str) -> Result<Val> {
        self.evaluate(|e| e.expression(text))
    }

    fn integer(&self, text: &str) -> Result<i64> {
        self.evaluate(|e| e.integer(text))
    }

    /// Operand that may be a bare word or an expression, such as a file
    /// or state name. Quoted text and defined variables evaluate; a bare
    /// undefined word passes through.
    fn name_operand(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(error!(SyntaxError; "MISSING NAME"));
        }
        Ok(self.expression(text)?.to_string())
    }
}
