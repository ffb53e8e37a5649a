use super::{Frame, Stack, Subscript, Val, Var};
use crate::error;
use crate::lang::{ast::Expression, name, Error, LineNumber};
use std::collections::HashMap;
use std::time::Instant;

type Result<T> = std::result::Result<T, Error>;

/// A `DEF FN` function.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Expression,
}

/// ## Variable environment
///
/// Globals, the scope frame stack, and the per-run tables: labels, the
/// DATA pool and user functions. Lookups search frame locals newest
/// first and then the globals.

#[derive(Debug)]
pub struct Environment {
    globals: Var,
    frames: Stack<Frame>,
    labels: HashMap<String, LineNumber>,
    data: Vec<String>,
    data_cursor: usize,
    functions: HashMap<String, UserFunction>,
    started: Instant,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            globals: Var::new(),
            frames: Stack::with_max_len("TOO MANY NESTED FOR OR GOSUB", 4096),
            labels: HashMap::new(),
            data: vec![],
            data_cursor: 0,
            functions: HashMap::new(),
            started: Instant::now(),
        }
    }
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Everything a RUN starts without.
    pub fn clear(&mut self) {
        self.globals.clear();
        self.frames.clear();
        self.labels.clear();
        self.data.clear();
        self.data_cursor = 0;
        self.functions.clear();
        self.started = Instant::now();
    }

    pub fn globals(&self) -> &Var {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Var {
        &mut self.globals
    }

    pub fn ticks(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    // *** Scalars

    pub fn get(&self, var_name: &str) -> Option<&Val> {
        for frame in self.frames.iter() {
            if let Some(val) = frame.locals().fetch(var_name) {
                return Some(val);
            }
        }
        self.globals.fetch(var_name)
    }

    pub fn contains(&self, var_name: &str) -> bool {
        self.get(var_name).is_some()
    }

    /// Local names go to the innermost frame, or to the globals when no
    /// frame is live.
    pub fn set(&mut self, var_name: &str, val: Val) -> Result<()> {
        if !name::is_legal(var_name) {
            return Err(error!(IllegalVariableName; var_name.to_string()));
        }
        if name::is_local(var_name) {
            if let Some(frame) = self.frames.last_mut() {
                return frame.locals_mut().store(var_name, val);
            }
        }
        self.globals.store(var_name, val)
    }

    /// Store into whichever map already holds the name.
    pub fn update(&mut self, var_name: &str, val: Val) -> Result<()> {
        for frame in self.frames.iter_mut() {
            if frame.locals().contains(var_name) {
                return frame.locals_mut().store(var_name, val);
            }
        }
        self.set(var_name, val)
    }

    pub fn remove(&mut self, var_name: &str) -> Option<Val> {
        for frame in self.frames.iter_mut() {
            if let Some(val) = frame.locals_mut().remove(var_name) {
                return Some(val);
            }
        }
        self.globals.remove(var_name)
    }

    // *** Array elements

    pub fn get_element(&self, var_name: &str, index: &[Subscript]) -> Option<&Val> {
        for frame in self.frames.iter() {
            if let Some(val) = frame.locals().fetch_element(var_name, index) {
                return Some(val);
            }
        }
        self.globals.fetch_element(var_name, index)
    }

    pub fn set_element(&mut self, var_name: &str, index: Vec<Subscript>, val: Val) -> Result<()> {
        if !name::is_legal(var_name) {
            return Err(error!(IllegalVariableName; var_name.to_string()));
        }
        self.scope_for(var_name).store_element(var_name, index, val)
    }

    pub fn remove_element(&mut self, var_name: &str, index: &[Subscript]) -> Option<Val> {
        for frame in self.frames.iter_mut() {
            if let Some(val) = frame.locals_mut().remove_element(var_name, index) {
                return Some(val);
            }
        }
        self.globals.remove_element(var_name, index)
    }

    pub fn dimension(&mut self, var_name: &str, bounds: &[i64]) -> Result<()> {
        if !name::is_legal(var_name) {
            return Err(error!(IllegalVariableName; var_name.to_string()));
        }
        self.scope_for(var_name).dimension_array(var_name, bounds)
    }

    fn scope_for(&mut self, var_name: &str) -> &mut Var {
        if name::is_local(var_name) {
            if let Some(frame) = self.frames.last_mut() {
                return frame.locals_mut();
            }
        }
        &mut self.globals
    }

    // *** Scope frames

    pub fn push_frame(&mut self, frame: Frame) -> Result<()> {
        self.frames.push(frame)
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Every live frame, newest first.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
        self.frames.iter_mut()
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    // *** Labels

    pub fn set_labels(&mut self, labels: HashMap<String, LineNumber>) {
        self.labels = labels;
    }

    pub fn label(&self, label: &str) -> Option<LineNumber> {
        self.labels.get(&label.trim().to_ascii_lowercase()).copied()
    }

    // *** DATA pool

    pub fn set_data(&mut self, data: Vec<String>) {
        self.data = data;
        self.data_cursor = 0;
    }

    pub fn read_data(&mut self) -> Result<&str> {
        match self.data.get(self.data_cursor) {
            Some(item) => {
                self.data_cursor += 1;
                Ok(item)
            }
            None => Err(error!(OutOfData)),
        }
    }

    pub fn restore(&mut self) {
        self.data_cursor = 0;
    }

    // *** User functions

    pub fn define(&mut self, function: UserFunction) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn function(&self, fn_name: &str) -> Option<&UserFunction> {
        self.functions.get(&name::normalize(fn_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locals_live_in_innermost_frame() {
        let mut env = Environment::new();
        env.set("A", Val::Number(1.0)).unwrap();
        env.push_frame(Frame::new_call(None)).unwrap();
        env.set("_T", Val::Number(2.0)).unwrap();
        assert_eq!(env.get("_t"), Some(&Val::Number(2.0)));
        assert!(!env.globals().contains("_T"));
        env.pop_frame();
        assert_eq!(env.get("_T"), None);
        assert_eq!(env.get("a"), Some(&Val::Number(1.0)));
    }

    #[test]
    fn test_locals_visible_to_inner_frames() {
        let mut env = Environment::new();
        env.push_frame(Frame::new_call(None)).unwrap();
        env.set("_X", Val::Number(5.0)).unwrap();
        env.push_frame(Frame::new_loop("I", 3, 1, None)).unwrap();
        assert_eq!(env.get("_X"), Some(&Val::Number(5.0)));
        env.update("_X", Val::Number(6.0)).unwrap();
        env.pop_frame();
        assert_eq!(env.get("_X"), Some(&Val::Number(6.0)));
    }

    #[test]
    fn test_data_cursor() {
        let mut env = Environment::new();
        env.set_data(vec!["1".into(), "2".into()]);
        assert_eq!(env.read_data().unwrap(), "1");
        assert_eq!(env.read_data().unwrap(), "2");
        assert!(env.read_data().unwrap_err().is(crate::lang::ErrorCode::OutOfData));
        env.restore();
        assert_eq!(env.read_data().unwrap(), "1");
    }

    #[test]
    fn test_illegal_name() {
        let mut env = Environment::new();
        let e = env.set("9A", Val::Number(1.0)).unwrap_err();
        assert!(e.to_string().starts_with("ILLEGAL VARIABLE NAME"));
    }
}
