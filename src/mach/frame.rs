use super::Var;
use crate::lang::{name, Pointer};

/// ## Scope frame
///
/// Pushed by FOR and GOSUB. Each frame owns the `_` prefixed variables
/// assigned while it is the innermost frame.

#[derive(Debug, Clone)]
pub enum Frame {
    Loop(LoopFrame),
    Call(CallFrame),
}

#[derive(Debug, Clone)]
pub struct LoopFrame {
    pub var: String,
    pub end: i64,
    pub step: i64,
    /// Statement after the FOR. `None` when the FOR ends the program.
    pub body: Option<Pointer>,
    pub locals: Var,
}

#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Statement after the GOSUB.
    pub resume: Option<Pointer>,
    pub locals: Var,
}

impl Frame {
    pub fn new_loop(var: &str, end: i64, step: i64, body: Option<Pointer>) -> Frame {
        Frame::Loop(LoopFrame {
            var: name::normalize(var),
            end,
            step,
            body,
            locals: Var::new(),
        })
    }

    pub fn new_call(resume: Option<Pointer>) -> Frame {
        Frame::Call(CallFrame {
            resume,
            locals: Var::new(),
        })
    }

    pub fn locals(&self) -> &Var {
        match self {
            Frame::Loop(f) => &f.locals,
            Frame::Call(f) => &f.locals,
        }
    }

    pub fn locals_mut(&mut self) -> &mut Var {
        match self {
            Frame::Loop(f) => &mut f.locals,
            Frame::Call(f) => &mut f.locals,
        }
    }

    pub fn is_loop_over(&self, var: &str) -> bool {
        match self {
            Frame::Loop(f) => f.var == name::normalize(var),
            Frame::Call(_) => false,
        }
    }
}
