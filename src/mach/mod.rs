/*!
## Rust Machine Module

This Rust module runs BASIC programs: values and variables, scope
frames, the expression evaluator, the program listing and the runtime
that executes it statement by statement.

*/

mod catalog;
mod command;
mod config;
mod env;
mod eval;
mod files;
mod frame;
mod function;
mod listing;
mod operation;
mod registry;
mod runtime;
mod stack;
mod val;
mod var;
mod words;

pub mod persist;
pub mod sql;

pub use catalog::Catalog;
pub use command::Command;
pub use config::{Config, Session};
pub use env::{Environment, UserFunction};
pub use eval::{Evaluator, Field};
pub use files::{Files, Mode as FileMode};
pub use frame::{CallFrame, Frame, LoopFrame};
pub use function::Function;
pub use listing::Listing;
pub use operation::Operation;
pub use registry::Registry;
pub use runtime::{Event, Runtime};
pub use sql::{Database, Unavailable};
pub use stack::Stack;
pub use val::Val;
pub use var::{Subscript, Var};
pub use words::WordList;
