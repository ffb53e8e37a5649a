//! # Board BASIC
//!
//! The BASIC dialect of a multi-user bulletin board. Users write small
//! interactive programs and chat bots in it; the board runs one
//! instance per session.
//!
//! Programs are typed at a `READY.` prompt. A line that starts with a
//! number is stored, anything else runs at once.
//! ```text
//! 10 FOR I=1 TO 3:PRINT "HELLO ";USERNAME$:NEXT I
//! RUN
//! ```
//!
//! Values are numbers or strings. A name ending in `$` holds a string
//! and a name starting with `_` lives only in the innermost FOR or
//! GOSUB. Lines that start with `!` are labels and may be the target of
//! GOTO, GOSUB and ON. Names that were never assigned read as their own
//! text, so `PRINT HELLO` prints `HELLO`.
//!
//! The `lang` module turns text into expressions and statements. The
//! `mach` module holds variables and runs programs. The `term` module is
//! the terminal front end used by the `basic` binary.

pub mod lang;
pub mod mach;
pub mod term;
