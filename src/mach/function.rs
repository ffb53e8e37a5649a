use super::{
    val::{format_number, MAX_STRING},
    Val, WordList,
};
use crate::error;
use crate::lang::Error;
use rand::Rng;
use std::convert::TryFrom;
use std::ops::RangeInclusive;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in function catalog
///
/// Names are matched after normalizing to uppercase. Errors raised by a
/// function carry the function name as their detail.

pub struct Function {}

impl Function {
    pub fn arity(func_name: &str) -> Option<RangeInclusive<usize>> {
        Some(match func_name {
            "RND" | "SIN" | "COS" | "TAN" | "ATAN" | "ASIN" | "ACOS" | "SQR" | "INT" | "ABS"
            | "VAL" => 1..=1,
            "POW" => 2..=2,
            "STR$" | "CHR$" | "ASC" | "LEN" | "UC$" | "LC$" | "TAB" => 1..=1,
            "LEFT$" | "RIGHT$" => 2..=2,
            "MID$" => 2..=3,
            "REPLACE$" => 3..=3,
            "INSTR" => 2..=3,
            "ISWORD" | "GETWORD" | "GETWORDCONTAINS" | "GETNEXTWORD" => 1..=1,
            "GETNEXTWORDCONTAINS" => 2..=2,
            _ => return None,
        })
    }

    pub fn is_builtin(func_name: &str) -> bool {
        Function::arity(func_name).is_some()
    }

    pub fn call(func_name: &str, args: &[Val], words: &WordList) -> Result<Val> {
        Function::dispatch(func_name, args, words).map_err(|e| e.message(func_name))
    }

    fn dispatch(func_name: &str, args: &[Val], words: &WordList) -> Result<Val> {
        match Function::arity(func_name) {
            Some(arity) if arity.contains(&args.len()) => {}
            Some(_) => return Err(error!(IllegalFunctionCall)),
            None => return Err(error!(UndefinedUserFunction)),
        }
        match func_name {
            "RND" => Function::rnd(&args[0]),
            "SIN" => Function::math(&args[0], f64::sin),
            "COS" => Function::math(&args[0], f64::cos),
            "TAN" => Function::math(&args[0], f64::tan),
            "ATAN" => Function::math(&args[0], f64::atan),
            "ASIN" => Function::math(&args[0], f64::asin),
            "ACOS" => Function::math(&args[0], f64::acos),
            "SQR" => Function::math(&args[0], f64::sqrt),
            "POW" => Function::pow(&args[0], &args[1]),
            "INT" => Function::math(&args[0], f64::trunc),
            "ABS" => Function::math(&args[0], f64::abs),
            "VAL" => Function::val(&args[0]),
            "STR$" => Ok(Val::Text(format_number(args[0].number()?))),
            "CHR$" => Function::chr(&args[0]),
            "ASC" => Function::asc(&args[0]),
            "LEFT$" => Function::left(&args[0], &args[1]),
            "RIGHT$" => Function::right(&args[0], &args[1]),
            "MID$" => Function::mid(&args[0], &args[1], args.get(2)),
            "REPLACE$" => Function::replace(&args[0], &args[1], &args[2]),
            "INSTR" => Function::instr(&args[0], &args[1], args.get(2)),
            "LEN" => Ok(Val::Number(args[0].text()?.chars().count() as f64)),
            "UC$" => Ok(Val::Text(args[0].text()?.to_uppercase())),
            "LC$" => Ok(Val::Text(args[0].text()?.to_lowercase())),
            "TAB" => Function::tab(&args[0]),
            "ISWORD" => Ok(Val::from_bool(words.is_word(args[0].text()?))),
            "GETWORD" => Ok(Function::word(words.random(Function::count(&args[0])?))),
            "GETWORDCONTAINS" => Ok(Function::word(words.random_containing(args[0].text()?))),
            "GETNEXTWORD" => Ok(Function::word(words.next_after(args[0].text()?))),
            "GETNEXTWORDCONTAINS" => Ok(Function::word(
                words.next_after_containing(args[0].text()?, args[1].text()?),
            )),
            _ => Err(error!(InternalError)),
        }
    }

    fn count(val: &Val) -> Result<usize> {
        let n = i64::try_from(val)?;
        if n < 0 {
            return Err(error!(IllegalFunctionCall));
        }
        Ok(n as usize)
    }

    fn tab(val: &Val) -> Result<Val> {
        let n = Function::count(val)?;
        if n > MAX_STRING {
            return Err(error!(StringTooLong));
        }
        Ok(Val::Text(" ".repeat(n)))
    }

    fn word(word: Option<&str>) -> Val {
        Val::Text(word.unwrap_or_default().to_string())
    }

    fn rnd(val: &Val) -> Result<Val> {
        let n = val.number()?;
        let mut rng = rand::thread_rng();
        if n < 1.0 {
            Ok(Val::Number(rng.gen::<f64>()))
        } else {
            Ok(Val::Number(rng.gen_range(1..=n.trunc() as i64) as f64))
        }
    }

    fn math(val: &Val, f: fn(f64) -> f64) -> Result<Val> {
        Function::checked(f(val.number()?))
    }

    fn pow(x: &Val, y: &Val) -> Result<Val> {
        Function::checked(x.number()?.powf(y.number()?))
    }

    /// NaN means an argument was outside the function's domain.
    fn checked(n: f64) -> Result<Val> {
        if n.is_nan() {
            Err(error!(IllegalFunctionCall))
        } else if n.is_infinite() {
            Err(error!(Overflow))
        } else {
            Ok(Val::Number(n))
        }
    }

    fn val(val: &Val) -> Result<Val> {
        match val {
            Val::Number(n) => Ok(Val::Number(*n)),
            Val::Text(s) if s.trim().is_empty() => Ok(Val::Number(0.0)),
            Val::Text(s) => match Val::from_literal(s.trim()) {
                Val::Number(n) => Ok(Val::Number(n)),
                Val::Text(_) => Err(error!(TypeMismatch)),
            },
        }
    }

    fn chr(val: &Val) -> Result<Val> {
        let n = i64::try_from(val)?;
        match u32::try_from(n).ok().and_then(std::char::from_u32) {
            Some(ch) => Ok(Val::Text(ch.to_string())),
            None => Err(error!(IllegalFunctionCall)),
        }
    }

    fn asc(val: &Val) -> Result<Val> {
        match val.text()?.chars().next() {
            Some(ch) => Ok(Val::Number(ch as u32 as f64)),
            None => Err(error!(IllegalFunctionCall)),
        }
    }

    fn left(s: &Val, n: &Val) -> Result<Val> {
        let n = Function::count(n)?;
        Ok(Val::Text(s.text()?.chars().take(n).collect()))
    }

    fn right(s: &Val, n: &Val) -> Result<Val> {
        let n = Function::count(n)?;
        let chars: Vec<char> = s.text()?.chars().collect();
        let skip = chars.len().saturating_sub(n);
        Ok(Val::Text(chars[skip..].iter().collect()))
    }

    /// `start` is 1-based. A missing length takes the rest of the string.
    fn mid(s: &Val, start: &Val, len: Option<&Val>) -> Result<Val> {
        let start = Function::count(start)?;
        if start < 1 {
            return Err(error!(IllegalFunctionCall));
        }
        let len = match len {
            Some(len) => Function::count(len)?,
            None => usize::max_value(),
        };
        Ok(Val::Text(s.text()?.chars().skip(start - 1).take(len).collect()))
    }

    fn replace(s: &Val, find: &Val, with: &Val) -> Result<Val> {
        let s = s.text()?;
        let find = find.text()?;
        let with = with.text()?;
        if find.is_empty() {
            return Ok(Val::Text(s.to_string()));
        }
        let hits = s.matches(find).count();
        if with.len() > find.len() && s.len() + hits * (with.len() - find.len()) > MAX_STRING {
            return Err(error!(StringTooLong));
        }
        Ok(Val::Text(s.replace(find, with)))
    }

    /// 1-based position of `find` at or after `start`, 0 when absent.
    fn instr(s: &Val, find: &Val, start: Option<&Val>) -> Result<Val> {
        let start = match start {
            Some(start) => Function::count(start)?,
            None => 1,
        };
        if start < 1 {
            return Err(error!(IllegalFunctionCall));
        }
        let hay: Vec<char> = s.text()?.chars().collect();
        let needle: Vec<char> = find.text()?.chars().collect();
        if start > hay.len() + 1 {
            return Ok(Val::Number(0.0));
        }
        if needle.is_empty() {
            return Ok(Val::Number(start as f64));
        }
        let found = hay[start - 1..]
            .windows(needle.len())
            .position(|w| w == needle.as_slice())
            .map(|i| i + start);
        Ok(Val::Number(found.unwrap_or(0) as f64))
    }
}
