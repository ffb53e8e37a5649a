use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Operators over runtime values
///
/// Numbers combine with numbers and text with text. Any mix is a
/// TYPE MISMATCH. Comparisons and logic yield 1 or 0.

pub struct Operation {}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Number(n) => Ok(Number(-n)),
            Text(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::from_bool(!val.is_truthy()))
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Operation::finite(l * r)
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        if r == 0.0 {
            return Err(error!(DivisionByZero));
        }
        Operation::finite(l / r)
    }

    /// Floored: the result takes the sign of the divisor.
    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        if r == 0.0 {
            return Err(error!(DivisionByZero));
        }
        Operation::finite(l - r * (l / r).floor())
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Text(l), Text(r)) => Val::checked_text(l + &r),
            (Number(l), Number(r)) => Operation::finite(l + r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Operation::finite(l - r)
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(Operation::equal_bool(&lhs, &rhs)?))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(!Operation::equal_bool(&lhs, &rhs)?))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::ordinals(lhs, rhs)?;
        Ok(Val::from_bool(l < r))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::ordinals(lhs, rhs)?;
        Ok(Val::from_bool(l <= r))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::ordinals(lhs, rhs)?;
        Ok(Val::from_bool(l > r))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::ordinals(lhs, rhs)?;
        Ok(Val::from_bool(l >= r))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(lhs.is_truthy() && rhs.is_truthy()))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(lhs.is_truthy() || rhs.is_truthy()))
    }

    fn equal_bool(lhs: &Val, rhs: &Val) -> Result<bool> {
        use Val::*;
        match (lhs, rhs) {
            (Number(l), Number(r)) => Ok(l == r),
            (Text(l), Text(r)) => Ok(l == r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn numbers(lhs: Val, rhs: Val) -> Result<(f64, f64)> {
        Ok((lhs.number()?, rhs.number()?))
    }

    /// Strings order by their token identifier, not by character.
    fn ordinals(lhs: Val, rhs: Val) -> Result<(f64, f64)> {
        use Val::*;
        match (lhs, rhs) {
            (Number(l), Number(r)) => Ok((l, r)),
            (Text(l), Text(r)) => Ok((Val::token_id(&l) as f64, Val::token_id(&r) as f64)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn finite(n: f64) -> Result<Val> {
        if n.is_finite() {
            Ok(Val::Number(n))
        } else {
            Err(error!(Overflow))
        }
    }
}
