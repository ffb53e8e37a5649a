use super::Column;

#[derive(Debug, PartialEq, Clone)]
pub enum Item {
    Expression(Expression),
    /// `,` or TAB: a field separator.
    Comma(Column),
    /// `;`: joins items without a separator.
    Semicolon(Column),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(Column, f64),
    String(Column, String),
    Var(Column, String),
    /// Built-in, user function, or array element. Which one is decided
    /// at evaluation time from the name.
    Call(Column, String, Vec<Expression>),
    Negation(Column, Box<Expression>),
    Not(Column, Box<Expression>),
    Multiply(Column, Box<Expression>, Box<Expression>),
    Divide(Column, Box<Expression>, Box<Expression>),
    Modulus(Column, Box<Expression>, Box<Expression>),
    Add(Column, Box<Expression>, Box<Expression>),
    Subtract(Column, Box<Expression>, Box<Expression>),
    Equal(Column, Box<Expression>, Box<Expression>),
    NotEqual(Column, Box<Expression>, Box<Expression>),
    Less(Column, Box<Expression>, Box<Expression>),
    LessEqual(Column, Box<Expression>, Box<Expression>),
    Greater(Column, Box<Expression>, Box<Expression>),
    GreaterEqual(Column, Box<Expression>, Box<Expression>),
    And(Column, Box<Expression>, Box<Expression>),
    Or(Column, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn column(&self) -> Column {
        use Expression::*;
        match self {
            Number(col, ..)
            | String(col, ..)
            | Var(col, ..)
            | Call(col, ..)
            | Negation(col, ..)
            | Not(col, ..)
            | Multiply(col, ..)
            | Divide(col, ..)
            | Modulus(col, ..)
            | Add(col, ..)
            | Subtract(col, ..)
            | Equal(col, ..)
            | NotEqual(col, ..)
            | Less(col, ..)
            | LessEqual(col, ..)
            | Greater(col, ..)
            | GreaterEqual(col, ..)
            | And(col, ..)
            | Or(col, ..) => col.clone(),
        }
    }

    /// True for a bare identifier or array element, the two forms that
    /// pass through as text when undefined.
    pub fn is_reference(&self) -> bool {
        matches!(self, Expression::Var(..) | Expression::Call(..))
    }
}
