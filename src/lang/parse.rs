use super::{ast::*, lex, token::*, Column, Error};

type Result<T> = std::result::Result<T, Error>;

/// Parse text holding exactly one expression.
pub fn parse(s: &str) -> Result<Expression> {
    let tokens = lex(s);
    let mut parse = Parser::new(&tokens);
    let expr = match parse.expression() {
        Ok(expr) => expr,
        Err(e) => return Err(e.in_column(&parse.col)),
    };
    match parse.next() {
        None => Ok(expr),
        Some(_) => Err(error!(SyntaxError, ..&parse.col; "UNEXPECTED TOKEN")),
    }
}

/// Parse a PRINT style list of expressions and separators.
pub fn parse_list(s: &str) -> Result<Vec<Item>> {
    let tokens = lex(s);
    let mut parse = Parser::new(&tokens);
    match parse.list() {
        Ok(list) => Ok(list),
        Err(e) => Err(e.in_column(&parse.col)),
    }
}

const UNARY: usize = 7;
const NOT_OPERAND: usize = 4;
/// Deepest expression tree the parser builds.
const MAX_NESTING: usize = 100;

struct Parser<'a> {
    token_stream: std::slice::Iter<'a, Token>,
    peeked: Option<&'a Token>,
    col: Column,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            token_stream: tokens.iter(),
            peeked: None,
            col: 0..0,
            depth: 0,
        }
    }

    fn column(&self) -> Column {
        self.col.clone()
    }

    fn next(&mut self) -> Option<&'a Token> {
        if self.peeked.is_some() {
            return self.peeked.take();
        }
        loop {
            self.col.start = self.col.end;
            let t = self.token_stream.next()?;
            self.col.end += t.to_string().chars().count();
            match t {
                Token::Whitespace(_) => continue,
                _ => return Some(t),
            }
        }
    }

    fn peek(&mut self) -> Option<&&'a Token> {
        if self.peeked.is_none() {
            self.peeked = self.next();
        }
        self.peeked.as_ref()
    }

    fn list(&mut self) -> Result<Vec<Item>> {
        let mut v: Vec<Item> = vec![];
        loop {
            match self.peek() {
                None => return Ok(v),
                Some(Token::Semicolon) => {
                    self.next();
                    v.push(Item::Semicolon(self.column()));
                }
                Some(Token::Comma) | Some(Token::Tab) => {
                    self.next();
                    v.push(Item::Comma(self.column()));
                }
                _ => v.push(Item::Expression(self.expression()?)),
            }
        }
    }

    fn expression(&mut self) -> Result<Expression> {
        self.nested(0).map(|(expr, _)| expr)
    }

    /// Precedence climbing. Returns the expression with its height; both
    /// the recursion and the height are bounded by `MAX_NESTING`.
    fn nested(&mut self, precedence: usize) -> Result<(Expression, usize)> {
        self.depth += 1;
        let result = if self.depth > MAX_NESTING {
            Err(error!(FormulaTooComplex))
        } else {
            self.climb(precedence)
        };
        self.depth -= 1;
        result
    }

    fn climb(&mut self, precedence: usize) -> Result<(Expression, usize)> {
        let (mut lhs, mut height) = match self.next() {
            Some(Token::LParen) => {
                let (expr, height) = self.nested(0)?;
                self.expect(Token::RParen)?;
                (expr, height + 1)
            }
            Some(Token::Ident(name)) => {
                let column = self.column();
                match self.peek() {
                    Some(&&Token::LParen) => {
                        let (args, height) = self.expression_list()?;
                        (Expression::Call(column, name.clone(), args), height + 1)
                    }
                    _ => (Expression::Var(column, name.clone()), 1),
                }
            }
            Some(Token::Literal(l)) => (Expression::for_literal(self.column(), l)?, 1),
            Some(Token::Operator(Operator::Minus)) => {
                let column = self.column();
                let (expr, height) = self.nested(UNARY)?;
                (Expression::Negation(column, Box::new(expr)), height + 1)
            }
            Some(Token::Operator(Operator::Plus)) => self.nested(UNARY)?,
            Some(Token::Operator(Operator::Not)) => {
                let column = self.column();
                let (expr, height) = self.nested(NOT_OPERAND)?;
                (Expression::Not(column, Box::new(expr)), height + 1)
            }
            Some(Token::Unknown(_)) => {
                return Err(error!(SyntaxError; "UNEXPECTED CHARACTER"));
            }
            _ => return Err(error!(SyntaxError; "EXPECTED EXPRESSION")),
        };
        loop {
            match self.peek() {
                Some(Token::Operator(op)) => {
                    let op_precedence = match Expression::op_precedence(op) {
                        Some(p) => p,
                        None => break,
                    };
                    if op_precedence < precedence {
                        break;
                    }
                    self.next();
                    let column = self.column();
                    let (rhs, rhs_height) = self.nested(op_precedence + 1)?;
                    height = height.max(rhs_height) + 1;
                    if height > MAX_NESTING {
                        return Err(error!(FormulaTooComplex));
                    }
                    lhs = Expression::for_binary_op(column, op, lhs, rhs);
                }
                _ => break,
            }
        }
        Ok((lhs, height))
    }

    fn expression_list(&mut self) -> Result<(Vec<Expression>, usize)> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        let mut height = 0;
        if let Some(Token::RParen) = self.peek() {
            self.next();
            return Ok((v, height));
        }
        loop {
            let (expr, expr_height) = self.nested(0)?;
            height = height.max(expr_height);
            v.push(expr);
            match self.next() {
                Some(Token::RParen) => return Ok((v, height)),
                Some(Token::Comma) | Some(Token::Tab) => continue,
                _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
            }
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if let Some(t) = self.next() {
            if *t == token {
                return Ok(());
            }
        }
        use Token::*;
        Err(error!(SyntaxError;
            match token {
                Unknown(_) | Whitespace(_) => {"UNEXPECTED TOKEN"}
                Literal(_) => {"EXPECTED LITERAL"}
                Operator(_) => {"EXPECTED OPERATOR"}
                Ident(_) => {"EXPECTED IDENTIFIER"}
                LParen => {"EXPECTED LEFT PARENTHESIS"}
                RParen => {"EXPECTED RIGHT PARENTHESIS"}
                Comma | Tab => {"EXPECTED COMMA"}
                Semicolon => {"EXPECTED SEMICOLON"}
            }
        ))
    }
}

impl Expression {
    fn for_binary_op(col: Column, op: &Operator, lhs: Expression, rhs: Expression) -> Expression {
        use Operator::*;
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match op {
            Plus => Expression::Add(col, lhs, rhs),
            Minus => Expression::Subtract(col, lhs, rhs),
            Multiply => Expression::Multiply(col, lhs, rhs),
            Divide => Expression::Divide(col, lhs, rhs),
            Modulus => Expression::Modulus(col, lhs, rhs),
            Equal => Expression::Equal(col, lhs, rhs),
            NotEqual => Expression::NotEqual(col, lhs, rhs),
            Less => Expression::Less(col, lhs, rhs),
            LessEqual => Expression::LessEqual(col, lhs, rhs),
            Greater => Expression::Greater(col, lhs, rhs),
            GreaterEqual => Expression::GreaterEqual(col, lhs, rhs),
            And => Expression::And(col, lhs, rhs),
            Or | Not => Expression::Or(col, lhs, rhs),
        }
    }

    fn op_precedence(op: &Operator) -> Option<usize> {
        use Operator::*;
        match op {
            Or => Some(1),
            And => Some(2),
            Not => None,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => Some(4),
            Plus | Minus => Some(5),
            Multiply | Divide | Modulus => Some(6),
        }
    }

    fn for_literal(col: Column, lit: &Literal) -> Result<Expression> {
        match lit {
            Literal::Number(s) => match s.parse::<f64>() {
                Ok(n) => Ok(Expression::Number(col, n)),
                Err(_) => Err(error!(SyntaxError; "INVALID NUMBER")),
            },
            Literal::String(s) => Ok(Expression::String(col, s.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_precedence() {
        let answer = Expression::Add(
            1..2,
            Box::new(Expression::Number(0..1, 2.0)),
            Box::new(Expression::Multiply(
                3..4,
                Box::new(Expression::Number(2..3, 3.0)),
                Box::new(Expression::Number(4..5, 4.0)),
            )),
        );
        assert_eq!(parse("2+3*4").unwrap(), answer);
    }

    #[test]
    fn test_left_associative() {
        let answer = Expression::Subtract(
            3..4,
            Box::new(Expression::Subtract(
                1..2,
                Box::new(Expression::Number(0..1, 9.0)),
                Box::new(Expression::Number(2..3, 3.0)),
            )),
            Box::new(Expression::Number(4..5, 1.0)),
        );
        assert_eq!(parse("9-3-1").unwrap(), answer);
    }

    #[test]
    fn test_reversed_relational() {
        let answer = Expression::LessEqual(
            1..3,
            Box::new(Expression::Var(0..1, "A".to_string())),
            Box::new(Expression::Number(3..4, 1.0)),
        );
        assert_eq!(parse("A=<1").unwrap(), answer);
    }

    #[test]
    fn test_call() {
        let answer = Expression::Call(
            0..5,
            "LEFT$".to_string(),
            vec![
                Expression::String(6..13, "HELLO".to_string()),
                Expression::Number(14..15, 3.0),
            ],
        );
        assert_eq!(parse(r#"LEFT$("HELLO",3)"#).unwrap(), answer);
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        match parse("not a=b").unwrap() {
            Expression::Not(_, inner) => match *inner {
                Expression::Equal(..) => {}
                other => panic!("{:?}", other),
            },
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn test_list() {
        let list = parse_list(r#""A";1,2"#).unwrap();
        assert_eq!(list.len(), 5);
        assert!(matches!(list[1], Item::Semicolon(_)));
        assert!(matches!(list[3], Item::Comma(_)));
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(parse("1 2").is_err());
        assert!(parse("(1").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let e = parse(&deep).unwrap_err();
        assert!(e.is(ErrorCode::FormulaTooComplex));
        let long = vec!["1"; 500].join("+");
        assert!(parse(&long).unwrap_err().is(ErrorCode::FormulaTooComplex));
        let fine = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert!(parse(&fine).is_ok());
    }
}
