#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Whitespace(usize),
    Literal(Literal),
    Operator(Operator),
    Ident(String),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Tab,
}

impl Token {
    pub fn from_string(s: &str) -> Option<Token> {
        use Operator::*;
        let token = match s.to_ascii_uppercase().as_str() {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "," => Token::Comma,
            ";" => Token::Semicolon,
            "\t" => Token::Tab,
            "*" => Token::Operator(Multiply),
            "/" => Token::Operator(Divide),
            "%" => Token::Operator(Modulus),
            "+" => Token::Operator(Plus),
            "-" => Token::Operator(Minus),
            "=" => Token::Operator(Equal),
            "<>" | "><" => Token::Operator(NotEqual),
            "<" => Token::Operator(Less),
            "<=" | "=<" => Token::Operator(LessEqual),
            ">" => Token::Operator(Greater),
            ">=" | "=>" => Token::Operator(GreaterEqual),
            "NOT" => Token::Operator(Not),
            "AND" => Token::Operator(And),
            "OR" => Token::Operator(Or),
            _ => return None,
        };
        Some(token)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Comma | Token::Semicolon | Token::Tab)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Whitespace(u) => write!(f, "{s:>w$}", s = "", w = u),
            Literal(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
            Semicolon => write!(f, ";"),
            Tab => write!(f, "\t"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(String),
    String(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Number(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Multiply,
    Divide,
    Modulus,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
}

impl Operator {
    pub fn is_relational(self) -> bool {
        use Operator::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulus => write!(f, "%"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let t = Token::from_string("and");
        assert_eq!(t, Some(Token::Operator(Operator::And)));
        let t = Token::from_string("=>");
        assert_eq!(t, Some(Token::Operator(Operator::GreaterEqual)));
        let t = Token::from_string("PICKLES");
        assert_eq!(t, None);
    }
}
