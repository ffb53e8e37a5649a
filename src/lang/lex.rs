use super::token::*;

pub fn lex(s: &str) -> Vec<Token> {
    BasicLexer::lex(s)
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\r' || c == '\n'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;

    fn whitespace(&mut self) -> Option<Token> {
        let mut len = 0;
        loop {
            self.chars().next();
            len += 1;
            if let Some(pk) = self.chars().peek() {
                if is_basic_whitespace(*pk) {
                    continue;
                }
            }
            return Some(Token::Whitespace(len));
        }
    }

    fn number(&mut self) -> Option<Token> {
        let mut s = String::new();
        let mut decimal = false;
        let mut exp = false;
        loop {
            let ch = self.chars().next()?;
            s.push(ch);
            if ch == '.' {
                decimal = true;
            }
            if let Some(pk) = self.chars().peek() {
                if is_basic_digit(*pk) {
                    continue;
                }
                if !decimal && !exp && *pk == '.' {
                    continue;
                }
                if !exp && (*pk == 'e' || *pk == 'E') {
                    let mut ahead = self.chars().clone();
                    ahead.next();
                    let signed = match ahead.peek() {
                        Some('+') | Some('-') => {
                            ahead.next();
                            true
                        }
                        _ => false,
                    };
                    if let Some(d) = ahead.peek() {
                        if is_basic_digit(*d) {
                            exp = true;
                            s.push('E');
                            self.chars().next();
                            if signed {
                                s.push(self.chars().next()?);
                            }
                            continue;
                        }
                    }
                }
            }
            break;
        }
        Some(Token::Literal(Literal::Number(s)))
    }

    fn string(&mut self) -> Option<Token> {
        let mut s = String::new();
        self.chars().next();
        loop {
            if let Some(ch) = self.chars().next() {
                if ch != '"' {
                    s.push(ch);
                    continue;
                }
            }
            return Some(Token::Literal(Literal::String(s)));
        }
    }

    fn alphabetic(&mut self) -> Option<Token> {
        let mut s = String::new();
        loop {
            let ch = self.chars().next()?;
            s.push(ch);
            if ch == '$' {
                break;
            }
            if let Some(pk) = self.chars().peek() {
                if is_basic_alphabetic(*pk) || is_basic_digit(*pk) || *pk == '$' {
                    continue;
                }
            }
            break;
        }
        if let Some(token @ Token::Operator(_)) = Token::from_string(&s) {
            return Some(token);
        }
        Some(Token::Ident(s))
    }

    fn minutia(&mut self) -> Option<Token> {
        let ch = self.chars().next()?;
        let s = ch.to_string();
        match Token::from_string(&s) {
            Some(t) => Some(t),
            None => Some(Token::Unknown(s)),
        }
    }
}

struct BasicLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Tokenizers<'a> for BasicLexer<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }
}

impl<'a> Iterator for BasicLexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let pk = self.chars.peek()?;
        if is_basic_whitespace(*pk) {
            return self.whitespace();
        }
        if is_basic_digit(*pk) || *pk == '.' {
            return self.number();
        }
        if is_basic_alphabetic(*pk) {
            return self.alphabetic();
        }
        if *pk == '"' {
            return self.string();
        }
        self.minutia()
    }
}

impl<'a> BasicLexer<'a> {
    fn lex(s: &str) -> Vec<Token> {
        let mut tokens = BasicLexer {
            chars: s.chars().peekable(),
        }
        .collect();
        BasicLexer::collapse_lt_gt_equal(&mut tokens);
        tokens
    }

    /// Every two character relational spelling collapses into one token,
    /// including the reversed forms `=<`, `=>` and `><`.
    fn collapse_lt_gt_equal(tokens: &mut Vec<Token>) {
        use Operator::*;
        let mut index = 0;
        while index + 1 < tokens.len() {
            let pair = match (&tokens[index], &tokens[index + 1]) {
                (Token::Operator(l), Token::Operator(r)) => Some((*l, *r)),
                _ => None,
            };
            let collapsed = match pair {
                Some((Less, Equal)) | Some((Equal, Less)) => Some(LessEqual),
                Some((Greater, Equal)) | Some((Equal, Greater)) => Some(GreaterEqual),
                Some((Less, Greater)) | Some((Greater, Less)) => Some(NotEqual),
                _ => None,
            };
            if let Some(op) = collapsed {
                tokens.splice(index..index + 2, Some(Token::Operator(op)));
            }
            index += 1;
        }
    }
}
