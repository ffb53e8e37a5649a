use super::LineNumber;

/// ## A line of BASIC as entered
///
/// An optional line number followed by one or more statements separated
/// by `:` outside of quotes.

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: Option<LineNumber>,
    text: String,
    statements: Vec<String>,
}

impl Line {
    pub fn new(s: &str) -> Line {
        let s = s.trim_end_matches(|c| c == '\r' || c == '\n');
        let trimmed = s.trim_start();
        let digits = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or_else(|| trimmed.len());
        if digits > 0 {
            if let Ok(number) = trimmed[..digits].parse::<LineNumber>() {
                let rest = &trimmed[digits..];
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                return Line::with_number(Some(number), rest);
            }
        }
        Line::with_number(None, s)
    }

    pub fn with_number(number: Option<LineNumber>, text: &str) -> Line {
        let text = text.trim_end().to_string();
        let statements = split_unquoted(&text, ':')
            .into_iter()
            .map(|s| expand_print(s.trim()))
            .collect();
        Line {
            number,
            text,
            statements,
        }
    }

    pub fn number(&self) -> Option<LineNumber> {
        self.number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_direct(&self) -> bool {
        self.number.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// `!name` declares a label for GOTO, GOSUB and ON.
    pub fn label(&self) -> Option<&str> {
        let first = self.statements.first()?;
        let name = first.strip_prefix('!')?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    pub fn renumbered(&self, number: LineNumber, text: String) -> Line {
        Line::with_number(Some(number), &text)
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.number {
            Some(number) => write!(f, "{} {}", number, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

fn expand_print(s: &str) -> String {
    match s.strip_prefix('?') {
        Some(rest) if !rest.starts_with(' ') => format!("? {}", rest),
        _ => s.to_string(),
    }
}

/// Split on `sep` wherever it appears outside of a quoted string.
pub fn split_unquoted(s: &str, sep: char) -> Vec<String> {
    let mut v: Vec<String> = vec![];
    let mut current = String::new();
    let mut quoted = false;
    for ch in s.chars() {
        if ch == '"' {
            quoted = !quoted;
        }
        if ch == sep && !quoted {
            v.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    v.push(current);
    v
}

/// Split on `sep` outside of quotes and parentheses.
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut v: Vec<String> = vec![];
    let mut current = String::new();
    let mut quoted = false;
    let mut depth = 0usize;
    for ch in s.chars() {
        match ch {
            '"' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == sep && !quoted && depth == 0 {
            v.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    v.push(current);
    v
}

/// Byte offset of `keyword` as a word outside of quotes. Case is
/// ignored. A number may follow directly, as in `THEN100`.
pub fn find_keyword(s: &str, keyword: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let kw = keyword.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphabetic() || b == b'_';
    let mut quoted = false;
    for i in 0..bytes.len() {
        if bytes[i] == b'"' {
            quoted = !quoted;
            continue;
        }
        if quoted || i + kw.len() > bytes.len() {
            continue;
        }
        if !bytes[i..i + kw.len()].eq_ignore_ascii_case(kw) {
            continue;
        }
        if i > 0 && is_word(bytes[i - 1]) {
            continue;
        }
        match bytes.get(i + kw.len()) {
            Some(&b) if is_word(b) || b == b'$' => continue,
            _ => return Some(i),
        }
    }
    None
}

/// Byte offset of the first `=` outside of quotes and parentheses.
pub fn find_assignment(s: &str) -> Option<usize> {
    let mut quoted = false;
    let mut depth = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            '=' if !quoted && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
