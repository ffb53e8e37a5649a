use super::LineNumber;

/// ## Statement pointer
///
/// Addresses one statement of a multi-statement line. Ordering is
/// lexicographic on `(line, statement)`. Statements typed without a line
/// number live on the direct line, `line: None`. A halted program has no
/// pointer at all, so the halt state is `Option::<Pointer>::None`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pointer {
    pub line: Option<LineNumber>,
    pub statement: usize,
}

impl Pointer {
    pub fn new(line: Option<LineNumber>, statement: usize) -> Pointer {
        Pointer { line, statement }
    }

    pub fn line(line: LineNumber) -> Pointer {
        Pointer::new(Some(line), 0)
    }

    pub fn direct(statement: usize) -> Pointer {
        Pointer::new(None, statement)
    }

    pub fn is_direct(&self) -> bool {
        self.line.is_none()
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", line, self.statement),
            None => write!(f, "direct:{}", self.statement),
        }
    }
}
