use super::{Column, LineNumber, Pointer};

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    pointer: Option<Pointer>,
    column: Column,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            pointer: None,
            column: 0..0,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn is_direct(&self) -> bool {
        self.line_number().is_none()
    }

    pub fn pointer(&self) -> Option<Pointer> {
        self.pointer
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.pointer.and_then(|p| p.line)
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn detail(&self) -> &str {
        &self.message
    }

    /// Attach the statement being executed. The innermost pointer wins
    /// so nested dispatch (IF ... THEN) does not overwrite it.
    pub fn in_pointer(mut self, pointer: Option<Pointer>) -> Error {
        if self.pointer.is_none() {
            self.pointer = pointer;
        }
        self
    }

    pub fn in_column(mut self, column: &Column) -> Error {
        if self.column == (0..0) {
            self.column = column.clone();
        }
        self
    }

    pub fn message<S: Into<String>>(mut self, message: S) -> Error {
        if self.message.is_empty() {
            self.message = message.into();
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    OutOfData = 4,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    UndefinedLine = 8,
    SubscriptOutOfRange = 9,
    DivisionByZero = 11,
    TypeMismatch = 13,
    StringTooLong = 15,
    FormulaTooComplex = 16,
    UndefinedUserFunction = 18,
    InternalError = 51,
    BadFileNumber = 52,
    FileNotFound = 53,
    BadFileMode = 54,
    FileAlreadyOpen = 55,
    DiskIoError = 57,
    InputPastEnd = 62,
    BadFileName = 64,
    UnknownStatement = 70,
    IllegalVariableName = 71,
    ExpressionTimeout = 72,
    TimeLimitExceeded = 73,
    Break = 74,
    DatabaseError = 75,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "NEXT WITHOUT FOR",
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            4 => "OUT OF DATA",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            8 => "UNDEFINED LINE",
            9 => "SUBSCRIPT OUT OF RANGE",
            11 => "DIVISION BY ZERO",
            13 => "TYPE MISMATCH",
            15 => "STRING TOO LONG",
            16 => "FORMULA TOO COMPLEX",
            18 => "UNDEFINED USER FUNCTION",
            51 => "INTERNAL ERROR",
            52 => "BAD FILE NUMBER",
            53 => "FILE NOT FOUND",
            54 => "BAD FILE MODE",
            55 => "FILE ALREADY OPEN",
            57 => "DISK I/O ERROR",
            62 => "INPUT PAST END",
            64 => "BAD FILE NAME",
            70 => "UNKNOWN STATEMENT",
            71 => "ILLEGAL VARIABLE NAME",
            72 => "EXPRESSION TIMEOUT",
            73 => "TIME LIMIT EXCEEDED",
            74 => "BREAK",
            75 => "DATABASE ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number() {
            suffix.push_str(&format!(" {}", line_number));
        }
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        let message = if self.message.is_empty() {
            String::new()
        } else {
            format!("; {}", self.message)
        };
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "PROGRAM ERROR {}{}", self.code, message)
            } else {
                write!(f, "PROGRAM ERROR {} IN{}{}", self.code, suffix, message)
            }
        } else if suffix.is_empty() {
            write!(f, "{}{}", code_str, message)
        } else {
            write!(f, "{} IN{}{}", code_str, suffix, message)
        }
    }
}
