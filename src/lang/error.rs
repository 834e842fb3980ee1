use super::Number;

#[derive(Debug, PartialEq, Clone)]
pub struct Error {
    code: u16,
    line: Option<Number>,
    message: Option<String>,
}

/// Build an `Error` from an `ErrorCode`, with an optional detail message.
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::from_code($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::from_code($crate::lang::ErrorCode::$err).message($msg)
    };
}

impl Error {
    pub fn from_code(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line: None,
            message: None,
        }
    }

    pub fn message(mut self, message: &str) -> Error {
        self.message = Some(message.to_string());
        self
    }

    pub fn in_line_number(mut self, line: Option<Number>) -> Error {
        self.line = line;
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> Option<Number> {
        self.line
    }
}

#[repr(u16)]
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ErrorCode {
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    UndefinedLine = 8,
    SubscriptOutOfRange = 9,
    DivisionByZero = 11,
    InputPastEnd = 62,
    Break = 70,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self.code {
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            8 => "UNDEFINED LINE",
            9 => "SUBSCRIPT OUT OF RANGE",
            11 => "DIVISION BY ZERO",
            62 => "INPUT PAST END",
            70 => "BREAK",
            _ => "",
        };
        if s.is_empty() {
            write!(f, "PROGRAM ERROR {}", self.code)?;
        } else {
            write!(f, "{}", s)?;
        }
        if let Some(message) = &self.message {
            write!(f, "; {}", message)?;
        }
        if let Some(line) = self.line {
            write!(f, " IN {}", line)?;
        }
        Ok(())
    }
}
