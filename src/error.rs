use std::fmt;

use thiserror::Error;

/// Every way a cmdscript run can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Declaration error: {0}")]
    Declaration(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Undefined reference: {0}")]
    UndefinedReference(String),
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
    #[error("Iteration limit exceeded: while loop ran {limit} times")]
    IterationLimitExceeded { limit: usize },
    #[error("Call depth exceeded: more than {limit} nested function calls")]
    CallDepthExceeded { limit: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    pub(crate) fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub(crate) fn undefined(msg: impl Into<String>) -> Self {
        Self::UndefinedReference(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// An [`Error`] tied to the statement that raised it.
#[derive(Debug, Error)]
pub struct ScriptError {
    /// 1-based source line; `0` when the error is not tied to a line.
    pub line: usize,
    /// Source text of the offending statement (trimmed).
    pub text: String,
    /// Printed as part of the message.
    pub error: Error,
}

impl ScriptError {
    pub fn new(line: usize, text: impl Into<String>, error: Error) -> Self {
        Self {
            line,
            text: text.into(),
            error,
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.error)
        } else if self.text.is_empty() {
            write!(f, "{} (Ln {})", self.error, self.line)
        } else {
            write!(f, "{} (Ln {}: `{}`)", self.error, self.line, self.text)
        }
    }
}

impl From<Error> for ScriptError {
    fn from(error: Error) -> Self {
        Self::new(0, String::new(), error)
    }
}
