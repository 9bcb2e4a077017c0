//! Formula error types

use std::fmt;

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// None of these escape a cell read: [`evaluate_raw`](crate::evaluate_raw) turns each
/// into the [`ErrorToken`] shown in the cell.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    /// Formula text is not a function call or a valid arithmetic expression
    #[error("Parse error: {0}")]
    Parse(String),

    /// A cell address that does not name a grid position
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A range argument that is not `A1` or `A1:B2` form
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Arithmetic or substitution failure
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// AVERAGE over a range with no numeric cells
    #[error("Division by zero")]
    DivisionByZero,
}

impl FormulaError {
    /// The display token this error is shown as
    pub fn token(&self) -> ErrorToken {
        match self {
            FormulaError::DivisionByZero => ErrorToken::Div0,
            FormulaError::InvalidAddress(_) => ErrorToken::Invalid,
            _ => ErrorToken::Error,
        }
    }
}

impl From<gridbook_core::Error> for FormulaError {
    fn from(err: gridbook_core::Error) -> Self {
        match err {
            gridbook_core::Error::InvalidAddress(s) => FormulaError::InvalidAddress(s),
            gridbook_core::Error::InvalidRange(s) => FormulaError::InvalidRange(s),
            other => FormulaError::Evaluation(other.to_string()),
        }
    }
}

/// Error values a cell can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorToken {
    /// `#ERROR!` - any parse or evaluation failure
    Error,
    /// `#DIV/0!` - AVERAGE with nothing to average
    Div0,
    /// `#INVALID!` - the address being read is itself invalid
    Invalid,
}

impl ErrorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorToken::Error => "#ERROR!",
            ErrorToken::Div0 => "#DIV/0!",
            ErrorToken::Invalid => "#INVALID!",
        }
    }
}

impl fmt::Display for ErrorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
