//! Error types for expression parsing and evaluation.
//!
//! Every failure aborts the current parse or evaluate call immediately;
//! there is no error recovery or partial result. After a failed parse the
//! cursor is in an undefined state and is reset by the next `parse` call.

use alloc::string::String;
use core::fmt;
use core::num::ParseFloatError;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, ExprError>;

/// Error type for expression parsing and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// A scanned numeric literal did not parse as a floating point number,
    /// e.g. `1..2`.
    Parse(ParseFloatError),

    /// The current lookahead character matches no grammar production.
    /// `found` is `None` when the input ended where a token was required.
    UnexpectedCharacter {
        position: usize,
        found: Option<char>,
    },

    /// An opened group never found its matching `)`.
    UnbalancedParenthesis { position: usize },

    /// A scanned name matches no variable, unary function, or binary
    /// function at parse time.
    UnknownIdentifier { name: String },

    /// A trailing operator-character run matches no registered binary
    /// operator.
    UnknownOperator { symbol: String },

    /// Characters remain after a complete top-level expression.
    TrailingInput { position: usize, found: char },

    /// An expression references a variable that is no longer in the table
    /// at evaluation time.
    ///
    /// Variables are bound by name and resolved on every evaluation, so
    /// removing one between parse and evaluate surfaces here, not at parse.
    UnknownVariable { name: String },

    /// The parser's nesting depth guard tripped.
    RecursionLimit(String),

    /// A bounded symbol table is full. The string names the table.
    CapacityExceeded(&'static str),

    /// A name is too long for the fixed-size key buffer.
    StringTooLong,
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Parse(err) => write!(f, "Invalid numeric literal: {}", err),
            ExprError::UnexpectedCharacter { position, found } => match found {
                Some(ch) => write!(f, "Unexpected character '{}' at position {}", ch, position),
                None => write!(f, "Unexpected end of input at position {}", position),
            },
            ExprError::UnbalancedParenthesis { position } => {
                write!(f, "Unbalanced parentheses at position {}", position)
            }
            ExprError::UnknownIdentifier { name } => {
                write!(f, "Unknown function or variable: '{}'", name)
            }
            ExprError::UnknownOperator { symbol } => {
                write!(f, "Unknown operator: '{}'", symbol)
            }
            ExprError::TrailingInput { position, found } => {
                write!(
                    f,
                    "Unexpected trailing input at position {}: '{}'",
                    position, found
                )
            }
            ExprError::UnknownVariable { name } => {
                write!(f, "Unknown variable: '{}'", name)
            }
            ExprError::RecursionLimit(err) => {
                write!(f, "Recursion limit exceeded: {}", err)
            }
            ExprError::CapacityExceeded(table) => {
                write!(f, "Capacity exceeded for {}", table)
            }
            ExprError::StringTooLong => write!(f, "Name too long for key buffer"),
        }
    }
}

impl From<ParseFloatError> for ExprError {
    fn from(err: ParseFloatError) -> ExprError {
        ExprError::Parse(err)
    }
}
