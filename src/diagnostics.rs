//! Error types for the preprocessor
//!
//! Only the parser raises errors about the input itself; lexing degrades
//! malformed directives to text, and interpreting a parsed tree cannot fail.
//! [`ParseError`] pins a failure to one input line (or to end of input) and
//! keeps the literal text of that line for display. [`PreprocessError`] adds
//! the file identifier once the failure leaves the single-file pipeline.

use crate::parser::ast::SourceLocation;
use std::fmt;
use std::io;
use thiserror::Error;

/// Where a parse error was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLocation {
    /// 1-based input line
    Line(usize),
    /// The token stream ran out
    Eof,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLocation::Line(line) => write!(f, "{}", line),
            ErrorLocation::Eof => write!(f, "<eof>"),
        }
    }
}

/// Syntax error in the directive structure of a file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub location: ErrorLocation,
    /// Literal text of the offending line; `None` at end of input
    pub text: Option<String>,
    pub message: String,
}

impl ParseError {
    pub fn at_line(
        location: SourceLocation,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ParseError {
            location: ErrorLocation::Line(location.line),
            text: Some(text.into()),
            message: message.into(),
        }
    }

    pub fn at_eof(message: impl Into<String>) -> Self {
        ParseError {
            location: ErrorLocation::Eof,
            text: None,
            message: message.into(),
        }
    }

    /// The line number, if the error is not at end of input
    pub fn line(&self) -> Option<usize> {
        match self.location {
            ErrorLocation::Line(line) => Some(line),
            ErrorLocation::Eof => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.location == ErrorLocation::Eof
    }

    /// The quoted source line, or `<eof>`
    pub fn excerpt(&self) -> &str {
        self.text.as_deref().unwrap_or("<eof>")
    }
}

/// Failure of a whole-file preprocessing run
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("{file_id}:{source}")]
    Syntax {
        file_id: String,
        #[source]
        source: ParseError,
    },

    #[error("{file_id}: {source}")]
    Io {
        file_id: String,
        #[source]
        source: io::Error,
    },
}

impl PreprocessError {
    pub fn file_id(&self) -> &str {
        match self {
            PreprocessError::Syntax { file_id, .. } | PreprocessError::Io { file_id, .. } => {
                file_id
            }
        }
    }

    /// The underlying syntax error, if this is one
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            PreprocessError::Syntax { source, .. } => Some(source),
            PreprocessError::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_error_display() {
        let err = ParseError::at_line(SourceLocation::new(7), "@else", "else without matching if");
        assert_eq!(err.to_string(), "7: else without matching if");
        assert_eq!(err.line(), Some(7));
        assert_eq!(err.excerpt(), "@else");
    }

    #[test]
    fn eof_error_display() {
        let err = ParseError::at_eof("expected @end");
        assert_eq!(err.to_string(), "<eof>: expected @end");
        assert!(err.is_eof());
        assert_eq!(err.excerpt(), "<eof>");
    }

    #[test]
    fn file_error_is_prefixed_with_file_id() {
        let err = PreprocessError::Syntax {
            file_id: "vimrc".to_string(),
            source: ParseError::at_line(SourceLocation::new(3), "@end", "end without matching if"),
        };
        assert_eq!(err.to_string(), "vimrc:3: end without matching if");
        assert_eq!(err.file_id(), "vimrc");
        assert!(err.parse_error().is_some());
    }
}
