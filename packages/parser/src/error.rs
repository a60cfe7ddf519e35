use std::ops::Range;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Range<usize>,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Invalid syntax at {span:?}: {message}")]
    InvalidSyntax { span: Range<usize>, message: String },

    #[error("Lexer error at {span:?}: unrecognized input '{found}'")]
    LexerError { span: Range<usize>, found: String },
}

impl ParseError {
    pub fn unexpected_token(
        span: Range<usize>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn lexer_error(span: Range<usize>, found: impl Into<String>) -> Self {
        Self::LexerError {
            span,
            found: found.into(),
        }
    }

    /// Byte range the error points at
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexerError { span, .. } => span.clone(),
            ParseError::UnexpectedEof { pos, .. } => *pos..*pos,
        }
    }

    /// Shift every position by `offset` (used for sub-parsers over template
    /// interpolations).
    pub(crate) fn offset_by(self, offset: usize) -> Self {
        let shift = |span: Range<usize>| span.start + offset..span.end + offset;
        match self {
            ParseError::UnexpectedToken {
                span,
                expected,
                found,
            } => ParseError::UnexpectedToken {
                span: shift(span),
                expected,
                found,
            },
            ParseError::UnexpectedEof { pos, expected } => ParseError::UnexpectedEof {
                pos: pos + offset,
                expected,
            },
            ParseError::InvalidSyntax { span, message } => ParseError::InvalidSyntax {
                span: shift(span),
                message,
            },
            ParseError::LexerError { span, found } => ParseError::LexerError {
                span: shift(span),
                found,
            },
        }
    }

    /// Short label used next to the highlighted source range
    pub fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. }
            | ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::InvalidSyntax { message, .. } => message.clone(),
            ParseError::LexerError { .. } => "unrecognized input".to_string(),
        }
    }
}

/// Pretty-print errors with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub mod pretty {
    use super::ParseError;
    use ariadne::{Color, Label, Report, ReportKind, Source};

    pub fn format_error(error: &ParseError, filename: &str, source: &str) -> String {
        let mut span = error.span();
        if span.start >= source.len() && !source.is_empty() {
            span = source.len() - 1..source.len();
        }

        let mut output = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_color(Color::Red)
                    .with_message(error.label()),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output);

        match written {
            Ok(()) => String::from_utf8(output)
                .unwrap_or_else(|_| format!("{}: {}", filename, error)),
            Err(_) => format!("{}: {}", filename, error),
        }
    }
}
