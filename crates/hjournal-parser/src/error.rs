//! Error types for every pipeline stage.

use crate::cst::Rule;
use crate::lexer::Mode;
use crate::span::Location;
use crate::Span;
use std::fmt;

/// No pattern of the active lexer mode matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte offset of the first unmatched input.
    pub offset: usize,
    /// One-based line of `offset`.
    pub line: usize,
    /// One-based column of `offset`, in characters.
    pub column: usize,
    /// The mode that was active.
    pub mode: Mode,
    /// The character at `offset`, if any.
    pub found: Option<char>,
}

impl LexError {
    /// Create a lexical error at `offset` in `source`.
    #[must_use]
    pub fn new(source: &str, offset: usize, mode: Mode) -> Self {
        let Location { line, column } = Location::of_offset(source, offset);
        Self {
            offset,
            line,
            column,
            mode,
            found: source.get(offset..).and_then(|rest| rest.chars().next()),
        }
    }

    /// Span of the offending character.
    #[must_use]
    pub fn span(&self) -> Span {
        let len = self.found.map_or(0, char::len_utf8);
        Span::new(self.offset, self.offset + len)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(c) => write!(f, "unexpected {c:?}")?,
            None => write!(f, "unexpected end of input")?,
        }
        write!(f, " in {} at {}:{}", self.mode, self.line, self.column)
    }
}

impl std::error::Error for LexError {}

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The span where the error occurred.
    pub span: Span,
    /// Journal item rules that were being attempted.
    pub attempted: Vec<Rule>,
    /// Line and column of the span start, when the source is known.
    pub location: Option<Location>,
    /// Optional context message.
    pub context: Option<String>,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            attempted: Vec::new(),
            location: None,
            context: None,
            hint: None,
        }
    }

    /// Record the rules that were being attempted.
    #[must_use]
    pub fn with_attempted(mut self, attempted: Vec<Rule>) -> Self {
        self.attempted = attempted;
        self
    }

    /// Resolve the line and column against the source text.
    #[must_use]
    pub fn with_location(mut self, source: &str) -> Self {
        self.location = Some(self.span.location(source));
        self
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a hint for fixing this error.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the span of this error.
    #[must_use]
    pub const fn span(&self) -> (usize, usize) {
        (self.span.start, self.span.end)
    }

    /// Get a numeric code for the error kind.
    #[must_use]
    pub const fn kind_code(&self) -> u32 {
        match &self.kind {
            ParseErrorKind::UnexpectedToken(_) => 1,
            ParseErrorKind::UnexpectedEof => 2,
            ParseErrorKind::InvalidLineStart(_) => 3,
        }
    }

    /// Get a short label for the error.
    #[must_use]
    pub const fn label(&self) -> &str {
        match &self.kind {
            ParseErrorKind::UnexpectedToken(_) => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::InvalidLineStart(_) => "not a journal item",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        if !self.attempted.is_empty() {
            let rules: Vec<String> = self.attempted.iter().map(ToString::to_string).collect();
            write!(f, " while parsing {}", rules.join(" or "))?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " ({ctx})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that no alternative accepts at this point.
    UnexpectedToken(String),
    /// Input ended inside an item.
    UnexpectedEof,
    /// A line starting with a token that cannot begin a journal item.
    InvalidLineStart(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken(found) => write!(f, "syntax error: unexpected {found}"),
            Self::UnexpectedEof => write!(f, "unexpected end of file"),
            Self::InvalidLineStart(found) => {
                write!(f, "syntax error: a line cannot start with {found}")
            }
        }
    }
}

/// A raw value that cannot be converted to its cooked form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookError {
    /// Year directive value is not a usable year.
    #[error("invalid year '{text}'")]
    InvalidYear {
        /// The raw year text.
        text: String,
        /// Where it appeared.
        span: Span,
    },
    /// Date components do not form a calendar date once the year is known.
    #[error("invalid date '{text}'")]
    InvalidDate {
        /// The resolved date, as `year-month-day`.
        text: String,
        /// Where it appeared.
        span: Span,
    },
    /// Number literal cannot be represented as a decimal.
    #[error("invalid number '{text}'")]
    InvalidNumber {
        /// The normalized number text.
        text: String,
        /// Where it appeared.
        span: Span,
    },
}

impl CookError {
    /// Source span of the offending value.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::InvalidYear { span, .. }
            | Self::InvalidDate { span, .. }
            | Self::InvalidNumber { span, .. } => *span,
        }
    }

    /// Numeric code for the error kind.
    #[must_use]
    pub const fn kind_code(&self) -> u32 {
        match self {
            Self::InvalidYear { .. } => 1,
            Self::InvalidDate { .. } => 2,
            Self::InvalidNumber { .. } => 3,
        }
    }

    /// Short label for the error.
    #[must_use]
    pub const fn label(&self) -> &str {
        match self {
            Self::InvalidYear { .. } => "invalid year",
            Self::InvalidDate { .. } => "invalid date",
            Self::InvalidNumber { .. } => "invalid number",
        }
    }
}

/// Any error produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The lexer found input no pattern of the active mode accepts.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),
    /// The parser could not recognize a journal item.
    #[error("{0}")]
    Syntactic(#[from] ParseError),
    /// A value could not be converted during cooking.
    #[error("semantic error: {0}")]
    Semantic(#[from] CookError),
}

impl Error {
    /// Source span of the error.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Lexical(e) => e.span(),
            Self::Syntactic(e) => e.span,
            Self::Semantic(e) => e.span(),
        }
    }

    /// Numeric code: `1` for lexical errors, `1xx` for parse errors and
    /// `2xx` for cooking errors.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Lexical(_) => 1,
            Self::Syntactic(e) => 100 + e.kind_code(),
            Self::Semantic(e) => 200 + e.kind_code(),
        }
    }

    /// Short label for the error.
    #[must_use]
    pub const fn label(&self) -> &str {
        match self {
            Self::Lexical(_) => "unrecognized input",
            Self::Syntactic(e) => e.label(),
            Self::Semantic(e) => e.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_location() {
        let source = "2024-01-01 x\n  ?";
        let err = LexError::new(source, 15, Mode::PostingLine);
        assert_eq!((err.line, err.column), (2, 3));
        assert_eq!(err.found, Some('?'));
        assert_eq!(err.span(), Span::new(15, 16));
        assert_eq!(err.to_string(), "unexpected '?' in posting at 2:3");
    }

    #[test]
    fn test_lex_error_at_end() {
        let err = LexError::new("abc", 3, Mode::Default);
        assert_eq!(err.found, None);
        assert!(err.span().is_empty());
    }

    #[test]
    fn test_parse_error_new() {
        let err = ParseError::new(ParseErrorKind::UnexpectedEof, Span::new(0, 5));
        assert_eq!(err.span(), (0, 5));
        assert!(err.attempted.is_empty());
        assert!(err.context.is_none());
        assert!(err.hint.is_none());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedToken("'@'".to_string()),
            Span::new(6, 7),
        )
        .with_attempted(vec![Rule::PriceDirective])
        .with_location("line\nP 2024");
        assert_eq!(
            err.to_string(),
            "syntax error: unexpected '@' at 2:2 while parsing PriceDirective"
        );
    }

    #[test]
    fn test_parse_error_with_context_and_hint() {
        let err = ParseError::new(ParseErrorKind::UnexpectedEof, Span::new(0, 5))
            .with_context("in transaction")
            .with_hint("add more input");
        assert_eq!(err.context.as_deref(), Some("in transaction"));
        assert_eq!(err.hint.as_deref(), Some("add more input"));
        assert!(err.to_string().ends_with("(in transaction)"));
    }

    #[test]
    fn test_kind_codes_and_labels() {
        let kinds = [
            (ParseErrorKind::UnexpectedToken("x".to_string()), 1),
            (ParseErrorKind::UnexpectedEof, 2),
            (ParseErrorKind::InvalidLineStart("x".to_string()), 3),
        ];
        for (kind, expected_code) in kinds {
            let err = ParseError::new(kind, Span::new(0, 1));
            assert_eq!(err.kind_code(), expected_code);
            assert!(!err.label().is_empty());
        }
    }

    #[test]
    fn test_error_codes() {
        let lexical = Error::from(LexError::new("?", 0, Mode::Default));
        assert_eq!(lexical.code(), 1);
        assert_eq!(lexical.span(), Span::new(0, 1));

        let semantic = Error::from(CookError::InvalidDate {
            text: "2023-2-29".to_string(),
            span: Span::new(3, 8),
        });
        assert_eq!(semantic.code(), 202);
        assert_eq!(semantic.label(), "invalid date");
        assert_eq!(semantic.span(), Span::new(3, 8));
        assert_eq!(
            semantic.to_string(),
            "semantic error: invalid date '2023-2-29'"
        );
    }

    #[test]
    fn test_error_is_error_trait() {
        let err = Error::from(ParseError::new(ParseErrorKind::UnexpectedEof, Span::new(0, 1)));
        let _: &dyn std::error::Error = &err;
    }
}
