//! hledger journal front end.
//!
//! This crate turns journal source text into a typed [`Journal`] in four
//! stages, each usable on its own:
//!
//! ```text
//! &str ─tokenize→ Vec<Token> ─parse_tokens→ CstNode ─cst_to_raw→ RawJournal ─raw_to_cooked→ Journal
//! ```
//!
//! - The lexer keeps an explicit stack of modes, so the same character can
//!   mean different things at the start of a line, inside a posting or in a
//!   comment.
//! - The parser builds a lossless concrete syntax tree.
//! - Raw lowering drops punctuation and whitespace but keeps every value as
//!   text.
//! - Cooking resolves year-less dates, converts numbers to decimals and
//!   attaches comment tags to the entity that owns them.
//!
//! # Example
//!
//! ```
//! use hjournal_parser::{parse_to_cooked_with, Options};
//!
//! let source = "\
//! Y 2024
//! 01/15 * Coffee Shop | morning ; kind: treat
//!     Expenses:Food:Coffee  $5.00
//!     Assets:Cash
//! ";
//!
//! let journal = parse_to_cooked_with(source, &Options::default()).unwrap();
//! let txn = &journal.transactions[0];
//! assert_eq!(txn.date.to_string(), "2024-01-15");
//! assert_eq!(txn.postings.len(), 2);
//! assert_eq!(txn.tags[0].name, "kind");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cook;
pub mod cst;
mod cst_to_raw;
mod error;
pub mod lexer;
mod options;
mod parser;
pub mod raw;
mod report;
mod span;

pub use cook::{raw_to_cooked, CookState};
pub use cst::{CstElement, CstNode, Rule};
pub use cst_to_raw::cst_to_raw;
pub use error::{CookError, Error, LexError, ParseError, ParseErrorKind};
pub use lexer::{tokenize, Mode, NumberLiteral, Token, TokenKind};
pub use options::{ErrorPolicy, Options};
pub use parser::{parse_tokens, parse_tokens_recovering};
pub use raw::{RawItem, RawJournal};
pub use span::{Location, Span};

pub use hjournal_core::Journal;

/// Parse source into a concrete syntax tree.
///
/// # Errors
///
/// Returns the lexical error or the first parse error. Parse errors carry
/// their line and column.
pub fn parse_to_cst(source: &str) -> Result<CstNode<'_>, Error> {
    let tokens = tokenize(source)?;
    tracing::debug!(tokens = tokens.len(), "tokenized source");
    let cst = parse_tokens(&tokens).map_err(|e| e.with_location(source))?;
    tracing::debug!(items = cst.child_nodes().count(), "parsed CST");
    Ok(cst)
}

/// Parse source into a concrete syntax tree, skipping items that fail to
/// parse.
///
/// Each skipped item (its line and the indented lines after it) yields one
/// [`ParseError`] and is left out of the tree; parsing resumes at the next
/// line.
///
/// # Errors
///
/// Lexical errors are still fatal.
pub fn parse_to_cst_recovering(
    source: &str,
) -> Result<(Option<CstNode<'_>>, Vec<ParseError>), Error> {
    let tokens = tokenize(source)?;
    tracing::debug!(tokens = tokens.len(), "tokenized source");
    let (cst, errors) = parse_tokens_recovering(&tokens);
    let errors: Vec<ParseError> = errors
        .into_iter()
        .map(|e| e.with_location(source))
        .collect();
    for error in &errors {
        tracing::warn!(%error, "skipped journal item");
    }
    Ok((cst, errors))
}

/// Parse source into a raw journal.
///
/// # Errors
///
/// Returns the lexical error or the first parse error.
pub fn parse_to_raw(source: &str) -> Result<RawJournal, Error> {
    Ok(cst_to_raw(&parse_to_cst(source)?))
}

/// Parse and cook source, resolving year-less dates against the current
/// local calendar year.
///
/// # Errors
///
/// Returns the first lexical, parse or cooking error.
pub fn parse_to_cooked(source: &str) -> Result<Journal, Error> {
    parse_to_cooked_with(source, &Options::default())
}

/// Parse and cook source with explicit options.
///
/// With [`ErrorPolicy::SkipItem`] items that fail to parse are logged and
/// dropped instead of failing the run. Lexical and cooking errors are always
/// fatal.
///
/// # Errors
///
/// Returns the first lexical, parse or cooking error.
pub fn parse_to_cooked_with(source: &str, options: &Options) -> Result<Journal, Error> {
    let cst = match options.error_policy {
        ErrorPolicy::Abort => parse_to_cst(source)?,
        ErrorPolicy::SkipItem => match parse_to_cst_recovering(source)? {
            (Some(cst), _) => cst,
            (None, errors) => {
                return Err(errors
                    .into_iter()
                    .next()
                    .map_or_else(|| Error::from(empty_parse_error(source)), Error::from));
            }
        },
    };
    let raw = cst_to_raw(&cst);
    Ok(raw_to_cooked(&raw, CookState::new(options.default_year))?)
}

fn empty_parse_error(source: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedEof,
        Span::new(source.len(), source.len()),
    )
    .with_location(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hjournal_core::Date;

    #[test]
    fn test_parse_error_has_location() {
        let err = parse_to_cst("; ok\nP 2024-01-01 USD\n").unwrap_err();
        let Error::Syntactic(err) = err else {
            panic!("expected a parse error");
        };
        assert_eq!(err.location.map(|l| l.line), Some(2));
    }

    #[test]
    fn test_skip_item_policy() {
        let source = "2024-01-01 bad\n  a  $\n2024-01-02 good\n";
        assert!(parse_to_cooked_with(source, &Options::default()).is_err());

        let options = Options::new()
            .with_default_year(2000)
            .with_error_policy(ErrorPolicy::SkipItem);
        let journal = parse_to_cooked_with(source, &options).unwrap();
        assert_eq!(journal.transactions.len(), 1);
        assert_eq!(journal.transactions[0].date, Date::new(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_lex_errors_are_fatal_when_recovering() {
        let options = Options::new().with_error_policy(ErrorPolicy::SkipItem);
        let err = parse_to_cooked_with("01/01 x\n a\n", &options).unwrap_err();
        assert!(matches!(err, Error::Lexical(_)));
    }

    #[test]
    fn test_parse_to_cooked_uses_current_year() {
        let journal = parse_to_cooked("01/02 x\n").unwrap();
        assert_eq!(journal.transactions[0].date.year, options::current_year());
    }
}
