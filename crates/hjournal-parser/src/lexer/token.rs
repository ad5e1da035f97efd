//! Token kinds and token values produced by the lexer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Span;

/// Every kind of token the lexer can produce.
///
/// Separators that only switch lexer modes (such as the two-space gap
/// between a posting account and its amount) are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    // ===== Structural =====
    /// Line terminator (`\n`, `\r\n` or `\r`).
    Newline,
    /// Leading indentation of a content line (two or more blanks, or tabs).
    Indent,

    // ===== Full-line comments =====
    /// `;` at the start of a line.
    SemicolonAtStart,
    /// `#` at the start of a line.
    HashAtStart,
    /// `*` at the start of a line.
    AsteriskAtStart,
    /// Text of a full-line comment.
    CommentText,

    // ===== Transaction init line =====
    /// A date at the start of a line, opening a transaction.
    DateAtStart,
    /// A date anywhere else (posting date, price date).
    SimpleDate,
    /// `=`
    Equals,
    /// `*` or `!` right after the transaction date.
    TxnStatus,
    /// Parenthesized transaction code, e.g. `(#443)`.
    ParenValue,
    /// Transaction description text.
    Text,
    /// `|` between payee and memo.
    Pipe,
    /// Memo text after the pipe.
    Memo,

    // ===== Inline comments and tags =====
    /// `;` opening an inline comment.
    SemicolonComment,
    /// Free text inside an inline comment.
    InlineCommentText,
    /// Tag name (without its colon).
    TagName,
    /// The colon ending a tag name.
    TagColon,
    /// Tag value.
    TagValue,
    /// `,` ending a tag value.
    TagComma,

    // ===== Account directive =====
    /// `account` at the start of a line.
    AccountKeyword,
    /// Account name inside an `account` directive.
    AccountName,
    /// Two or more blanks (or a tab) inside an `account` directive.
    DoubleWs,

    // ===== Postings =====
    /// `*` or `!` before a posting account.
    PostingStatus,
    /// `Assets:Chequing`
    RealAccountName,
    /// `(Assets:Chequing)`
    VirtualAccountName,
    /// `[Assets:Chequing]`
    VirtualBalancedAccountName,

    // ===== Amounts =====
    /// Whitespace between amount components.
    AmountWs,
    /// A number literal.
    Number,
    /// A commodity symbol, word or quoted string.
    CommodityText,
    /// `-`
    Dash,
    /// `+`
    Plus,
    /// `@`
    At,
    /// `*` inside an amount (inclusive balance assertion).
    Asterisk,
    /// `(`
    LParen,
    /// `)`
    RParen,

    // ===== Other directives =====
    /// `P` at the start of a line.
    PriceKeyword,
    /// The commodity being priced, trailing blanks included.
    PriceCommodity,
    /// `commodity ` at the start of a line.
    CommodityKeyword,
    /// `D ` at the start of a line.
    DefaultCommodityKeyword,
    /// `format ` inside a commodity directive.
    FormatKeyword,
    /// `Y`, `year` or `apply year` at the start of a line.
    YearKeyword,
    /// Four or five digit year value.
    YearValue,

    // ===== Multiline comments =====
    /// `comment` at the start of a line.
    MultilineCommentStart,
    /// Line terminator inside a multiline comment body.
    MultilineCommentNewline,
    /// One line of multiline comment text.
    MultilineCommentText,
    /// `end comment` at the start of a line.
    MultilineCommentEnd,
}

impl TokenKind {
    /// Check whether this kind is one of the three posting account shapes.
    #[must_use]
    pub const fn is_posting_account(self) -> bool {
        matches!(
            self,
            Self::RealAccountName | Self::VirtualAccountName | Self::VirtualBalancedAccountName
        )
    }

    /// Human readable name used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Newline => "end of line",
            Self::Indent => "indentation",
            Self::SemicolonAtStart | Self::HashAtStart | Self::AsteriskAtStart => {
                "comment marker"
            }
            Self::CommentText => "comment text",
            Self::DateAtStart | Self::SimpleDate => "date",
            Self::Equals => "'='",
            Self::TxnStatus | Self::PostingStatus => "status marker",
            Self::ParenValue => "transaction code",
            Self::Text => "description",
            Self::Pipe => "'|'",
            Self::Memo => "memo",
            Self::SemicolonComment => "';'",
            Self::InlineCommentText => "comment text",
            Self::TagName => "tag name",
            Self::TagColon => "':'",
            Self::TagValue => "tag value",
            Self::TagComma => "','",
            Self::AccountKeyword => "'account'",
            Self::AccountName
            | Self::RealAccountName
            | Self::VirtualAccountName
            | Self::VirtualBalancedAccountName => "account name",
            Self::DoubleWs | Self::AmountWs => "whitespace",
            Self::Number => "number",
            Self::CommodityText | Self::PriceCommodity => "commodity",
            Self::Dash => "'-'",
            Self::Plus => "'+'",
            Self::At => "'@'",
            Self::Asterisk => "'*'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::PriceKeyword => "'P'",
            Self::CommodityKeyword => "'commodity'",
            Self::DefaultCommodityKeyword => "'D'",
            Self::FormatKeyword => "'format'",
            Self::YearKeyword => "year directive",
            Self::YearValue => "year",
            Self::MultilineCommentStart => "'comment'",
            Self::MultilineCommentNewline => "end of line",
            Self::MultilineCommentText => "comment text",
            Self::MultilineCommentEnd => "'end comment'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A token: its kind, the exact source slice it covers and its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token<'src> {
    /// The token kind.
    pub kind: TokenKind,
    /// The exact source text.
    pub text: &'src str,
    /// Byte offset span in the source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Account name segments for account-name tokens.
    ///
    /// Virtual and virtual-balanced names have their brackets removed.
    /// Inside an `account` directive brackets are ordinary name characters,
    /// so `account (Assets:Chequing)` yields `["(Assets", "Chequing)"]`.
    #[must_use]
    pub fn account_segments(&self) -> Vec<&'src str> {
        let name = match self.kind {
            TokenKind::VirtualAccountName | TokenKind::VirtualBalancedAccountName => {
                strip_wrapper(self.text)
            }
            _ => self.text,
        };
        name.split(':').collect()
    }

    /// Text with its delimiters removed.
    ///
    /// Strips the parentheses of a [`TokenKind::ParenValue`], the quotes of a
    /// quoted commodity and the trailing blanks of a price commodity. Other
    /// kinds are returned unchanged.
    #[must_use]
    pub fn inner_text(&self) -> &'src str {
        match self.kind {
            TokenKind::ParenValue => strip_wrapper(self.text),
            TokenKind::CommodityText => unquote(self.text),
            TokenKind::PriceCommodity => unquote(self.text.trim_end()),
            _ => self.text,
        }
    }

    /// Decompose a [`TokenKind::Number`] token.
    #[must_use]
    pub fn number_literal(&self) -> Option<NumberLiteral> {
        (self.kind == TokenKind::Number).then(|| NumberLiteral::parse(self.text))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline | TokenKind::MultilineCommentNewline => write!(f, "end of line"),
            _ => write!(f, "{} '{}'", self.kind.describe(), self.text),
        }
    }
}

/// Remove the first and last character, e.g. brackets or quotes.
fn strip_wrapper(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn unquote(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        strip_wrapper(text)
    } else {
        text
    }
}

/// A number literal split into its parts.
///
/// Journal numbers group digits with `,`, `.` or a single space and use
/// either `.` or `,` as the decimal mark. The last separator that is followed
/// by one to three digits and then the end of the literal is the decimal mark;
/// every other separator is a digit group mark and is dropped. A space is
/// only ever a digit group mark.
///
/// # Examples
///
/// ```
/// use hjournal_parser::NumberLiteral;
///
/// let n = NumberLiteral::parse("1.000,00");
/// assert_eq!(n.decimal_mark, Some(','));
/// assert_eq!(n.normalized(), "1000.00");
///
/// let n = NumberLiteral::parse("1,00,00,000.00");
/// assert_eq!(n.decimal_mark, Some('.'));
/// assert_eq!(n.normalized(), "10000000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberLiteral {
    /// Integer digits with group marks removed.
    pub integer: String,
    /// Fraction digits, when a decimal mark was found.
    pub fraction: Option<String>,
    /// The decimal mark character.
    pub decimal_mark: Option<char>,
    /// Exponent digits (with sign), e.g. `4` for `1.3e4`.
    pub exponent: Option<String>,
}

impl NumberLiteral {
    /// Split a number literal.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(i) => (&text[..i], Some(text[i + 1..].to_string())),
            None => (text, None),
        };

        let decimal_at = mantissa
            .char_indices()
            .filter(|(_, c)| matches!(c, ',' | '.' | ' '))
            .last()
            .filter(|&(i, c)| {
                let rest = &mantissa[i + c.len_utf8()..];
                c != ' '
                    && (1..=3).contains(&rest.len())
                    && rest.chars().all(|d| d.is_ascii_digit())
            });

        let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
        match decimal_at {
            Some((i, mark)) => Self {
                integer: digits(&mantissa[..i]),
                fraction: Some(mantissa[i + 1..].to_string()),
                decimal_mark: Some(mark),
                exponent,
            },
            None => Self {
                integer: digits(mantissa),
                fraction: None,
                decimal_mark: None,
                exponent,
            },
        }
    }

    /// Canonical form: group marks removed, `.` as decimal mark.
    #[must_use]
    pub fn normalized(&self) -> String {
        let mut out = self.integer.clone();
        if let Some(fraction) = &self.fraction {
            out.push('.');
            out.push_str(fraction);
        }
        if let Some(exponent) = &self.exponent {
            out.push('e');
            out.push_str(exponent);
        }
        out
    }

    /// Convert to a decimal, honouring the exponent.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        parse_decimal(&self.normalized())
    }
}

/// Parse a normalized number string (optionally with an exponent).
pub(crate) fn parse_decimal(normalized: &str) -> Option<Decimal> {
    if normalized.contains(['e', 'E']) {
        Decimal::from_scientific(normalized).ok()
    } else {
        normalized.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_number_plain_integer() {
        let n = NumberLiteral::parse("1000");
        assert_eq!(n.integer, "1000");
        assert_eq!(n.fraction, None);
        assert_eq!(n.to_decimal(), Some(dec!(1000)));
    }

    #[test]
    fn test_number_period_decimal() {
        let n = NumberLiteral::parse("1,000.00");
        assert_eq!(n.decimal_mark, Some('.'));
        assert_eq!(n.normalized(), "1000.00");
    }

    #[test]
    fn test_number_comma_decimal() {
        let n = NumberLiteral::parse("1.000,00");
        assert_eq!(n.decimal_mark, Some(','));
        assert_eq!(n.to_decimal(), Some(dec!(1000.00)));
    }

    #[test]
    fn test_number_indian_grouping() {
        let n = NumberLiteral::parse("1,00,00,000.00");
        assert_eq!(n.integer, "10000000");
        assert_eq!(n.fraction.as_deref(), Some("00"));
    }

    #[test]
    fn test_number_space_grouping() {
        let n = NumberLiteral::parse("1 000.00");
        assert_eq!(n.normalized(), "1000.00");
        // A space never acts as the decimal mark
        assert_eq!(NumberLiteral::parse("1 000").normalized(), "1000");
    }

    #[test]
    fn test_number_long_trailing_group_is_integer() {
        let n = NumberLiteral::parse("1,0000");
        assert_eq!(n.decimal_mark, None);
        assert_eq!(n.normalized(), "10000");
    }

    #[test]
    fn test_number_exponent() {
        let n = NumberLiteral::parse("1.3e4");
        assert_eq!(n.exponent.as_deref(), Some("4"));
        assert_eq!(n.to_decimal(), Some(dec!(13000)));
        assert_eq!(NumberLiteral::parse("25E-1").to_decimal(), Some(dec!(2.5)));
    }

    #[test]
    fn test_account_segments() {
        let tok = Token::new(
            TokenKind::VirtualAccountName,
            "(Assets:Virtual)",
            Span::new(0, 16),
        );
        assert_eq!(tok.account_segments(), vec!["Assets", "Virtual"]);

        let tok = Token::new(TokenKind::AccountName, "(Assets:Chequing)", Span::new(0, 17));
        assert_eq!(tok.account_segments(), vec!["(Assets", "Chequing)"]);
    }

    #[test]
    fn test_inner_text() {
        let code = Token::new(TokenKind::ParenValue, "(#443)", Span::new(0, 6));
        assert_eq!(code.inner_text(), "#443");

        let quoted = Token::new(TokenKind::CommodityText, "\"green apples\"", Span::new(0, 14));
        assert_eq!(quoted.inner_text(), "green apples");

        let price = Token::new(TokenKind::PriceCommodity, "$US ", Span::new(0, 4));
        assert_eq!(price.inner_text(), "$US");
    }
}
