//! Per-mode token tables.
//!
//! Each lexer mode is a separate Logos enum so that only the patterns of the
//! active mode are eligible at any offset. The driver in the parent module
//! runs one enum at a time and applies the [`Transition`] each token asks for.

use std::fmt;
use std::ops::Range;

use hjournal_core::Date;
use logos::{FilterResult, Logos};

use super::TokenKind;

/// A named lexer state selecting which token patterns are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Start of a line.
    Default,
    /// Body of a full-line comment.
    LineComment,
    /// Transaction line right after the date.
    TxnLine,
    /// Transaction line right after the status marker.
    TxnCode,
    /// Transaction line right after the code.
    TxnDescription,
    /// Secondary date after `=`.
    PostingDate,
    /// Text after the payee/memo pipe.
    Memo,
    /// Inside an inline comment.
    InlineComment,
    /// Inside a tag value.
    TagValue,
    /// After the `account` keyword.
    Account,
    /// Indented line of a transaction, before the account.
    PostingLine,
    /// After a posting account name.
    Posting,
    /// Amount expression.
    Amount,
    /// After the `P` keyword.
    Price,
    /// After the year directive keyword.
    Year,
    /// Body of a multiline comment.
    MultilineComment,
    /// Indented line of an account, price or year directive.
    DirectiveContent,
    /// Indented line of a commodity directive.
    CommodityContent,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "line start",
            Self::LineComment => "comment",
            Self::TxnLine | Self::TxnCode | Self::TxnDescription => "transaction line",
            Self::PostingDate => "posting date",
            Self::Memo => "memo",
            Self::InlineComment => "inline comment",
            Self::TagValue => "tag value",
            Self::Account => "account directive",
            Self::PostingLine | Self::Posting => "posting",
            Self::Amount => "amount",
            Self::Price => "price directive",
            Self::Year => "year directive",
            Self::MultilineComment => "multiline comment",
            Self::DirectiveContent => "directive content line",
            Self::CommodityContent => "commodity content line",
        };
        f.write_str(name)
    }
}

/// What the mode stack does after a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Transition {
    Stay,
    Push(Mode),
    Pop,
    Replace(Mode),
    /// Push the content mode of the enclosing block.
    PushContent,
}

/// One match of the active mode, relative to the remaining input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Lexeme {
    /// `None` for separators that only switch modes.
    pub kind: Option<TokenKind>,
    pub transition: Transition,
    pub span: Range<usize>,
}

trait ModeToken {
    fn kind(&self) -> Option<TokenKind>;
    fn transition(&self) -> Transition;
}

impl Mode {
    /// Match one token of this mode at the start of `rest`.
    ///
    /// Returns `None` at end of input and the offending range when no
    /// pattern matches.
    pub(super) fn next_lexeme(self, rest: &str) -> Option<Result<Lexeme, Range<usize>>> {
        match self {
            Self::Default => lex_one::<DefaultToken>(rest),
            Self::LineComment => lex_one::<LineCommentToken>(rest),
            Self::TxnLine => lex_one::<TxnLineToken>(rest),
            Self::TxnCode => lex_one::<TxnCodeToken>(rest),
            Self::TxnDescription => lex_one::<TxnDescriptionToken>(rest),
            Self::PostingDate => lex_one::<PostingDateToken>(rest),
            Self::Memo => lex_one::<MemoToken>(rest),
            Self::InlineComment => lex_one::<InlineCommentToken>(rest),
            Self::TagValue => lex_one::<TagValueToken>(rest),
            Self::Account => lex_one::<AccountToken>(rest),
            Self::PostingLine => lex_one::<PostingLineToken>(rest),
            Self::Posting => lex_one::<PostingToken>(rest),
            Self::Amount => lex_one::<AmountToken>(rest),
            Self::Price => lex_one::<PriceToken>(rest),
            Self::Year => lex_one::<YearToken>(rest),
            Self::MultilineComment => lex_one::<MultilineCommentToken>(rest),
            Self::DirectiveContent => lex_one::<DirectiveContentToken>(rest),
            Self::CommodityContent => lex_one::<CommodityContentToken>(rest),
        }
    }
}

fn lex_one<'s, T>(rest: &'s str) -> Option<Result<Lexeme, Range<usize>>>
where
    T: Logos<'s, Source = str, Error = (), Extras = ()> + ModeToken,
{
    let mut lexer = T::lexer(rest);
    let result = lexer.next()?;
    let span = lexer.span();
    Some(match result {
        Ok(token) => Ok(Lexeme {
            kind: token.kind(),
            transition: token.transition(),
            span,
        }),
        Err(()) => Err(span),
    })
}

// ============================================================================
// Callbacks
// ============================================================================

/// Indentation must be two or more blanks or contain a tab. Blank lines are
/// skipped entirely.
fn indent(lex: &mut logos::Lexer<'_, DefaultToken>) -> FilterResult<(), ()> {
    let rest = lex.remainder();
    if rest.is_empty() || rest.starts_with(['\r', '\n']) {
        FilterResult::Skip
    } else if lex.slice() == " " {
        FilterResult::Error(())
    } else {
        FilterResult::Emit(())
    }
}

/// Calendar check for `[Y-]M-D` dates. Year-less dates are checked against a
/// leap year.
fn is_valid_date(text: &str) -> bool {
    let parts: Vec<&str> = text.split(['-', '/', '.']).collect();
    let parsed: Option<Vec<u32>> = parts.iter().map(|p| p.parse().ok()).collect();
    match parsed.as_deref() {
        Some(&[year, month, day]) => i32::try_from(year)
            .ok()
            .and_then(|year| Date::new(year, month, day))
            .is_some(),
        Some(&[month, day]) => Date::is_valid_month_day(month, day),
        _ => false,
    }
}

fn date_at_start(lex: &mut logos::Lexer<'_, DefaultToken>) -> bool {
    is_valid_date(lex.slice())
}

fn posting_date(lex: &mut logos::Lexer<'_, PostingDateToken>) -> bool {
    is_valid_date(lex.slice())
}

fn price_date(lex: &mut logos::Lexer<'_, PriceToken>) -> bool {
    is_valid_date(lex.slice())
}

/// A year value must be followed by a blank or the end of the line.
fn year_value(lex: &mut logos::Lexer<'_, YearToken>) -> bool {
    lex.remainder().chars().next().map_or(true, char::is_whitespace)
}

/// Check whether `s` starts with a tag name (`word:`).
fn starts_tag(s: &str) -> bool {
    let word: usize = s
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .map(char::len_utf8)
        .sum();
    word > 0 && s[word..].starts_with(':')
}

/// Byte length of the tag name at the start of a comment word: any run of
/// non-blank, non-colon characters directly followed by a colon.
fn leading_tag_name_len(s: &str) -> Option<usize> {
    let word = s
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(s.len());
    (word > 0 && s[word..].starts_with(':')).then_some(word)
}

/// A word of an inline comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentWord {
    /// A tag name with its colon.
    Tag,
    /// Text up to the end of the line or the next tag.
    Text,
}

/// Classify the comment word starting at the matched character and extend
/// the token over it.
fn comment_word(lex: &mut logos::Lexer<'_, InlineCommentToken>) -> CommentWord {
    let matched = lex.slice().len();
    if let Some(name) = leading_tag_name_len(&lex.source()[lex.span().start..]) {
        lex.bump(name + 1 - matched);
        return CommentWord::Tag;
    }
    let rest = lex.remainder();
    let end = rest
        .char_indices()
        .find(|&(i, c)| matches!(c, '\r' | '\n') || starts_tag(&rest[i..]))
        .map_or(rest.len(), |(i, _)| i);
    lex.bump(end);
    CommentWord::Text
}

/// What an opening parenthesis on a transaction line starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParenKind {
    /// A closed `(code)`.
    Code,
    /// No closing parenthesis on the line: description text.
    Text,
}

/// Length after the `(` and the kind of the parenthesized run.
fn paren_extent(rest: &str) -> (usize, ParenKind) {
    let line = &rest[..rest.find(['\r', '\n']).unwrap_or(rest.len())];
    match line.find(')') {
        Some(close) => (close + 1, ParenKind::Code),
        None => (line.find(['|', ';']).unwrap_or(line.len()), ParenKind::Text),
    }
}

fn txn_line_paren(lex: &mut logos::Lexer<'_, TxnLineToken>) -> ParenKind {
    let (len, paren) = paren_extent(lex.remainder());
    lex.bump(len);
    paren
}

fn txn_code_paren(lex: &mut logos::Lexer<'_, TxnCodeToken>) -> ParenKind {
    let (len, paren) = paren_extent(lex.remainder());
    lex.bump(len);
    paren
}

// ============================================================================
// Mode tables
// ============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[ \t]+", indent)]
    Indent,
    #[regex(r"([0-9]{4,5}[-/.])?[0-9]{1,2}[-/.][0-9]{1,2}", date_at_start)]
    Date,
    #[token(";")]
    Semicolon,
    #[token("#")]
    Hash,
    #[token("*")]
    Asterisk,
    #[token("account")]
    Account,
    #[token("commodity ")]
    Commodity,
    #[token("D ")]
    DefaultCommodity,
    #[token("P")]
    Price,
    #[token("Y")]
    #[token("year")]
    #[token("apply year")]
    Year,
    #[regex(r"comment[ \t]*")]
    MultilineComment,
}

impl ModeToken for DefaultToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Indent => TokenKind::Indent,
            Self::Date => TokenKind::DateAtStart,
            Self::Semicolon => TokenKind::SemicolonAtStart,
            Self::Hash => TokenKind::HashAtStart,
            Self::Asterisk => TokenKind::AsteriskAtStart,
            Self::Account => TokenKind::AccountKeyword,
            Self::Commodity => TokenKind::CommodityKeyword,
            Self::DefaultCommodity => TokenKind::DefaultCommodityKeyword,
            Self::Price => TokenKind::PriceKeyword,
            Self::Year => TokenKind::YearKeyword,
            Self::MultilineComment => TokenKind::MultilineCommentStart,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline => Transition::Stay,
            Self::Indent => Transition::PushContent,
            Self::Date => Transition::Push(Mode::TxnLine),
            Self::Semicolon | Self::Hash | Self::Asterisk => Transition::Push(Mode::LineComment),
            Self::Account => Transition::Push(Mode::Account),
            Self::Commodity | Self::DefaultCommodity => Transition::Push(Mode::Amount),
            Self::Price => Transition::Push(Mode::Price),
            Self::Year => Transition::Push(Mode::Year),
            Self::MultilineComment => Transition::Push(Mode::MultilineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum LineCommentToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[^\r\n]+")]
    Text,
}

impl ModeToken for LineCommentToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Text => TokenKind::CommentText,
        })
    }

    fn transition(&self) -> Transition {
        Transition::Stay
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum TxnLineToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[token("=")]
    Equals,
    #[regex(r"[*!]")]
    Status,
    #[token("(", txn_line_paren)]
    Paren(ParenKind),
    #[regex(r"[^ \t|;\r\n=*!(][^|;\r\n]*")]
    Text,
    #[token("|")]
    Pipe,
    #[token(";")]
    Semicolon,
}

impl ModeToken for TxnLineToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Equals => TokenKind::Equals,
            Self::Status => TokenKind::TxnStatus,
            Self::Paren(ParenKind::Code) => TokenKind::ParenValue,
            Self::Paren(ParenKind::Text) | Self::Text => TokenKind::Text,
            Self::Pipe => TokenKind::Pipe,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline | Self::Text | Self::Paren(ParenKind::Text) => Transition::Stay,
            Self::Equals => Transition::Push(Mode::PostingDate),
            Self::Status => Transition::Replace(Mode::TxnCode),
            Self::Paren(ParenKind::Code) => Transition::Replace(Mode::TxnDescription),
            Self::Pipe => Transition::Replace(Mode::Memo),
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum TxnCodeToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[token("(", txn_code_paren)]
    Paren(ParenKind),
    #[regex(r"[^ \t|;\r\n(][^|;\r\n]*")]
    Text,
    #[token("|")]
    Pipe,
    #[token(";")]
    Semicolon,
}

impl ModeToken for TxnCodeToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Paren(ParenKind::Code) => TokenKind::ParenValue,
            Self::Paren(ParenKind::Text) | Self::Text => TokenKind::Text,
            Self::Pipe => TokenKind::Pipe,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline => Transition::Stay,
            Self::Paren(_) | Self::Text => Transition::Replace(Mode::TxnDescription),
            Self::Pipe => Transition::Replace(Mode::Memo),
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum TxnDescriptionToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[^ \t|;\r\n][^|;\r\n]*")]
    Text,
    #[token("|")]
    Pipe,
    #[token(";")]
    Semicolon,
}

impl ModeToken for TxnDescriptionToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Text => TokenKind::Text,
            Self::Pipe => TokenKind::Pipe,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline | Self::Text => Transition::Stay,
            Self::Pipe => Transition::Replace(Mode::Memo),
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PostingDateToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"([0-9]{4,5}[-/.])?[0-9]{1,2}[-/.][0-9]{1,2}", posting_date)]
    Date,
}

impl ModeToken for PostingDateToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Date => TokenKind::SimpleDate,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline => Transition::Stay,
            Self::Date => Transition::Pop,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum MemoToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[^ \t;\r\n][^;\r\n]*")]
    Memo,
    #[token(";")]
    Semicolon,
}

impl ModeToken for MemoToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Memo => TokenKind::Memo,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline | Self::Memo => Transition::Stay,
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum InlineCommentToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    /// A tag's name and colon, which the driver splits, or comment text.
    #[regex(r"[^ \t\r\n]", comment_word)]
    Word(CommentWord),
}

impl ModeToken for InlineCommentToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Word(CommentWord::Tag) => TokenKind::TagName,
            Self::Word(CommentWord::Text) => TokenKind::InlineCommentText,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline | Self::Word(CommentWord::Text) => Transition::Stay,
            Self::Word(CommentWord::Tag) => Transition::Push(Mode::TagValue),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum TagValueToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[^\r\n,]+")]
    Value,
    #[token(",")]
    Comma,
}

impl ModeToken for TagValueToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Value => TokenKind::TagValue,
            Self::Comma => TokenKind::TagComma,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline | Self::Value => Transition::Stay,
            Self::Comma => Transition::Pop,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip " ")]
enum AccountToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[^ \t\r\n:;]+( [^ \t\r\n:;]+)*(:[^ \t\r\n:;]+( [^ \t\r\n:;]+)*)*")]
    Name,
    #[regex(r"[ \t][ \t]+|\t")]
    DoubleWs,
    #[token(";")]
    Semicolon,
}

impl ModeToken for AccountToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Name => TokenKind::AccountName,
            Self::DoubleWs => TokenKind::DoubleWs,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Semicolon => Transition::Push(Mode::InlineComment),
            _ => Transition::Stay,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum PostingLineToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[*!]")]
    Status,
    #[regex(r"[^ \t\r\n:;(\[*!][^ \t\r\n:;]*( [^ \t\r\n:;]+)*(:[^ \t\r\n:;]+( [^ \t\r\n:;]+)*)*")]
    Real,
    #[regex(r"\([^ \t\r\n:;()]+( [^ \t\r\n:;()]+)*(:[^ \t\r\n:;()]+( [^ \t\r\n:;()]+)*)*\)")]
    Virtual,
    #[regex(r"\[[^ \t\r\n:;\[\]]+( [^ \t\r\n:;\[\]]+)*(:[^ \t\r\n:;\[\]]+( [^ \t\r\n:;\[\]]+)*)*\]")]
    VirtualBalanced,
    #[token(";")]
    Semicolon,
}

impl ModeToken for PostingLineToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Status => TokenKind::PostingStatus,
            Self::Real => TokenKind::RealAccountName,
            Self::Virtual => TokenKind::VirtualAccountName,
            Self::VirtualBalanced => TokenKind::VirtualBalancedAccountName,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline | Self::Status => Transition::Stay,
            Self::Real | Self::Virtual | Self::VirtualBalanced => {
                Transition::Replace(Mode::Posting)
            }
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip " ")]
enum PostingToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[ \t][ \t]+|\t")]
    Separator,
    #[token(";")]
    Semicolon,
}

impl ModeToken for PostingToken {
    fn kind(&self) -> Option<TokenKind> {
        match self {
            Self::Newline => Some(TokenKind::Newline),
            Self::Separator => None,
            Self::Semicolon => Some(TokenKind::SemicolonComment),
        }
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline => Transition::Stay,
            Self::Separator => Transition::Replace(Mode::Amount),
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum AmountToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[ \t]+")]
    Ws,
    #[regex(r"[0-9]+([., ][0-9]+)*([eE][-+]?[0-9]+)?")]
    Number,
    #[regex(r#"[^\s\p{L}\p{N}\-+.,;@=*()"]+"#)]
    #[regex(r"\p{L}[\p{L}\p{N}_]*")]
    #[regex(r#""[^"\r\n]*""#)]
    Commodity,
    #[token("-")]
    Dash,
    #[token("+")]
    Plus,
    #[token("=")]
    Equals,
    #[token("@")]
    At,
    #[token("*")]
    Asterisk,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
}

impl ModeToken for AmountToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Ws => TokenKind::AmountWs,
            Self::Number => TokenKind::Number,
            Self::Commodity => TokenKind::CommodityText,
            Self::Dash => TokenKind::Dash,
            Self::Plus => TokenKind::Plus,
            Self::Equals => TokenKind::Equals,
            Self::At => TokenKind::At,
            Self::Asterisk => TokenKind::Asterisk,
            Self::LParen => TokenKind::LParen,
            Self::RParen => TokenKind::RParen,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Semicolon => Transition::Push(Mode::InlineComment),
            _ => Transition::Stay,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum PriceToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"([0-9]{4,5}[-/.])?[0-9]{1,2}[-/.][0-9]{1,2}", price_date)]
    Date,
    #[regex(r#"("[^"\r\n]*"|[^\s\p{N}\-+.,;@=*()"]+)[ \t]*"#)]
    Commodity,
}

impl ModeToken for PriceToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Date => TokenKind::SimpleDate,
            Self::Commodity => TokenKind::PriceCommodity,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Commodity => Transition::Replace(Mode::Amount),
            _ => Transition::Stay,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum YearToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"[0-9]{4,5}", year_value)]
    Value,
    #[token(";")]
    Semicolon,
}

impl ModeToken for YearToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Value => TokenKind::YearValue,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Semicolon => Transition::Push(Mode::InlineComment),
            _ => Transition::Stay,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum MultilineCommentToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    /// A body line. The driver closes the comment on a line starting with
    /// `end comment`.
    #[regex(r"[^\r\n]+")]
    Text,
}

impl ModeToken for MultilineCommentToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::MultilineCommentNewline,
            Self::Text => TokenKind::MultilineCommentText,
        })
    }

    fn transition(&self) -> Transition {
        Transition::Stay
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum DirectiveContentToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[token(";")]
    Semicolon,
}

impl ModeToken for DirectiveContentToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline => Transition::Stay,
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum CommodityContentToken {
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[token("format ")]
    Format,
    #[token(";")]
    Semicolon,
}

impl ModeToken for CommodityContentToken {
    fn kind(&self) -> Option<TokenKind> {
        Some(match self {
            Self::Newline => TokenKind::Newline,
            Self::Format => TokenKind::FormatKeyword,
            Self::Semicolon => TokenKind::SemicolonComment,
        })
    }

    fn transition(&self) -> Transition {
        match self {
            Self::Newline => Transition::Stay,
            Self::Format => Transition::Replace(Mode::Amount),
            Self::Semicolon => Transition::Push(Mode::InlineComment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates() {
        assert!(is_valid_date("2024-02-29"));
        assert!(is_valid_date("02/29"));
        assert!(is_valid_date("12024.1.1"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("13/01"));
    }

    #[test]
    fn test_starts_tag() {
        assert!(starts_tag("tag2:"));
        assert!(starts_tag("标签:value"));
        assert!(starts_tag("a-b_c:"));
        assert!(!starts_tag("word tag:"));
        assert!(!starts_tag(":tag:"));
    }

    #[test]
    fn test_leading_tag_name_len() {
        assert_eq!(leading_tag_name_len("tag:"), Some(3));
        assert_eq!(leading_tag_name_len("t@g!: value"), Some(4));
        assert_eq!(leading_tag_name_len("标签:"), Some(6));
        assert_eq!(leading_tag_name_len("word tag:"), None);
        assert_eq!(leading_tag_name_len(":tag:"), None);
        assert_eq!(leading_tag_name_len("words"), None);
    }

    #[test]
    fn test_comment_word_kinds() {
        let tag = lex_one::<InlineCommentToken>("trip: nyc").unwrap().unwrap();
        assert_eq!(tag.kind, Some(TokenKind::TagName));
        assert_eq!(tag.span, 0..5);
        let text = lex_one::<InlineCommentToken>("bought milk trip:").unwrap().unwrap();
        assert_eq!(text.kind, Some(TokenKind::InlineCommentText));
        assert_eq!(text.span, 0..12);
    }

    #[test]
    fn test_paren_extent() {
        assert_eq!(paren_extent("#443) Payee\n"), (5, ParenKind::Code));
        assert_eq!(paren_extent("open desc\n)"), (9, ParenKind::Text));
        assert_eq!(paren_extent("open | memo"), (5, ParenKind::Text));
        let lexeme = lex_one::<TxnLineToken>("(no close").unwrap().unwrap();
        assert_eq!(lexeme.kind, Some(TokenKind::Text));
        assert_eq!(lexeme.transition, Transition::Stay);
    }

    #[test]
    fn test_year_value_requires_blank() {
        assert!(lex_one::<YearToken>("2024 ").is_some_and(|r| r.is_ok()));
        assert!(lex_one::<YearToken>("2024").is_some_and(|r| r.is_ok()));
        assert!(lex_one::<YearToken>("2024a").is_some_and(|r| r.is_err()));
    }

    #[test]
    fn test_blank_line_indent_is_skipped() {
        let lexeme = lex_one::<DefaultToken>("   \n").unwrap().unwrap();
        assert_eq!(lexeme.kind, Some(TokenKind::Newline));
        assert_eq!(lexeme.span, 3..4);
    }

    #[test]
    fn test_single_space_indent_is_rejected() {
        assert!(lex_one::<DefaultToken>(" Assets").unwrap().is_err());
    }

    #[test]
    fn test_posting_separator_has_no_kind() {
        let lexeme = lex_one::<PostingToken>("  $10").unwrap().unwrap();
        assert_eq!(lexeme.kind, None);
        assert_eq!(lexeme.transition, Transition::Replace(Mode::Amount));
    }
}
