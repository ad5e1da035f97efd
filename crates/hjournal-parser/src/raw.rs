//! Raw journal types.
//!
//! The raw journal is the CST with its delimiters, indentation and
//! whitespace removed, shaped after the journal items it describes. Every
//! value is still textual: dates keep their written components and amounts
//! keep their number literal. Turning those into calendar dates and decimals
//! happens when cooking (see [`crate::cook`]).

use hjournal_core::{AccountKind, DateDelimiter, Description, StatusIndicator, Tag};
use serde::{Deserialize, Serialize};

use crate::Span;

/// A lowered journal: one item per journal item node, in document order.
pub type RawJournal = Vec<RawItem>;

/// One journal item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawItem {
    /// A transaction and its content lines.
    Transaction(RawTransaction),
    /// A full-line comment, marker removed.
    Comment(String),
    /// `P date commodity amount`
    PriceDirective(RawPriceDirective),
    /// `account name`
    AccountDirective(RawAccountDirective),
    /// `commodity ...`
    CommodityDirective(RawCommodityDirective),
    /// `D amount`
    DefaultCommodityDirective(RawDefaultCommodityDirective),
    /// Body lines of a `comment` block. Blank lines are kept as `""`.
    MultilineComment(Vec<String>),
    /// `Y 2024`
    YearDirective(RawYearDirective),
}

impl RawItem {
    /// Short name of the item kind, used in trace logs.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::Comment(_) => "comment",
            Self::PriceDirective(_) => "price directive",
            Self::AccountDirective(_) => "account directive",
            Self::CommodityDirective(_) => "commodity directive",
            Self::DefaultCommodityDirective(_) => "default commodity directive",
            Self::MultilineComment(_) => "multiline comment",
            Self::YearDirective(_) => "year directive",
        }
    }
}

/// A date as written. The year may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDate {
    /// Year digits, if written.
    pub year: Option<String>,
    /// Month digits, possibly zero-padded.
    pub month: String,
    /// Day digits, possibly zero-padded.
    pub day: String,
    /// The first delimiter used.
    pub delimiter: DateDelimiter,
    /// Source span of the date.
    pub span: Span,
}

impl RawDate {
    /// Split a date literal such as `2024/01/05` or `1.5`.
    ///
    /// Returns `None` when the text does not have two or three
    /// delimiter-separated components.
    #[must_use]
    pub fn parse(text: &str, span: Span) -> Option<Self> {
        let delimiter = text.chars().find_map(DateDelimiter::from_char)?;
        let parts: Vec<&str> = text.split(['-', '/', '.']).collect();
        let (year, month, day) = match parts.as_slice() {
            [year, month, day] => (Some((*year).to_string()), *month, *day),
            [month, day] => (None, *month, *day),
            _ => return None,
        };
        Some(Self {
            year,
            month: month.to_string(),
            day: day.to_string(),
            delimiter,
            span,
        })
    }
}

/// Explicit sign written before an amount's number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    /// `-`
    Negative,
    /// `+`
    Positive,
}

/// An amount as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAmount {
    /// Normalized number literal: group marks removed, `.` as decimal mark.
    pub number: String,
    /// Commodity, unquoted.
    pub commodity: Option<String>,
    /// Explicit sign, if any.
    pub sign: Option<Sign>,
    /// The amount's source text.
    pub value: String,
    /// Source span of the amount.
    pub span: Span,
}

/// One item of an inline comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCommentItem {
    /// A run of free text.
    Text(String),
    /// A `name:value` tag.
    Tag(Tag),
}

/// A `;` comment at the end of a line or alone on a content line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInlineComment {
    /// Text runs and tags in order.
    pub items: Vec<RawCommentItem>,
}

impl RawInlineComment {
    /// The tags of this comment, in order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.items.iter().filter_map(|item| match item {
            RawCommentItem::Tag(tag) => Some(tag),
            RawCommentItem::Text(_) => None,
        })
    }
}

/// Tags of an optional comment.
pub(crate) fn comment_tags(comment: Option<&RawInlineComment>) -> impl Iterator<Item = &Tag> {
    comment.into_iter().flat_map(RawInlineComment::tags)
}

/// A transaction's primary date and optional posting date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionDate {
    /// The primary date.
    pub date: RawDate,
    /// The date after `=`.
    pub posting_date: Option<RawDate>,
}

/// The first line of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionInitLine {
    /// Dates.
    pub date: RawTransactionDate,
    /// Status marker.
    pub status: StatusIndicator,
    /// Code inside the parentheses.
    pub cheque_number: Option<String>,
    /// Description, split into payee and memo on the first `|`.
    pub description: Description,
    /// Trailing comment.
    pub comment: Option<RawInlineComment>,
}

/// A price annotation on a posting amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLotPrice {
    /// `@@` instead of `@`.
    pub is_total: bool,
    /// Parenthesized operator.
    pub is_virtual: bool,
    /// The price.
    pub amount: RawAmount,
}

/// A balance assertion on a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBalanceAssertion {
    /// `==` instead of `=`.
    pub is_total: bool,
    /// Leading `*`.
    pub is_inclusive: bool,
    /// The asserted amount.
    pub amount: RawAmount,
}

/// A posting line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPosting {
    /// Status marker.
    pub status: StatusIndicator,
    /// Account shape.
    pub kind: AccountKind,
    /// Account name segments, brackets removed.
    pub account: Vec<String>,
    /// Amount.
    pub amount: Option<RawAmount>,
    /// Lot price.
    pub lot_price: Option<RawLotPrice>,
    /// Balance assertion.
    pub assertion: Option<RawBalanceAssertion>,
    /// Trailing comment.
    pub comment: Option<RawInlineComment>,
}

/// An indented line of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawTransactionContentLine {
    /// A posting.
    Posting(RawPosting),
    /// A line holding only a comment.
    Comment(RawInlineComment),
}

/// A transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// The first line.
    pub init_line: RawTransactionInitLine,
    /// Postings and comment lines, in order.
    pub content_lines: Vec<RawTransactionContentLine>,
}

/// A `P` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceDirective {
    /// Date of the price.
    pub date: RawDate,
    /// The commodity being priced.
    pub commodity: String,
    /// Its price.
    pub price: RawAmount,
    /// Header comment.
    pub comment: Option<RawInlineComment>,
    /// Indented comment lines.
    pub content_lines: Vec<RawInlineComment>,
}

/// An `account` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccountDirective {
    /// Account name segments; brackets are literal characters here.
    pub account: Vec<String>,
    /// Header comment.
    pub comment: Option<RawInlineComment>,
    /// Indented comment lines.
    pub content_lines: Vec<RawInlineComment>,
}

/// An indented line of a `commodity` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawCommodityContentLine {
    /// `format amount`, with an optional trailing comment.
    Format {
        /// The format sample.
        format: RawAmount,
        /// Trailing comment.
        comment: Option<RawInlineComment>,
    },
    /// A line holding only a comment.
    Comment(RawInlineComment),
}

impl RawCommodityContentLine {
    /// The comment on this line, if any.
    #[must_use]
    pub const fn comment(&self) -> Option<&RawInlineComment> {
        match self {
            Self::Format { comment, .. } => comment.as_ref(),
            Self::Comment(comment) => Some(comment),
        }
    }
}

/// A `commodity` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommodityDirective {
    /// Commodity named without a sample amount, e.g. `commodity USD`.
    pub commodity: Option<String>,
    /// Sample amount on the header line, e.g. `commodity $1000.00`.
    pub format: Option<RawAmount>,
    /// Header comment.
    pub comment: Option<RawInlineComment>,
    /// Indented lines.
    pub content_lines: Vec<RawCommodityContentLine>,
}

/// A `D` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDefaultCommodityDirective {
    /// The sample amount.
    pub format: RawAmount,
    /// Header comment.
    pub comment: Option<RawInlineComment>,
    /// Indented comment lines.
    pub content_lines: Vec<RawInlineComment>,
}

/// A `Y`, `year` or `apply year` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawYearDirective {
    /// The year digits.
    pub year: String,
    /// Source span of the year value.
    pub span: Span,
    /// Header comment.
    pub comment: Option<RawInlineComment>,
    /// Indented comment lines.
    pub content_lines: Vec<RawInlineComment>,
}
