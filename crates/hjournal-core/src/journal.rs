//! Cooked journal types.
//!
//! These are the fully resolved values produced at the end of the pipeline:
//! every date has a year, every number is a [`Decimal`](rust_decimal::Decimal)
//! and every tag has been attached to the entity that owns it.
//!
//! The [`Journal`] groups its items by category. Order within a category is
//! document order; order across categories is not recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, BalanceAssertion, Date, LotPrice, Tag};

/// Clearing status of a transaction or posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIndicator {
    /// No marker.
    #[default]
    Unmarked,
    /// `!`
    Pending,
    /// `*`
    Cleared,
}

impl StatusIndicator {
    /// Map a status marker character.
    #[must_use]
    pub const fn from_marker(c: char) -> Option<Self> {
        match c {
            '*' => Some(Self::Cleared),
            '!' => Some(Self::Pending),
            _ => None,
        }
    }

    /// The marker character, if any.
    #[must_use]
    pub const fn marker(self) -> Option<char> {
        match self {
            Self::Unmarked => None,
            Self::Pending => Some('!'),
            Self::Cleared => Some('*'),
        }
    }
}

/// Transaction description: either free text or a payee and memo split on `|`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    /// Plain description text (possibly empty).
    Text(String),
    /// `payee | memo`
    PayeeMemo {
        /// Text before the first pipe.
        payee: String,
        /// Text after the first pipe, pipes included.
        memo: String,
    },
}

impl Default for Description {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::PayeeMemo { payee, memo } => write!(f, "{payee} | {memo}"),
        }
    }
}

/// Which of the three posting account shapes was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    /// `Assets:Chequing`
    #[default]
    Real,
    /// `(Assets:Chequing)`
    Virtual,
    /// `[Assets:Chequing]`
    VirtualBalanced,
}

/// Write account segments joined by `:`, wrapped according to `kind`.
pub(crate) fn write_account(
    f: &mut impl fmt::Write,
    kind: AccountKind,
    segments: &[String],
) -> fmt::Result {
    let name = segments.join(":");
    match kind {
        AccountKind::Real => write!(f, "{name}"),
        AccountKind::Virtual => write!(f, "({name})"),
        AccountKind::VirtualBalanced => write!(f, "[{name}]"),
    }
}

/// A posting within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    /// Posting status marker.
    pub status: StatusIndicator,
    /// Account shape.
    pub kind: AccountKind,
    /// Account name segments.
    pub account: Vec<String>,
    /// The posted amount, if written.
    pub amount: Option<Amount>,
    /// Lot price (`@`, `@@`, `(@)`, `(@@)`).
    pub lot_price: Option<LotPrice>,
    /// Balance assertion (`=`, `==`, `=*`, `==*`).
    pub assertion: Option<BalanceAssertion>,
    /// Tags from the posting's own comment and the comment lines after it.
    pub tags: Vec<Tag>,
}

impl Posting {
    /// Create a real-account posting with no amount.
    #[must_use]
    pub fn new<S: Into<String>>(account: impl IntoIterator<Item = S>) -> Self {
        Self {
            status: StatusIndicator::Unmarked,
            kind: AccountKind::Real,
            account: account.into_iter().map(Into::into).collect(),
            amount: None,
            lot_price: None,
            assertion: None,
            tags: Vec::new(),
        }
    }

    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Full account name joined by `:`.
    #[must_use]
    pub fn account_name(&self) -> String {
        self.account.join(":")
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(marker) = self.status.marker() {
            write!(f, "{marker} ")?;
        }
        write_account(f, self.kind, &self.account)?;
        if let Some(amount) = &self.amount {
            write!(f, "  {amount}")?;
        }
        if let Some(price) = &self.lot_price {
            write!(f, " {price}")?;
        }
        if let Some(assertion) = &self.assertion {
            write!(f, " {assertion}")?;
        }
        Ok(())
    }
}

/// A transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Primary date.
    pub date: Date,
    /// Secondary (posting) date written after `=`.
    pub posting_date: Option<Date>,
    /// Status marker.
    pub status: StatusIndicator,
    /// Code written in parentheses, e.g. a cheque number.
    pub cheque_number: Option<String>,
    /// Description.
    pub description: Description,
    /// Postings in document order.
    pub postings: Vec<Posting>,
    /// Tags owned by the transaction itself.
    pub tags: Vec<Tag>,
}

impl Transaction {
    /// Create an unmarked transaction with an empty description.
    #[must_use]
    pub fn new(date: Date) -> Self {
        Self {
            date,
            posting_date: None,
            status: StatusIndicator::Unmarked,
            cheque_number: None,
            description: Description::default(),
            postings: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Add a posting.
    #[must_use]
    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        if let Some(posting_date) = &self.posting_date {
            write!(f, "={posting_date}")?;
        }
        if let Some(marker) = self.status.marker() {
            write!(f, " {marker}")?;
        }
        if let Some(code) = &self.cheque_number {
            write!(f, " ({code})")?;
        }
        let description = self.description.to_string();
        if !description.is_empty() {
            write!(f, " {description}")?;
        }
        for posting in &self.postings {
            write!(f, "\n    {posting}")?;
        }
        Ok(())
    }
}

/// An `account` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name segments, brackets kept as literal characters.
    pub account: Vec<String>,
    /// Tags from the header comment and the content lines.
    pub tags: Vec<Tag>,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account {}", self.account.join(":"))
    }
}

/// A `P` market price directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Date of the price.
    pub date: Date,
    /// The commodity being priced.
    pub commodity: String,
    /// Its price.
    pub price: Amount,
    /// Tags from the header comment and the content lines.
    pub tags: Vec<Tag>,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P {} {} {}", self.date, self.commodity, self.price)
    }
}

/// A `commodity` or `D` (default commodity) directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commodity {
    /// `true` for a `D` directive.
    pub is_default: bool,
    /// The declared commodity symbol.
    pub commodity: Option<String>,
    /// Display format sample, from the header or a `format` subdirective.
    pub format: Option<Amount>,
    /// Tags from the header comment and the content lines.
    pub tags: Vec<Tag>,
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_default { "D" } else { "commodity" };
        match (&self.format, &self.commodity) {
            (Some(format), _) => write!(f, "{keyword} {format}"),
            (None, Some(commodity)) => write!(f, "{keyword} {commodity}"),
            (None, None) => write!(f, "{keyword}"),
        }
    }
}

/// A cooked journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// All transactions, in document order.
    pub transactions: Vec<Transaction>,
    /// All account directives, in document order.
    pub accounts: Vec<Account>,
    /// All price directives, in document order.
    pub prices: Vec<Price>,
    /// All commodity and default commodity directives, in document order.
    pub commodities: Vec<Commodity>,
}

impl Journal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the journal holds no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.accounts.is_empty()
            && self.prices.is_empty()
            && self.commodities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_markers() {
        assert_eq!(
            StatusIndicator::from_marker('*'),
            Some(StatusIndicator::Cleared)
        );
        assert_eq!(
            StatusIndicator::from_marker('!'),
            Some(StatusIndicator::Pending)
        );
        assert_eq!(StatusIndicator::from_marker('?'), None);
        assert_eq!(StatusIndicator::Unmarked.marker(), None);
    }

    #[test]
    fn test_description_serializes_untagged() {
        let text = serde_json::to_string(&Description::Text("lunch".into())).unwrap();
        assert_eq!(text, "\"lunch\"");

        let split = Description::PayeeMemo {
            payee: "Cafe".into(),
            memo: "lunch".into(),
        };
        let json = serde_json::to_string(&split).unwrap();
        assert_eq!(json, r#"{"payee":"Cafe","memo":"lunch"}"#);
    }

    #[test]
    fn test_posting_serializes_camel_case() {
        let mut posting = Posting::new(["Assets"]).with_amount(Amount::new(dec!(1), "X"));
        posting.lot_price = Some(LotPrice {
            kind: crate::LotPriceKind::Total,
            is_virtual: true,
            amount: Amount::new(dec!(2), "Y"),
        });
        posting.assertion = Some(BalanceAssertion {
            is_total: false,
            is_inclusive: true,
            amount: Amount::new(dec!(3), "X"),
        });
        let json = serde_json::to_value(&posting).unwrap();
        assert_eq!(json["lotPrice"]["isVirtual"], true);
        assert_eq!(json["lotPrice"]["kind"], "total");
        assert_eq!(json["assertion"]["isInclusive"], true);
        assert_eq!(json["assertion"]["isTotal"], false);
        let back: Posting = serde_json::from_value(json).unwrap();
        assert_eq!(back, posting);
    }

    #[test]
    fn test_transaction_display() {
        let txn = Transaction::new(Date::new(2024, 1, 15).unwrap())
            .with_posting(Posting::new(["Expenses", "Food"]).with_amount(Amount::new(dec!(5), "$")))
            .with_posting(Posting::new(["Assets", "Cash"]));
        let mut txn = txn;
        txn.status = StatusIndicator::Cleared;
        txn.description = Description::Text("Coffee".into());
        assert_eq!(
            txn.to_string(),
            "2024-01-15 * Coffee\n    Expenses:Food  $5\n    Assets:Cash"
        );
    }

    #[test]
    fn test_virtual_posting_display() {
        let mut posting = Posting::new(["Assets", "Virtual"]);
        posting.kind = AccountKind::Virtual;
        assert_eq!(posting.to_string(), "(Assets:Virtual)");
        posting.kind = AccountKind::VirtualBalanced;
        assert_eq!(posting.to_string(), "[Assets:Virtual]");
    }

    #[test]
    fn test_empty_journal() {
        assert!(Journal::new().is_empty());
    }
}
