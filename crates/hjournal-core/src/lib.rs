//! Core types for hjournal
//!
//! This crate provides the value types shared by every stage of the journal
//! front end and by anything consuming its output:
//!
//! - [`Date`] - A resolved calendar date
//! - [`Amount`] - A signed decimal with an optional commodity
//! - [`LotPrice`] and [`BalanceAssertion`] - Posting amount annotations
//! - [`Tag`] - A `name:value` comment annotation
//! - [`Journal`] - The cooked journal: transactions, accounts, prices and commodities
//!
//! # Example
//!
//! ```
//! use hjournal_core::{Amount, Date, Posting, Transaction, format_transaction, FormatConfig};
//! use rust_decimal_macros::dec;
//!
//! let txn = Transaction::new(Date::new(2024, 1, 15).unwrap())
//!     .with_posting(Posting::new(["Expenses", "Coffee"]).with_amount(Amount::new(dec!(5), "$")))
//!     .with_posting(Posting::new(["Assets", "Cash"]));
//!
//! let text = format_transaction(&txn, &FormatConfig::with_column(30));
//! assert!(text.starts_with("2024-01-15\n"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod date;
pub mod format;
pub mod journal;
pub mod tag;

pub use amount::{Amount, BalanceAssertion, LotPrice, LotPriceKind};
pub use date::{Date, DateDelimiter};
pub use format::{format_journal, format_transaction, FormatConfig};
pub use journal::{
    Account, AccountKind, Commodity, Description, Journal, Posting, Price, StatusIndicator,
    Transaction,
};
pub use tag::Tag;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
