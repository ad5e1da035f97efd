//! Journal formatter.
//!
//! Renders a cooked [`Journal`] back to journal source with posting amounts
//! aligned to a configurable column. Tags are written as inline comments on
//! the entity that owns them, so formatting and re-parsing a journal yields
//! the same tag ownership.

use std::fmt::{self, Write};

use crate::journal::write_account;
use crate::{Account, Commodity, Journal, Posting, Price, Tag, Transaction};

/// Formatter configuration.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Column to align posting amounts to (default: 48).
    pub amount_column: usize,
    /// Indentation for postings.
    pub indent: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            amount_column: 48,
            indent: "    ".to_string(),
        }
    }
}

impl FormatConfig {
    /// Create a new config with the specified amount column.
    #[must_use]
    pub fn with_column(column: usize) -> Self {
        Self {
            amount_column: column,
            ..Default::default()
        }
    }

    /// Create a new config with the specified indent width.
    #[must_use]
    pub fn with_indent(indent_width: usize) -> Self {
        Self {
            indent: " ".repeat(indent_width.max(2)),
            ..Default::default()
        }
    }
}

/// Format a whole journal.
///
/// Items are grouped by category: commodities, accounts, prices, then
/// transactions, each separated by a blank line.
pub fn format_journal(journal: &Journal, config: &FormatConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_journal(&mut out, journal, config);
    out
}

/// Format a single transaction, postings included.
pub fn format_transaction(txn: &Transaction, config: &FormatConfig) -> String {
    let mut out = String::new();
    let _ = write_transaction(&mut out, txn, config);
    out
}

fn write_journal(out: &mut String, journal: &Journal, config: &FormatConfig) -> fmt::Result {
    let mut sections: Vec<String> = Vec::new();

    let mut header = String::new();
    for commodity in &journal.commodities {
        write_commodity(&mut header, commodity)?;
    }
    for account in &journal.accounts {
        write_account_directive(&mut header, account)?;
    }
    for price in &journal.prices {
        write_price(&mut header, price)?;
    }
    if !header.is_empty() {
        sections.push(header);
    }

    for txn in &journal.transactions {
        let mut section = String::new();
        write_transaction(&mut section, txn, config)?;
        sections.push(section);
    }

    write!(out, "{}", sections.join("\n"))
}

fn write_tags(out: &mut String, tags: &[Tag]) -> fmt::Result {
    if tags.is_empty() {
        return Ok(());
    }
    let rendered: Vec<String> = tags.iter().map(ToString::to_string).collect();
    write!(out, "  ; {}", rendered.join(", "))
}

fn write_commodity(out: &mut String, commodity: &Commodity) -> fmt::Result {
    write!(out, "{commodity}")?;
    write_tags(out, &commodity.tags)?;
    out.push('\n');
    Ok(())
}

fn write_account_directive(out: &mut String, account: &Account) -> fmt::Result {
    write!(out, "{account}")?;
    write_tags(out, &account.tags)?;
    out.push('\n');
    Ok(())
}

fn write_price(out: &mut String, price: &Price) -> fmt::Result {
    write!(out, "{price}")?;
    write_tags(out, &price.tags)?;
    out.push('\n');
    Ok(())
}

fn write_transaction(out: &mut String, txn: &Transaction, config: &FormatConfig) -> fmt::Result {
    write!(out, "{}", txn.date)?;
    if let Some(posting_date) = &txn.posting_date {
        write!(out, "={posting_date}")?;
    }
    if let Some(marker) = txn.status.marker() {
        write!(out, " {marker}")?;
    }
    if let Some(code) = &txn.cheque_number {
        write!(out, " ({code})")?;
    }
    let description = txn.description.to_string();
    if !description.is_empty() {
        write!(out, " {description}")?;
    }
    write_tags(out, &txn.tags)?;
    out.push('\n');

    for posting in &txn.postings {
        write_posting(out, posting, config)?;
        out.push('\n');
    }
    Ok(())
}

/// Format a posting with amount alignment.
fn write_posting(out: &mut String, posting: &Posting, config: &FormatConfig) -> fmt::Result {
    let mut line = String::new();
    line.push_str(&config.indent);
    if let Some(marker) = posting.status.marker() {
        write!(line, "{marker} ")?;
    }
    write_account(&mut line, posting.kind, &posting.account)?;

    if let Some(amount) = &posting.amount {
        let amount_str = amount.to_string();
        // Pad so the amount ends at the configured column
        let target_col = config.amount_column.saturating_sub(amount_str.chars().count());
        let current_len = line.chars().count();
        if current_len + 2 <= target_col {
            line.push_str(&" ".repeat(target_col - current_len));
        } else {
            line.push_str("  "); // Minimum 2 spaces
        }
        line.push_str(&amount_str);
    } else if posting.lot_price.is_some() || posting.assertion.is_some() {
        line.push_str("  ");
    }

    if let Some(price) = &posting.lot_price {
        write!(line, " {price}")?;
    }
    if let Some(assertion) = &posting.assertion {
        write!(line, " {assertion}")?;
    }
    write_tags(&mut line, &posting.tags)?;
    out.push_str(&line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, Date, Description, StatusIndicator};
    use rust_decimal_macros::dec;

    fn sample_transaction() -> Transaction {
        let mut txn = Transaction::new(Date::new(2024, 1, 15).unwrap())
            .with_posting(
                Posting::new(["Expenses", "Food"]).with_amount(Amount::new(dec!(23.05), "$")),
            )
            .with_posting(Posting::new(["Assets", "Chequing"]));
        txn.status = StatusIndicator::Cleared;
        txn.description = Description::Text("New York Steakhouse".into());
        txn
    }

    #[test]
    fn test_format_transaction_aligns_amounts() {
        let config = FormatConfig::with_column(30);
        let out = format_transaction(&sample_transaction(), &config);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "2024-01-15 * New York Steakhouse");
        assert_eq!(lines[1].len(), 30);
        assert!(lines[1].ends_with("$23.05"));
        assert_eq!(lines[2], "    Assets:Chequing");
    }

    #[test]
    fn test_format_narrow_column_keeps_two_spaces() {
        let config = FormatConfig::with_column(5);
        let out = format_transaction(&sample_transaction(), &config);
        assert!(out.contains("Expenses:Food  $23.05"));
    }

    #[test]
    fn test_format_tags_as_comment() {
        let mut txn = sample_transaction();
        txn.tags.push(Tag::with_value("trip", "nyc"));
        txn.postings[0].tags.push(Tag::new("meal"));
        let out = format_transaction(&txn, &FormatConfig::default());
        assert!(out.lines().next().unwrap().ends_with("  ; trip: nyc"));
        assert!(out.lines().nth(1).unwrap().ends_with("  ; meal:"));
    }

    #[test]
    fn test_format_journal_sections() {
        let journal = Journal {
            transactions: vec![sample_transaction()],
            accounts: vec![Account {
                account: vec!["Assets".into(), "Chequing".into()],
                tags: vec![],
            }],
            prices: vec![Price {
                date: Date::new(2024, 1, 1).unwrap(),
                commodity: "USD".into(),
                price: Amount::new(dec!(1.37), "$"),
                tags: vec![],
            }],
            commodities: vec![],
        };
        let out = format_journal(&journal, &FormatConfig::default());
        assert!(out.starts_with("account Assets:Chequing\nP 2024-01-01 USD $1.37\n\n2024-01-15"));
    }
}
