//! Amounts, lot prices and balance assertions.
//!
//! An [`Amount`] pairs a signed decimal quantity with an optional commodity.
//! Commodities come in three shapes in journal source: symbol runs (`$`, `€`),
//! word runs in any script (`CAD`, `foobar`) and quoted multi-word strings
//! (`"green apples"`). Once cooked, the commodity is stored without quotes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity paired with an optional commodity.
///
/// # Examples
///
/// ```
/// use hjournal_core::Amount;
/// use rust_decimal_macros::dec;
///
/// let amount = Amount::new(dec!(-23.05), "$");
/// assert!(amount.is_negative());
/// assert_eq!(amount.to_string(), "$-23.05");
///
/// let bare = Amount::bare(dec!(1000));
/// assert_eq!(bare.to_string(), "1000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// The signed quantity.
    pub number: Decimal,
    /// The commodity, if one was written.
    pub commodity: Option<String>,
}

impl Amount {
    /// Create an amount with a commodity.
    #[must_use]
    pub fn new(number: Decimal, commodity: impl Into<String>) -> Self {
        Self {
            number,
            commodity: Some(commodity.into()),
        }
    }

    /// Create an amount without a commodity.
    #[must_use]
    pub const fn bare(number: Decimal) -> Self {
        Self {
            number,
            commodity: None,
        }
    }

    /// Check if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.number.is_sign_negative() && !self.number.is_zero()
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.number.is_zero()
    }

    /// Get the commodity as a string slice.
    #[must_use]
    pub fn commodity(&self) -> Option<&str> {
        self.commodity.as_deref()
    }
}

/// How a commodity should be placed relative to its number when printed.
fn commodity_is_prefix(commodity: &str) -> bool {
    commodity
        .chars()
        .next()
        .is_some_and(|c| !c.is_alphanumeric() && c != '"')
}

fn write_commodity(f: &mut fmt::Formatter<'_>, commodity: &str) -> fmt::Result {
    if commodity.chars().any(char::is_whitespace) {
        write!(f, "\"{commodity}\"")
    } else {
        write!(f, "{commodity}")
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.commodity {
            Some(c) if commodity_is_prefix(c) => write!(f, "{c}{}", self.number),
            Some(c) => {
                write!(f, "{} ", self.number)?;
                write_commodity(f, c)
            }
            None => write!(f, "{}", self.number),
        }
    }
}

/// A lot price attached to a posting amount.
///
/// `@` gives a per-unit price and `@@` a total price. Wrapping the operator
/// in parentheses (`(@)`, `(@@)`) marks the price as virtual: it is recorded
/// but does not take part in balancing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotPrice {
    /// Unit or total price.
    pub kind: LotPriceKind,
    /// Whether the operator was parenthesized.
    pub is_virtual: bool,
    /// The price amount.
    pub amount: Amount,
}

/// Kind of a lot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotPriceKind {
    /// `@`
    Unit,
    /// `@@`
    Total,
}

impl fmt::Display for LotPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            LotPriceKind::Unit => "@",
            LotPriceKind::Total => "@@",
        };
        if self.is_virtual {
            write!(f, "({op}) {}", self.amount)
        } else {
            write!(f, "{op} {}", self.amount)
        }
    }
}

/// A balance assertion attached to a posting.
///
/// `=` asserts the balance of the posted commodity, `==` asserts it is the
/// only commodity held. A leading `*` makes the assertion include subaccounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAssertion {
    /// `==` instead of `=`.
    pub is_total: bool,
    /// `*` prefix.
    pub is_inclusive: bool,
    /// The asserted amount.
    pub amount: Amount,
}

impl fmt::Display for BalanceAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inclusive {
            write!(f, "*")?;
        }
        if self.is_total {
            write!(f, "== {}", self.amount)
        } else {
            write!(f, "= {}", self.amount)
        }
    }
}
