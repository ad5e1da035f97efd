//! Raw → cooked lowering.
//!
//! Cooking is a left-to-right fold over the raw journal. The only state
//! carried between items is [`CookState`]: the year that dates written
//! without one resolve to. Year directives replace it; every other item is
//! resolved against it and pushed to its category of the [`Journal`].

use hjournal_core::{
    Account, Amount, BalanceAssertion, Commodity, Date, Journal, LotPrice, LotPriceKind, Posting,
    Price, Tag, Transaction,
};

use crate::error::CookError;
use crate::lexer::parse_decimal;
use crate::raw::{
    comment_tags, RawAccountDirective, RawAmount, RawBalanceAssertion, RawCommodityContentLine,
    RawCommodityDirective, RawDate, RawDefaultCommodityDirective, RawInlineComment, RawItem,
    RawLotPrice, RawPosting, RawPriceDirective, RawTransaction, RawTransactionContentLine, Sign,
};

/// State threaded through the cooking fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookState {
    /// Year used for dates written without one.
    pub default_year: i32,
}

impl CookState {
    /// Start cooking with the given fallback year.
    #[must_use]
    pub const fn new(default_year: i32) -> Self {
        Self { default_year }
    }
}

/// Cook a raw journal.
///
/// # Errors
///
/// Fails on the first year directive, date or number that cannot be
/// converted. No partial journal is returned.
pub fn raw_to_cooked(raw: &[RawItem], state: CookState) -> Result<Journal, CookError> {
    let mut cook = Cook {
        state,
        journal: Journal::new(),
    };
    for item in raw {
        cook.item(item)?;
    }
    let journal = cook.journal;
    tracing::debug!(
        transactions = journal.transactions.len(),
        accounts = journal.accounts.len(),
        prices = journal.prices.len(),
        commodities = journal.commodities.len(),
        "cooked journal"
    );
    Ok(journal)
}

/// The entity that comment-only content lines attach their tags to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagOwner {
    Transaction,
    Posting(usize),
}

struct Cook {
    state: CookState,
    journal: Journal,
}

impl Cook {
    fn item(&mut self, item: &RawItem) -> Result<(), CookError> {
        tracing::trace!(kind = item.kind_name(), "cooking item");
        match item {
            RawItem::Transaction(txn) => {
                let txn = self.transaction(txn)?;
                self.journal.transactions.push(txn);
            }
            RawItem::PriceDirective(price) => {
                let price = self.price(price)?;
                self.journal.prices.push(price);
            }
            RawItem::AccountDirective(account) => {
                self.journal.accounts.push(account_directive(account));
            }
            RawItem::CommodityDirective(commodity) => {
                self.journal.commodities.push(commodity_directive(commodity)?);
            }
            RawItem::DefaultCommodityDirective(commodity) => {
                self.journal
                    .commodities
                    .push(default_commodity_directive(commodity)?);
            }
            RawItem::YearDirective(year) => {
                let value = year
                    .year
                    .parse::<i32>()
                    .map_err(|_| CookError::InvalidYear {
                        text: year.year.clone(),
                        span: year.span,
                    })?;
                tracing::trace!(year = value, "default year changed");
                self.state.default_year = value;
            }
            RawItem::Comment(_) | RawItem::MultilineComment(_) => {}
        }
        Ok(())
    }

    fn transaction(&self, raw: &RawTransaction) -> Result<Transaction, CookError> {
        let init = &raw.init_line;
        let date = resolve_date(&init.date.date, self.state.default_year)?;
        let posting_date = init
            .date
            .posting_date
            .as_ref()
            .map(|d| resolve_date(d, date.year))
            .transpose()?;

        let mut txn = Transaction::new(date);
        txn.posting_date = posting_date;
        txn.status = init.status;
        txn.cheque_number = init.cheque_number.clone();
        txn.description = init.description.clone();
        txn.tags = comment_tags(init.comment.as_ref()).cloned().collect();

        let mut owner = TagOwner::Transaction;
        for line in &raw.content_lines {
            match line {
                RawTransactionContentLine::Posting(posting) => {
                    owner = TagOwner::Posting(txn.postings.len());
                    txn.postings.push(cook_posting(posting)?);
                }
                RawTransactionContentLine::Comment(comment) => {
                    let tags = match owner {
                        TagOwner::Transaction => &mut txn.tags,
                        TagOwner::Posting(i) => &mut txn.postings[i].tags,
                    };
                    tags.extend(comment.tags().cloned());
                }
            }
        }
        Ok(txn)
    }

    fn price(&self, raw: &RawPriceDirective) -> Result<Price, CookError> {
        Ok(Price {
            date: resolve_date(&raw.date, self.state.default_year)?,
            commodity: raw.commodity.clone(),
            price: cook_amount(&raw.price)?,
            tags: directive_tags(raw.comment.as_ref(), &raw.content_lines),
        })
    }
}

/// Resolve a written date, filling in `default_year` when the year is
/// missing.
fn resolve_date(raw: &RawDate, default_year: i32) -> Result<Date, CookError> {
    let year = match &raw.year {
        Some(text) => text.parse::<i32>().map_err(|_| CookError::InvalidYear {
            text: text.clone(),
            span: raw.span,
        })?,
        None => default_year,
    };
    let invalid = || CookError::InvalidDate {
        text: format!("{year}-{}-{}", raw.month, raw.day),
        span: raw.span,
    };
    let month = raw.month.parse::<u32>().map_err(|_| invalid())?;
    let day = raw.day.parse::<u32>().map_err(|_| invalid())?;
    Date::new(year, month, day).ok_or_else(invalid)
}

fn cook_amount(raw: &RawAmount) -> Result<Amount, CookError> {
    let number = parse_decimal(&raw.number).ok_or_else(|| CookError::InvalidNumber {
        text: raw.number.clone(),
        span: raw.span,
    })?;
    let number = match raw.sign {
        Some(Sign::Negative) => -number,
        Some(Sign::Positive) | None => number,
    };
    Ok(Amount {
        number,
        commodity: raw.commodity.clone(),
    })
}

fn cook_lot_price(raw: &RawLotPrice) -> Result<LotPrice, CookError> {
    Ok(LotPrice {
        kind: if raw.is_total {
            LotPriceKind::Total
        } else {
            LotPriceKind::Unit
        },
        is_virtual: raw.is_virtual,
        amount: cook_amount(&raw.amount)?,
    })
}

fn cook_assertion(raw: &RawBalanceAssertion) -> Result<BalanceAssertion, CookError> {
    Ok(BalanceAssertion {
        is_total: raw.is_total,
        is_inclusive: raw.is_inclusive,
        amount: cook_amount(&raw.amount)?,
    })
}

fn cook_posting(raw: &RawPosting) -> Result<Posting, CookError> {
    Ok(Posting {
        status: raw.status,
        kind: raw.kind,
        account: raw.account.clone(),
        amount: raw.amount.as_ref().map(cook_amount).transpose()?,
        lot_price: raw.lot_price.as_ref().map(cook_lot_price).transpose()?,
        assertion: raw.assertion.as_ref().map(cook_assertion).transpose()?,
        tags: comment_tags(raw.comment.as_ref()).cloned().collect(),
    })
}

/// Header tags followed by content-line tags.
fn directive_tags(header: Option<&RawInlineComment>, lines: &[RawInlineComment]) -> Vec<Tag> {
    comment_tags(header)
        .chain(lines.iter().flat_map(RawInlineComment::tags))
        .cloned()
        .collect()
}

fn account_directive(raw: &RawAccountDirective) -> Account {
    Account {
        account: raw.account.clone(),
        tags: directive_tags(raw.comment.as_ref(), &raw.content_lines),
    }
}

fn commodity_directive(raw: &RawCommodityDirective) -> Result<Commodity, CookError> {
    let mut format = raw.format.as_ref().map(cook_amount).transpose()?;
    let mut tags: Vec<Tag> = comment_tags(raw.comment.as_ref()).cloned().collect();
    for line in &raw.content_lines {
        if let RawCommodityContentLine::Format { format: sample, .. } = line {
            format = Some(cook_amount(sample)?);
        }
        tags.extend(comment_tags(line.comment()).cloned());
    }
    let commodity = raw
        .commodity
        .clone()
        .or_else(|| format.as_ref().and_then(|f| f.commodity.clone()));
    Ok(Commodity {
        is_default: false,
        commodity,
        format,
        tags,
    })
}

fn default_commodity_directive(
    raw: &RawDefaultCommodityDirective,
) -> Result<Commodity, CookError> {
    let format = cook_amount(&raw.format)?;
    Ok(Commodity {
        is_default: true,
        commodity: format.commodity.clone(),
        format: Some(format),
        tags: directive_tags(raw.comment.as_ref(), &raw.content_lines),
    })
}
