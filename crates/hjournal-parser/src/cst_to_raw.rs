//! CST → raw journal lowering.
//!
//! A pure, order-preserving walk over the journal item nodes. Delimiter,
//! indentation and whitespace tokens are dropped and every remaining text is
//! trimmed.

use hjournal_core::{AccountKind, Description, StatusIndicator, Tag};

use crate::cst::{CstNode, Rule};
use crate::raw::{
    RawAccountDirective, RawAmount, RawBalanceAssertion, RawCommentItem, RawCommodityContentLine,
    RawCommodityDirective, RawDate, RawDefaultCommodityDirective, RawInlineComment, RawItem,
    RawJournal, RawLotPrice, RawPosting, RawPriceDirective, RawTransaction,
    RawTransactionContentLine, RawTransactionDate, RawTransactionInitLine, RawYearDirective, Sign,
};
use crate::{Token, TokenKind};

/// Lower a CST rooted at [`Rule::Journal`] into a raw journal.
///
/// Trees built by [`crate::parse_tokens`] always lower completely. An item
/// node that lacks a required token (only possible for a hand-built tree)
/// is logged and left out.
pub fn cst_to_raw(journal: &CstNode<'_>) -> RawJournal {
    let items: RawJournal = journal
        .child_nodes()
        .filter_map(|node| {
            let item = lower_item(node);
            if item.is_none() {
                tracing::warn!(rule = %node.rule, "journal item is missing required tokens");
            }
            item
        })
        .collect();
    tracing::debug!(items = items.len(), "lowered CST to raw journal");
    items
}

fn lower_item(node: &CstNode<'_>) -> Option<RawItem> {
    Some(match node.rule {
        Rule::Transaction => RawItem::Transaction(transaction(node)?),
        Rule::LineComment => RawItem::Comment(text_of(node, TokenKind::CommentText)),
        Rule::MultilineComment => RawItem::MultilineComment(
            node.nodes(Rule::MultilineCommentItem)
                .map(|item| text_of(item, TokenKind::MultilineCommentText))
                .collect(),
        ),
        Rule::AccountDirective => RawItem::AccountDirective(account_directive(node)?),
        Rule::CommodityDirective => RawItem::CommodityDirective(commodity_directive(node)?),
        Rule::DefaultCommodityDirective => {
            RawItem::DefaultCommodityDirective(default_commodity_directive(node)?)
        }
        Rule::PriceDirective => RawItem::PriceDirective(price_directive(node)?),
        Rule::YearDirective => RawItem::YearDirective(year_directive(node)?),
        _ => return None,
    })
}

/// Trimmed text of the first direct child token of `kind`, or `""`.
fn text_of(node: &CstNode<'_>, kind: TokenKind) -> String {
    node.token(kind)
        .map(|t| t.text.trim().to_string())
        .unwrap_or_default()
}

fn status_of(token: Option<&Token<'_>>) -> StatusIndicator {
    token
        .and_then(|t| t.text.trim().chars().next())
        .and_then(StatusIndicator::from_marker)
        .unwrap_or_default()
}

fn date(token: &Token<'_>) -> Option<RawDate> {
    RawDate::parse(token.text.trim(), token.span)
}

// ============================================================================
// Comments
// ============================================================================

fn inline_comment(node: &CstNode<'_>) -> RawInlineComment {
    let items = node
        .nodes(Rule::InlineCommentItem)
        .filter_map(|item| {
            if let Some(text) = item.token(TokenKind::InlineCommentText) {
                return Some(RawCommentItem::Text(text.text.trim().to_string()));
            }
            item.node(Rule::Tag).map(|tag| RawCommentItem::Tag(tag_of(tag)))
        })
        .collect();
    RawInlineComment { items }
}

fn tag_of(node: &CstNode<'_>) -> Tag {
    let name = text_of(node, TokenKind::TagName);
    let value = text_of(node, TokenKind::TagValue);
    if value.is_empty() {
        Tag::new(name)
    } else {
        Tag::with_value(name, value)
    }
}

fn comment_of(node: &CstNode<'_>) -> Option<RawInlineComment> {
    node.node(Rule::InlineComment).map(inline_comment)
}

/// Comments of the indented lines of a directive.
fn content_comments(node: &CstNode<'_>, line_rule: Rule) -> Vec<RawInlineComment> {
    node.nodes(line_rule).filter_map(comment_of).collect()
}

// ============================================================================
// Amounts
// ============================================================================

fn amount(node: &CstNode<'_>) -> Option<RawAmount> {
    let number = node.token(TokenKind::Number)?.number_literal()?;
    let tokens = node.all_tokens();
    let sign = if node.token(TokenKind::Dash).is_some() {
        Some(Sign::Negative)
    } else if node.token(TokenKind::Plus).is_some() {
        Some(Sign::Positive)
    } else {
        None
    };
    let value: String = tokens.iter().map(|t| t.text).collect();
    Some(RawAmount {
        number: number.normalized(),
        commodity: node
            .token(TokenKind::CommodityText)
            .map(|t| t.inner_text().to_string()),
        sign,
        value: value.trim().to_string(),
        span: node.span()?,
    })
}

fn lot_price(node: &CstNode<'_>) -> Option<RawLotPrice> {
    Some(RawLotPrice {
        is_total: node.tokens(TokenKind::At).count() == 2,
        is_virtual: node.token(TokenKind::LParen).is_some(),
        amount: amount(node.node(Rule::Amount)?)?,
    })
}

fn balance_assertion(node: &CstNode<'_>) -> Option<RawBalanceAssertion> {
    Some(RawBalanceAssertion {
        is_total: node.tokens(TokenKind::Equals).count() == 2,
        is_inclusive: node.token(TokenKind::Asterisk).is_some(),
        amount: amount(node.node(Rule::Amount)?)?,
    })
}

// ============================================================================
// Transactions
// ============================================================================

fn description(init_line: &CstNode<'_>) -> Description {
    let text = text_of(init_line, TokenKind::Text);
    if init_line.token(TokenKind::Pipe).is_some() {
        Description::PayeeMemo {
            payee: text,
            memo: text_of(init_line, TokenKind::Memo),
        }
    } else {
        Description::Text(text)
    }
}

fn init_line(node: &CstNode<'_>) -> Option<RawTransactionInitLine> {
    let dates = node.node(Rule::TransactionDate)?;
    let date = RawTransactionDate {
        date: self::date(dates.token(TokenKind::DateAtStart)?)?,
        posting_date: match dates.token(TokenKind::SimpleDate) {
            Some(token) => Some(self::date(token)?),
            None => None,
        },
    };
    Some(RawTransactionInitLine {
        date,
        status: status_of(node.token(TokenKind::TxnStatus)),
        cheque_number: node
            .token(TokenKind::ParenValue)
            .map(|t| t.inner_text().trim().to_string()),
        description: description(node),
        comment: comment_of(node),
    })
}

fn posting(node: &CstNode<'_>) -> Option<RawPosting> {
    let account = node.child_tokens().find(|t| t.kind.is_posting_account())?;
    let kind = match account.kind {
        TokenKind::VirtualAccountName => AccountKind::Virtual,
        TokenKind::VirtualBalancedAccountName => AccountKind::VirtualBalanced,
        _ => AccountKind::Real,
    };
    Some(RawPosting {
        status: status_of(node.token(TokenKind::PostingStatus)),
        kind,
        account: segments(account),
        amount: node.node(Rule::Amount).and_then(amount),
        lot_price: node.node(Rule::LotPrice).and_then(lot_price),
        assertion: node.node(Rule::BalanceAssertion).and_then(balance_assertion),
        comment: comment_of(node),
    })
}

fn segments(account: &Token<'_>) -> Vec<String> {
    account
        .account_segments()
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect()
}

fn transaction(node: &CstNode<'_>) -> Option<RawTransaction> {
    let init_line = init_line(node.node(Rule::TransactionInitLine)?)?;
    let content_lines = node
        .nodes(Rule::TransactionContentLine)
        .filter_map(|line| match line.node(Rule::Posting) {
            Some(p) => posting(p).map(RawTransactionContentLine::Posting),
            None => comment_of(line).map(RawTransactionContentLine::Comment),
        })
        .collect();
    Some(RawTransaction {
        init_line,
        content_lines,
    })
}

// ============================================================================
// Directives
// ============================================================================

fn account_directive(node: &CstNode<'_>) -> Option<RawAccountDirective> {
    Some(RawAccountDirective {
        account: segments(node.token(TokenKind::AccountName)?),
        comment: comment_of(node),
        content_lines: content_comments(node, Rule::AccountDirectiveContentLine),
    })
}

fn commodity_directive(node: &CstNode<'_>) -> Option<RawCommodityDirective> {
    let content_lines = node
        .nodes(Rule::CommodityDirectiveContentLine)
        .filter_map(|line| match line.node(Rule::FormatSubdirective) {
            Some(format) => Some(RawCommodityContentLine::Format {
                format: amount(format.node(Rule::Amount)?)?,
                comment: comment_of(format),
            }),
            None => comment_of(line).map(RawCommodityContentLine::Comment),
        })
        .collect();
    Some(RawCommodityDirective {
        commodity: node
            .token(TokenKind::CommodityText)
            .map(|t| t.inner_text().to_string()),
        format: node.node(Rule::Amount).and_then(amount),
        comment: comment_of(node),
        content_lines,
    })
}

fn default_commodity_directive(node: &CstNode<'_>) -> Option<RawDefaultCommodityDirective> {
    Some(RawDefaultCommodityDirective {
        format: amount(node.node(Rule::Amount)?)?,
        comment: comment_of(node),
        content_lines: content_comments(node, Rule::DefaultCommodityDirectiveContentLine),
    })
}

fn price_directive(node: &CstNode<'_>) -> Option<RawPriceDirective> {
    Some(RawPriceDirective {
        date: date(node.token(TokenKind::SimpleDate)?)?,
        commodity: node.token(TokenKind::PriceCommodity)?.inner_text().to_string(),
        price: amount(node.node(Rule::Amount)?)?,
        comment: comment_of(node),
        content_lines: content_comments(node, Rule::PriceDirectiveContentLine),
    })
}

fn year_directive(node: &CstNode<'_>) -> Option<RawYearDirective> {
    let value = node.token(TokenKind::YearValue)?;
    Some(RawYearDirective {
        year: value.text.trim().to_string(),
        span: value.span,
        comment: comment_of(node),
        content_lines: content_comments(node, Rule::YearDirectiveContentLine),
    })
}
