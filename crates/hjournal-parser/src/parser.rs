//! Token-based CST parser using Chumsky.
//!
//! # Architecture
//!
//! ```text
//! Source (&str) → tokenize() → Vec<Token> → Chumsky parser → CstNode
//! ```
//!
//! Every rule produces the list of child elements it consumed; rules that
//! appear in the tree wrap that list in a [`CstNode`]. The first token of a
//! line decides which journal item is attempted.

use chumsky::prelude::*;

use crate::cst::{CstElement, CstNode, Rule};
use crate::error::{ParseError, ParseErrorKind};
use crate::{Span, Token, TokenKind};

/// Type alias for parser extra with our token type.
type TokExtra<'t, 'src> = extra::Err<Rich<'t, Token<'src>>>;

/// Children produced by a rule.
type Children<'src> = Vec<CstElement<'src>>;

fn concat<'src>((mut head, tail): (Children<'src>, Children<'src>)) -> Children<'src> {
    head.extend(tail);
    head
}

/// Chain parsers, concatenating their children.
macro_rules! seq {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $first $(.then($rest).map(concat))*
    };
}

// ============================================================================
// Primitives
// ============================================================================

/// Match a single token of the given kind.
fn tok<'t, 'src: 't>(
    kind: TokenKind,
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    any()
        .filter(move |t: &Token<'src>| t.kind == kind)
        .map(|t| vec![CstElement::Token(t)])
}

/// Match a single token whose kind is in `kinds`.
fn tok_any_of<'t, 'src: 't>(
    kinds: &'static [TokenKind],
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    any()
        .filter(move |t: &Token<'src>| kinds.contains(&t.kind))
        .map(|t| vec![CstElement::Token(t)])
}

/// Zero or one occurrence.
fn opt<'t, 'src: 't>(
    p: impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone,
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    p.or_not().map(Option::unwrap_or_default)
}

/// Zero or more occurrences.
fn many<'t, 'src: 't>(
    p: impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone,
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    p.repeated()
        .collect::<Vec<_>>()
        .map(|runs| runs.into_iter().flatten().collect())
}

/// Wrap the children of `p` in a node.
fn node<'t, 'src: 't>(
    rule: Rule,
    p: impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone,
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    p.map(move |children| vec![CstElement::Node(CstNode::new(rule, children))])
}

/// End of input, consuming nothing.
fn eoi<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    end().map(|()| Vec::new())
}

/// A line terminator. End of input counts as one.
fn line_end<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    tok(TokenKind::Newline).or(eoi())
}

fn ws<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    tok(TokenKind::AmountWs)
}

/// Header line followed by content lines. Fails when an indented line
/// follows that is not valid content, so a broken block is reported as a
/// whole.
fn block<'t, 'src: 't>(
    header: impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone,
    content: impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone,
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    seq!(header, many(content)).then_ignore(tok(TokenKind::Indent).not())
}

// ============================================================================
// Comments
// ============================================================================

fn tag<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    node(
        Rule::Tag,
        seq!(
            tok(TokenKind::TagName),
            tok(TokenKind::TagColon),
            opt(tok(TokenKind::TagValue)),
            opt(tok(TokenKind::TagComma)),
        ),
    )
}

fn inline_comment<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let item = node(
        Rule::InlineCommentItem,
        tok(TokenKind::InlineCommentText).or(tag()),
    );
    node(
        Rule::InlineComment,
        seq!(tok(TokenKind::SemicolonComment), many(item)),
    )
}

/// Indented line holding only an inline comment.
fn comment_content_line<'t, 'src: 't>(
    rule: Rule,
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    node(
        rule,
        seq!(tok(TokenKind::Indent), inline_comment(), line_end()),
    )
}

fn line_comment<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    const MARKERS: &[TokenKind] = &[
        TokenKind::SemicolonAtStart,
        TokenKind::HashAtStart,
        TokenKind::AsteriskAtStart,
    ];
    node(
        Rule::LineComment,
        seq!(
            tok_any_of(MARKERS),
            opt(tok(TokenKind::CommentText)),
            line_end()
        ),
    )
}

fn multiline_comment<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let text = || tok(TokenKind::MultilineCommentText);
    let newline = || tok(TokenKind::MultilineCommentNewline);
    let item = node(
        Rule::MultilineCommentItem,
        choice((
            seq!(text(), newline()),
            newline(),
            seq!(text(), eoi()),
        )),
    );
    node(
        Rule::MultilineComment,
        seq!(
            tok(TokenKind::MultilineCommentStart),
            newline().or(eoi()),
            many(item),
            seq!(tok(TokenKind::MultilineCommentEnd), line_end()).or(eoi()),
        ),
    )
}

// ============================================================================
// Amounts
// ============================================================================

fn amount<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    const SIGNS: &[TokenKind] = &[TokenKind::Dash, TokenKind::Plus];
    let commodity = || tok(TokenKind::CommodityText);
    node(
        Rule::Amount,
        seq!(
            opt(tok_any_of(SIGNS)),
            opt(ws()),
            opt(seq!(commodity(), opt(ws()))),
            opt(tok_any_of(SIGNS)),
            opt(ws()),
            tok(TokenKind::Number),
            opt(seq!(opt(ws()), commodity())),
        ),
    )
}

fn lot_price<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let at = || tok(TokenKind::At);
    node(
        Rule::LotPrice,
        seq!(
            opt(ws()),
            choice((
                seq!(tok(TokenKind::LParen), at(), opt(at()), tok(TokenKind::RParen)),
                seq!(at(), opt(at())),
            )),
            opt(ws()),
            amount(),
        ),
    )
}

fn balance_assertion<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    node(
        Rule::BalanceAssertion,
        seq!(
            opt(ws()),
            opt(tok(TokenKind::Asterisk)),
            tok(TokenKind::Equals),
            opt(tok(TokenKind::Equals)),
            opt(ws()),
            amount(),
        ),
    )
}

// ============================================================================
// Transactions
// ============================================================================

fn posting<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    const ACCOUNTS: &[TokenKind] = &[
        TokenKind::RealAccountName,
        TokenKind::VirtualAccountName,
        TokenKind::VirtualBalancedAccountName,
    ];
    let annotations = choice((
        seq!(lot_price(), opt(balance_assertion())),
        seq!(balance_assertion(), opt(lot_price())),
    ));
    node(
        Rule::Posting,
        seq!(
            opt(tok(TokenKind::PostingStatus)),
            tok_any_of(ACCOUNTS),
            opt(amount()),
            opt(annotations),
            opt(ws()),
            opt(inline_comment()),
        ),
    )
}

fn transaction<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let date = node(
        Rule::TransactionDate,
        seq!(
            tok(TokenKind::DateAtStart),
            opt(seq!(tok(TokenKind::Equals), tok(TokenKind::SimpleDate))),
        ),
    );
    let init_line = node(
        Rule::TransactionInitLine,
        seq!(
            date,
            opt(tok(TokenKind::TxnStatus)),
            opt(tok(TokenKind::ParenValue)),
            opt(tok(TokenKind::Text)),
            opt(seq!(tok(TokenKind::Pipe), opt(tok(TokenKind::Memo)))),
            opt(inline_comment()),
            line_end(),
        ),
    );
    let content_line = node(
        Rule::TransactionContentLine,
        seq!(
            tok(TokenKind::Indent),
            posting().or(inline_comment()),
            line_end()
        ),
    );
    node(Rule::Transaction, block(init_line, content_line))
}

// ============================================================================
// Directives
// ============================================================================

fn account_directive<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let header = seq!(
        tok(TokenKind::AccountKeyword),
        tok(TokenKind::AccountName),
        opt(tok(TokenKind::DoubleWs)),
        opt(inline_comment()),
        line_end(),
    );
    node(
        Rule::AccountDirective,
        block(
            header,
            comment_content_line(Rule::AccountDirectiveContentLine),
        ),
    )
}

fn commodity_directive<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let header = seq!(
        tok(TokenKind::CommodityKeyword),
        opt(amount().or(seq!(opt(ws()), tok(TokenKind::CommodityText)))),
        opt(ws()),
        opt(inline_comment()),
        line_end(),
    );
    let format = node(
        Rule::FormatSubdirective,
        seq!(
            tok(TokenKind::FormatKeyword),
            amount(),
            opt(ws()),
            opt(inline_comment()),
        ),
    );
    let content_line = node(
        Rule::CommodityDirectiveContentLine,
        seq!(
            tok(TokenKind::Indent),
            format.or(inline_comment()),
            line_end()
        ),
    );
    node(Rule::CommodityDirective, block(header, content_line))
}

fn default_commodity_directive<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let header = seq!(
        tok(TokenKind::DefaultCommodityKeyword),
        amount(),
        opt(ws()),
        opt(inline_comment()),
        line_end(),
    );
    node(
        Rule::DefaultCommodityDirective,
        block(
            header,
            comment_content_line(Rule::DefaultCommodityDirectiveContentLine),
        ),
    )
}

fn price_directive<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let header = seq!(
        tok(TokenKind::PriceKeyword),
        tok(TokenKind::SimpleDate),
        tok(TokenKind::PriceCommodity),
        amount(),
        opt(ws()),
        opt(inline_comment()),
        line_end(),
    );
    node(
        Rule::PriceDirective,
        block(header, comment_content_line(Rule::PriceDirectiveContentLine)),
    )
}

fn year_directive<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    let header = seq!(
        tok(TokenKind::YearKeyword),
        tok(TokenKind::YearValue),
        opt(inline_comment()),
        line_end(),
    );
    node(
        Rule::YearDirective,
        block(header, comment_content_line(Rule::YearDirectiveContentLine)),
    )
}

// ============================================================================
// Journal
// ============================================================================

fn journal_item<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], Children<'src>, TokExtra<'t, 'src>> + Clone {
    choice((
        transaction(),
        line_comment(),
        multiline_comment(),
        account_directive(),
        commodity_directive(),
        default_commodity_directive(),
        price_directive(),
        year_directive(),
    ))
}

fn journal<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], CstNode<'src>, TokExtra<'t, 'src>> {
    many(tok(TokenKind::Newline).or(journal_item()))
        .then_ignore(end())
        .map(|children| CstNode::new(Rule::Journal, children))
}

/// Skip tokens until after the next newline (for error recovery), together
/// with any indented lines that follow.
/// Consumes at least one token to make progress.
fn skip_item<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], (), TokExtra<'t, 'src>> + Clone {
    let rest_of_line = || {
        any()
            .filter(|t: &Token<'src>| t.kind != TokenKind::Newline)
            .repeated()
            .then(tok(TokenKind::Newline).or_not())
    };
    any()
        .then(rest_of_line())
        .then(tok(TokenKind::Indent).then(rest_of_line()).repeated())
        .to(())
}

fn journal_recovering<'t, 'src: 't>(
) -> impl Parser<'t, &'t [Token<'src>], CstNode<'src>, TokExtra<'t, 'src>> {
    tok(TokenKind::Newline)
        .or(journal_item())
        .map(Some)
        .recover_with(via_parser(skip_item().to(None)))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|runs| {
            let children = runs.into_iter().flatten().flatten().collect();
            CstNode::new(Rule::Journal, children)
        })
}

// ============================================================================
// Public API
// ============================================================================

/// Parse a token stream into a CST rooted at [`Rule::Journal`].
///
/// # Errors
///
/// Returns the first [`ParseError`]: the offending token and the journal
/// item rules that were being attempted for its line. The error carries no
/// line/column until resolved with [`ParseError::with_location`].
pub fn parse_tokens<'src>(tokens: &[Token<'src>]) -> Result<CstNode<'src>, ParseError> {
    let (output, errors) = journal().parse(tokens).into_output_errors();
    match (output, errors.into_iter().next()) {
        (Some(cst), None) => Ok(cst),
        (_, Some(err)) => Err(convert_error(tokens, &err)),
        (None, None) => Err(ParseError::new(
            ParseErrorKind::UnexpectedEof,
            end_span(tokens),
        )),
    }
}

/// Parse a token stream, skipping items that fail to parse.
///
/// Every skipped item (its line and any indented lines after it) is
/// reported and left out of the tree.
pub fn parse_tokens_recovering<'src>(
    tokens: &[Token<'src>],
) -> (Option<CstNode<'src>>, Vec<ParseError>) {
    let (output, errors) = journal_recovering().parse(tokens).into_output_errors();
    let errors = errors
        .iter()
        .map(|err| convert_error(tokens, err))
        .collect();
    (output, errors)
}

fn end_span(tokens: &[Token<'_>]) -> Span {
    let end = tokens.last().map_or(0, |t| t.span.end);
    Span::new(end, end)
}

fn convert_error(tokens: &[Token<'_>], err: &Rich<'_, Token<'_>>) -> ParseError {
    let index = err.span().start;
    let attempted = attempted_rules(tokens, index);
    // Failed token filters report no found token, only its position.
    let Some(found) = tokens.get(index) else {
        return ParseError::new(ParseErrorKind::UnexpectedEof, end_span(tokens))
            .with_attempted(attempted);
    };
    let at_line_start = index == 0 || tokens[index - 1].kind == TokenKind::Newline;
    let kind = if at_line_start && Rule::for_line_start(found.kind).is_none() {
        ParseErrorKind::InvalidLineStart(found.to_string())
    } else {
        ParseErrorKind::UnexpectedToken(found.to_string())
    };
    let mut error = ParseError::new(kind, found.span).with_attempted(attempted);
    if found.kind == TokenKind::Indent && at_line_start {
        error = error.with_hint("indented lines must follow a transaction or directive");
    }
    error
}

/// The journal item rules attempted for the line holding token `index`.
///
/// Walks back over indented lines to the header that owns them. When no
/// header can be found every item rule was attempted.
fn attempted_rules(tokens: &[Token<'_>], index: usize) -> Vec<Rule> {
    let mut i = index.min(tokens.len());
    loop {
        // Move to the first token of the current line.
        while i > 0 && tokens[i - 1].kind != TokenKind::Newline {
            i -= 1;
        }
        match tokens.get(i) {
            Some(first) if first.kind == TokenKind::Indent && i > 0 => i -= 1,
            Some(first) => {
                return Rule::for_line_start(first.kind)
                    .map_or_else(|| Rule::JOURNAL_ITEMS.to_vec(), |rule| vec![rule]);
            }
            None => return Rule::JOURNAL_ITEMS.to_vec(),
        }
    }
}
