//! Concrete syntax tree.
//!
//! A [`CstNode`] records which grammar [`Rule`] matched and every token and
//! nested rule it consumed, in source order. Nothing is discarded: the
//! concatenated token texts of a tree, plus skipped blanks, reproduce the
//! source.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::{Span, Token, TokenKind};

/// Grammar rules that produce CST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Rule {
    /// The whole document.
    Journal,
    /// A transaction with its content lines.
    Transaction,
    /// The first line of a transaction.
    TransactionInitLine,
    /// Primary date with an optional `=date` posting date.
    TransactionDate,
    /// An indented posting or comment line inside a transaction.
    TransactionContentLine,
    /// Account and amounts of one posting.
    Posting,
    /// A signed number with an optional commodity.
    Amount,
    /// `@ amount`, `@@ amount`, `(@) amount` or `(@@) amount`.
    LotPrice,
    /// `= amount`, `== amount`, `=* amount` or `==* amount`.
    BalanceAssertion,
    /// `;`, `#` or `*` comment line.
    LineComment,
    /// `comment` ... `end comment` block.
    MultilineComment,
    /// One body line of a multiline comment.
    MultilineCommentItem,
    /// `account` directive.
    AccountDirective,
    /// Indented comment line of an `account` directive.
    AccountDirectiveContentLine,
    /// `commodity` directive.
    CommodityDirective,
    /// Indented line of a `commodity` directive.
    CommodityDirectiveContentLine,
    /// `format amount` inside a `commodity` directive.
    FormatSubdirective,
    /// `D` directive.
    DefaultCommodityDirective,
    /// Indented comment line of a `D` directive.
    DefaultCommodityDirectiveContentLine,
    /// `P` directive.
    PriceDirective,
    /// Indented comment line of a `P` directive.
    PriceDirectiveContentLine,
    /// `Y` / `year` / `apply year` directive.
    YearDirective,
    /// Indented comment line of a year directive.
    YearDirectiveContentLine,
    /// `;` followed by text and tags.
    InlineComment,
    /// One text run or tag of an inline comment.
    InlineCommentItem,
    /// `name:value`
    Tag,
}

impl Rule {
    /// The rules that can form a top-level journal item.
    pub const JOURNAL_ITEMS: [Self; 8] = [
        Self::Transaction,
        Self::LineComment,
        Self::MultilineComment,
        Self::AccountDirective,
        Self::CommodityDirective,
        Self::DefaultCommodityDirective,
        Self::PriceDirective,
        Self::YearDirective,
    ];

    /// The journal item started by a line whose first token has this kind.
    #[must_use]
    pub const fn for_line_start(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::DateAtStart => Self::Transaction,
            TokenKind::SemicolonAtStart | TokenKind::HashAtStart | TokenKind::AsteriskAtStart => {
                Self::LineComment
            }
            TokenKind::MultilineCommentStart => Self::MultilineComment,
            TokenKind::AccountKeyword => Self::AccountDirective,
            TokenKind::CommodityKeyword => Self::CommodityDirective,
            TokenKind::DefaultCommodityKeyword => Self::DefaultCommodityDirective,
            TokenKind::PriceKeyword => Self::PriceDirective,
            TokenKind::YearKeyword => Self::YearDirective,
            _ => return None,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A child of a CST node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CstElement<'src> {
    /// A token occurrence.
    Token(Token<'src>),
    /// A nested rule occurrence.
    Node(CstNode<'src>),
}

/// A matched grammar rule and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CstNode<'src> {
    /// The rule that matched.
    pub rule: Rule,
    /// Tokens and nested nodes, in source order.
    pub children: Vec<CstElement<'src>>,
}

impl<'src> CstNode<'src> {
    /// Create a node.
    #[must_use]
    pub const fn new(rule: Rule, children: Vec<CstElement<'src>>) -> Self {
        Self { rule, children }
    }

    /// First child node with the given rule.
    #[must_use]
    pub fn node(&self, rule: Rule) -> Option<&Self> {
        self.nodes(rule).next()
    }

    /// All child nodes with the given rule, in order.
    pub fn nodes(&self, rule: Rule) -> impl Iterator<Item = &Self> + '_ {
        self.child_nodes().filter(move |n| n.rule == rule)
    }

    /// All child nodes, in order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Self> + '_ {
        self.children.iter().filter_map(|c| match c {
            CstElement::Node(n) => Some(n),
            CstElement::Token(_) => None,
        })
    }

    /// First direct child token with the given kind.
    #[must_use]
    pub fn token(&self, kind: TokenKind) -> Option<&Token<'src>> {
        self.tokens(kind).next()
    }

    /// All direct child tokens with the given kind, in order.
    pub fn tokens(&self, kind: TokenKind) -> impl Iterator<Item = &Token<'src>> + '_ {
        self.child_tokens().filter(move |t| t.kind == kind)
    }

    /// All direct child tokens, in order.
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token<'src>> + '_ {
        self.children.iter().filter_map(|c| match c {
            CstElement::Token(t) => Some(t),
            CstElement::Node(_) => None,
        })
    }

    /// Every token under this node, depth first.
    #[must_use]
    pub fn all_tokens(&self) -> Vec<&Token<'src>> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token<'src>>) {
        for child in &self.children {
            match child {
                CstElement::Token(t) => out.push(t),
                CstElement::Node(n) => n.collect_tokens(out),
            }
        }
    }

    /// Byte span from the first to the last token under this node.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        let tokens = self.all_tokens();
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(first.span.merge(&last.span))
    }

    /// Summarize this node as rule and token-kind multiplicities.
    ///
    /// Tokens are counted; nested nodes are listed with their own shapes.
    /// Mostly useful in tests.
    #[must_use]
    pub fn shape(&self) -> Shape {
        let mut entries: BTreeMap<String, ShapeEntry> = BTreeMap::new();
        for child in &self.children {
            match child {
                CstElement::Token(t) => {
                    let entry = entries
                        .entry(t.kind.to_string())
                        .or_insert(ShapeEntry::Count(0));
                    if let ShapeEntry::Count(n) = entry {
                        *n += 1;
                    }
                }
                CstElement::Node(n) => {
                    let entry = entries
                        .entry(n.rule.to_string())
                        .or_insert_with(|| ShapeEntry::Nodes(Vec::new()));
                    if let ShapeEntry::Nodes(shapes) = entry {
                        shapes.push(n.shape());
                    }
                }
            }
        }
        Shape(entries)
    }
}

/// Multiplicity summary of a CST node. See [`CstNode::shape`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Shape(pub BTreeMap<String, ShapeEntry>);

/// One entry of a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ShapeEntry {
    /// Number of tokens of a kind.
    Count(usize),
    /// Shapes of the nested nodes of a rule.
    Nodes(Vec<Shape>),
}

impl Shape {
    /// Token count for a kind, or nested shapes for a rule.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShapeEntry> {
        self.0.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &'static str, start: usize) -> CstElement<'static> {
        CstElement::Token(Token::new(kind, text, Span::new(start, start + text.len())))
    }

    fn sample() -> CstNode<'static> {
        let comment = CstNode::new(
            Rule::InlineComment,
            vec![
                tok(TokenKind::SemicolonComment, ";", 9),
                CstElement::Node(CstNode::new(
                    Rule::InlineCommentItem,
                    vec![tok(TokenKind::InlineCommentText, "note", 10)],
                )),
            ],
        );
        CstNode::new(
            Rule::AccountDirective,
            vec![
                tok(TokenKind::AccountKeyword, "account", 0),
                tok(TokenKind::AccountName, "A", 8),
                CstElement::Node(comment),
                tok(TokenKind::Newline, "\n", 14),
            ],
        )
    }

    #[test]
    fn test_lookups() {
        let node = sample();
        assert_eq!(node.token(TokenKind::AccountName).map(|t| t.text), Some("A"));
        assert!(node.token(TokenKind::DoubleWs).is_none());
        assert_eq!(node.nodes(Rule::InlineComment).count(), 1);
        assert_eq!(node.all_tokens().len(), 5);
        assert_eq!(node.span(), Some(Span::new(0, 15)));
    }

    #[test]
    fn test_shape() {
        let shape = sample().shape();
        assert_eq!(shape.get("AccountKeyword"), Some(&ShapeEntry::Count(1)));
        assert_eq!(shape.get("Newline"), Some(&ShapeEntry::Count(1)));
        let Some(ShapeEntry::Nodes(comments)) = shape.get("InlineComment") else {
            panic!("missing inline comment shape");
        };
        assert_eq!(comments.len(), 1);
        assert_eq!(
            comments[0].get("SemicolonComment"),
            Some(&ShapeEntry::Count(1))
        );
    }

    #[test]
    fn test_line_start_rules() {
        assert_eq!(
            Rule::for_line_start(TokenKind::DateAtStart),
            Some(Rule::Transaction)
        );
        assert_eq!(Rule::for_line_start(TokenKind::Indent), None);
    }
}
