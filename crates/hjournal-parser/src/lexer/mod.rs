//! Mode-stack lexer.
//!
//! The lexer keeps an explicit stack of [`Mode`]s. Only the patterns of the
//! top mode are tried at each offset, so the same characters can mean
//! different things depending on context: `(` starts a virtual account in a
//! posting but is an ordinary name character after `account`.
//!
//! Every line terminator outside a multiline comment resets the stack to
//! `[Default]`, so no construct leaks state into the next line.

mod modes;
mod token;

pub use modes::Mode;
pub use token::{NumberLiteral, Token, TokenKind};

pub(crate) use token::parse_decimal;

use modes::Transition;

use crate::error::LexError;
use crate::Span;

/// Closes a multiline comment when it starts a body line.
const END_COMMENT: &str = "end comment";

/// The construct whose indented content lines follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Transaction,
    Commodity,
    Directive,
}

impl Block {
    const fn content_mode(self) -> Mode {
        match self {
            Self::None | Self::Transaction => Mode::PostingLine,
            Self::Commodity => Mode::CommodityContent,
            Self::Directive => Mode::DirectiveContent,
        }
    }
}

/// Tokenize journal source.
///
/// # Errors
///
/// Returns a [`LexError`] at the first offset where no pattern of the active
/// mode matches.
///
/// # Example
///
/// ```
/// use hjournal_parser::{tokenize, TokenKind};
///
/// let tokens = tokenize("P 2024-01-01 USD 1.35 CAD\n").unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds[..3], [TokenKind::PriceKeyword, TokenKind::SimpleDate, TokenKind::PriceCommodity]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    stack: Vec<Mode>,
    block: Block,
    tokens: Vec<Token<'src>>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            stack: vec![Mode::Default],
            block: Block::None,
            tokens: Vec::new(),
        }
    }

    fn mode(&self) -> Mode {
        self.stack.last().copied().unwrap_or(Mode::Default)
    }

    fn run(mut self) -> Result<Vec<Token<'src>>, LexError> {
        while self.offset < self.source.len() {
            let mode = self.mode();
            let Some(step) = mode.next_lexeme(&self.source[self.offset..]) else {
                break;
            };
            let lexeme =
                step.map_err(|span| LexError::new(self.source, self.offset + span.start, mode))?;
            let start = self.offset + lexeme.span.start;
            let end = self.offset + lexeme.span.end;
            self.offset = end;
            match lexeme.kind {
                Some(kind) => self.emit(kind, start, end, lexeme.transition),
                None => self.apply(lexeme.transition),
            }
        }
        tracing::trace!(tokens = self.tokens.len(), "lexed source");
        Ok(self.tokens)
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text = &self.source[start..end];
        self.tokens.push(Token::new(kind, text, Span::new(start, end)));
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize, transition: Transition) {
        match kind {
            TokenKind::TagName => {
                // The matched text includes the colon.
                self.push_token(TokenKind::TagName, start, end - 1);
                self.push_token(TokenKind::TagColon, end - 1, end);
                self.apply(transition);
            }
            TokenKind::MultilineCommentText
                if self.tokens.last().map(|t| t.kind)
                    == Some(TokenKind::MultilineCommentNewline)
                    && self.source[start..end].starts_with(END_COMMENT) =>
            {
                // Anything after the marker and its blanks is lexed as line
                // start input, where it fails.
                let after = &self.source[start + END_COMMENT.len()..end];
                let blanks = after.len() - after.trim_start_matches([' ', '\t']).len();
                let end = start + END_COMMENT.len() + blanks;
                self.push_token(TokenKind::MultilineCommentEnd, start, end);
                self.offset = end;
                self.apply(Transition::Pop);
            }
            TokenKind::Newline => {
                self.push_token(kind, start, end);
                self.stack.truncate(1);
            }
            _ => {
                if let Some(block) = Self::block_opened_by(kind) {
                    self.block = block;
                }
                self.push_token(kind, start, end);
                self.apply(transition);
            }
        }
    }

    const fn block_opened_by(kind: TokenKind) -> Option<Block> {
        Some(match kind {
            TokenKind::DateAtStart => Block::Transaction,
            TokenKind::CommodityKeyword | TokenKind::DefaultCommodityKeyword => Block::Commodity,
            TokenKind::AccountKeyword | TokenKind::PriceKeyword | TokenKind::YearKeyword => {
                Block::Directive
            }
            TokenKind::SemicolonAtStart
            | TokenKind::HashAtStart
            | TokenKind::AsteriskAtStart
            | TokenKind::MultilineCommentStart => Block::None,
            _ => return None,
        })
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Push(mode) => self.stack.push(mode),
            Transition::Pop => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            Transition::Replace(mode) => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
                self.stack.push(mode);
            }
            Transition::PushContent => self.stack.push(self.block.content_mode()),
        }
        tracing::trace!(mode = ?self.mode(), depth = self.stack.len(), "lexer mode");
    }
}
