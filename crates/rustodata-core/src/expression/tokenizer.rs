//! Tokenizer for `$filter` and `$orderby` expressions.
//!
//! Produces a flat, position-tagged [`TokenStream`]. Literal tokens are typed
//! here, once, using the narrowest-fit rule (see [`EdmLiteral::integer`]).
//! Operator keywords (`eq`, `and`, `not`, ...) and method names are plain
//! identifiers; the parser resolves them through the operator table.

use std::fmt;

use super::error::ExpressionError;
use super::literal::{self, EdmLiteral};

// ---------------------------------------------------------------------------
// Token type
// ---------------------------------------------------------------------------

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A typed literal.
    Literal,
    /// A name: property, keyword, operator, or method.
    Identifier,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
    /// `/`
    Slash,
    /// `.`
    Dot,
    /// `-` not followed by a digit.
    Minus,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("literal"),
            Self::Identifier => f.write_str("identifier"),
            Self::OpenParen => f.write_str("'('"),
            Self::CloseParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::Slash => f.write_str("'/'"),
            Self::Dot => f.write_str("'.'"),
            Self::Minus => f.write_str("'-'"),
        }
    }
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Byte offset of the token in the source expression.
    pub position: usize,
    /// Raw source text.
    pub text: String,
    /// Resolved value for [`TokenKind::Literal`] tokens.
    pub literal: Option<EdmLiteral>,
}

impl Token {
    /// Returns `true` if this is the identifier `word`.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn invalid(&self, start: usize) -> ExpressionError {
        let end = self.pos.max(start + 1).min(self.input.len());
        ExpressionError::InvalidToken {
            position: start,
            text: self.input.get(start..end).unwrap_or_default().to_owned(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ExpressionError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            let start = self.pos;
            let token = match c {
                '(' => self.punct(TokenKind::OpenParen),
                ')' => self.punct(TokenKind::CloseParen),
                ',' => self.punct(TokenKind::Comma),
                '/' => self.punct(TokenKind::Slash),
                '.' => self.punct(TokenKind::Dot),
                '\'' => {
                    let value = self.quoted(start)?;
                    self.literal(start, EdmLiteral::string(value))
                }
                '-' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.number(start)?,
                '-' => self.punct(TokenKind::Minus),
                c if c.is_ascii_digit() => self.number(start)?,
                c if is_ident_start(c) => self.word(start)?,
                _ => {
                    self.bump();
                    return Err(self.invalid(start));
                }
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn punct(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.bump();
        Token {
            kind,
            position: start,
            text: self.input[start..self.pos].to_owned(),
            literal: None,
        }
    }

    fn literal(&self, start: usize, literal: EdmLiteral) -> Token {
        Token {
            kind: TokenKind::Literal,
            position: start,
            text: self.input[start..self.pos].to_owned(),
            literal: Some(literal),
        }
    }

    /// Read a `'...'` body with `''` as the escaped quote.
    fn quoted(&mut self, start: usize) -> Result<String, ExpressionError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.bump();
                    value.push('\'');
                }
                Some('\'') => return Ok(value),
                Some(c) => value.push(c),
                None => return Err(self.invalid(start)),
            }
        }
    }

    fn number(&mut self, start: usize) -> Result<Token, ExpressionError> {
        if self.peek() == Some('-') {
            self.bump();
        }
        self.eat_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                if signed {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }

        if self
            .peek()
            .is_some_and(|c| matches!(c.to_ascii_uppercase(), 'L' | 'M' | 'D' | 'F'))
            && !self.peek_nth(1).is_some_and(is_ident_part)
        {
            self.bump();
        }

        if self.peek().is_some_and(is_ident_part) {
            self.eat_while(is_ident_part);
            return Err(self.invalid(start));
        }

        let text = &self.input[start..self.pos];
        let literal = literal::parse_number(text).ok_or_else(|| self.invalid(start))?;
        Ok(self.literal(start, literal))
    }

    fn word(&mut self, start: usize) -> Result<Token, ExpressionError> {
        self.eat_while(is_ident_part);
        let input = self.input;
        let word = &input[start..self.pos];

        if literal::is_typed_prefix(word) && self.peek() == Some('\'') {
            let prefix_end = self.pos;
            let body = self.quoted(start)?;
            let prefix = &input[start..prefix_end];
            let literal = literal::parse_typed(prefix, &body).ok_or_else(|| self.invalid(start))?;
            return Ok(self.literal(start, literal));
        }

        let literal = match word {
            "null" => Some(EdmLiteral::null()),
            "true" => Some(EdmLiteral::boolean(true)),
            "false" => Some(EdmLiteral::boolean(false)),
            _ => None,
        };
        Ok(match literal {
            Some(literal) => self.literal(start, literal),
            None => Token {
                kind: TokenKind::Identifier,
                position: start,
                text: word.to_owned(),
                literal: None,
            },
        })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Token stream
// ---------------------------------------------------------------------------

/// A position-tagged token sequence with one-token lookahead.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl TokenStream {
    /// The token at the cursor, if any.
    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// The most recently consumed token, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Consume and return the token at the cursor.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume a token of `kind` or fail.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ExpressionError> {
        if let Some(token) = self.tokens.get(self.pos).filter(|t| t.kind == kind).cloned() {
            self.pos += 1;
            return Ok(token);
        }
        Err(ExpressionError::UnexpectedToken {
            position: self.position(),
            expected: kind.to_string(),
            found: self
                .peek()
                .map_or_else(|| "end of input".to_owned(), ToString::to_string),
        })
    }

    /// Consume a token of `kind` if it is next. Returns whether it was consumed.
    pub fn accept(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the identifier `word` if it is next. Returns whether it was consumed.
    pub fn accept_word(&mut self, word: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_word(word)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Returns `true` when every token has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Byte offset of the cursor (the end of input once exhausted).
    #[must_use]
    pub fn position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.position)
    }
}

/// Tokenize an expression string.
pub fn tokenize(input: &str) -> Result<TokenStream, ExpressionError> {
    let tokens = Lexer::new(input).tokenize()?;
    Ok(TokenStream {
        tokens,
        pos: 0,
        end: input.len(),
    })
}
