//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct: a one-token-lookahead recursive
//! descent parser over the lexer's token stream.
//!
//! # Grammar
//!
//! ```text
//! file        ::= lines Eof
//! lines       ::= { line }
//! line        ::= Text | Define | Undef | condition
//! condition   ::= (If | IfNot) lines [else_clause] End
//! else_clause ::= (Elif | ElifNot) lines [else_clause]
//!               | Else lines
//! ```
//!
//! An `@elif` chain never consumes its own `@end`: each `@elif` becomes a
//! condition nested in the else branch of the previous one, and only the
//! outermost `@if`/`@ifnot` consumes the single `@end` for the whole chain.
//!
//! The chain itself is parsed with a loop, so its length is unbounded. Nesting
//! of `@if` blocks recurses and is capped at [`MAX_NESTING`].
//!
//! Parsing is all-or-nothing. The first error aborts the file and no partial
//! tree is returned.

use crate::diagnostics::ParseError;
use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token};
use tracing::debug;

/// Deepest `@if` nesting accepted before parsing fails
pub const MAX_NESTING: usize = 256;

/// Recursive descent parser for the directive language
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Open conditions around the current token
    depth: usize,
    /// Raw input lines, for quoting in diagnostics
    lines: Vec<TextLine>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    pub fn from_lexer(lexer: Lexer) -> Self {
        let tokens = lexer.tokenize();
        Self {
            tokens,
            position: 0,
            depth: 0,
            lines: lexer.into_lines(),
        }
    }

    /// Parse the entire file into its root block
    pub fn parse_file(&mut self) -> Result<Block, ParseError> {
        let root = self.parse_lines()?;

        if !self.is_at_end() {
            return Err(self.dangling_directive());
        }

        debug!(statements = root.len(), "parsed file");
        Ok(root)
    }

    /// `lines ::= { line }`, stopping at the first token outside FIRST(line)
    fn parse_lines(&mut self) -> Result<Block, ParseError> {
        let mut block = Block::new();

        while self.starts_line() {
            block.nodes.push(self.parse_line()?);
        }

        Ok(block)
    }

    fn parse_line(&mut self) -> Result<Node, ParseError> {
        match self.advance().clone() {
            Token::Text(line, _) => Ok(Node::Text(line)),
            Token::Define(name, location) => Ok(Node::Define { name, location }),
            Token::Undef(name, location) => Ok(Node::Undef { name, location }),
            Token::If(key, location) => self.parse_condition(key, false, location),
            Token::IfNot(key, location) => self.parse_condition(key, true, location),
            other => Err(self.error_at(
                other.location(),
                format!("expected a line or @if, found {}", other),
            )),
        }
    }

    /// Parse the rest of a condition whose `@if`/`@ifnot` was just consumed
    fn parse_condition(
        &mut self,
        key: String,
        negated: bool,
        location: SourceLocation,
    ) -> Result<Node, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at(
                location,
                format!("conditions nested deeper than {}", MAX_NESTING),
            ));
        }

        self.depth += 1;
        let parsed = self.parse_condition_body(key, negated, location);
        self.depth -= 1;
        parsed
    }

    fn parse_condition_body(
        &mut self,
        key: String,
        negated: bool,
        location: SourceLocation,
    ) -> Result<Node, ParseError> {
        let body = self.parse_lines()?;
        let else_branch = self.parse_else_clause()?;

        self.expect_token(&Token::End(self.current_location()), "expected @end")?;

        Ok(Node::Condition(Condition {
            key,
            negated,
            body,
            else_branch,
            location,
        }))
    }

    /// Collect every `@elif`/`@elifnot` and an optional `@else`, then link
    /// them back to front into one chain.
    fn parse_else_clause(&mut self) -> Result<Option<ElseBranch>, ParseError> {
        let mut elifs = Vec::new();
        let mut tail = None;

        loop {
            if self.match_token(&Token::Else(self.current_location())) {
                tail = Some(ElseBranch::Else(self.parse_lines()?));
                break;
            }

            let (key, negated, location) = match self.peek() {
                Token::Elif(key, location) => (key.clone(), false, *location),
                Token::ElifNot(key, location) => (key.clone(), true, *location),
                _ => break,
            };
            self.advance();

            elifs.push(Condition {
                key,
                negated,
                body: self.parse_lines()?,
                else_branch: None,
                location,
            });
        }

        Ok(elifs.into_iter().rev().fold(tail, |else_branch, mut cond| {
            cond.else_branch = else_branch;
            Some(ElseBranch::Elif(Box::new(cond)))
        }))
    }

    /// Error for a token left over after the top-level `lines`
    fn dangling_directive(&self) -> ParseError {
        let message = match self.peek() {
            Token::Elif(..) => "elif without matching if".to_string(),
            Token::ElifNot(..) => "elifnot without matching if".to_string(),
            Token::Else(_) => "else without matching if".to_string(),
            Token::End(_) => "end without matching if".to_string(),
            other => format!("unexpected {}", other),
        };
        self.error_here(message)
    }

    // ===== Helper methods =====

    fn starts_line(&self) -> bool {
        matches!(
            self.peek(),
            Token::Text(..)
                | Token::Define(..)
                | Token::Undef(..)
                | Token::If(..)
                | Token::IfNot(..)
        )
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!("{}, found {}", message, self.peek())))
        }
    }

    /// Error located at the current token, or at `<eof>`
    fn error_here(&self, message: String) -> ParseError {
        if self.is_at_end() {
            ParseError::at_eof(message)
        } else {
            self.error_at(self.current_location(), message)
        }
    }

    fn error_at(&self, location: SourceLocation, message: String) -> ParseError {
        let text = location
            .line
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(|line| line.content.clone())
            .unwrap_or_default();
        ParseError::at_line(location, text, message)
    }
}
