//! Directive language parser
//!
//! This module transforms preprocessor input into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Line classification (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Directive Language
//!
//! Each directive occupies a whole line:
//! - `@@ ...` comment, dropped
//! - `@if NAME` / `@ifnot NAME` open a condition
//! - `@elif NAME` / `@elifnot NAME` / `@else` continue it
//! - `@end` closes it
//! - `@define NAME` / `@undef NAME` mutate the definition set
//!
//! Any other line is text. There is no expression syntax and no escaping.
//!
//! # Parser Implementation
//!
//! Hand-written LL(1) recursive descent parser. Directive lines are matched
//! with small `nom` combinators.

pub mod ast;
pub mod lexer;
pub mod parse;
