//! Lexer (line classifier) for preprocessor input
//!
//! Splits the input into physical lines and converts each one into a
//! [`Token`]. Classification is whole-line: a directive pattern only applies
//! if it matches the entire line, otherwise the line is plain text. Comment
//! lines (`@@...`) produce no token but still occupy a line number, so every
//! token's [`SourceLocation`] is its raw position in the input.
//!
//! The lexer never fails. Malformed directives such as `@if` without an
//! identifier degrade to text.

use super::ast::{SourceLocation, TextLine};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    combinator::{eof, map, rest, value},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use std::fmt;
use std::io::{self, BufRead};
use tracing::trace;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line without a separate token→line table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(TextLine, SourceLocation),

    // Conditionals
    If(String, SourceLocation),
    IfNot(String, SourceLocation),
    Elif(String, SourceLocation),
    ElifNot(String, SourceLocation),
    Else(SourceLocation),
    End(SourceLocation),

    // Definition set mutation
    Define(String, SourceLocation),
    Undef(String, SourceLocation),

    // End of input, located one past the last line
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Text(_, loc)
            | Token::If(_, loc)
            | Token::IfNot(_, loc)
            | Token::Elif(_, loc)
            | Token::ElifNot(_, loc)
            | Token::Else(loc)
            | Token::End(loc)
            | Token::Define(_, loc)
            | Token::Undef(_, loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(..) => write!(f, "text line"),
            Token::If(key, _) => write!(f, "'@if {}'", key),
            Token::IfNot(key, _) => write!(f, "'@ifnot {}'", key),
            Token::Elif(key, _) => write!(f, "'@elif {}'", key),
            Token::ElifNot(key, _) => write!(f, "'@elifnot {}'", key),
            Token::Else(_) => write!(f, "'@else'"),
            Token::End(_) => write!(f, "'@end'"),
            Token::Define(key, _) => write!(f, "'@define {}'", key),
            Token::Undef(key, _) => write!(f, "'@undef {}'", key),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// A recognised directive line
#[derive(Debug, Clone, PartialEq)]
enum Directive {
    Comment,
    If(String),
    IfNot(String),
    Elif(String),
    ElifNot(String),
    Else,
    End,
    Define(String),
    Undef(String),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

fn space0(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

fn space1(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace)(input)
}

/// `@ keyword ident`, which must span the whole line
fn keyword_with_ident<'a>(
    keyword: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    map(
        terminated(
            preceded(tuple((tag("@"), space0, tag(keyword), space1)), identifier),
            eof,
        ),
        |ident: &str| ident.to_string(),
    )
}

/// `@ keyword` with optional trailing whitespace, spanning the whole line
fn bare_keyword<'a>(keyword: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
    value((), tuple((tag("@"), space0, tag(keyword), space0, eof)))
}

/// Match a full line against the directive patterns, in priority order
fn directive(line: &str) -> IResult<&str, Directive> {
    alt((
        value(Directive::Comment, preceded(tag("@@"), rest)),
        map(keyword_with_ident("if"), Directive::If),
        map(keyword_with_ident("ifnot"), Directive::IfNot),
        map(keyword_with_ident("elif"), Directive::Elif),
        map(keyword_with_ident("elifnot"), Directive::ElifNot),
        value(Directive::Else, bare_keyword("else")),
        value(Directive::End, bare_keyword("end")),
        map(keyword_with_ident("define"), Directive::Define),
        map(keyword_with_ident("undef"), Directive::Undef),
    ))(line)
}

/// Split raw text into lines, recording each line's terminator.
///
/// Both `\n` and `\r\n` end a line. A lone `\r` is line content.
pub fn split_lines(input: &str) -> Vec<TextLine> {
    input.split_inclusive('\n').map(TextLine::from_raw).collect()
}

/// Lexer for preprocessor input
pub struct Lexer {
    lines: Vec<TextLine>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            lines: split_lines(input),
        }
    }

    /// Read every line from `reader` up front.
    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut lines = Vec::new();
        let mut buf = String::new();

        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            lines.push(TextLine::from_raw(&buf));
        }

        Ok(Self { lines })
    }

    /// The raw input lines, terminators stripped
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<TextLine> {
        self.lines
    }

    /// Tokenize the entire input. The last token is always [`Token::Eof`].
    pub fn tokenize(&self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.lines.len() + 1);

        for (index, line) in self.lines.iter().enumerate() {
            let location = SourceLocation::new(index + 1);
            if let Some(token) = classify_line(line, location) {
                tokens.push(token);
            }
        }

        tokens.push(Token::Eof(SourceLocation::new(self.lines.len() + 1)));
        tokens
    }
}

/// Classify one line. Returns `None` for comments.
fn classify_line(line: &TextLine, location: SourceLocation) -> Option<Token> {
    let directive = match directive(&line.content) {
        Ok((_, directive)) => directive,
        Err(_) => return Some(Token::Text(line.clone(), location)),
    };

    trace!(line = location.line, ?directive, "directive");

    let token = match directive {
        Directive::Comment => return None,
        Directive::If(key) => Token::If(key, location),
        Directive::IfNot(key) => Token::IfNot(key, location),
        Directive::Elif(key) => Token::Elif(key, location),
        Directive::ElifNot(key) => Token::ElifNot(key, location),
        Directive::Else => Token::Else(location),
        Directive::End => Token::End(location),
        Directive::Define(key) => Token::Define(key, location),
        Directive::Undef(key) => Token::Undef(key, location),
    };
    Some(token)
}
