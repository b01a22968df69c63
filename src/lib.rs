//! # Introduction
//!
//! txtpp is a line-oriented conditional text preprocessor. Directive lines
//! embedded in an ordinary text file select which lines are kept and mutate a
//! set of named definitions as the file is read, top to bottom.
//!
//! ```text
//! world
//! @if HELLO
//! hello
//! @elif WORLD2
//! okay
//! @else
//! :thinking:
//! @end
//! @@ comments are dropped
//! @define SEEN
//! ```
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Interpreter → Output
//!                                              ↕
//!                                         Definitions
//! ```
//!
//! 1. [`parser`]: classifies lines into tokens and builds the AST.
//! 2. [`interpreter`]: walks the AST once, emitting text and applying
//!    `@define`/`@undef` to the caller's [`Definitions`].
//! 3. [`output`]: the emitted lines, which render back to text with each
//!    line's original terminator (`\n`, `\r\n`, or none).
//! 4. [`diagnostics`]: line-numbered parse errors.
//!
//! A file either parses completely and runs, or fails with a
//! [`ParseError`] and emits nothing.

pub mod definitions;
pub mod diagnostics;
pub mod interpreter;
pub mod output;
pub mod parser;

pub use definitions::Definitions;
pub use diagnostics::{ErrorLocation, ParseError, PreprocessError};
pub use output::Output;
pub use parser::ast::{LineEnding, TextLine};

use interpreter::engine::Interpreter;
use parser::lexer::Lexer;
use parser::parse::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// File identifier used for standard input in diagnostics
pub const STDIN_ID: &str = "<stdin>";

/// Preprocess `input`, mutating `defs` with every directive that runs.
pub fn preprocess(input: &str, defs: &mut Definitions) -> Result<Output, ParseError> {
    execute(Parser::new(input), defs)
}

/// Read all of `reader`, then preprocess it. `file_id` only prefixes errors.
pub fn preprocess_reader<R: BufRead>(
    reader: R,
    defs: &mut Definitions,
    file_id: &str,
) -> Result<Output, PreprocessError> {
    let lexer = Lexer::from_reader(reader).map_err(|source| PreprocessError::Io {
        file_id: file_id.to_string(),
        source,
    })?;

    execute(Parser::from_lexer(lexer), defs).map_err(|source| PreprocessError::Syntax {
        file_id: file_id.to_string(),
        source,
    })
}

/// Preprocess the file at `path`. The file is closed before this returns.
pub fn preprocess_file(
    path: impl AsRef<Path>,
    defs: &mut Definitions,
) -> Result<Output, PreprocessError> {
    let path = path.as_ref();
    let file_id = path.display().to_string();

    let file = File::open(path).map_err(|source| PreprocessError::Io {
        file_id: file_id.clone(),
        source,
    })?;

    preprocess_reader(BufReader::new(file), defs, &file_id)
}

fn execute(mut parser: Parser, defs: &mut Definitions) -> Result<Output, ParseError> {
    let root = parser.parse_file()?;
    Ok(Interpreter::new(defs).run(&root))
}
