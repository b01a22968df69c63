// AST (Abstract Syntax Tree) definitions for the preprocessor

/// Source location information for error reporting
///
/// Lines are 1-based and count every physical input line, including comment
/// and blank lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
}

impl SourceLocation {
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

/// Line terminator found at the end of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A literal line of text, as it appeared in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// Line content without its terminator
    pub content: String,
    /// The terminator the input line ended in. Only the last line of a file
    /// can lack one.
    pub newline: Option<LineEnding>,
}

impl TextLine {
    pub fn new(content: impl Into<String>, newline: Option<LineEnding>) -> Self {
        TextLine {
            content: content.into(),
            newline,
        }
    }

    /// Split a raw line that may still carry its terminator
    pub fn from_raw(raw: &str) -> Self {
        if let Some(content) = raw.strip_suffix("\r\n") {
            TextLine::new(content, Some(LineEnding::CrLf))
        } else if let Some(content) = raw.strip_suffix('\n') {
            TextLine::new(content, Some(LineEnding::Lf))
        } else {
            TextLine::new(raw, None)
        }
    }
}

/// A statement of the directive language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Emitted verbatim when reached
    Text(TextLine),
    /// `@define NAME`
    Define {
        name: String,
        location: SourceLocation,
    },
    /// `@undef NAME`
    Undef {
        name: String,
        location: SourceLocation,
    },
    /// `@if` / `@ifnot` with its body and else chain
    Condition(Condition),
}

/// Sequence of sibling statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub nodes: Vec<Node>,
}

impl Block {
    pub fn new() -> Self {
        Block { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A conditional branch: `truth = key ∈ definitions XOR negated`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub negated: bool,
    pub body: Block,
    pub else_branch: Option<ElseBranch>,
    pub location: SourceLocation,
}

// Unlink elif chains one link at a time; the derived drop would recurse once
// per `@elif`.
impl Drop for Condition {
    fn drop(&mut self) {
        let mut next = self.else_branch.take();
        while let Some(ElseBranch::Elif(mut cond)) = next {
            next = cond.else_branch.take();
        }
    }
}

/// What runs when a condition evaluates to false
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElseBranch {
    /// `@elif` / `@elifnot`: a nested condition sharing the outer `@end`
    Elif(Box<Condition>),
    /// Terminal `@else`
    Else(Block),
}
