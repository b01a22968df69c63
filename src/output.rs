// Output buffer for emitted text lines

use crate::parser::ast::TextLine;
use std::io::{self, Write};

/// Lines emitted by one interpreter run, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    lines: Vec<TextLine>,
}

impl Output {
    pub fn new() -> Self {
        Output { lines: Vec::new() }
    }

    pub fn emit(&mut self, line: TextLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Line contents without newline information
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.content.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the lines back into text, each with the terminator it had in
    /// the input
    pub fn render(&self) -> String {
        let capacity = self.lines.iter().map(|line| line.content.len() + 2).sum();
        let mut text = String::with_capacity(capacity);
        for line in &self.lines {
            text.push_str(&line.content);
            if let Some(ending) = line.newline {
                text.push_str(ending.as_str());
            }
        }
        text
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in &self.lines {
            writer.write_all(line.content.as_bytes())?;
            if let Some(ending) = line.newline {
                writer.write_all(ending.as_str().as_bytes())?;
            }
        }
        writer.flush()
    }
}
