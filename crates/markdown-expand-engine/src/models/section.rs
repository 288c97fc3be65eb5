use serde::{Deserialize, Serialize};

use super::block::{Block, Heading};

/// A level-1 heading together with the blocks that follow it.
///
/// Body headings are stored already demoted; the anchor is never part of the
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    anchor: Heading,
    body: Vec<Block<'a>>,
}

impl<'a> Section<'a> {
    pub fn new(anchor: Heading) -> Self {
        Self {
            anchor,
            body: Vec::new(),
        }
    }

    pub fn anchor(&self) -> &Heading {
        &self.anchor
    }

    pub fn body(&self) -> &[Block<'a>] {
        &self.body
    }

    pub(crate) fn push(&mut self, block: Block<'a>) {
        self.body.push(block);
    }

    /// The anchor's inline markdown with surrounding whitespace removed.
    pub fn title(&self) -> String {
        self.anchor.content().trim().to_string()
    }

    /// Serialize the body: blocks separated by a blank line, one trailing
    /// newline, and nothing at all for an empty body.
    pub fn content(&self) -> String {
        if self.body.is_empty() {
            return String::new();
        }
        let mut out = self
            .body
            .iter()
            .map(Block::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }

    pub fn to_document(&self) -> OutputDocument {
        OutputDocument {
            title: self.title(),
            content: self.content(),
        }
    }
}

/// One document produced by a split, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub title: String,
    pub content: String,
}

impl OutputDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
