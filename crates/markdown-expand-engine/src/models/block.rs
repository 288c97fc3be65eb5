/// Deepest heading level markdown can express.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Kind of a non-heading top-level block.
///
/// The splitter never looks inside these blocks; the kind is kept for
/// logging and for callers inspecting a parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    BlockQuote,
    List,
    CodeBlock,
    HtmlBlock,
    Table,
    ThematicBreak,
    FootnoteDefinition,
    /// A link reference definition (`[label]: /url "title"`).
    LinkDefinition,
    /// Anything else the parser reports at the top level.
    Other,
}

/// A heading block: its level and its inline content as markdown text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    level: u8,
    content: String,
}

impl Heading {
    /// Create a heading, clamping `level` into `1..=6`.
    pub fn new(level: u8, content: impl Into<String>) -> Self {
        Self {
            level: level.clamp(1, MAX_HEADING_LEVEL),
            content: content.into(),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Inline content exactly as written in the source, flattened to one line.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// A copy of this heading one level shallower. Level 1 stays at 1.
    #[must_use]
    pub fn demoted(&self) -> Self {
        Self::new(self.level.saturating_sub(1), self.content.clone())
    }

    /// Serialize as an ATX heading (`## content`).
    pub fn to_markdown(&self) -> String {
        let marker = "#".repeat(usize::from(self.level));
        if self.content.is_empty() {
            marker
        } else {
            format!("{marker} {}", self.content)
        }
    }
}

/// A top-level block of a parsed document.
///
/// Headings are parsed into [`Heading`]; every other block is carried as the
/// exact slice of source text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading(Heading),
    Opaque { kind: BlockKind, source: &'a str },
}

impl Block<'_> {
    /// The heading, if this block is one.
    pub fn as_heading(&self) -> Option<&Heading> {
        match self {
            Block::Heading(heading) => Some(heading),
            Block::Opaque { .. } => None,
        }
    }

    /// Whether this block opens a new section.
    pub fn is_anchor(&self) -> bool {
        self.as_heading().is_some_and(|h| h.level() == 1)
    }

    pub fn to_markdown(&self) -> String {
        match self {
            Block::Heading(heading) => heading.to_markdown(),
            Block::Opaque { source, .. } => (*source).to_string(),
        }
    }
}

/// Ordered sequence of top-level blocks of one source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTree<'a> {
    pub blocks: Vec<Block<'a>>,
}

impl<'a> BlockTree<'a> {
    pub fn new(blocks: Vec<Block<'a>>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of level-1 headings, i.e. the number of documents a split yields.
    pub fn anchor_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_anchor()).count()
    }
}
