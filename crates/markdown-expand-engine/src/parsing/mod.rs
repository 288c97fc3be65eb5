//! Top-level block parsing on top of `pulldown-cmark`.
//!
//! Only the outermost block structure is interpreted. Headings are parsed into
//! [`Heading`] values; every other block keeps its exact source text so that
//! syntax the splitter does not understand survives untouched.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockKind, BlockTree, Heading};

/// Markdown dialect used for parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Enable GitHub-flavoured extensions: tables, strikethrough, task lists
    /// and footnotes. Plain CommonMark when false.
    pub gfm: bool,
}

impl ParseOptions {
    fn cmark_options(self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
        } else {
            Options::empty()
        }
    }
}

/// Parse `source` into its sequence of top-level blocks.
///
/// The parser accepts any input; link reference definitions, which produce no
/// events, are recovered from the source between the scanned blocks so that
/// every definition survives, including repeated labels.
pub fn parse_blocks<'a>(source: &'a str, options: &ParseOptions) -> BlockTree<'a> {
    let parser = Parser::new_ext(source, options.cmark_options());

    let mut scan = TopLevelScan::default();
    for (event, range) in parser.into_offset_iter() {
        scan.push(event, range);
    }
    let mut scanned = scan.finish();
    scanned.sort_by_key(|b| b.range.start);

    let definitions = definition_blocks(source, &scanned);
    scanned.extend(definitions);
    scanned.sort_by_key(|b| b.range.start);

    let blocks: Vec<Block<'a>> = scanned.into_iter().map(|b| b.into_block(source)).collect();
    log::debug!("parsed {} top-level blocks", blocks.len());
    BlockTree::new(blocks)
}

#[derive(Debug)]
enum ScannedKind {
    Heading(u8),
    Opaque(BlockKind),
}

#[derive(Debug)]
struct ScannedBlock {
    range: Range<usize>,
    kind: ScannedKind,
    /// Union of the inline event ranges, for headings.
    content: Option<Range<usize>>,
}

impl ScannedBlock {
    fn into_block(self, source: &str) -> Block<'_> {
        match self.kind {
            ScannedKind::Heading(level) => {
                let heading_start = self.range.start;
                let content = self
                    .content
                    .map(|inline| {
                        let start = heading_content_start(source, heading_start).min(inline.start);
                        flatten_lines(&source[start..inline.end])
                    })
                    .unwrap_or_default();
                Block::Heading(Heading::new(level, content))
            }
            ScannedKind::Opaque(kind) => Block::Opaque {
                kind,
                source: block_source(source, &self.range),
            },
        }
    }
}

/// Tracks nesting depth so only blocks at depth zero are recorded.
#[derive(Debug, Default)]
struct TopLevelScan {
    depth: usize,
    open: Option<ScannedBlock>,
    blocks: Vec<ScannedBlock>,
}

impl TopLevelScan {
    fn push(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                if self.depth == 0 {
                    self.open = Some(ScannedBlock {
                        range,
                        kind: classify(&tag),
                        content: None,
                    });
                } else {
                    self.extend_content(&range);
                }
                self.depth += 1;
            }
            Event::End(_) => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth > 0 {
                    self.extend_content(&range);
                } else if let Some(mut block) = self.open.take() {
                    block.range.end = block.range.end.max(range.end);
                    self.blocks.push(block);
                }
            }
            Event::Rule if self.depth == 0 => self.blocks.push(ScannedBlock {
                range,
                kind: ScannedKind::Opaque(BlockKind::ThematicBreak),
                content: None,
            }),
            _ if self.depth == 0 => self.blocks.push(ScannedBlock {
                range,
                kind: ScannedKind::Opaque(BlockKind::Other),
                content: None,
            }),
            _ => self.extend_content(&range),
        }
    }

    fn extend_content(&mut self, range: &Range<usize>) {
        if let Some(block) = self.open.as_mut()
            && matches!(block.kind, ScannedKind::Heading(_))
        {
            block.content = Some(match block.content.take() {
                Some(current) => current.start.min(range.start)..current.end.max(range.end),
                None => range.clone(),
            });
        }
    }

    fn finish(self) -> Vec<ScannedBlock> {
        self.blocks
    }
}

fn classify(tag: &Tag<'_>) -> ScannedKind {
    let kind = match tag {
        Tag::Heading { level, .. } => return ScannedKind::Heading(heading_level_to_u8(level)),
        Tag::Paragraph => BlockKind::Paragraph,
        Tag::BlockQuote(_) => BlockKind::BlockQuote,
        Tag::List(_) => BlockKind::List,
        Tag::CodeBlock(_) => BlockKind::CodeBlock,
        Tag::HtmlBlock => BlockKind::HtmlBlock,
        Tag::Table(_) => BlockKind::Table,
        Tag::FootnoteDefinition(_) => BlockKind::FootnoteDefinition,
        _ => BlockKind::Other,
    };
    ScannedKind::Opaque(kind)
}

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Source text of a block: widened back to the start of its line when only
/// indentation precedes it, with trailing whitespace removed.
fn block_source<'a>(source: &'a str, range: &Range<usize>) -> &'a str {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let indent = &source[line_start..range.start];
    let start = if indent.chars().all(|c| c == ' ' || c == '\t') {
        line_start
    } else {
        range.start
    };
    source[start..range.end].trim_end()
}

/// Offset where a heading's text begins: past the indentation, any ATX `#`
/// run and the whitespace after it. The inline events alone are not enough:
/// an escaped character's range starts after its backslash.
fn heading_content_start(source: &str, heading_start: usize) -> usize {
    let rest = &source[heading_start..];
    let after_indent = rest.trim_start_matches(' ');
    let after_marker = after_indent.trim_start_matches('#');
    let text = after_marker.trim_start_matches([' ', '\t']);
    heading_start + (rest.len() - text.len())
}

/// Link reference definitions produce no events. They are the non-blank runs
/// of source left between the top-level blocks, each starting with `[`.
fn definition_blocks(source: &str, scanned: &[ScannedBlock]) -> Vec<ScannedBlock> {
    let mut gaps = Vec::new();
    let mut cursor = 0;
    for block in scanned {
        if block.range.start > cursor {
            gaps.push(cursor..block.range.start);
        }
        cursor = cursor.max(block.range.end);
    }
    if cursor < source.len() {
        gaps.push(cursor..source.len());
    }

    gaps.into_iter()
        .flat_map(|gap| non_blank_runs(source, gap))
        .filter(|run| source[run.clone()].trim_start().starts_with('['))
        .map(|range| ScannedBlock {
            range,
            kind: ScannedKind::Opaque(BlockKind::LinkDefinition),
            content: None,
        })
        .collect()
}

/// Split `gap` into runs of consecutive non-blank lines.
fn non_blank_runs(source: &str, gap: Range<usize>) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut run: Option<Range<usize>> = None;
    let mut offset = gap.start;
    for line in source[gap].split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim().is_empty() {
            runs.extend(run.take());
        } else {
            run = Some(run.map_or(offset..end, |r| r.start..end));
        }
        offset = end;
    }
    runs.extend(run);
    runs
}

/// Join the lines of multi-line heading content with single spaces.
fn flatten_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
