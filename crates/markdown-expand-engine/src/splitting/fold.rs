use crate::models::{Block, Section};

/// Accumulator for grouping a block sequence into sections.
///
/// Each [`step`](Self::step) consumes one block and returns the next state, so
/// grouping is a plain `Iterator::fold`:
///
/// ```rust
/// # use markdown_expand_engine::models::{Block, Heading};
/// # use markdown_expand_engine::splitting::SectionFold;
/// let blocks = vec![
///     Block::Heading(Heading::new(1, "A")),
///     Block::Heading(Heading::new(2, "A.1")),
/// ];
/// let grouped = blocks.into_iter().fold(SectionFold::default(), SectionFold::step).finish();
/// assert_eq!(grouped.sections[0].body()[0].as_heading().unwrap().level(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SectionFold<'a> {
    finished: Vec<Section<'a>>,
    current: Option<Section<'a>>,
    leading: Vec<Block<'a>>,
}

/// Result of folding a whole block sequence.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Grouped<'a> {
    pub sections: Vec<Section<'a>>,
    /// Blocks seen before the first level-1 heading, unchanged.
    pub leading: Vec<Block<'a>>,
}

impl<'a> SectionFold<'a> {
    #[must_use]
    pub fn step(mut self, block: Block<'a>) -> Self {
        match block {
            Block::Heading(heading) if heading.level() == 1 => {
                self.finished.extend(self.current.take());
                self.current = Some(Section::new(heading));
            }
            block => match self.current.as_mut() {
                Some(section) => section.push(demote(block)),
                None => self.leading.push(block),
            },
        }
        self
    }

    pub fn finish(mut self) -> Grouped<'a> {
        self.finished.extend(self.current.take());
        Grouped {
            sections: self.finished,
            leading: self.leading,
        }
    }
}

fn demote(block: Block<'_>) -> Block<'_> {
    match block {
        Block::Heading(heading) => Block::Heading(heading.demoted()),
        other => other,
    }
}
