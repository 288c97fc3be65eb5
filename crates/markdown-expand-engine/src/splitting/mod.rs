//! Splitting a document into one document per level-1 section.
//!
//! The pipeline is parse → fold → serialize:
//!
//! 1. [`parse_blocks`] turns the source into a [`BlockTree`](crate::models::BlockTree)
//!    of top-level blocks.
//! 2. [`SectionFold`] groups the blocks under their level-1 anchors, demoting
//!    every nested heading by one level.
//! 3. Each [`Section`](crate::models::Section) renders to an [`OutputDocument`].
//!
//! Nothing here touches the filesystem; see [`crate::io`] for persistence.

mod fold;

pub use fold::{Grouped, SectionFold};

use serde::{Deserialize, Serialize};

use crate::models::OutputDocument;
use crate::parsing::{ParseOptions, parse_blocks};

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Failed to parse document: {0}")]
    Parse(#[from] std::str::Utf8Error),
    #[error("Document has {blocks} block(s) before its first level-1 heading")]
    LeadingContent { blocks: usize },
}

/// What to do with blocks that come before the first level-1 heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadingContent {
    /// Drop them. They have no destination document.
    #[default]
    Discard,
    /// Fail with [`SplitError::LeadingContent`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitOptions {
    pub parse: ParseOptions,
    pub leading_content: LeadingContent,
}

/// Split `source` with the default options (CommonMark, discard leading content).
pub fn split(source: &str) -> Result<Vec<OutputDocument>, SplitError> {
    split_with(source, &SplitOptions::default())
}

/// Split raw bytes, which must be valid UTF-8.
pub fn split_bytes(bytes: &[u8], options: &SplitOptions) -> Result<Vec<OutputDocument>, SplitError> {
    let source = std::str::from_utf8(bytes)?;
    split_with(source, options)
}

pub fn split_with(source: &str, options: &SplitOptions) -> Result<Vec<OutputDocument>, SplitError> {
    let tree = parse_blocks(source, &options.parse);
    let grouped = tree
        .blocks
        .into_iter()
        .fold(SectionFold::default(), SectionFold::step)
        .finish();

    if !grouped.leading.is_empty() {
        match options.leading_content {
            LeadingContent::Discard => log::warn!(
                "discarding {} block(s) before the first level-1 heading",
                grouped.leading.len()
            ),
            LeadingContent::Reject => {
                return Err(SplitError::LeadingContent {
                    blocks: grouped.leading.len(),
                });
            }
        }
    }

    let documents: Vec<OutputDocument> = grouped.sections.iter().map(|s| s.to_document()).collect();
    log::debug!("split into {} document(s)", documents.len());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn reject() -> SplitOptions {
        SplitOptions {
            leading_content: LeadingContent::Reject,
            ..SplitOptions::default()
        }
    }

    #[test]
    fn test_split_example_document() {
        let md = "# Intro\nSome text.\n# Chapter One\n## Section A\nBody A.\n# Chapter Two\nBody B.\n";

        let docs = split(md).unwrap();

        assert_eq!(
            docs,
            vec![
                OutputDocument::new("Intro", "Some text.\n"),
                OutputDocument::new("Chapter One", "# Section A\n\nBody A.\n"),
                OutputDocument::new("Chapter Two", "Body B.\n"),
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case("\n\n")]
    #[case("Just a paragraph.")]
    #[case("## Only a subheading\n\ntext")]
    fn test_no_anchor_yields_nothing(#[case] md: &str) {
        assert!(split(md).unwrap().is_empty());
    }

    #[test]
    fn test_reject_policy_fails_on_leading_content() {
        let err = split_with("Just a paragraph.", &reject()).unwrap_err();
        assert!(matches!(err, SplitError::LeadingContent { blocks: 1 }));
        assert!(err.to_string().contains("1 block(s)"));
    }

    #[test]
    fn test_reject_policy_accepts_clean_documents() {
        assert!(split_with("", &reject()).unwrap().is_empty());
        assert_eq!(split_with("# A\nbody", &reject()).unwrap().len(), 1);
    }

    #[test]
    fn test_discard_policy_drops_preamble() {
        let docs = split("preamble\n\n## early\n\n# Real\ncontent").unwrap();
        assert_eq!(docs, vec![OutputDocument::new("Real", "content\n")]);
    }

    #[test]
    fn test_duplicate_titles_are_preserved() {
        let docs = split("# A\nfoo\n# A\nbar").unwrap();
        assert_eq!(
            docs,
            vec![
                OutputDocument::new("A", "foo\n"),
                OutputDocument::new("A", "bar\n"),
            ]
        );
    }

    #[test]
    fn test_empty_anchor_gives_empty_title() {
        let docs = split("#\ntext").unwrap();
        assert_eq!(docs, vec![OutputDocument::new("", "text\n")]);
    }

    #[test]
    fn test_split_bytes_rejects_invalid_utf8() {
        let err = split_bytes(&[b'#', b' ', 0xff, 0xfe], &SplitOptions::default()).unwrap_err();
        assert!(matches!(err, SplitError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse document"));
    }

    #[test]
    fn test_split_bytes_accepts_utf8() {
        let docs = split_bytes("# Café\n☕".as_bytes(), &SplitOptions::default()).unwrap();
        assert_eq!(docs, vec![OutputDocument::new("Café", "☕\n")]);
    }
}
