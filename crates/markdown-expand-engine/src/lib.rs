pub mod io;
pub mod models;
pub mod parsing;
pub mod splitting;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::{ExpandOptions, Expansion, IoError, PlannedDocument, expand_file, plan_expansion};
pub use models::{Block, BlockKind, BlockTree, Heading, OutputDocument, Section};
pub use parsing::{ParseOptions, parse_blocks};
pub use splitting::{
    LeadingContent, SectionFold, SplitError, SplitOptions, split, split_bytes, split_with,
};
