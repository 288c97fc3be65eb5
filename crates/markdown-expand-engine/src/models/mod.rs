pub mod block;
pub mod section;

pub use block::{Block, BlockKind, BlockTree, Heading, MAX_HEADING_LEVEL};
pub use section::{OutputDocument, Section};
