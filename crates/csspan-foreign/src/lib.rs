//! csspan Foreign Tree
//!
//! PostCSS-shaped CSS tree whose nodes carry explicit source spans, plus a
//! range index over it that shares offset semantics with the engine tree.

mod adapter;
mod node;
mod parser;
mod print;

pub use adapter::ForeignIndex;
pub use node::{ForeignKind, ForeignNode, SourcePoint, SourceSpan, SpanNode};
pub use parser::parse;
pub use print::print_foreign_node_with_details;

use csspan_index::IndexError;
use csspan_text::TextError;

/// Foreign tree error. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForeignError {
    #[error("Unclosed block at {line}:{column}")]
    UnclosedBlock { line: u32, column: u32 },

    #[error("Unclosed comment at {line}:{column}")]
    UnclosedComment { line: u32, column: u32 },

    #[error("Unclosed string at {line}:{column}")]
    UnclosedString { line: u32, column: u32 },

    #[error("Unexpected }} at {line}:{column}")]
    UnexpectedClose { line: u32, column: u32 },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Text(#[from] TextError),
}
