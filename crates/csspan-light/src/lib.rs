//! csspan Light Transform
//!
//! Builds a source-mapped AST from lightningcss visitor callbacks. The
//! engine reports starts only; ends are backfilled from the next start
//! at the same or a shallower depth.

mod builder;
mod config;
mod engine;
mod hints;
mod kind;
mod node;
mod print;
mod transform;
mod tree;

pub use builder::{TreeBuilder, VisitEvent};
pub use config::TransformConfig;
pub use kind::NodeKind;
pub use node::{LightNode, LocationOrigin, NodeData, NodeId, NodeLocation, NodeState};
pub use print::{print_node_location, print_node_with_details};
pub use transform::{TransformResult, transform};
pub use tree::{LightTree, NodeSummary};

use csspan_index::IndexError;
use csspan_text::TextError;

/// Transform error
#[derive(Debug, thiserror::Error)]
pub enum LightError {
    #[error("Parse error at {line}:{column}: {message}")]
    Parse { message: String, line: u32, column: u32 },

    #[error("Print error: {0}")]
    Print(String),

    #[error("Exit of {found} does not match open container {expected:?}")]
    UnbalancedExit {
        expected: Option<NodeKind>,
        found: NodeKind,
    },

    #[error("{kind} cannot be entered as a container")]
    NotContainer { kind: NodeKind },

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
