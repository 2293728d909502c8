//! Engine tree nodes

use serde::Serialize;

use csspan_text::{LineColumn, TextRange};

use crate::NodeKind;

/// Node identifier (index into the tree arena, creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where an embedded location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationOrigin {
    /// Reported by the engine
    Engine,
    /// Found by scanning the source for the node's signature
    Scanned,
}

/// Start location carried by a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeLocation {
    pub position: LineColumn,
    pub origin: LocationOrigin,
}

/// Owned snapshot of a visitor payload.
///
/// The builder only looks at `location`; `label` and `detail` are kept
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    pub label: String,
    pub detail: Option<String>,
    pub location: Option<NodeLocation>,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
            location: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_location(mut self, position: LineColumn, origin: LocationOrigin) -> Self {
        self.location = Some(NodeLocation { position, origin });
        self
    }
}

/// Range resolution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Start known, end not yet seen
    Provisional { start: LineColumn },
    /// Backfilled
    Resolved { range: TextRange },
}

/// Engine tree node
#[derive(Debug, Clone)]
pub struct LightNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub data: NodeData,
    /// Number of open containers when the node was visited
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub(crate) state: NodeState,
}

impl LightNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind, data: NodeData, depth: usize, start: LineColumn) -> Self {
        Self {
            id,
            kind,
            data,
            depth,
            parent: None,
            prev: None,
            next: None,
            children: Vec::new(),
            state: NodeState::Provisional { start },
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn start(&self) -> LineColumn {
        match self.state {
            NodeState::Provisional { start } => start,
            NodeState::Resolved { range } => range.start,
        }
    }

    /// Resolved range, `None` while provisional
    pub fn range(&self) -> Option<TextRange> {
        match self.state {
            NodeState::Resolved { range } => Some(range),
            NodeState::Provisional { .. } => None,
        }
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, NodeState::Resolved { .. })
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
