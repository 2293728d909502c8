//! Engine tree arena

use std::fmt::Write;

use serde::Serialize;

use csspan_index::RangeStore;
use csspan_text::{OffsetRange, SourceText, TextRange};

use crate::print::{print_node_location, print_node_with_details};
use crate::{LightError, LightNode, NodeData, NodeId, NodeKind};

/// Tree built from one visitor event stream.
///
/// Owns the source it was built against so node text can be sliced on
/// demand. Nodes are stored in creation order, which is pre-order.
#[derive(Debug, Clone)]
pub struct LightTree {
    source: SourceText,
    nodes: Vec<LightNode>,
    roots: Vec<NodeId>,
}

/// Serializable view of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub depth: usize,
    pub range: Option<TextRange>,
    pub text: Option<String>,
}

impl LightTree {
    pub(crate) fn new(source: SourceText, nodes: Vec<LightNode>, roots: Vec<NodeId>) -> Self {
        Self { source, nodes, roots }
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&LightNode> {
        self.nodes.get(id.index())
    }

    /// Top-level nodes in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All nodes in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &LightNode> {
        self.nodes.iter()
    }

    /// Payloads in creation order
    pub fn payloads(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().map(|node| &node.data)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &LightNode> {
        let children = self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[]);
        children.iter().filter_map(move |&child| self.get(child))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &LightNode> {
        std::iter::successors(self.get(id).and_then(|node| node.parent), move |&parent| {
            self.get(parent).and_then(|node| node.parent)
        })
        .filter_map(move |ancestor| self.get(ancestor))
    }

    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        self.get(id)?.range()
    }

    pub fn offset_range(&self, id: NodeId) -> Option<OffsetRange> {
        self.source.offset_range(self.range(id)?).ok()
    }

    /// Source text covered by a node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.source.slice_range(self.range(id)?).ok()
    }

    /// Index every resolved node by range
    pub fn build_store(&self) -> Result<RangeStore<NodeId>, LightError> {
        let mut builder = RangeStore::builder(&self.source);
        for node in &self.nodes {
            let Some(range) = node.range() else {
                tracing::warn!("Node {:?} ({}) left unresolved", node.id, node.kind);
                continue;
            };
            builder.push(node.id, node.parent, range)?;
        }
        Ok(builder.finish())
    }

    pub fn summary(&self) -> Vec<NodeSummary> {
        self.nodes
            .iter()
            .map(|node| NodeSummary {
                id: node.id,
                kind: node.kind,
                label: node.data.label.clone(),
                depth: node.depth,
                range: node.range(),
                text: self.text(node.id).map(str::to_owned),
            })
            .collect()
    }

    /// Indented outline of the tree, one node per line
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let indent = "  ".repeat(node.depth);
            let _ = write!(out, "{}{}", indent, print_node_with_details(node));
            if let Some(location) = print_node_location(node) {
                let _ = write!(out, " {}", location);
            }
            match node.range() {
                Some(range) => {
                    let _ = writeln!(out, " [{}]", range);
                }
                None => out.push('\n'),
            }
        }
        out
    }
}
