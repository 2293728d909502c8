//! Cross-tree node locator
//!
//! Both trees index ranges against the same [`SourceText`], so a byte
//! offset means the same thing on either side.

use std::hash::Hash;

use csspan_foreign::{ForeignIndex, ForeignNode, print_foreign_node_with_details};
use csspan_index::RangeStore;
use csspan_light::{LightNode, NodeId, TransformResult, print_node_with_details};
use csspan_text::{OffsetRange, SourceText};

use crate::Error;

/// Which tree a lookup runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Light,
    Foreign,
}

/// Node found in either tree
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Light(&'a LightNode),
    Foreign(&'a ForeignNode),
}

impl NodeRef<'_> {
    pub fn side(&self) -> Side {
        match self {
            NodeRef::Light(_) => Side::Light,
            NodeRef::Foreign(_) => Side::Foreign,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            NodeRef::Light(node) => print_node_with_details(node),
            NodeRef::Foreign(node) => print_foreign_node_with_details(node),
        }
    }
}

/// Find the node in `other` matching a range from the opposite tree.
///
/// Looks one character past the start to step over the opening
/// delimiter, staying inside `range`.
pub fn project_across<K: Copy + Eq + Hash>(range: OffsetRange, other: &RangeStore<K>) -> Option<K> {
    let offset = if range.is_empty() {
        range.start
    } else {
        (range.start + 1).min(range.end - 1)
    };
    other.node_at_offset(offset)
}

/// Lookups over the engine tree and, when parsed, the foreign tree
pub struct Locator<'a> {
    light: &'a TransformResult,
    foreign: Option<ForeignIndex<'a, ForeignNode>>,
}

impl<'a> Locator<'a> {
    pub fn new(light: &'a TransformResult, foreign: Option<&'a ForeignNode>) -> Result<Self, Error> {
        let foreign = match foreign {
            Some(root) => Some(ForeignIndex::build(light.tree.source(), root)?),
            None => None,
        };
        Ok(Self { light, foreign })
    }

    pub fn source(&self) -> &'a SourceText {
        self.light.tree.source()
    }

    pub fn foreign_index(&self) -> Option<&ForeignIndex<'a, ForeignNode>> {
        self.foreign.as_ref()
    }

    /// Node covering a 0-based line/column. Positions past the end clamp.
    pub fn by_location(&self, side: Side, line: u32, column: u32) -> Option<NodeRef<'a>> {
        let offset = self.source().offset_of(line, column, false).ok()?;
        match side {
            Side::Light => self.light_node(self.light.store.node_at_offset(offset)?),
            Side::Foreign => self.foreign.as_ref()?.node_at_offset(offset).map(NodeRef::Foreign),
        }
    }

    /// Deepest node covering a 0-based line/column
    pub fn deepest_at_location(&self, side: Side, line: u32, column: u32) -> Option<NodeRef<'a>> {
        let offset = self.source().offset_of(line, column, false).ok()?;
        match side {
            Side::Light => self.light_node(self.light.store.deepest_node_at_offset(offset)?),
            Side::Foreign => self
                .foreign
                .as_ref()?
                .deepest_node_at_offset(offset)
                .map(NodeRef::Foreign),
        }
    }

    pub fn light_range(&self, id: NodeId) -> Option<OffsetRange> {
        self.light.store.range_of(id)
    }

    pub fn foreign_range(&self, node: &ForeignNode) -> Option<OffsetRange> {
        self.foreign.as_ref()?.range_of(node)
    }

    /// Foreign node matching an engine node
    pub fn project_to_foreign(&self, id: NodeId) -> Option<&'a ForeignNode> {
        let index = self.foreign.as_ref()?;
        let ordinal = project_across(self.light_range(id)?, index.store())?;
        index.node(ordinal)
    }

    /// Engine node matching a foreign node
    pub fn project_to_light(&self, node: &ForeignNode) -> Option<&'a LightNode> {
        let id = project_across(self.foreign_range(node)?, &self.light.store)?;
        self.light.tree.get(id)
    }

    fn light_node(&self, id: NodeId) -> Option<NodeRef<'a>> {
        self.light.tree.get(id).map(NodeRef::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csspan_text::SourceText;

    #[test]
    fn test_project_across_skips_opening_delimiter() {
        let source = SourceText::new("(ab)cd");
        let mut builder = RangeStore::builder(&source);
        builder.push_offsets('o', None, OffsetRange::new(0, 1)).unwrap();
        builder.push_offsets('i', None, OffsetRange::new(1, 4)).unwrap();
        let store = builder.finish();

        assert_eq!(project_across(OffsetRange::new(0, 4), &store), Some('i'));
        // Single character ranges use their own start
        assert_eq!(project_across(OffsetRange::new(0, 1), &store), Some('o'));
        assert_eq!(project_across(OffsetRange::new(0, 0), &store), Some('o'));
        assert_eq!(project_across(OffsetRange::new(5, 6), &store), None);
    }
}
