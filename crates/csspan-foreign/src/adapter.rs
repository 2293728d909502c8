//! Range index over a spanned tree

use std::collections::HashMap;

use csspan_index::{RangeStore, RangeStoreBuilder};
use csspan_text::{OffsetRange, SourceText};

use crate::{ForeignError, SourceSpan, SpanNode};

/// Range lookup over any [`SpanNode`] tree.
///
/// Every node gets a pre-order ordinal. Only nodes with a span are indexed;
/// children of a spanless node hang under its nearest spanned ancestor.
/// Line/column lookups are 0-based, like the rest of the workspace.
pub struct ForeignIndex<'a, N> {
    source: &'a SourceText,
    nodes: Vec<&'a N>,
    /// Node address to ordinal
    ordinals: HashMap<usize, usize>,
    store: RangeStore<usize>,
}

impl<'a, N: SpanNode> ForeignIndex<'a, N> {
    pub fn build(source: &'a SourceText, root: &'a N) -> Result<Self, ForeignError> {
        let mut index = Self {
            source,
            nodes: Vec::new(),
            ordinals: HashMap::new(),
            store: RangeStore::new(),
        };
        let mut builder = RangeStore::builder(source);
        index.visit(&mut builder, root, None)?;
        index.store = builder.finish();

        tracing::debug!("Indexed {} of {} foreign nodes", index.store.len(), index.nodes.len());
        Ok(index)
    }

    fn visit(
        &mut self,
        builder: &mut RangeStoreBuilder<'_, usize>,
        node: &'a N,
        parent: Option<usize>,
    ) -> Result<(), ForeignError> {
        let ordinal = self.nodes.len();
        self.nodes.push(node);
        self.ordinals.insert(address(node), ordinal);

        let mut anchor = parent;
        if let Some(span) = node.span() {
            let range = span_offsets(builder.source(), span)?;
            builder.push_offsets(ordinal, parent, range)?;
            anchor = Some(ordinal);
        }
        for child in node.children() {
            self.visit(builder, child, anchor)?;
        }
        Ok(())
    }

    /// Number of visited nodes, spanned or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn store(&self) -> &RangeStore<usize> {
        &self.store
    }

    pub fn source(&self) -> &'a SourceText {
        self.source
    }

    pub fn ordinal_of(&self, node: &N) -> Option<usize> {
        self.ordinals.get(&address(node)).copied()
    }

    pub fn node(&self, ordinal: usize) -> Option<&'a N> {
        self.nodes.get(ordinal).copied()
    }

    pub fn range_of(&self, node: &N) -> Option<OffsetRange> {
        self.store.range_of(self.ordinal_of(node)?)
    }

    pub fn text_of(&self, node: &N) -> Option<&'a str> {
        self.source.slice_offsets(self.range_of(node)?).ok()
    }

    /// Node covering `offset`, descending one level below the top
    pub fn node_at_offset(&self, offset: usize) -> Option<&'a N> {
        self.node(self.store.node_at_offset(offset)?)
    }

    pub fn deepest_node_at_offset(&self, offset: usize) -> Option<&'a N> {
        self.node(self.store.deepest_node_at_offset(offset)?)
    }

    /// Node at a 0-based line/column; out-of-range positions are clamped
    pub fn node_at_location(&self, line: u32, column: u32) -> Option<&'a N> {
        let offset = self.source.offset_of(line, column, false).ok()?;
        self.node_at_offset(offset)
    }
}

fn address<N>(node: &N) -> usize {
    node as *const N as usize
}

/// Convert a 1-based span with an inclusive end into byte offsets
fn span_offsets(source: &SourceText, span: SourceSpan) -> Result<OffsetRange, ForeignError> {
    let start = source.offset_of(
        span.start.line.saturating_sub(1),
        span.start.column.saturating_sub(1),
        false,
    )?;
    let last = source.offset_of(
        span.end.line.saturating_sub(1),
        span.end.column.saturating_sub(1),
        false,
    )?;
    let end = match source.text()[last..].chars().next() {
        Some(ch) => last + ch.len_utf8(),
        None => last,
    };
    Ok(OffsetRange::new(start, end.max(start)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ForeignKind, ForeignNode, SourcePoint, parse};

    #[test]
    fn test_index_parsed_tree() {
        let css = ".a { color: red; }\n.b { top: 0; }";
        let source = SourceText::new(css);
        let root = parse(css).unwrap();
        let index = ForeignIndex::build(&source, &root).unwrap();

        assert_eq!(index.len(), 5);
        // Root has no span
        assert_eq!(index.store().len(), 4);
        assert_eq!(index.ordinal_of(&root), Some(0));
        assert_eq!(index.range_of(&root), None);

        let a = &root.nodes[0];
        assert_eq!(index.text_of(a), Some(".a { color: red; }"));
        assert_eq!(index.text_of(&a.nodes[0]), Some("color: red;"));
        assert_eq!(index.text_of(&root.nodes[1]), Some(".b { top: 0; }"));
    }

    #[test]
    fn test_lookup_by_offset_and_location() {
        let css = ".a { color: red; }\n.b { top: 0; }";
        let source = SourceText::new(css);
        let root = parse(css).unwrap();
        let index = ForeignIndex::build(&source, &root).unwrap();

        let decl = index.node_at_offset(6).unwrap();
        assert_eq!(decl.type_name(), "decl");
        let rule = index.node_at_offset(17).unwrap();
        assert_eq!(rule.kind, ForeignKind::Rule { selector: ".a".into() });
        // Newline between rules belongs to nothing
        assert!(index.node_at_offset(18).is_none());

        let top = index.node_at_location(1, 5).unwrap();
        assert_eq!(top.type_name(), "decl");
        assert_eq!(index.node_at_location(9, 0).map(|n| n.type_name()), Some("rule"));
    }

    #[test]
    fn test_spanless_parent_is_skipped() {
        let source = SourceText::new("abcdef");
        let point = |column: u32| SourcePoint {
            line: 1,
            column,
            offset: column as usize - 1,
        };
        let mut inner = ForeignNode::new(ForeignKind::Rule { selector: "x".into() }, None);
        inner.nodes.push(ForeignNode::new(
            ForeignKind::Comment { text: "c".into() },
            Some(SourceSpan {
                start: point(3),
                end: point(4),
            }),
        ));
        let mut root = ForeignNode::new(
            ForeignKind::Root,
            Some(SourceSpan {
                start: point(1),
                end: point(6),
            }),
        );
        root.nodes.push(inner);

        let index = ForeignIndex::build(&source, &root).unwrap();
        let comment = &root.nodes[0].nodes[0];
        assert_eq!(index.ordinal_of(comment), Some(2));
        assert_eq!(index.store().parent_of(2), Some(0));
        assert_eq!(index.text_of(comment), Some("cd"));
        assert_eq!(index.deepest_node_at_offset(3).map(|n| n.type_name()), Some("comment"));
    }

    #[test]
    fn test_multibyte_end_column() {
        let css = ".é { top: 0 }";
        let source = SourceText::new(css);
        let root = parse(css).unwrap();
        let index = ForeignIndex::build(&source, &root).unwrap();
        assert_eq!(index.text_of(&root.nodes[0]), Some(css));
    }
}
